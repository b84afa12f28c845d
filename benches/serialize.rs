//! Benchmarks for serialization and paste tokenization
//!
//! Run with: cargo bench serialize

use std::rc::Rc;

use emote_input::catalog::{Emote, StaticCatalog};
use emote_input::editable::Composer;
use emote_input::event_bus::EventBus;
use emote_input::platform::ManualPlatform;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn catalog() -> StaticCatalog {
    StaticCatalog::new((0..500).map(|i| Emote::new(i.to_string(), format!("Emote{}", i))))
}

fn composer() -> Composer {
    Composer::new(
        Rc::new(catalog()),
        Rc::new(ManualPlatform::new()),
        EventBus::new(),
    )
}

/// `words` words, every third one an emote name
fn chat_text(words: usize) -> String {
    (0..words)
        .map(|i| {
            if i % 3 == 0 {
                format!("Emote{}", i % 500)
            } else {
                "word".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Serialization
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn process_content(bencher: divan::Bencher, words: usize) {
    let mut composer = composer();
    composer.set_content(&chat_text(words));

    bencher.bench_local(|| {
        divan::black_box(composer.process_content().character_count);
    });
}

#[divan::bench(args = [10, 100, 1_000])]
fn draft_text(bencher: divan::Bencher, words: usize) {
    let mut composer = composer();
    composer.set_content(&chat_text(words));

    bencher.bench_local(|| divan::black_box(composer.draft_text()));
}

// ============================================================================
// Paste tokenization
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn paste_into_empty(bencher: divan::Bencher, words: usize) {
    let lines = vec![chat_text(words)];

    bencher
        .with_inputs(composer)
        .bench_local_values(|mut composer| {
            divan::black_box(composer.parse_and_insert_paste(&lines));
        });
}

#[divan::bench]
fn paste_into_middle_of_large_draft(bencher: divan::Bencher) {
    let lines = vec![chat_text(50)];

    bencher
        .with_inputs(|| {
            let mut composer = composer();
            composer.set_content(&chat_text(2_000));
            composer
        })
        .bench_local_values(|mut composer| {
            divan::black_box(composer.parse_and_insert_paste(&lines));
        });
}

// ============================================================================
// Editing
// ============================================================================

#[divan::bench]
fn backspace_through_large_draft(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| {
            let mut composer = composer();
            composer.set_content(&chat_text(500));
            composer
        })
        .bench_local_values(|mut composer| {
            while composer.delete_backward() {}
            composer
        });
}
