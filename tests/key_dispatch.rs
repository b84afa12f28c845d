//! Key arbitration tests - host handlers competing with the composer

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{doc_string, harness, id};
use emote_input::dispatcher::Flow;
use emote_input::event_bus::topics;
use emote_input::keymap::{KeyCode, KeyPhase};
use emote_input::model::KeyOutcome;

#[test]
fn test_earlier_handler_vetoes_submit() {
    let mut h = harness();
    h.runtime
        .model_mut()
        .add_key_handler(KeyPhase::Down, 5, |_, event| {
            if event.key == KeyCode::Enter {
                Flow::Halt
            } else {
                Flow::Continue
            }
        });

    h.type_text("hi");
    assert_eq!(h.press("enter"), KeyOutcome::Prevented);
    assert!(h.events_on(topics::SUBMIT).is_empty());
}

#[test]
fn test_later_handler_only_sees_unclaimed_keys() {
    let mut h = harness();
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    h.runtime
        .model_mut()
        .add_key_handler(KeyPhase::Down, 15, move |_, _| {
            counter.set(counter.get() + 1);
            Flow::Continue
        });

    h.type_text("abc");
    assert_eq!(seen.get(), 0);

    assert_eq!(h.press("escape"), KeyOutcome::Default);
    assert_eq!(seen.get(), 1);
}

#[test]
fn test_autocomplete_handler_edits_composer() {
    let mut h = harness();
    h.runtime
        .model_mut()
        .add_key_handler(KeyPhase::Down, 1, |composer, event| {
            if event.key == KeyCode::Tab {
                composer.insert_token(&id("25"));
                Flow::Halt
            } else {
                Flow::Continue
            }
        });

    h.type_text("hi ");
    assert_eq!(h.press("tab"), KeyOutcome::Prevented);
    assert_eq!(doc_string(h.composer()), "hi {25}");
}

#[test]
fn test_removed_handler_no_longer_runs() {
    let mut h = harness();
    let handler = h
        .runtime
        .model_mut()
        .add_key_handler(KeyPhase::Down, 0, |_, _| Flow::Halt);

    h.type_text("a");
    assert!(h.composer().document().is_empty());

    assert!(h
        .runtime
        .model_mut()
        .remove_key_handler(KeyPhase::Down, handler));
    h.type_text("a");
    assert_eq!(doc_string(h.composer()), "a");
}

#[test]
fn test_once_handler_runs_a_single_time() {
    let mut h = harness();
    h.runtime
        .model_mut()
        .keys
        .add_listener_once(KeyPhase::Down, 0, |_, _| Flow::Halt);

    h.type_text("ab");
    assert_eq!(doc_string(h.composer()), "b");
}

#[test]
fn test_key_up_handlers_are_separate() {
    let mut h = harness();
    let ups = Rc::new(Cell::new(0));
    let counter = Rc::clone(&ups);
    h.runtime
        .model_mut()
        .add_key_handler(KeyPhase::Up, 0, move |_, _| {
            counter.set(counter.get() + 1);
            Flow::Continue
        });

    h.type_text("xy");
    assert_eq!(ups.get(), 2);
    assert_eq!(doc_string(h.composer()), "xy");
}

#[test]
fn test_history_handler_runs_after_composer() {
    let h = harness();
    let keys = &h.runtime.model().keys;

    assert_eq!(keys.listener_count(KeyPhase::Down), 2);
    assert_eq!(keys.listener_count(KeyPhase::Up), 1);
}
