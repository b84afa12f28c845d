//! Text editing tests - typing, deletion, word deletion, replacement

mod common;

use common::{doc_string, harness};
use emote_input::model::KeyOutcome;

// ========================================================================
// Typing
// ========================================================================

#[test]
fn test_typing_builds_single_text_run() {
    let mut h = harness();
    h.type_text("hello");

    assert_eq!(doc_string(h.composer()), "hello");
    assert_eq!(h.composer().document().segment_count(), 1);
    assert_eq!(h.composer().caret(), 5);
}

#[test]
fn test_typing_is_serialized_after_debounce() {
    let mut h = harness();
    h.type_text("hello");

    assert!(h.composer().needs_processing());
    assert_eq!(h.composer().message(), "");

    assert!(h.wait_ms(25));
    assert_eq!(h.composer().message(), "hello");
    assert_eq!(h.composer().character_count(), 5);
}

#[test]
fn test_typed_space_after_plain_word() {
    let mut h = harness();
    h.type_text("hello world");

    assert_eq!(doc_string(h.composer()), "hello world");
    assert_eq!(h.composer().document().token_count(), 0);
}

#[test]
fn test_character_count_counts_scalar_values() {
    let mut h = harness();
    h.type_text("héllo 😀");
    h.runtime.flush();

    assert_eq!(h.composer().message(), "héllo 😀");
    assert_eq!(h.composer().character_count(), 7);
}

#[test]
fn test_unclaimed_key_keeps_default_action() {
    let mut h = harness();
    assert_eq!(h.press("escape"), KeyOutcome::Default);
    assert_eq!(h.press("tab"), KeyOutcome::Default);
    assert_eq!(h.press("a"), KeyOutcome::Prevented);
}

// ========================================================================
// Deletion
// ========================================================================

#[test]
fn test_backspace_deletes_previous_char() {
    let mut h = harness();
    h.type_text("hello");
    h.press("backspace");

    assert_eq!(doc_string(h.composer()), "hell");
    assert_eq!(h.composer().caret(), 4);
}

#[test]
fn test_backspace_on_empty_is_noop() {
    let mut h = harness();
    let outcome = h.press("backspace");

    assert_eq!(outcome, KeyOutcome::Prevented);
    assert_eq!(h.composer().revision(), 0);
    assert!(h.runtime.next_deadline().is_none());
}

#[test]
fn test_delete_forward_at_start() {
    let mut h = harness();
    h.type_text("abc");
    h.press("home");
    h.press("delete");

    assert_eq!(doc_string(h.composer()), "bc");
    assert_eq!(h.composer().caret(), 0);
}

#[test]
fn test_delete_forward_at_end_is_noop() {
    let mut h = harness();
    h.type_text("abc");
    let revision = h.composer().revision();
    h.press("delete");

    assert_eq!(doc_string(h.composer()), "abc");
    assert_eq!(h.composer().revision(), revision);
}

#[test]
fn test_ctrl_backspace_deletes_words() {
    let mut h = harness();
    h.type_text("hello world");

    h.press("ctrl+backspace");
    assert_eq!(doc_string(h.composer()), "hello ");

    h.press("ctrl+backspace");
    assert_eq!(doc_string(h.composer()), "");
    assert!(h.composer().document().is_empty());
}

#[test]
fn test_alt_backspace_is_word_delete() {
    let mut h = harness();
    h.type_text("one two");
    h.press("alt+backspace");

    assert_eq!(doc_string(h.composer()), "one ");
}

#[test]
fn test_ctrl_delete_deletes_word_and_trailing_space() {
    let mut h = harness();
    h.type_text("hello world");
    h.press("home");
    h.press("ctrl+delete");

    assert_eq!(doc_string(h.composer()), "world");
    assert_eq!(h.composer().caret(), 0);
}

#[test]
fn test_ctrl_backspace_stops_at_punctuation() {
    let mut h = harness();
    h.type_text("wow!!");
    h.press("ctrl+backspace");

    assert_eq!(doc_string(h.composer()), "");

    h.type_text("a.b");
    h.press("ctrl+backspace");
    assert_eq!(doc_string(h.composer()), "a.");
}

// ========================================================================
// Selection replacement
// ========================================================================

#[test]
fn test_typing_replaces_select_all() {
    let mut h = harness();
    h.type_text("hello");
    h.press("ctrl+a");
    h.type_text("x");

    assert_eq!(doc_string(h.composer()), "x");
    assert_eq!(h.composer().caret(), 1);
}

#[test]
fn test_shift_left_selection_replaced_by_typing() {
    let mut h = harness();
    h.type_text("hello");
    h.press("shift+left");
    h.press("shift+left");

    let sel = h.composer().selection().unwrap();
    assert_eq!((sel.anchor, sel.head), (5, 3));

    h.type_text("p");
    assert_eq!(doc_string(h.composer()), "help");
}

#[test]
fn test_backspace_removes_selection() {
    let mut h = harness();
    h.type_text("hello");
    h.press("ctrl+a");
    h.press("backspace");

    assert!(h.composer().document().is_empty());
    assert_eq!(h.composer().caret(), 0);
}

#[test]
fn test_home_and_end() {
    let mut h = harness();
    h.type_text("abc");
    h.press("home");
    h.type_text("x");
    h.press("end");
    h.type_text("y");

    assert_eq!(doc_string(h.composer()), "xabcy");
}

#[test]
fn test_shift_home_selects_to_start() {
    let mut h = harness();
    h.type_text("abc");
    h.press("shift+home");

    let sel = h.composer().selection().unwrap();
    assert_eq!(sel.range(), 0..3);
    assert!(sel.is_reversed());
}
