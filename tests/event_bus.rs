//! Event bus tests against a live composer session

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::harness;
use emote_input::event_bus::{callback, topics, Payload};
use serde_json::json;

#[test]
fn test_subscribe_all_once_waits_for_every_topic() {
    let mut h = harness();
    let seen: Rc<RefCell<Vec<Vec<Payload>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    h.runtime
        .bus()
        .subscribe_all_once(&[topics::CHARACTER_COUNT, topics::IS_EMPTY], move |payloads| {
            sink.borrow_mut().push(payloads)
        })
        .unwrap();

    // Typing flips the empty state at once; the count waits for the debounce
    h.type_text("a");
    assert!(seen.borrow().is_empty());

    h.wait_ms(25);
    assert_eq!(
        *seen.borrow(),
        vec![vec![json!({ "value": 1 }), json!({ "isEmpty": false })]]
    );

    // Never again
    h.type_text("b");
    h.wait_ms(25);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_late_subscriber_gets_replay() {
    let mut h = harness();
    h.type_text("abc");
    h.runtime.flush();

    let got = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&got);
    h.runtime
        .bus()
        .subscribe(
            topics::CHARACTER_COUNT,
            callback(move |data| *sink.borrow_mut() = Some(data.clone())),
            true,
            false,
        )
        .unwrap();

    assert_eq!(*got.borrow(), Some(json!({ "value": 3 })));
}

#[test]
fn test_unsubscribed_listener_is_not_called() {
    let mut h = harness();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let listener = callback(move |_| *counter.borrow_mut() += 1);

    let bus = h.runtime.bus().clone();
    bus.subscribe(topics::IS_EMPTY, Rc::clone(&listener), false, false)
        .unwrap();
    h.type_text("a");
    bus.unsubscribe(topics::IS_EMPTY, &listener);
    h.press("backspace");

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_teardown_clears_bus_and_timer() {
    let mut h = harness();
    h.type_text("a");
    assert!(h.runtime.next_deadline().is_some());

    h.runtime.teardown();

    assert!(h.runtime.next_deadline().is_none());
    assert_eq!(h.runtime.bus().listener_count(topics::CHARACTER_COUNT), 0);
    assert_eq!(h.runtime.bus().last_payload(topics::IS_EMPTY), None);

    // A torn-down bus delivers nothing
    h.clear_events();
    h.type_text("b");
    h.runtime.flush();
    assert!(h.events.borrow().is_empty());
}
