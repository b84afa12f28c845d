//! Session script replay tests

mod common;

use common::{doc_string, harness};
use emote_input::catalog::{EmoteCatalog, StaticCatalog};
use emote_input::event_bus::topics;
use emote_input::script::Script;

#[test]
fn test_sample_catalog_parses() {
    let catalog = StaticCatalog::from_yaml(include_str!("../samples/emotes.yaml")).unwrap();
    assert_eq!(catalog.len(), 4);
    assert!(catalog.emote_id_by_name("<3").is_some());
}

#[test]
fn test_sample_session_replay() {
    let script = Script::from_yaml(include_str!("../samples/session.yaml")).unwrap();
    let mut h = harness();
    let clock = std::rc::Rc::clone(&h.clock);

    script.run(&mut h.runtime, &clock);
    h.runtime.flush();

    let history: Vec<&str> = h.composer().history().iter().collect();
    assert_eq!(history, vec!["hello Kappa PogChamp gg"]);

    // Up recalled the submitted message
    assert_eq!(doc_string(h.composer()), "hello {25} {88} gg");
    assert_eq!(
        h.composer().message(),
        "hello [emote:25:Kappa] [emote:88:PogChamp] gg"
    );
    assert_eq!(h.events_on(topics::SUBMIT).len(), 1);
}

#[test]
fn test_wait_steps_drive_the_clock() {
    let script = Script::from_yaml("- type: abc\n- wait_ms: 10\n- wait_ms: 15\n").unwrap();
    let mut h = harness();
    let clock = std::rc::Rc::clone(&h.clock);

    script.run(&mut h.runtime, &clock);

    assert_eq!(h.composer().message(), "abc");
    assert_eq!(h.events_on(topics::CHARACTER_COUNT).len(), 1);
}

#[test]
fn test_resync_step_adopts_surface_tree() {
    let script = Script::from_yaml(
        r#"
- type: "hi "
- resync:
    - text: "hi "
    - component:
        id: "25"
        parts: [leading_marker, { body: "<img>" }, trailing_marker]
    - line_break
"#,
    )
    .unwrap();
    let mut h = harness();
    let clock = std::rc::Rc::clone(&h.clock);

    script.run(&mut h.runtime, &clock);
    assert_eq!(doc_string(h.composer()), "hi {25}");
}
