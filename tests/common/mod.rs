//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use emote_input::catalog::{Emote, StaticCatalog};
use emote_input::config::ComposerConfig;
use emote_input::editable::{Segment, TokenId};
use emote_input::event_bus::{callback, topics, EventBus, Payload};
use emote_input::keymap::{parse_key_string, KeyEvent};
use emote_input::model::KeyOutcome;
use emote_input::platform::{ManualPlatform, Platform};
use emote_input::{Composer, Runtime};

/// Catalog used across the integration tests
pub fn test_catalog() -> StaticCatalog {
    StaticCatalog::new([
        Emote::new("25", "Kappa"),
        Emote::new("88", "PogChamp"),
        Emote::new("2", "KEKW"),
        Emote::new("9", "<3"),
    ])
}

/// A runtime on a virtual clock, with every bus event recorded
pub struct Harness {
    pub runtime: Runtime,
    pub clock: Rc<ManualPlatform>,
    pub events: Rc<RefCell<Vec<(String, Payload)>>>,
}

pub fn harness() -> Harness {
    harness_with(ComposerConfig::default(), ManualPlatform::new())
}

pub fn harness_with(config: ComposerConfig, platform: ManualPlatform) -> Harness {
    let clock = Rc::new(platform);
    let bus = EventBus::new();
    let events = record_events(&bus);
    let runtime = Runtime::with_config(
        config,
        Rc::new(test_catalog()),
        Rc::clone(&clock) as Rc<dyn Platform>,
        bus,
    );
    Harness {
        runtime,
        clock,
        events,
    }
}

fn record_events(bus: &EventBus) -> Rc<RefCell<Vec<(String, Payload)>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    for topic in [topics::CHARACTER_COUNT, topics::IS_EMPTY, topics::SUBMIT] {
        let events = Rc::clone(&events);
        bus.subscribe(
            topic,
            callback(move |data| {
                events
                    .borrow_mut()
                    .push((topic.to_string(), data.clone()))
            }),
            false,
            false,
        )
        .unwrap();
    }
    events
}

impl Harness {
    pub fn composer(&self) -> &Composer {
        self.runtime.composer()
    }

    /// Type `text` one key at a time
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.runtime.press(KeyEvent::char(ch));
        }
    }

    /// Press a key described like `"ctrl+backspace"`
    pub fn press(&mut self, key: &str) -> KeyOutcome {
        let event = parse_key_string(key).unwrap();
        self.runtime.press(event)
    }

    /// Advance the virtual clock and let due timers fire
    pub fn wait_ms(&mut self, ms: u64) -> bool {
        self.clock.advance_ms(ms);
        self.runtime.tick()
    }

    /// Payloads published on `topic`, oldest first
    pub fn events_on(&self, topic: &str) -> Vec<Payload> {
        self.events
            .borrow()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, data)| data.clone())
            .collect()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Document rendered compactly: text as-is, tokens as `{id}`
pub fn doc_string(composer: &Composer) -> String {
    composer
        .document()
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Token(token) => format!("{{{}}}", token.id),
        })
        .collect()
}

pub fn id(s: &str) -> TokenId {
    TokenId::new(s)
}
