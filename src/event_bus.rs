//! Publish/subscribe event bus for composer-to-host notifications
//!
//! The bus remembers the last payload published per topic (the replay cache)
//! so that late subscribers can ask for it on subscription. It is a cheap,
//! clonable handle: every clone talks to the same listener maps.
//!
//! # Usage
//!
//! ```ignore
//! let bus = EventBus::new();
//! let on_count = callback(|data| println!("count: {}", data["value"]));
//! bus.subscribe(topics::CHARACTER_COUNT, on_count, true, false)?;
//! bus.publish(topics::CHARACTER_COUNT, json!({ "value": 3 }));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

/// Topics published by the composer
pub mod topics {
    /// `{ "value": number }` after every serialization
    pub const CHARACTER_COUNT: &str = "input_controller.character_count";
    /// No payload; Enter pressed on a non-empty draft
    pub const SUBMIT: &str = "input_controller.submit";
    /// `{ "isEmpty": bool }`, only on transitions
    pub const IS_EMPTY: &str = "input_controller.is_empty";
}

/// Payload carried by an event
pub type Payload = Value;

/// Subscriber callback. Identity (pointer equality) is used by `unsubscribe`.
pub type Callback = Rc<dyn Fn(&Payload)>;

/// Wrap a closure as a [`Callback`]
pub fn callback(f: impl Fn(&Payload) + 'static) -> Callback {
    Rc::new(f)
}

/// A published event as kept in the replay cache
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub topic: String,
    pub data: Payload,
}

/// Errors returned for invalid bus arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Topic was empty
    InvalidTopic,
    /// Topic list for `subscribe_all_once` was empty
    EmptyTopicList,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::InvalidTopic => write!(f, "Invalid argument: topic must be a non-empty string"),
            BusError::EmptyTopicList => write!(f, "Invalid argument: topic list must not be empty"),
        }
    }
}

impl std::error::Error for BusError {}

#[derive(Default)]
struct BusState {
    listeners: HashMap<String, Vec<Callback>>,
    once_listeners: HashMap<String, Vec<Callback>>,
    fired_events: HashMap<String, EventRecord>,
}

/// Single-threaded publish/subscribe bus with replay-to-late-subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EventBus")
            .field("topics", &state.listeners.keys().collect::<Vec<_>>())
            .field("fired", &state.fired_events.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `topic`.
    ///
    /// With `replay_last`, a payload already published for `topic` is delivered
    /// synchronously before this returns. A `once` subscription that is
    /// satisfied by the replay is not registered at all.
    pub fn subscribe(
        &self,
        topic: &str,
        callback: Callback,
        replay_last: bool,
        once: bool,
    ) -> Result<(), BusError> {
        if topic.is_empty() {
            tracing::error!(target: "event_bus", "subscribe called with empty topic");
            return Err(BusError::InvalidTopic);
        }

        let replay = if replay_last {
            self.last_payload(topic)
        } else {
            None
        };

        if once {
            if let Some(data) = replay {
                callback(&data);
                return Ok(());
            }
            self.state
                .borrow_mut()
                .once_listeners
                .entry(topic.to_string())
                .or_default()
                .push(callback);
        } else {
            self.state
                .borrow_mut()
                .listeners
                .entry(topic.to_string())
                .or_default()
                .push(Rc::clone(&callback));

            if let Some(data) = replay {
                callback(&data);
            }
        }

        Ok(())
    }

    /// Invoke `callback` exactly once, with payloads aligned to `topics`,
    /// as soon as every topic has been published at least once.
    ///
    /// Topics already in the replay cache count as fired. Duplicate topics
    /// in the list are only waited for once.
    pub fn subscribe_all_once(
        &self,
        topics: &[&str],
        on_all: impl FnOnce(Vec<Payload>) + 'static,
    ) -> Result<(), BusError> {
        if topics.is_empty() {
            return Err(BusError::EmptyTopicList);
        }
        if topics.iter().any(|t| t.is_empty()) {
            return Err(BusError::InvalidTopic);
        }

        let ordered: Vec<String> = topics.iter().map(|t| t.to_string()).collect();
        let remaining: HashSet<String> = {
            let state = self.state.borrow();
            ordered
                .iter()
                .filter(|t| !state.fired_events.contains_key(*t))
                .cloned()
                .collect()
        };

        if remaining.is_empty() {
            on_all(self.collect_payloads(&ordered));
            return Ok(());
        }

        let pending = Rc::new(RefCell::new(PendingAll {
            remaining,
            callback: Some(Box::new(on_all)),
        }));

        let waiting: Vec<String> = pending.borrow().remaining.iter().cloned().collect();
        for topic in waiting {
            let pending = Rc::clone(&pending);
            let weak_state: Weak<RefCell<BusState>> = Rc::downgrade(&self.state);
            let ordered = ordered.clone();
            let fired_topic = topic.clone();

            let listener = callback(move |_| {
                let ready = {
                    let mut pending = pending.borrow_mut();
                    pending.remaining.remove(&fired_topic);
                    if pending.remaining.is_empty() {
                        pending.callback.take()
                    } else {
                        None
                    }
                };

                if let (Some(cb), Some(state)) = (ready, weak_state.upgrade()) {
                    let bus = EventBus { state };
                    cb(bus.collect_payloads(&ordered));
                }
            });

            self.subscribe(&topic, listener, true, true)?;
        }

        Ok(())
    }

    /// Remove one registration of `callback` for `topic`. No-op if absent.
    pub fn unsubscribe(&self, topic: &str, callback: &Callback) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        for map in [&mut state.listeners, &mut state.once_listeners] {
            if let Some(list) = map.get_mut(topic) {
                if let Some(index) = list.iter().position(|cb| Rc::ptr_eq(cb, callback)) {
                    list.remove(index);
                    return;
                }
            }
        }
    }

    /// Record `data` for `topic`, then run one-shot subscribers followed by
    /// persistent subscribers, each in registration order.
    pub fn publish(&self, topic: &str, data: Payload) {
        if topic.is_empty() {
            tracing::error!(target: "event_bus", "Invalid event topic, discarding event");
            return;
        }

        tracing::debug!(target: "event_bus", topic, "event published");

        // Listeners run without the state borrowed so they may publish or
        // (un)subscribe re-entrantly.
        let (once, persistent) = {
            let mut state = self.state.borrow_mut();
            state.fired_events.insert(
                topic.to_string(),
                EventRecord {
                    topic: topic.to_string(),
                    data: data.clone(),
                },
            );
            let once = state.once_listeners.remove(topic).unwrap_or_default();
            let persistent = state.listeners.get(topic).cloned().unwrap_or_default();
            (once, persistent)
        };

        for listener in once {
            listener(&data);
        }
        for listener in persistent {
            listener(&data);
        }
    }

    /// Last payload published for `topic`, if any
    pub fn last_payload(&self, topic: &str) -> Option<Payload> {
        self.state
            .borrow()
            .fired_events
            .get(topic)
            .map(|record| record.data.clone())
    }

    /// Number of registrations (persistent + one-shot) for `topic`
    pub fn listener_count(&self, topic: &str) -> usize {
        let state = self.state.borrow();
        state.listeners.get(topic).map_or(0, Vec::len)
            + state.once_listeners.get(topic).map_or(0, Vec::len)
    }

    /// Drop every listener and the replay cache. Used at session teardown.
    pub fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        state.listeners.clear();
        state.once_listeners.clear();
        state.fired_events.clear();
        tracing::debug!(target: "event_bus", "event bus destroyed");
    }

    fn collect_payloads(&self, topics: &[String]) -> Vec<Payload> {
        let state = self.state.borrow();
        topics
            .iter()
            .map(|t| {
                state
                    .fired_events
                    .get(t)
                    .map(|record| record.data.clone())
                    .unwrap_or(Value::Null)
            })
            .collect()
    }
}

struct PendingAll {
    remaining: HashSet<String>,
    callback: Option<Box<dyn FnOnce(Vec<Payload>)>>,
}
