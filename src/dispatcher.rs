//! Priority-ordered, cancellable handler chains
//!
//! Several concerns compete for the same physical key event (host shortcuts,
//! autocomplete, submit-on-Enter, history recall). Each registers a handler
//! with a priority; lower priorities run first and any handler can return
//! [`Flow::Halt`] to stop the rest of the chain, including the composer's
//! default handling.
//!
//! Handlers receive a mutable context (the composer) alongside the event, so
//! the dispatcher can live next to the state it arbitrates over without
//! shared ownership.

use std::collections::HashMap;
use std::hash::Hash;

/// What a handler wants to happen to the rest of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Let lower-precedence handlers run
    Continue,
    /// Stop propagation; later handlers and default handling are skipped
    Halt,
}

impl Flow {
    pub fn is_halt(self) -> bool {
        self == Flow::Halt
    }
}

/// Identifies a registered handler for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Boxed handler stored in a chain
pub type Handler<C, E> = Box<dyn FnMut(&mut C, &E) -> Flow>;

struct Entry<C, E> {
    id: HandlerId,
    priority: i32,
    once: bool,
    handler: Handler<C, E>,
}

/// Per-event-kind chains of `(priority, handler)` sorted ascending by priority.
/// Handlers with equal priority run in registration order.
pub struct PriorityDispatcher<K, C, E> {
    chains: HashMap<K, Vec<Entry<C, E>>>,
    next_id: u64,
}

impl<K, C, E> Default for PriorityDispatcher<K, C, E>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            chains: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<K, C, E> std::fmt::Debug for PriorityDispatcher<K, C, E>
where
    K: Eq + Hash + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (kind, chain) in &self.chains {
            let priorities: Vec<i32> = chain.iter().map(|e| e.priority).collect();
            map.entry(kind, &priorities);
        }
        map.finish()
    }
}

impl<K, C, E> PriorityDispatcher<K, C, E>
where
    K: Eq + Hash + Copy + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `kind` at `priority`
    pub fn add_listener(
        &mut self,
        kind: K,
        priority: i32,
        handler: impl FnMut(&mut C, &E) -> Flow + 'static,
    ) -> HandlerId {
        self.insert(kind, priority, false, Box::new(handler))
    }

    /// Register a handler that is removed after its first invocation
    pub fn add_listener_once(
        &mut self,
        kind: K,
        priority: i32,
        handler: impl FnMut(&mut C, &E) -> Flow + 'static,
    ) -> HandlerId {
        self.insert(kind, priority, true, Box::new(handler))
    }

    fn insert(&mut self, kind: K, priority: i32, once: bool, handler: Handler<C, E>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        let chain = self.chains.entry(kind).or_default();
        // After every entry with priority <= ours keeps registration order stable
        let index = chain.partition_point(|e| e.priority <= priority);
        chain.insert(
            index,
            Entry {
                id,
                priority,
                once,
                handler,
            },
        );
        id
    }

    /// Remove a handler. Returns false if it was not registered for `kind`.
    pub fn remove_listener(&mut self, kind: K, id: HandlerId) -> bool {
        let Some(chain) = self.chains.get_mut(&kind) else {
            return false;
        };
        match chain.iter().position(|e| e.id == id) {
            Some(index) => {
                chain.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of handlers registered for `kind`
    pub fn listener_count(&self, kind: K) -> usize {
        self.chains.get(&kind).map_or(0, Vec::len)
    }

    /// Run the chain for `kind` until a handler halts.
    ///
    /// Returns [`Flow::Halt`] if any handler stopped propagation.
    pub fn dispatch(&mut self, kind: K, ctx: &mut C, event: &E) -> Flow {
        let Some(chain) = self.chains.get_mut(&kind) else {
            return Flow::Continue;
        };

        let mut flow = Flow::Continue;
        let mut index = 0;
        while index < chain.len() {
            let entry = &mut chain[index];
            let result = (entry.handler)(ctx, event);

            if entry.once {
                chain.remove(index);
            } else {
                index += 1;
            }

            if result.is_halt() {
                tracing::trace!(?kind, "propagation halted");
                flow = Flow::Halt;
                break;
            }
        }

        flow
    }
}
