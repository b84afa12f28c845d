//! Input model - the complete state of one chat input session
//!
//! Holds the composer alongside the key dispatcher that arbitrates over it.
//! The two are sibling fields so a dispatch can borrow the dispatcher and
//! the composer mutably at the same time.

use std::fmt;
use std::rc::Rc;

use crate::catalog::EmoteCatalog;
use crate::clipboard::{Clipboard, PlainTextClipboard};
use crate::config::ComposerConfig;
use crate::dispatcher::{Flow, HandlerId, PriorityDispatcher};
use crate::editable::{Composer, COMPOSER_PRIORITY, HISTORY_PRIORITY};
use crate::event_bus::EventBus;
use crate::keymap::{KeyEvent, KeyPhase};
use crate::platform::Platform;

/// Key handler chains, with the composer as handler context
pub type KeyDispatcher = PriorityDispatcher<KeyPhase, Composer, KeyEvent>;

/// Whether the surface may run its native action for a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Some handler halted the chain; suppress native handling
    Prevented,
    /// Nobody claimed the key
    Default,
}

impl From<Flow> for KeyOutcome {
    fn from(flow: Flow) -> Self {
        match flow {
            Flow::Halt => KeyOutcome::Prevented,
            Flow::Continue => KeyOutcome::Default,
        }
    }
}

impl KeyOutcome {
    pub fn is_prevented(self) -> bool {
        self == KeyOutcome::Prevented
    }
}

pub struct InputModel {
    pub composer: Composer,
    pub keys: KeyDispatcher,
    pub clipboard: Box<dyn Clipboard>,
    pub config: ComposerConfig,
    /// Outcome of the last key event, read back by the runtime
    pub key_outcome: Option<KeyOutcome>,
}

impl fmt::Debug for InputModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputModel")
            .field("composer", &self.composer)
            .field("keys", &self.keys)
            .field("config", &self.config)
            .field("key_outcome", &self.key_outcome)
            .finish_non_exhaustive()
    }
}

impl InputModel {
    /// Build a model with the composer's default key handlers registered
    pub fn new(
        catalog: Rc<dyn EmoteCatalog>,
        platform: Rc<dyn Platform>,
        bus: EventBus,
        config: ComposerConfig,
    ) -> Self {
        let composer = Composer::new(catalog, platform, bus)
            .with_history_capacity(config.history_capacity);

        let mut model = Self {
            composer,
            keys: KeyDispatcher::new(),
            clipboard: Box::new(PlainTextClipboard),
            config,
            key_outcome: None,
        };
        model.register_default_handlers();
        model
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    fn register_default_handlers(&mut self) {
        self.keys
            .add_listener(KeyPhase::Down, COMPOSER_PRIORITY, Composer::handle_key_down);
        self.keys
            .add_listener(KeyPhase::Up, COMPOSER_PRIORITY, Composer::handle_key_up);
        self.keys
            .add_listener(KeyPhase::Down, HISTORY_PRIORITY, Composer::handle_history_key);
    }

    /// Register a host handler (autocomplete, shortcuts). Use a priority
    /// below the composer's to run first.
    pub fn add_key_handler(
        &mut self,
        phase: KeyPhase,
        priority: i32,
        handler: impl FnMut(&mut Composer, &KeyEvent) -> Flow + 'static,
    ) -> HandlerId {
        self.keys.add_listener(phase, priority, handler)
    }

    pub fn remove_key_handler(&mut self, phase: KeyPhase, id: HandlerId) -> bool {
        self.keys.remove_listener(phase, id)
    }

    /// Run the handler chain for `phase`
    pub fn dispatch_key(&mut self, phase: KeyPhase, event: &KeyEvent) -> Flow {
        self.keys.dispatch(phase, &mut self.composer, event)
    }
}
