//! Runtime - drives the update loop and executes commands
//!
//! The runtime owns the model and the serialization debouncer. Hosts feed it
//! surface events with [`Runtime::send`] and call [`Runtime::tick`] from
//! their event loop (or after advancing a manual clock) so pending
//! serializations fire.

use std::rc::Rc;
use std::time::Duration;

use crate::catalog::EmoteCatalog;
use crate::commands::Cmd;
use crate::config::ComposerConfig;
use crate::editable::{Composer, SurfaceSelection};
use crate::event_bus::EventBus;
use crate::keymap::KeyEvent;
use crate::messages::{ComposerMsg, Msg, SurfaceMsg};
use crate::model::{InputModel, KeyOutcome};
use crate::platform::{Debouncer, Platform};
use crate::update::update;

pub struct Runtime {
    model: InputModel,
    platform: Rc<dyn Platform>,
    /// Pending serialization, keyed by the revision it was scheduled for
    debouncer: Debouncer<u64>,
    /// Normalized selection the surface should adopt
    surface_selection: Option<SurfaceSelection>,
}

impl Runtime {
    pub fn new(model: InputModel, platform: Rc<dyn Platform>) -> Self {
        Self {
            model,
            platform,
            debouncer: Debouncer::new(),
            surface_selection: None,
        }
    }

    /// Build a model and runtime sharing `platform`
    pub fn with_config(
        config: ComposerConfig,
        catalog: Rc<dyn EmoteCatalog>,
        platform: Rc<dyn Platform>,
        bus: EventBus,
    ) -> Self {
        let model = InputModel::new(catalog, Rc::clone(&platform), bus, config);
        Self::new(model, platform)
    }

    pub fn model(&self) -> &InputModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut InputModel {
        &mut self.model
    }

    pub fn composer(&self) -> &Composer {
        &self.model.composer
    }

    pub fn bus(&self) -> &EventBus {
        self.model.composer.bus()
    }

    /// Run one message through `update` and execute the resulting command.
    ///
    /// For key events, reports whether the surface's native action must be
    /// suppressed.
    pub fn send(&mut self, msg: impl Into<Msg>) -> Option<KeyOutcome> {
        let msg = msg.into();
        let is_key = matches!(
            msg,
            Msg::Surface(SurfaceMsg::KeyDown(_) | SurfaceMsg::KeyUp(_))
        );

        self.model.key_outcome = None;
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }

        if is_key {
            self.model.key_outcome.take()
        } else {
            None
        }
    }

    pub fn key_down(&mut self, event: KeyEvent) -> KeyOutcome {
        self.send(SurfaceMsg::KeyDown(event))
            .unwrap_or(KeyOutcome::Default)
    }

    pub fn key_up(&mut self, event: KeyEvent) -> KeyOutcome {
        self.send(SurfaceMsg::KeyUp(event))
            .unwrap_or(KeyOutcome::Default)
    }

    /// Key down followed by key up; returns the key-down outcome
    pub fn press(&mut self, event: KeyEvent) -> KeyOutcome {
        let outcome = self.key_down(event);
        self.key_up(event);
        outcome
    }

    /// Fire the pending serialization if its deadline has passed.
    /// Returns true if it fired.
    pub fn tick(&mut self) -> bool {
        let Some(revision) = self.debouncer.fire_due(self.platform.now()) else {
            return false;
        };
        if let Some(cmd) = update(
            &mut self.model,
            Msg::Composer(ComposerMsg::ProcessContentReady { revision }),
        ) {
            self.process_cmd(cmd);
        }
        true
    }

    /// Fire the pending serialization now, regardless of its deadline
    pub fn flush(&mut self) -> bool {
        let Some(revision) = self.debouncer.cancel() else {
            return false;
        };
        if let Some(cmd) = update(
            &mut self.model,
            Msg::Composer(ComposerMsg::ProcessContentReady { revision }),
        ) {
            self.process_cmd(cmd);
        }
        true
    }

    /// When the pending serialization is due, on the platform clock
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Selection the surface should be moved to after a normalizer snap
    pub fn take_surface_selection(&mut self) -> Option<SurfaceSelection> {
        self.surface_selection.take()
    }

    /// Session teardown: drop the pending timer and every bus listener
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
        self.model.composer.bus().destroy();
        tracing::debug!("input session torn down");
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
            Cmd::DebouncedProcessContent { revision, delay_ms } => {
                self.debouncer.schedule(
                    self.platform.now(),
                    Duration::from_millis(delay_ms),
                    revision,
                );
            }
            Cmd::SetSurfaceSelection(selection) => {
                self.surface_selection = Some(selection);
            }
        }
    }
}
