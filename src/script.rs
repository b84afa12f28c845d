//! Session scripts: a YAML list of surface events replayed against a runtime
//!
//! ```yaml
//! - type: "hello Kappa"
//! - key: ctrl+backspace
//! - paste: "PogChamp\nsecond line"
//! - token: "25"
//! - select: { anchor: { segment: 0, offset: 0 }, focus: { segment: 1, offset: 2 } }
//! - wait_ms: 30
//! - key: enter
//! - submit_ok: true
//! ```
//!
//! Time is virtual: `wait_ms` advances a [`ManualPlatform`] so replays are
//! deterministic.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::clipboard::PasteEvent;
use crate::editable::{SurfaceNode, SurfaceSelection, TokenId};
use crate::keymap::{parse_key_string, KeyCode, KeyEvent, KeyParseError};
use crate::messages::{ComposerMsg, SurfaceMsg};
use crate::platform::ManualPlatform;
use crate::runtime::Runtime;

/// One script entry as written. Exactly one field must be set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Typed one key at a time
    #[serde(rename = "type")]
    pub type_text: Option<String>,
    pub key: Option<String>,
    pub paste: Option<String>,
    pub token: Option<String>,
    pub select: Option<SurfaceSelection>,
    pub wait_ms: Option<u64>,
    /// Host acknowledges the submit request
    #[serde(default)]
    pub submit_ok: bool,
    pub resync: Option<Vec<SurfaceNode>>,
}

/// A resolved step
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Type(String),
    Key(KeyEvent),
    Paste(String),
    Token(TokenId),
    Select(SurfaceSelection),
    Wait(u64),
    SubmitOk,
    Resync(Vec<SurfaceNode>),
}

#[derive(Debug)]
pub enum ScriptError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
    /// Step `index` sets no field or more than one
    InvalidStep { index: usize, fields: usize },
    InvalidKey {
        index: usize,
        source: KeyParseError,
    },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io { path, source } => {
                write!(f, "Failed to read script {}: {}", path.display(), source)
            }
            ScriptError::Parse(e) => write!(f, "Failed to parse script: {}", e),
            ScriptError::InvalidStep { index, fields } => write!(
                f,
                "Step {} must set exactly one action, found {}",
                index + 1,
                fields
            ),
            ScriptError::InvalidKey { index, source } => {
                write!(f, "Step {}: {}", index + 1, source)
            }
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io { source, .. } => Some(source),
            ScriptError::Parse(e) => Some(e),
            ScriptError::InvalidStep { .. } => None,
            ScriptError::InvalidKey { source, .. } => Some(source),
        }
    }
}

impl Step {
    fn into_action(self, index: usize) -> Result<Action, ScriptError> {
        let fields = [
            self.type_text.is_some(),
            self.key.is_some(),
            self.paste.is_some(),
            self.token.is_some(),
            self.select.is_some(),
            self.wait_ms.is_some(),
            self.submit_ok,
            self.resync.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if fields != 1 {
            return Err(ScriptError::InvalidStep { index, fields });
        }

        let action = if let Some(text) = self.type_text {
            Action::Type(text)
        } else if let Some(key) = self.key {
            let event = parse_key_string(&key)
                .map_err(|source| ScriptError::InvalidKey { index, source })?;
            Action::Key(event)
        } else if let Some(text) = self.paste {
            Action::Paste(text)
        } else if let Some(id) = self.token {
            Action::Token(TokenId::new(id))
        } else if let Some(selection) = self.select {
            Action::Select(selection)
        } else if let Some(ms) = self.wait_ms {
            Action::Wait(ms)
        } else if let Some(nodes) = self.resync {
            Action::Resync(nodes)
        } else {
            Action::SubmitOk
        };
        Ok(action)
    }
}

/// A parsed session script
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub actions: Vec<Action>,
}

impl Script {
    pub fn from_yaml(content: &str) -> Result<Self, ScriptError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let steps: Vec<Step> = serde_yaml::from_str(content).map_err(ScriptError::Parse)?;
        let actions = steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| step.into_action(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { actions })
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Replay every action. `clock` must be the platform `runtime` was
    /// built with.
    pub fn run(&self, runtime: &mut Runtime, clock: &ManualPlatform) {
        for (index, action) in self.actions.iter().enumerate() {
            tracing::debug!(step = index + 1, ?action, "replaying");
            apply(runtime, clock, action);
            runtime.tick();
        }
    }
}

fn apply(runtime: &mut Runtime, clock: &ManualPlatform, action: &Action) {
    match action {
        Action::Type(text) => {
            for ch in text.chars() {
                let event = if ch == '\n' {
                    KeyEvent::key(KeyCode::Enter)
                } else {
                    KeyEvent::char(ch)
                };
                runtime.press(event);
            }
        }
        Action::Key(event) => {
            runtime.press(*event);
        }
        Action::Paste(text) => {
            runtime.send(SurfaceMsg::Paste(PasteEvent::text(text.as_str())));
        }
        Action::Token(id) => {
            runtime.send(ComposerMsg::InsertToken(id.clone()));
        }
        Action::Select(selection) => {
            runtime.send(SurfaceMsg::SelectionChanged(*selection));
            if let Some(snapped) = runtime.take_surface_selection() {
                tracing::debug!(?snapped, "surface selection snapped");
            }
        }
        Action::Wait(ms) => clock.advance_ms(*ms),
        Action::SubmitOk => {
            runtime.send(ComposerMsg::FinishSubmit);
        }
        Action::Resync(nodes) => {
            runtime.send(SurfaceMsg::Resync(nodes.clone()));
        }
    }
}
