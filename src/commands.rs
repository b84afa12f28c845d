//! Commands for the Elm-style architecture
//!
//! Commands are side effects returned by update functions and executed by
//! the runtime.

use crate::editable::SurfaceSelection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
    /// Start (or restart) the serialization debounce timer.
    /// After delay_ms, sends `ComposerMsg::ProcessContentReady`
    DebouncedProcessContent { revision: u64, delay_ms: u64 },
    /// Move the surface's native selection to this normalized one
    SetSurfaceSelection(SurfaceSelection),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Combine two optional commands
    pub fn merge(a: Option<Cmd>, b: Option<Cmd>) -> Option<Cmd> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Cmd::Batch(vec![a, b])),
            (a, None) => a,
            (None, b) => b,
        }
    }

    pub fn is_none(&self) -> bool {
        match self {
            Cmd::None => true,
            Cmd::Batch(cmds) => cmds.iter().all(Cmd::is_none),
            _ => false,
        }
    }
}

// Allow converting Option<Cmd> to Cmd
impl From<Option<Cmd>> for Cmd {
    fn from(opt: Option<Cmd>) -> Self {
        opt.unwrap_or(Cmd::None)
    }
}
