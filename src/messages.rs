//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::clipboard::PasteEvent;
use crate::editable::{SurfaceNode, SurfaceSelection, TokenId};
use crate::keymap::KeyEvent;

/// Raw events from the editing surface
#[derive(Debug, Clone)]
pub enum SurfaceMsg {
    /// Key pressed; routed through the key dispatcher
    KeyDown(KeyEvent),
    /// Key released
    KeyUp(KeyEvent),
    /// Paste with the surface's clipboard payload
    Paste(PasteEvent),
    /// Caret/selection moved (keyboard or mouse alike)
    SelectionChanged(SurfaceSelection),
    /// The surface tree was edited natively; adopt it
    Resync(Vec<SurfaceNode>),
}

/// Programmatic requests from the host
#[derive(Debug, Clone)]
pub enum ComposerMsg {
    InsertText(String),
    /// Insert an emote picked from a menu
    InsertToken(TokenId),
    /// Already-split pasted lines
    PasteLines(Vec<String>),
    SetContent(String),
    Clear,
    ReplaceToken { offset: usize, id: TokenId },
    ReplaceTokenWithText { offset: usize, text: String },
    /// Debounce timer fired for `revision`
    ProcessContentReady { revision: u64 },
    /// Transport accepted the message
    FinishSubmit,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Surface(SurfaceMsg),
    Composer(ComposerMsg),
}

impl From<SurfaceMsg> for Msg {
    fn from(msg: SurfaceMsg) -> Self {
        Msg::Surface(msg)
    }
}

impl From<ComposerMsg> for Msg {
    fn from(msg: ComposerMsg) -> Self {
        Msg::Composer(msg)
    }
}
