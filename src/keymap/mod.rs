//! Keyboard input types for the composer
//!
//! Hosts translate their native key events into [`KeyEvent`] and feed them
//! through the priority dispatcher.
//!
//! ```text
//! native key event → KeyEvent → PriorityDispatcher → Composer::handle_key_down
//! ```
//!
//! Key strings such as `"ctrl+shift+left"` can be parsed with
//! [`parse_key_string`] (used by session scripts).

mod parse;
mod types;

pub use parse::{parse_key_string, KeyParseError};
pub use types::{KeyCode, KeyEvent, KeyPhase, Modifiers};
