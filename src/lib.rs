//! Emote Input - chat message composer with atomic inline emote tokens
//!
//! This crate provides the document engine behind a chat input box: a
//! segment model of text runs and indivisible tokens, caret normalization,
//! debounced serialization and priority-ordered key arbitration, wired
//! together in the Elm Architecture pattern.

pub mod catalog;
pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod dispatcher;
pub mod editable;
pub mod event_bus;
pub mod history;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod platform;
pub mod runtime;
pub mod script;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::ComposerConfig;
pub use editable::Composer;
pub use messages::Msg;
pub use model::InputModel;
pub use runtime::Runtime;
