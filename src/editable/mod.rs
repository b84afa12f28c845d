//! Editable document model for the chat composer.
//!
//! # Architecture
//!
//! - [`Document`]: ordered text runs and atomic [`Token`]s, addressed by unit
//!   offsets (one unit per char, one per token)
//! - [`surface`]: the host surface's node tree and caret [`Point`]s, and the
//!   mapping between surface points and unit offsets
//! - [`normalize`]: classifies surface points against token edges and snaps
//!   illegal ones outward
//! - [`Selection`]: anchor/head over unit offsets
//! - [`Composer`]: the engine tying these together with the catalog, the
//!   event bus and message history
//!
//! # Example
//!
//! ```ignore
//! let mut composer = Composer::new(catalog, platform, EventBus::new());
//! composer.insert_text("gg ");
//! composer.insert_token(&TokenId::new("1730752"));
//! assert_eq!(composer.message(), "gg [emote:1730752:PogChamp]");
//! ```

mod composer;
mod keys;
pub mod normalize;
mod segment;
mod selection;
pub mod surface;

pub use composer::{Composer, Direction, ProcessedContent};
pub use keys::{COMPOSER_PRIORITY, HISTORY_PRIORITY};
pub use normalize::{CaretState, Edge};
pub use segment::{Document, Segment, Token, TokenId, TokenStructure, Unit};
pub use selection::Selection;
pub use surface::{ComponentPart, Point, SurfaceNode, SurfaceSelection, TOKEN_SPAN};
