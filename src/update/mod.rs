//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod composer;
mod surface;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::model::InputModel;

#[cfg(debug_assertions)]
use crate::tracing::SelectionSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use composer::update_composer;
pub use surface::update_surface;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut InputModel, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut InputModel, msg: Msg) -> Option<Cmd> {
    let revision = model.composer.revision();

    let result = match msg {
        Msg::Surface(m) => update_surface(model, m),
        Msg::Composer(m) => update_composer(model, m),
    };

    // Any edit restarts the serialization timer
    let schedule = if model.composer.revision() != revision {
        schedule_process_content(model)
    } else {
        None
    };

    Cmd::merge(result, schedule)
}

/// Debounce command for the current revision, if it has not been
/// serialized yet
pub fn schedule_process_content(model: &InputModel) -> Option<Cmd> {
    if !model.composer.needs_processing() {
        return None;
    }
    Some(Cmd::DebouncedProcessContent {
        revision: model.composer.revision(),
        delay_ms: model.config.process_debounce_ms,
    })
}

/// Update with a span per message and a selection diff at `trace`
#[cfg(debug_assertions)]
fn update_traced(model: &mut InputModel, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = SelectionSnapshot::from_composer(&model.composer);
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);

    let after = SelectionSnapshot::from_composer(&model.composer);
    if let Some(diff) = before.diff(&after) {
        tracing::trace!(target: "selection", %diff, "state changed");
    }

    debug_assert!(
        model.composer.document().is_normalized(),
        "segment invariants broken after {}",
        msg_name
    );

    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Surface(KeyDown(KeyEvent { .. }))`
/// - `Composer(InsertText("hi"))`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    let name = format!("{:?}", msg);
    if name.len() > 120 {
        let cut = name
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= 120)
            .last()
            .unwrap_or(0);
        format!("{}…", &name[..cut])
    } else {
        name
    }
}
