//! Surface event handlers

use crate::commands::Cmd;
use crate::keymap::KeyPhase;
use crate::messages::SurfaceMsg;
use crate::model::{InputModel, KeyOutcome};

/// Handle raw events from the editing surface
pub fn update_surface(model: &mut InputModel, msg: SurfaceMsg) -> Option<Cmd> {
    match msg {
        SurfaceMsg::KeyDown(event) => {
            let flow = model.dispatch_key(KeyPhase::Down, &event);
            model.key_outcome = Some(KeyOutcome::from(flow));
            None
        }

        SurfaceMsg::KeyUp(event) => {
            let flow = model.dispatch_key(KeyPhase::Up, &event);
            model.key_outcome = Some(KeyOutcome::from(flow));
            None
        }

        SurfaceMsg::Paste(event) => {
            let lines = model.clipboard.parse_pasted_message(&event);
            if lines.is_empty() {
                tracing::debug!("paste without text content ignored");
                return None;
            }
            let tokens = model.composer.parse_and_insert_paste(&lines);
            tracing::debug!(lines = lines.len(), tokens, "pasted");
            None
        }

        SurfaceMsg::SelectionChanged(reported) => {
            if model.composer.set_surface_selection(reported) {
                model
                    .composer
                    .surface_selection()
                    .map(Cmd::SetSurfaceSelection)
            } else {
                None
            }
        }

        SurfaceMsg::Resync(nodes) => {
            model.composer.resync_from_surface(nodes);
            None
        }
    }
}
