//! Host request handlers

use crate::commands::Cmd;
use crate::messages::ComposerMsg;
use crate::model::InputModel;

/// Handle programmatic requests and timer callbacks
pub fn update_composer(model: &mut InputModel, msg: ComposerMsg) -> Option<Cmd> {
    let composer = &mut model.composer;

    match msg {
        ComposerMsg::InsertText(text) => {
            composer.insert_text(&text);
        }

        ComposerMsg::InsertToken(id) => {
            composer.insert_token(&id);
        }

        ComposerMsg::PasteLines(lines) => {
            composer.parse_and_insert_paste(&lines);
        }

        ComposerMsg::SetContent(text) => composer.set_content(&text),

        ComposerMsg::Clear => composer.clear(),

        ComposerMsg::ReplaceToken { offset, id } => {
            composer.replace_token(offset, &id);
        }

        ComposerMsg::ReplaceTokenWithText { offset, text } => {
            composer.replace_token_with_text(offset, &text);
        }

        ComposerMsg::ProcessContentReady { revision } => {
            // Skip if the draft has been edited since the debounce started
            if composer.revision() != revision {
                tracing::debug!(
                    "Skipping stale process request: revision {} != request revision {}",
                    composer.revision(),
                    revision
                );
                return None;
            }
            if composer.needs_processing() {
                composer.process_content();
            }
        }

        ComposerMsg::FinishSubmit => {
            let content = composer.finish_submit();
            tracing::debug!(
                chars = content.character_count,
                tokens = content.token_ids.len(),
                "message submitted"
            );
        }
    }

    None
}
