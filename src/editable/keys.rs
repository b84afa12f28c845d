//! Default key handling for the composer.
//!
//! These are registered on the key dispatcher by the model; hosts can put
//! their own handlers in front and halt propagation to override them.

use crate::dispatcher::Flow;
use crate::keymap::{KeyCode, KeyEvent};

use super::composer::{Composer, Direction};

/// Priority of the composer's own key handlers
pub const COMPOSER_PRIORITY: i32 = 10;
/// Priority of the history-recall handler
pub const HISTORY_PRIORITY: i32 = 20;

impl Composer {
    /// Key-down default actions. Halts whenever the composer performed the
    /// edit itself so the surface does not repeat it natively.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> Flow {
        let mods = event.mods;
        let word = mods.ctrl() || mods.alt();

        match event.key {
            KeyCode::Enter => {
                self.request_submit();
                Flow::Halt
            }
            KeyCode::Backspace => {
                if word {
                    self.delete_word_backward();
                } else {
                    self.delete_backward();
                }
                Flow::Halt
            }
            KeyCode::Delete => {
                if word {
                    self.delete_word_forward();
                } else {
                    self.delete_forward();
                }
                Flow::Halt
            }
            KeyCode::Space if !mods.has_command_modifier() => {
                self.handle_word_completion();
                Flow::Halt
            }
            KeyCode::Left | KeyCode::Right => {
                let direction = if event.key == KeyCode::Left {
                    Direction::Backward
                } else {
                    Direction::Forward
                };
                if word {
                    self.handle_directional_word_skip(direction, mods.shift());
                } else {
                    self.move_caret(direction, mods.shift());
                }
                Flow::Halt
            }
            KeyCode::Home => {
                self.move_to_start(mods.shift());
                Flow::Halt
            }
            KeyCode::End => {
                self.move_to_end(mods.shift());
                Flow::Halt
            }
            KeyCode::Char('a') | KeyCode::Char('A') if mods.ctrl() || mods.meta() => {
                self.select_all();
                Flow::Halt
            }
            _ => match event.visible_char() {
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    self.insert_text(ch.encode_utf8(&mut buf));
                    Flow::Halt
                }
                None => Flow::Continue,
            },
        }
    }

    /// Key-up: after a deletion, clean out tokens the surface may have
    /// damaged.
    pub fn handle_key_up(&mut self, event: &KeyEvent) -> Flow {
        if matches!(event.key, KeyCode::Backspace | KeyCode::Delete) {
            self.remove_malformed_tokens();
        }
        Flow::Continue
    }

    /// ArrowUp/ArrowDown history recall
    pub fn handle_history_key(&mut self, event: &KeyEvent) -> Flow {
        if event.mods.has_command_modifier() || event.mods.shift() {
            return Flow::Continue;
        }

        let recalled = match event.key {
            KeyCode::Up => self.recall_older(),
            KeyCode::Down => self.recall_newer(),
            _ => false,
        };
        if recalled {
            Flow::Halt
        } else {
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::catalog::{Emote, StaticCatalog};
    use crate::event_bus::EventBus;
    use crate::keymap::Modifiers;
    use crate::platform::ManualPlatform;

    fn composer() -> Composer {
        Composer::new(
            Rc::new(StaticCatalog::new([Emote::new("1", "Kappa")])),
            Rc::new(ManualPlatform::new()),
            EventBus::new(),
        )
    }

    fn type_str(c: &mut Composer, s: &str) {
        for ch in s.chars() {
            c.handle_key_down(&KeyEvent::char(ch));
        }
    }

    #[test]
    fn test_typing_and_space_completion() {
        let mut c = composer();
        type_str(&mut c, "hi Kappa ok");
        assert_eq!(c.process_content().message, "hi [emote:1:Kappa] ok");
    }

    #[test]
    fn test_unhandled_keys_pass_through() {
        let mut c = composer();
        assert_eq!(
            c.handle_key_down(&KeyEvent::key(KeyCode::Escape)),
            Flow::Continue
        );
        assert_eq!(
            c.handle_key_down(&KeyEvent::new(KeyCode::Char('c'), Modifiers::CTRL)),
            Flow::Continue
        );
        assert_eq!(
            c.handle_history_key(&KeyEvent::key(KeyCode::Up)),
            Flow::Continue
        );
    }

    #[test]
    fn test_ctrl_a_selects_everything() {
        let mut c = composer();
        type_str(&mut c, "abc");
        c.handle_key_down(&KeyEvent::new(KeyCode::Char('a'), Modifiers::CTRL));
        c.handle_key_down(&KeyEvent::key(KeyCode::Backspace));
        assert!(c.document().is_empty());
    }
}
