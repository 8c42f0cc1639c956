//! Composer state: the message being typed, per-channel drafts and the
//! history of sent messages for up/down navigation.

use std::collections::HashMap;

use crate::model::ChannelId;
use crate::validation::{sanitize_message, validate_message};

const HISTORY_LIMIT: usize = 50;

#[derive(Default)]
pub struct InputState {
    /// Current message being composed
    pub message_input: String,

    /// Unsent text left behind in other channels
    drafts: HashMap<ChannelId, String>,

    /// Sent messages, oldest first
    pub history: Vec<String>,

    /// Current position in history (None = not navigating)
    pub history_pos: Option<usize>,

    /// Saved input when entering history mode
    pub history_saved_input: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park the current text under `from` and restore whatever was left in `to`
    pub fn switch_channel(&mut self, from: Option<ChannelId>, to: Option<ChannelId>) {
        if from == to {
            return;
        }
        let text = std::mem::take(&mut self.message_input);
        if let Some(from) = from {
            if text.trim().is_empty() {
                self.drafts.remove(&from);
            } else {
                self.drafts.insert(from, text);
            }
        }
        if let Some(to) = to {
            self.message_input = self.drafts.remove(&to).unwrap_or_default();
        }
        self.reset_navigation();
    }

    /// Validate and take the composed message, recording it in history.
    /// The input is left untouched when validation fails.
    pub fn take_message(&mut self) -> Result<String, String> {
        validate_message(&self.message_input)?;
        let text = sanitize_message(&self.message_input);
        self.message_input.clear();
        self.history.push(text.clone());
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.reset_navigation();
        Ok(text)
    }

    /// Arrow up: step back through sent messages
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => {
                self.history_saved_input = Some(self.message_input.clone());
                self.history.len() - 1
            }
            Some(pos) => pos.saturating_sub(1),
        };
        self.history_pos = Some(pos);
        self.message_input = self.history[pos].clone();
    }

    /// Arrow down: step forward, back to the saved input past the newest entry
    pub fn history_next(&mut self) {
        let Some(pos) = self.history_pos else { return };
        if pos + 1 < self.history.len() {
            self.history_pos = Some(pos + 1);
            self.message_input = self.history[pos + 1].clone();
        } else {
            self.history_pos = None;
            self.message_input = self.history_saved_input.take().unwrap_or_default();
        }
    }

    pub fn reset_navigation(&mut self) {
        self.history_pos = None;
        self.history_saved_input = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_message_validates_and_records() {
        let mut input = InputState::new();
        input.message_input = "   ".into();
        assert!(input.take_message().is_err());
        assert_eq!(input.message_input, "   ");

        input.message_input = "  hello \n".into();
        assert_eq!(input.take_message().unwrap(), "hello");
        assert!(input.message_input.is_empty());
        assert_eq!(input.history, vec!["hello"]);
    }

    #[test]
    fn test_history_navigation() {
        let mut input = InputState::new();
        input.history = vec!["first".into(), "second".into()];
        input.message_input = "draft".into();

        input.history_prev();
        assert_eq!(input.message_input, "second");
        input.history_prev();
        assert_eq!(input.message_input, "first");
        input.history_prev();
        assert_eq!(input.message_input, "first");

        input.history_next();
        assert_eq!(input.message_input, "second");
        input.history_next();
        assert_eq!(input.message_input, "draft");
        assert_eq!(input.history_pos, None);
    }

    #[test]
    fn test_drafts_follow_channels() {
        let mut input = InputState::new();
        input.message_input = "half written".into();
        input.switch_channel(Some(ChannelId(1)), Some(ChannelId(2)));
        assert!(input.message_input.is_empty());

        input.message_input = "other".into();
        input.switch_channel(Some(ChannelId(2)), Some(ChannelId(1)));
        assert_eq!(input.message_input, "half written");

        input.switch_channel(Some(ChannelId(1)), Some(ChannelId(2)));
        assert_eq!(input.message_input, "other");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut input = InputState::new();
        for i in 0..HISTORY_LIMIT + 5 {
            input.message_input = format!("msg {}", i);
            input.take_message().unwrap();
        }
        assert_eq!(input.history.len(), HISTORY_LIMIT);
        assert_eq!(input.history[0], "msg 5");
    }
}
