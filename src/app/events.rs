//! Event processing from backend

use super::SlackrApp;
use crate::config::{clear_session, save_session};
use crate::events;
use crate::protocol::{ErrorContext, GuiEvent};

impl SlackrApp {
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.process_single_event(event);
        }
    }

    fn process_single_event(&mut self, event: GuiEvent) {
        // Side effects outside the client state: keyring, settings, forms
        match &event {
            GuiEvent::LoggedIn(session) => {
                if let Err(e) = save_session(session) {
                    tracing::warn!("could not store session: {}", e);
                }
                if !self.auth.email.trim().is_empty() {
                    self.settings.last_email = self.auth.email.trim().to_string();
                    self.save_settings();
                }
                self.auth.reset_secrets();
            }
            GuiEvent::LoggedOut => {
                if let Err(e) = clear_session() {
                    tracing::warn!("could not clear stored session: {}", e);
                }
                self.auth.reset_secrets();
                self.dialogs.close_all();
                self.input = crate::input_state::InputState::new();
                self.composer_channel = None;
            }
            GuiEvent::ChannelLeft(channel) if self.state.active_channel_id() == Some(*channel) => {
                self.dialogs.close_channel_dialogs();
            }
            // Auth failures belong to the form, not the error dialog
            GuiEvent::Error { context, message }
                if matches!(context, ErrorContext::Login | ErrorContext::Register) =>
            {
                self.auth.fail(message.clone());
                return;
            }
            _ => {}
        }

        let actions = events::process_single_event(&mut self.state, event);
        self.send_all(actions);
    }
}
