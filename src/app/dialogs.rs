//! Dialog rendering orchestration

use eframe::egui;

use super::SlackrApp;
use crate::protocol::BackendAction;
use crate::ui;
use crate::ui::dialogs::DialogAction;

impl SlackrApp {
    /// Render all dialogs and handle their actions
    pub(super) fn render_dialogs(&mut self, ctx: &egui::Context) {
        // Floating status toasts (top-right corner)
        ui::dialogs::render_status_toasts(ctx, &self.state.status_messages, &self.theme);

        let mut actions = self.dialogs.render(ctx);

        if let Some(channel) = self.state.pending_join {
            let name = self
                .state
                .find_channel(channel)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("channel {}", channel));
            actions.extend(ui::dialogs::render_join_prompt(ctx, channel, &name));
        }

        // Errors go on top of everything else
        actions.extend(ui::dialogs::render_error_dialog(ctx, &self.state.errors));

        for action in actions {
            self.handle_dialog_action(action);
        }
    }

    /// Handle dialog actions by sending appropriate backend requests
    fn handle_dialog_action(&mut self, action: DialogAction) {
        match action {
            DialogAction::CreateChannel {
                name,
                description,
                private,
            } => self.send(BackendAction::CreateChannel {
                name,
                description,
                private,
            }),
            DialogAction::UpdateChannel {
                channel,
                name,
                description,
            } => self.send(BackendAction::UpdateChannel {
                channel,
                name,
                description,
            }),
            DialogAction::EditMessage {
                channel,
                message,
                text,
            } => self.send(BackendAction::EditMessage {
                channel,
                message,
                text,
            }),
            DialogAction::DeleteMessage { channel, message } => {
                self.send(BackendAction::DeleteMessage { channel, message })
            }
            DialogAction::JoinChannel(channel) => self.send(BackendAction::JoinChannel(channel)),
            DialogAction::DeclineJoin => self.state.pending_join = None,
            DialogAction::DismissError => {
                if !self.state.errors.is_empty() {
                    self.state.errors.remove(0);
                }
            }
        }
    }
}
