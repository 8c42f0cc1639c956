//! Message composer panel with history navigation

use eframe::egui;

use crate::app::SlackrApp;
use crate::protocol::BackendAction;

impl SlackrApp {
    /// Render the composer at the bottom of the window while a channel is open
    pub(in crate::app) fn render_input_panel(&mut self, ctx: &egui::Context) {
        let Some(channel) = self.state.active_channel_id() else {
            return;
        };
        let theme = self.theme.clone();
        let mut error = None;

        egui::TopBottomPanel::bottom("input_panel")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme.surface[3])
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(10, 8))
                    .show(ui, |ui| {
                        let response = ui.add(
                            egui::TextEdit::multiline(&mut self.input.message_input)
                                .desired_rows(1)
                                .desired_width(ui.available_width() - 4.0)
                                .frame(false)
                                .hint_text("Type a message... (Enter to send, Shift+Enter for a new line)"),
                        );

                        // Enter without Shift sends; Shift+Enter inserts a newline
                        let enter = response.has_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);

                        if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
                            self.input.history_prev();
                        }
                        if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
                            self.input.history_next();
                        }
                        if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                            self.input.message_input.clear();
                            self.input.reset_navigation();
                        }

                        if enter {
                            // The multiline edit already took the newline
                            let typed = self.input.message_input.trim_end_matches('\n').to_string();
                            self.input.message_input = typed;
                            match self.input.take_message() {
                                Ok(text) => {
                                    let _ = self.action_tx.send(BackendAction::SendMessage { channel, text });
                                }
                                Err(e) => error = Some(e),
                            }
                            response.request_focus();
                        }
                    });
            });

        if let Some(e) = error {
            self.state.push_error(e);
        }
    }
}
