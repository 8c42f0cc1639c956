//! Message editor dialog - change the text of one of your messages.

use eframe::egui;

use super::DialogAction;
use crate::model::{ChannelId, MessageId};
use crate::validation::{sanitize_message, validate_message};

pub struct MessageEditorDialog {
    pub channel: ChannelId,
    pub message: MessageId,
    pub text_input: String,
    original: String,
    error: Option<String>,
}

impl MessageEditorDialog {
    pub fn new(channel: ChannelId, message: MessageId, current: &str) -> Self {
        Self {
            channel,
            message,
            text_input: current.to_string(),
            original: current.to_string(),
            error: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        sanitize_message(&self.text_input) != self.original
    }

    pub fn submit(&self) -> Result<DialogAction, String> {
        validate_message(&self.text_input)?;
        Ok(DialogAction::EditMessage {
            channel: self.channel,
            message: self.message,
            text: sanitize_message(&self.text_input),
        })
    }

    /// Render the dialog.
    /// The second return value indicates if the dialog is still open.
    pub fn render(&mut self, ctx: &egui::Context) -> (Option<DialogAction>, bool) {
        let mut action = None;
        let mut window_open = true;
        let mut should_close = false;

        egui::Window::new("Edit Message")
            .open(&mut window_open)
            .resizable(true)
            .collapsible(false)
            .default_width(450.0)
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.text_input)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(240, 71, 71), error);
                }
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.add_enabled(self.is_changed(), egui::Button::new("Save")).clicked() {
                        match self.submit() {
                            Ok(a) => {
                                action = Some(a);
                                should_close = true;
                            }
                            Err(e) => self.error = Some(e),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        should_close = true;
                    }
                });

                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    should_close = true;
                }
            });

        (action, window_open && !should_close)
    }
}
