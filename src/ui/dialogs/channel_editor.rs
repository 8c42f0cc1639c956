//! Channel editor dialog - create a channel or edit name and description.

use eframe::egui;

use super::DialogAction;
use crate::model::ChannelId;
use crate::validation::validate_channel_name;

/// Self-contained channel editor state. `channel` is None when creating.
pub struct ChannelEditorDialog {
    pub channel: Option<ChannelId>,
    pub name_input: String,
    pub description_input: String,
    pub private: bool,
    error: Option<String>,
}

impl ChannelEditorDialog {
    pub fn create() -> Self {
        Self {
            channel: None,
            name_input: String::new(),
            description_input: String::new(),
            private: false,
            error: None,
        }
    }

    pub fn edit(channel: ChannelId, name: &str, description: &str) -> Self {
        Self {
            channel: Some(channel),
            name_input: name.to_string(),
            description_input: description.to_string(),
            private: false,
            error: None,
        }
    }

    /// Validate the inputs and build the action
    pub fn submit(&self) -> Result<DialogAction, String> {
        validate_channel_name(&self.name_input)?;
        let name = self.name_input.trim().to_string();
        let description = self.description_input.trim().to_string();
        Ok(match self.channel {
            Some(channel) => DialogAction::UpdateChannel {
                channel,
                name,
                description,
            },
            None => DialogAction::CreateChannel {
                name,
                description,
                private: self.private,
            },
        })
    }

    /// Render the dialog.
    /// The second return value indicates if the dialog is still open.
    pub fn render(&mut self, ctx: &egui::Context) -> (Option<DialogAction>, bool) {
        let mut action = None;
        let mut window_open = true;
        let mut should_close = false;
        let title = if self.channel.is_some() { "Edit Channel" } else { "Create Channel" };

        egui::Window::new(title)
            .open(&mut window_open)
            .resizable(false)
            .collapsible(false)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.label("Name:");
                ui.add(egui::TextEdit::singleline(&mut self.name_input).desired_width(f32::INFINITY));
                ui.add_space(4.0);
                ui.label("Description:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.description_input)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                if self.channel.is_none() {
                    ui.checkbox(&mut self.private, "Private channel");
                }

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(240, 71, 71), error);
                }
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
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
