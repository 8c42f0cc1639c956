//! Small modal prompts: delete confirmation, join prompt and the error dialog.

use eframe::egui;

use super::DialogAction;
use crate::model::{ChannelId, MessageId};

/// Asks before deleting a message
pub struct ConfirmDeleteDialog {
    pub channel: ChannelId,
    pub message: MessageId,
}

impl ConfirmDeleteDialog {
    pub fn new(channel: ChannelId, message: MessageId) -> Self {
        Self { channel, message }
    }

    /// The second return value indicates if the dialog is still open.
    pub fn render(&mut self, ctx: &egui::Context) -> (Option<DialogAction>, bool) {
        let mut action = None;
        let mut still_open = true;

        egui::Modal::new(egui::Id::new("confirm_delete")).show(ctx, |ui| {
            ui.heading("Delete message");
            ui.label("Are you sure you want to delete this message?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    action = Some(DialogAction::DeleteMessage {
                        channel: self.channel,
                        message: self.message,
                    });
                    still_open = false;
                }
                if ui.button("Cancel").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    still_open = false;
                }
            });
        });

        (action, still_open)
    }
}

/// Offered when the user opens a public channel they are not a member of
pub fn render_join_prompt(ctx: &egui::Context, channel: ChannelId, name: &str) -> Option<DialogAction> {
    let mut action = None;

    egui::Modal::new(egui::Id::new(("join_prompt", channel.0))).show(ctx, |ui| {
        ui.heading(format!("# {}", name));
        ui.label("You are not a member of this channel. Join it to read and send messages?");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Join").clicked() {
                action = Some(DialogAction::JoinChannel(channel));
            }
            if ui.button("Not now").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                action = Some(DialogAction::DeclineJoin);
            }
        });
    });

    action
}

/// Shows the oldest unacknowledged error; the rest wait behind it
pub fn render_error_dialog(ctx: &egui::Context, errors: &[String]) -> Option<DialogAction> {
    let first = errors.first()?;
    let mut action = None;

    egui::Modal::new(egui::Id::new("error_dialog")).show(ctx, |ui| {
        ui.heading("Error");
        ui.label(first);
        if errors.len() > 1 {
            ui.label(
                egui::RichText::new(format!("{} more", errors.len() - 1))
                    .small()
                    .weak(),
            );
        }
        ui.add_space(8.0);
        if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            action = Some(DialogAction::DismissError);
        }
    });

    action
}
