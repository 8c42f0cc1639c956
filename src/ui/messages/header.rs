//! Channel header: name, privacy, description, creator and the channel
//! actions, rendered above the feed.

use eframe::egui::{self, Stroke};

use crate::state::ActiveChannel;
use crate::ui::theme::SlackrTheme;

/// Actions that can be triggered from the channel header
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderAction {
    /// Open the editor with the current name and description
    Edit { name: String, description: String },
    Leave,
}

/// Render the header for the open channel.
///
/// Returns Some(action) if user interaction occurred
pub fn render_channel_header(
    ui: &mut egui::Ui,
    channel: &ActiveChannel,
    pinned_count: usize,
    theme: &SlackrTheme,
) -> Option<HeaderAction> {
    let mut action = None;

    egui::Frame::new()
        .fill(theme.surface[1])
        .stroke(Stroke::new(1.0, theme.border))
        .inner_margin(egui::Margin::symmetric(16, 12))
        .show(ui, |ui| {
            let Some(details) = &channel.details else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new("Loading channel…").color(theme.text_muted));
                });
                return;
            };

            ui.horizontal(|ui| {
                let icon = if details.private { "🔒" } else { "#" };
                ui.label(egui::RichText::new(icon).size(16.0).color(theme.text_secondary));
                ui.label(
                    egui::RichText::new(&details.name)
                        .size(16.0)
                        .strong()
                        .color(theme.text_primary),
                );
                ui.label(
                    egui::RichText::new(if details.private { "private" } else { "public" })
                        .size(11.0)
                        .color(theme.text_secondary)
                        .background_color(theme.surface[4]),
                );
                ui.label(
                    egui::RichText::new(format!("👥 {}", details.members.len()))
                        .size(13.0)
                        .color(theme.text_muted),
                );
                if pinned_count > 0 {
                    ui.label(
                        egui::RichText::new(format!("📌 {}", pinned_count))
                            .size(13.0)
                            .color(theme.warning),
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Leave").clicked() {
                        action = Some(HeaderAction::Leave);
                    }
                    if ui.button("Edit").clicked() {
                        action = Some(HeaderAction::Edit {
                            name: details.name.clone(),
                            description: details.description.clone(),
                        });
                    }
                });
            });

            let description = if details.description.is_empty() {
                "No description"
            } else {
                details.description.as_str()
            };
            ui.label(egui::RichText::new(description).size(13.0).color(theme.text_secondary));
            ui.label(
                egui::RichText::new(format!(
                    "Created by {} on {}",
                    channel.creator_name,
                    details.created_at.format("%d/%m/%Y")
                ))
                .size(11.0)
                .color(theme.text_muted),
            );
        });

    action
}
