//! Channel sidebar: joined channels, joinable public channels and a filter.

use eframe::egui::{self, Stroke};
use std::collections::HashSet;

use crate::model::{ChannelId, ChannelSummary};
use crate::ui::theme::{self, SlackrTheme, SECTION_STYLE};

/// What the user did in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Select(ChannelId),
    CreateChannel,
}

/// Sidebar state that lives across frames
#[derive(Default)]
pub struct SidebarState {
    pub filter: String,
    pub collapsed: HashSet<&'static str>,
}

/// Channels whose name contains the filter, ignoring case
pub fn filter_channels<'a>(channels: &'a [ChannelSummary], filter: &str) -> Vec<&'a ChannelSummary> {
    let needle = filter.trim().to_lowercase();
    channels
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .collect()
}

/// Render the left channel list panel.
pub fn render_channel_list(
    ctx: &egui::Context,
    joined: &[ChannelSummary],
    public: &[ChannelSummary],
    active: Option<ChannelId>,
    sidebar: &mut SidebarState,
    theme: &SlackrTheme,
) -> Option<SidebarAction> {
    let mut action = None;

    egui::SidePanel::left("channels_panel")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .frame(
            egui::Frame::new()
                .fill(theme.surface[1])
                .inner_margin(egui::Margin::symmetric(12, 12))
                .stroke(Stroke::new(1.0, theme.border)),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Slackr").size(18.0).strong().color(theme.text_primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("＋").on_hover_text("Create channel").clicked() {
                        action = Some(SidebarAction::CreateChannel);
                    }
                });
            });
            ui.add_space(8.0);

            ui.add(
                egui::TextEdit::singleline(&mut sidebar.filter)
                    .hint_text("🔍 Search channels...")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);

            egui::ScrollArea::vertical()
                .id_salt("channel_list")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let sections = [("CHANNELS", joined), ("BROWSE", public)];
                    for (title, channels) in sections {
                        let shown = filter_channels(channels, &sidebar.filter);
                        if let Some(id) = render_section(ui, title, &shown, active, sidebar, theme) {
                            action = Some(SidebarAction::Select(id));
                        }
                        ui.add_space(10.0);
                    }
                });
        });

    action
}

fn render_section(
    ui: &mut egui::Ui,
    title: &'static str,
    channels: &[&ChannelSummary],
    active: Option<ChannelId>,
    sidebar: &mut SidebarState,
    theme: &SlackrTheme,
) -> Option<ChannelId> {
    let collapsed = sidebar.collapsed.contains(title);
    let caret = if collapsed { "▶" } else { "▼" };
    let header = ui.add(
        egui::Label::new(
            egui::RichText::new(format!("{} {}  {}", caret, title, channels.len()))
                .font(theme::style_font(ui.style(), SECTION_STYLE))
                .strong()
                .color(theme.text_muted),
        )
        .sense(egui::Sense::click()),
    );
    if header.clicked() {
        if collapsed {
            sidebar.collapsed.remove(title);
        } else {
            sidebar.collapsed.insert(title);
        }
    }
    if collapsed {
        return None;
    }

    if channels.is_empty() {
        ui.label(egui::RichText::new("Nothing here").size(12.0).color(theme.text_muted));
        return None;
    }

    let mut selected = None;
    for channel in channels {
        let icon = if channel.private { "🔒" } else { "#" };
        let is_active = active == Some(channel.id);
        let text = egui::RichText::new(format!("{} {}", icon, channel.name)).color(if is_active {
            theme.text_primary
        } else {
            theme.text_secondary
        });
        let response = ui.add_sized(
            egui::vec2(ui.available_width(), 26.0),
            egui::SelectableLabel::new(is_active, text),
        );
        if response.clicked() {
            selected = Some(channel.id);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    fn channel(id: u64, name: &str) -> ChannelSummary {
        ChannelSummary {
            id: ChannelId(id),
            name: name.into(),
            creator: UserId(1),
            private: false,
            members: Vec::new(),
        }
    }

    #[test]
    fn test_filter_channels() {
        let channels = vec![channel(1, "General"), channel(2, "random"), channel(3, "gen-z")];
        let names = |filter: &str| -> Vec<String> {
            filter_channels(&channels, filter)
                .into_iter()
                .map(|c| c.name.clone())
                .collect()
        };
        assert_eq!(names(""), vec!["General", "random", "gen-z"]);
        assert_eq!(names("GEN"), vec!["General", "gen-z"]);
        assert_eq!(names("  rand "), vec!["random"]);
        assert!(names("zzz").is_empty());
    }
}
