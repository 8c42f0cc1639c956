//! Menu bar, sidebar and central panel rendering

use eframe::egui;

use crate::app::SlackrApp;
use crate::protocol::BackendAction;
use crate::ui;
use crate::ui::messages::{FeedAction, HeaderAction};
use crate::ui::panels::SidebarAction;

impl SlackrApp {
    /// Render the menu bar at the top of the window
    pub(in crate::app) fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar")
            .frame(
                egui::Frame::new()
                    .fill(self.theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(8, 4))
                    .stroke(egui::Stroke::new(1.0, self.theme.border)),
            )
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Log out").clicked() {
                            self.send(BackendAction::Logout);
                            ui.close_menu();
                        }
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.menu_button("Channel", |ui| {
                        if ui.button("Create channel…").clicked() {
                            self.dialogs.open_create_channel();
                            ui.close_menu();
                        }
                        if ui.button("Refresh list").clicked() {
                            self.send(BackendAction::ListChannels);
                            ui.close_menu();
                        }
                    });
                    ui.menu_button("View", |ui| {
                        let label = if self.settings.theme == "light" { "Dark theme" } else { "Light theme" };
                        if ui.button(label).clicked() {
                            self.toggle_theme(ctx);
                            ui.close_menu();
                        }
                    });
                });
            });
    }

    pub(in crate::app) fn render_sidebar(&mut self, ctx: &egui::Context) {
        let action = ui::panels::render_channel_list(
            ctx,
            &self.state.joined_channels,
            &self.state.public_channels,
            self.state.active_channel_id(),
            &mut self.sidebar,
            &self.theme,
        );
        match action {
            Some(SidebarAction::Select(channel)) => {
                if self.state.active_channel_id() != Some(channel) {
                    self.dialogs.close_channel_dialogs();
                    let actions = self.state.select_channel(channel);
                    self.send_all(actions);
                }
            }
            Some(SidebarAction::CreateChannel) => self.dialogs.open_create_channel(),
            None => {}
        }
    }

    /// Render the central panel: welcome screen or the open channel
    pub(in crate::app) fn render_central_panel(&mut self, ctx: &egui::Context) {
        let theme = self.theme.clone();
        let me = self.state.user_id();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface[0]).inner_margin(0.0))
            .show(ctx, |ui| {
                let Some(active) = self.state.active_channel.clone() else {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.3);
                        ui.heading("Welcome to Slackr");
                        ui.label(
                            egui::RichText::new("Pick a channel on the left, or create a new one.")
                                .color(theme.text_muted),
                        );
                    });
                    return;
                };

                let pinned = self.state.feed.sink().pinned().count();
                match ui::messages::render_channel_header(ui, &active, pinned, &theme) {
                    Some(HeaderAction::Edit { name, description }) => {
                        self.dialogs.open_edit_channel(active.id, &name, &description);
                    }
                    Some(HeaderAction::Leave) => self.send(BackendAction::LeaveChannel(active.id)),
                    None => {}
                }

                let actions = ui::messages::render_feed(
                    ui,
                    self.state.feed.sink_mut(),
                    active.id,
                    me,
                    &theme,
                );
                for action in actions {
                    self.handle_feed_action(active.id, action);
                }
            });
    }

    fn handle_feed_action(&mut self, channel: crate::model::ChannelId, action: FeedAction) {
        match action {
            FeedAction::LoadOlder => {
                if let Some(fetch) = self.state.on_scroll_to_top() {
                    self.send(fetch);
                }
            }
            FeedAction::Delete(message) => self.dialogs.open_confirm_delete(channel, message),
            FeedAction::SetPinned(message, pinned) => self.send(BackendAction::SetPinned {
                channel,
                message,
                pinned,
            }),
            FeedAction::React { message, kind, add } => self.send(BackendAction::React {
                channel,
                message,
                kind,
                add,
            }),
            FeedAction::Edit(message, text) => self.dialogs.open_message_editor(channel, message, &text),
        }
    }
}
