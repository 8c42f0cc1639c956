//! Main update loop and global shortcuts

use eframe::egui;
use std::time::Duration;

use super::SlackrApp;
use crate::ui;

impl eframe::App for SlackrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.measure_installed {
            let measure = ui::messages::GalleyMeasure::new(ctx.clone());
            self.state.feed.sink_mut().set_measure(Box::new(measure));
            self.measure_installed = true;
        }

        // Process backend events
        self.process_events();

        // Request repaint to keep checking for events and to age timestamps
        ctx.request_repaint_after(Duration::from_millis(100));
        // Purge old status messages (toasts) older than 4 seconds
        self.state.purge_old_status_messages(4);

        if !self.state.is_logged_in() {
            if let Some(action) = self.auth.render(ctx, &self.theme) {
                self.send(action);
            }
            self.render_dialogs(ctx);
            return;
        }

        // Ctrl+Shift+L: toggle theme
        if ctx.input(|i| i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::L)) {
            self.toggle_theme(ctx);
        }

        self.render_menu_bar(ctx);
        self.render_sidebar(ctx);
        self.sync_composer();
        self.render_input_panel(ctx);
        self.render_central_panel(ctx);
        self.render_dialogs(ctx);
    }
}

impl SlackrApp {
    /// Keep the composer text attached to the channel it was typed in
    fn sync_composer(&mut self) {
        let current = self.state.active_channel_id();
        if current != self.composer_channel {
            self.input.switch_channel(self.composer_channel, current);
            self.composer_channel = current;
        }
    }
}
