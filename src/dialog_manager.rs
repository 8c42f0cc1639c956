//! Dialog management for centralized dialog state and rendering.
//!
//! Consolidates the editing dialogs into a single `DialogManager` so the
//! app only sees the `DialogAction`s they produce.

use eframe::egui::Context;

use crate::model::{ChannelId, MessageId};
use crate::ui::dialogs::{ChannelEditorDialog, ConfirmDeleteDialog, DialogAction, MessageEditorDialog};

/// Manages all application dialogs in one place.
///
/// Uses the Option<Dialog> pattern where None = closed, Some = open.
#[derive(Default)]
pub struct DialogManager {
    pub channel_editor: Option<ChannelEditorDialog>,
    pub message_editor: Option<MessageEditorDialog>,
    pub confirm_delete: Option<ConfirmDeleteDialog>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create_channel(&mut self) {
        self.channel_editor = Some(ChannelEditorDialog::create());
    }

    pub fn open_edit_channel(&mut self, channel: ChannelId, name: &str, description: &str) {
        self.channel_editor = Some(ChannelEditorDialog::edit(channel, name, description));
    }

    pub fn open_message_editor(&mut self, channel: ChannelId, message: MessageId, text: &str) {
        self.message_editor = Some(MessageEditorDialog::new(channel, message, text));
    }

    pub fn open_confirm_delete(&mut self, channel: ChannelId, message: MessageId) {
        self.confirm_delete = Some(ConfirmDeleteDialog::new(channel, message));
    }

    /// Drop dialogs tied to a channel that is no longer open
    pub fn close_channel_dialogs(&mut self) {
        self.message_editor = None;
        self.confirm_delete = None;
        if self.channel_editor.as_ref().is_some_and(|d| d.channel.is_some()) {
            self.channel_editor = None;
        }
    }

    pub fn close_all(&mut self) {
        *self = Self::default();
    }

    pub fn any_open(&self) -> bool {
        self.channel_editor.is_some() || self.message_editor.is_some() || self.confirm_delete.is_some()
    }

    /// Render all open dialogs and collect their actions.
    pub fn render(&mut self, ctx: &Context) -> Vec<DialogAction> {
        let mut actions = Vec::new();

        if let Some(dialog) = &mut self.channel_editor {
            let (action, still_open) = dialog.render(ctx);
            actions.extend(action);
            if !still_open {
                self.channel_editor = None;
            }
        }

        if let Some(dialog) = &mut self.message_editor {
            let (action, still_open) = dialog.render(ctx);
            actions.extend(action);
            if !still_open {
                self.message_editor = None;
            }
        }

        if let Some(dialog) = &mut self.confirm_delete {
            let (action, still_open) = dialog.render(ctx);
            actions.extend(action);
            if !still_open {
                self.confirm_delete = None;
            }
        }

        actions
    }
}
