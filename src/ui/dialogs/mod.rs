//! Modal dialogs and windows - self-contained dialog components.
//!
//! Each dialog owns its editing state and returns `DialogAction`s
//! instead of mutating external state directly. Dialogs are stored as
//! `Option<Dialog>` in the `DialogManager`: `None` is closed, `Some` is
//! open with its state.

mod actions;
mod channel_editor;
mod message_editor;
mod prompts;
mod status_toasts;

pub use actions::DialogAction;
pub use channel_editor::ChannelEditorDialog;
pub use message_editor::MessageEditorDialog;
pub use prompts::{render_error_dialog, render_join_prompt, ConfirmDeleteDialog};
pub use status_toasts::render_status_toasts;
