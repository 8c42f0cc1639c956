//! Dialog action types - dialogs return actions instead of mutating state directly.

use crate::model::{ChannelId, MessageId};

/// Actions that dialogs can return to the main application.
/// The app processes these in its update loop.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    CreateChannel {
        name: String,
        description: String,
        private: bool,
    },
    UpdateChannel {
        channel: ChannelId,
        name: String,
        description: String,
    },
    EditMessage {
        channel: ChannelId,
        message: MessageId,
        text: String,
    },
    DeleteMessage {
        channel: ChannelId,
        message: MessageId,
    },
    JoinChannel(ChannelId),
    /// The join prompt was dismissed without joining
    DeclineJoin,
    /// The front error was acknowledged
    DismissError,
}
