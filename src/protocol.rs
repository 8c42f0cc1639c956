//! Messages exchanged between the UI thread and the backend thread.

use crate::error::FetchError;
use crate::feed::{Batch, FetchTicket};
use crate::model::{ChannelDetails, ChannelId, ChannelSummary, MessageId, Session, UserId};

/// Actions sent from the UI to the Backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// Log in with email and password
    Login { email: String, password: String },
    /// Create an account and log in
    Register {
        email: String,
        name: String,
        password: String,
    },
    /// Reuse a session restored from the keyring
    RestoreSession(Session),
    Logout,
    /// Fetch the full channel listing
    ListChannels,
    /// Fetch the header data of a channel the user is a member of
    OpenChannel(ChannelId),
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
    JoinChannel(ChannelId),
    LeaveChannel(ChannelId),
    /// Resolve a ticket issued by the feed loader
    FetchFeed(FetchTicket),
    SendMessage { channel: ChannelId, text: String },
    EditMessage {
        channel: ChannelId,
        message: MessageId,
        text: String,
    },
    DeleteMessage { channel: ChannelId, message: MessageId },
    SetPinned {
        channel: ChannelId,
        message: MessageId,
        pinned: bool,
    },
    React {
        channel: ChannelId,
        message: MessageId,
        kind: String,
        add: bool,
    },
    /// Stop the backend loop
    Shutdown,
}

/// Which user-facing operation an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Login,
    Register,
    Logout,
    Channels,
    Channel,
    Message,
    Backend,
}

/// Events sent from the Backend to the UI
#[derive(Debug, Clone)]
pub enum GuiEvent {
    LoggedIn(Session),
    LoggedOut,
    Channels(Vec<ChannelSummary>),
    ChannelOpened {
        channel: ChannelId,
        details: ChannelDetails,
        creator_name: String,
    },
    ChannelCreated(ChannelId),
    ChannelUpdated(ChannelId),
    ChannelJoined(ChannelId),
    ChannelLeft(ChannelId),
    /// Outcome of a feed ticket; the loader decides whether it is still current
    FeedBatch {
        ticket: FetchTicket,
        result: Result<Batch, FetchError>,
    },
    MessageSent(ChannelId),
    MessageEdited {
        channel: ChannelId,
        message: MessageId,
        text: String,
    },
    MessageDeleted { channel: ChannelId, message: MessageId },
    PinChanged {
        channel: ChannelId,
        message: MessageId,
        pinned: bool,
    },
    ReactionChanged {
        channel: ChannelId,
        message: MessageId,
        user: UserId,
        kind: String,
        add: bool,
    },
    Error { context: ErrorContext, message: String },
}

impl GuiEvent {
    pub fn error(context: ErrorContext, err: impl std::fmt::Display) -> Self {
        GuiEvent::Error {
            context,
            message: err.to_string(),
        }
    }
}
