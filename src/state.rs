//! Core application state, separated from UI logic.
//!
//! `ClientState` holds everything the chat session knows on the UI thread:
//! the session, the channel lists, the open channel and its feed loader.
//! Methods that need the backend return the `BackendAction`s to send
//! instead of sending them, so the app layer stays the only owner of the
//! channel and the state can be driven directly in tests.

use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::{FeedError, FetchError};
use crate::feed::{
    Batch, Completion, FeedLoader, FeedView, FetchTicket, FixedRowHeight, NodeUpdate,
};
use crate::model::{ChannelDetails, ChannelId, ChannelSummary, MessageId, Session};
use crate::protocol::BackendAction;

/// Error text the backend returns when opening a channel the user is not in
pub const NOT_MEMBER_ERROR: &str = "Authorised user is not a member of this channel";

/// Height used for rows until the message panel installs a real measure
const PLACEHOLDER_ROW_HEIGHT: f32 = 48.0;

pub type Feed = FeedLoader<FeedView, Sender<FeedError>>;

/// The channel currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveChannel {
    pub id: ChannelId,
    /// Filled in once `channel/{id}` answers
    pub details: Option<ChannelDetails>,
    pub creator_name: String,
}

/// Core application state for the chat client.
///
/// Owned by `SlackrApp` and passed to UI components as needed.
pub struct ClientState {
    pub session: Option<Session>,

    /// Channels the user belongs to, in server order.
    pub joined_channels: Vec<ChannelSummary>,

    /// Public channels the user has not joined.
    pub public_channels: Vec<ChannelSummary>,

    pub active_channel: Option<ActiveChannel>,

    /// A channel the user picked but is not a member of; shows the join prompt.
    pub pending_join: Option<ChannelId>,

    pub feed: Feed,
    feed_errors: Receiver<FeedError>,

    /// Messages waiting for the error dialog, oldest first.
    pub errors: Vec<String>,

    /// Status toast messages with creation time (auto-expire).
    pub status_messages: Vec<(String, Instant)>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientState {
    pub fn new() -> Self {
        let (error_tx, error_rx) = unbounded();
        let view = FeedView::new(Box::new(FixedRowHeight(PLACEHOLDER_ROW_HEIGHT)));
        Self {
            session: None,
            joined_channels: Vec::new(),
            public_channels: Vec::new(),
            active_channel: None,
            pending_join: None,
            feed: FeedLoader::new(view, error_tx),
            feed_errors: error_rx,
            errors: Vec::new(),
            status_messages: Vec::new(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<crate::model::UserId> {
        self.session.as_ref().map(|s| s.user_id)
    }

    pub fn active_channel_id(&self) -> Option<ChannelId> {
        self.active_channel.as_ref().map(|c| c.id)
    }

    /// Split a fresh listing into joined and joinable channels.
    /// Private channels the user is not in are not shown at all.
    pub fn set_channels(&mut self, channels: Vec<ChannelSummary>) {
        let Some(user) = self.user_id() else {
            self.joined_channels.clear();
            self.public_channels.clear();
            return;
        };
        let (joined, others): (Vec<_>, Vec<_>) =
            channels.into_iter().partition(|c| c.is_member(user));
        self.joined_channels = joined;
        self.public_channels = others.into_iter().filter(|c| !c.private).collect();
    }

    pub fn find_channel(&self, id: ChannelId) -> Option<&ChannelSummary> {
        self.joined_channels
            .iter()
            .chain(self.public_channels.iter())
            .find(|c| c.id == id)
    }

    pub fn is_member(&self, id: ChannelId) -> bool {
        self.joined_channels.iter().any(|c| c.id == id)
    }

    /// The user clicked a channel in the sidebar
    pub fn select_channel(&mut self, id: ChannelId) -> Vec<BackendAction> {
        if !self.is_member(id) {
            self.close_channel();
            self.pending_join = Some(id);
            return Vec::new();
        }
        self.pending_join = None;
        self.active_channel = Some(ActiveChannel {
            id,
            details: None,
            creator_name: String::new(),
        });
        let ticket = self.start_feed(id);
        vec![BackendAction::OpenChannel(id), BackendAction::FetchFeed(ticket)]
    }

    /// Render the open channel's feed again from the newest message
    pub fn reload_feed(&mut self) -> Option<BackendAction> {
        let id = self.active_channel_id()?;
        Some(BackendAction::FetchFeed(self.start_feed(id)))
    }

    fn start_feed(&mut self, id: ChannelId) -> FetchTicket {
        self.feed.sink_mut().attach();
        self.feed.initialize(id)
    }

    /// Leave the channel view and return to the welcome screen
    pub fn close_channel(&mut self) {
        self.feed.teardown();
        self.feed.sink_mut().detach();
        self.active_channel = None;
    }

    pub fn set_channel_details(&mut self, id: ChannelId, details: ChannelDetails, creator_name: String) {
        match self.active_channel.as_mut() {
            Some(active) if active.id == id => {
                active.details = Some(details);
                active.creator_name = creator_name;
            }
            _ => tracing::debug!(channel = %id, "ignoring details for a channel no longer open"),
        }
    }

    /// Move a channel into the joined list without waiting for a new listing
    pub fn mark_joined(&mut self, id: ChannelId) {
        let Some(user) = self.user_id() else { return };
        if let Some(pos) = self.public_channels.iter().position(|c| c.id == id) {
            let mut channel = self.public_channels.remove(pos);
            channel.members.push(user);
            self.joined_channels.push(channel);
        }
        if self.pending_join == Some(id) {
            self.pending_join = None;
        }
    }

    pub fn mark_left(&mut self, id: ChannelId) {
        if self.active_channel_id() == Some(id) {
            self.close_channel();
        }
        let Some(user) = self.user_id() else { return };
        if let Some(pos) = self.joined_channels.iter().position(|c| c.id == id) {
            let mut channel = self.joined_channels.remove(pos);
            channel.members.retain(|m| *m != user);
            if !channel.private {
                self.public_channels.push(channel);
            }
        }
    }

    /// The top of the feed came into view
    pub fn on_scroll_to_top(&mut self) -> Option<BackendAction> {
        self.feed.on_scroll_to_top().map(BackendAction::FetchFeed)
    }

    pub fn apply_feed_batch(&mut self, ticket: &FetchTicket, result: Result<Batch, FetchError>) -> Completion {
        let completion = self.feed.complete(ticket, result);
        self.drain_feed_errors();
        completion
    }

    pub fn apply_message_update(&mut self, channel: ChannelId, message: MessageId, update: &NodeUpdate) {
        if self.active_channel_id() == Some(channel) {
            self.feed.apply_update(message, update);
        }
    }

    pub fn remove_message(&mut self, channel: ChannelId, message: MessageId) {
        if self.active_channel_id() == Some(channel) {
            self.feed.remove(message);
        }
    }

    /// Move reported feed errors into the error dialog queue
    pub fn drain_feed_errors(&mut self) {
        while let Ok(error) = self.feed_errors.try_recv() {
            self.errors.push(error.to_string());
        }
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn push_status(&mut self, message: impl Into<String>) {
        self.status_messages.push((message.into(), Instant::now()));
    }

    /// Forget everything tied to the session
    pub fn clear_session(&mut self) {
        self.close_channel();
        self.session = None;
        self.joined_channels.clear();
        self.public_channels.clear();
        self.pending_join = None;
    }

    /// Purge status messages older than the given duration.
    pub fn purge_old_status_messages(&mut self, max_age_secs: u64) {
        self.status_messages
            .retain(|(_, created)| created.elapsed().as_secs() < max_age_secs);
    }
}
