//! In-memory collaborators for exercising the feed without a backend or a window.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use super::fetch::{FetchDirection, FetchTicket, MessageSource, BATCH_SIZE};
use super::sink::{NodeUpdate, RenderSink};
use crate::error::{FetchError, RenderPreconditionError};
use crate::model::{ChannelId, Message, MessageId, SenderProfile, UserId, UserProfile};

pub(crate) const CHANNEL: ChannelId = ChannelId(1);

pub(crate) fn ticket(generation: u64, start: usize, direction: FetchDirection) -> FetchTicket {
    FetchTicket {
        generation,
        channel_id: CHANNEL,
        start,
        direction,
    }
}

pub(crate) fn message(id: u64, sender: u64) -> Message {
    Message {
        id: MessageId(id),
        sender: UserId(sender),
        message: Some(format!("message {}", id)),
        image: None,
        sent_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id as i64),
        edited: false,
        edited_at: None,
        pinned: false,
        reactions: Vec::new(),
    }
}

#[derive(Default)]
struct SourceState {
    history: Vec<Message>,
    failing_users: HashSet<UserId>,
    fail_listing: bool,
    user_lookups: usize,
    listings: usize,
}

/// A channel whose history is messages `1..=n`, `n` being the newest
#[derive(Default)]
pub(crate) struct FakeSource {
    state: Mutex<SourceState>,
}

impl FakeSource {
    pub fn with_history(n: u64, senders: u64) -> Self {
        let source = Self::default();
        {
            let mut state = source.state.lock().unwrap();
            state.history = (1..=n).map(|id| message(id, id % senders)).collect();
        }
        source
    }

    pub fn fail_user(&self, user: UserId) {
        self.state.lock().unwrap().failing_users.insert(user);
    }

    /// Delete a message server side; older messages move up one offset
    pub fn delete(&self, id: MessageId) {
        self.state.lock().unwrap().history.retain(|m| m.id != id);
    }

    pub fn fail_listing(&self, fail: bool) {
        self.state.lock().unwrap().fail_listing = fail;
    }

    pub fn user_lookups(&self) -> usize {
        self.state.lock().unwrap().user_lookups
    }

    pub fn listings(&self) -> usize {
        self.state.lock().unwrap().listings
    }
}

#[async_trait]
impl MessageSource for FakeSource {
    async fn list_messages(
        &self,
        _channel: ChannelId,
        start: usize,
    ) -> Result<Vec<Message>, FetchError> {
        let mut state = self.state.lock().unwrap();
        state.listings += 1;
        if state.fail_listing {
            return Err(FetchError::Network("connection refused".into()));
        }
        Ok(state
            .history
            .iter()
            .rev()
            .skip(start)
            .take(BATCH_SIZE)
            .cloned()
            .collect())
    }

    async fn get_user(&self, user: UserId) -> Result<UserProfile, FetchError> {
        let mut state = self.state.lock().unwrap();
        state.user_lookups += 1;
        if state.failing_users.contains(&user) {
            return Err(FetchError::Server {
                status: 400,
                message: "Invalid user".into(),
            });
        }
        Ok(UserProfile {
            name: format!("user{}", user.0),
            email: None,
            bio: None,
            image: None,
        })
    }
}

/// Render sink that records what it was asked to do.
///
/// Row height depends on the message id so height sums are not trivially
/// `count * h`.
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub rows: VecDeque<Message>,
    pub senders: VecDeque<String>,
    pub offset: f32,
    pub loading: bool,
    pub watch_armed: bool,
    pub detached: bool,
    pub bottom_scrolls: usize,
    pub clears: usize,
}

impl RecordingSink {
    pub fn row_height(id: MessageId) -> f32 {
        20.0 + (id.0 % 3) as f32 * 8.0
    }

    pub fn ids(&self) -> Vec<u64> {
        self.rows.iter().map(|m| m.id.0).collect()
    }

    pub fn row(&self, id: u64) -> Option<&Message> {
        self.rows.iter().find(|m| m.id.0 == id)
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) {
        self.rows.clear();
        self.senders.clear();
        self.clears += 1;
    }

    fn append_to_bottom(
        &mut self,
        message: &Message,
        sender: &SenderProfile,
    ) -> Result<(), RenderPreconditionError> {
        if self.detached {
            return Err(RenderPreconditionError("message list detached".into()));
        }
        self.rows.push_back(message.clone());
        self.senders.push_back(sender.name.clone());
        Ok(())
    }

    fn prepend_to_top(
        &mut self,
        message: &Message,
        sender: &SenderProfile,
    ) -> Result<f32, RenderPreconditionError> {
        if self.detached {
            return Err(RenderPreconditionError("message list detached".into()));
        }
        self.rows.push_front(message.clone());
        self.senders.push_front(sender.name.clone());
        Ok(Self::row_height(message.id))
    }

    fn set_loading_indicator(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn set_scroll_offset(&mut self, px: f32) {
        self.offset = px;
    }

    fn scroll_to_bottom(&mut self) {
        self.bottom_scrolls += 1;
        self.offset = self.rows.iter().map(|m| Self::row_height(m.id)).sum();
    }

    fn set_top_watch(&mut self, armed: bool) {
        self.watch_armed = armed;
    }

    fn update_node(&mut self, id: MessageId, update: &NodeUpdate) -> bool {
        match self.rows.iter_mut().find(|m| m.id == id) {
            Some(row) => {
                update.apply(row);
                true
            }
            None => false,
        }
    }

    fn remove_node(&mut self, id: MessageId) -> bool {
        match self.rows.iter().position(|m| m.id == id) {
            Some(idx) => {
                self.rows.remove(idx);
                self.senders.remove(idx);
                true
            }
            None => false,
        }
    }
}
