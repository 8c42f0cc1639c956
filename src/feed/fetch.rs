//! Fetching one batch of a channel's history together with its senders.
//!
//! Runs on the backend runtime. The loader hands out a [`FetchTicket`], the
//! backend resolves it with [`fetch_batch`] and ships the [`Batch`] back.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Mutex;

use crate::error::FetchError;
use crate::model::{ChannelId, Message, SenderProfile, UserId, UserProfile};

/// Number of messages the backend returns per listing call
pub const BATCH_SIZE: usize = 25;

/// The capabilities the feed needs from the REST backend
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Up to [`BATCH_SIZE`] messages, newest first, for `[start, start + 25)`
    async fn list_messages(
        &self,
        channel: ChannelId,
        start: usize,
    ) -> Result<Vec<Message>, FetchError>;

    async fn get_user(&self, user: UserId) -> Result<UserProfile, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    /// Most recent batch, rendered at the bottom
    Initial,
    /// Next older batch, rendered above the current content
    Older,
}

/// One outstanding fetch issued by the feed loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub channel_id: ChannelId,
    pub start: usize,
    pub direction: FetchDirection,
}

/// A message paired with the profile of whoever sent it
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub message: Message,
    pub sender: SenderProfile,
}

/// Result of one listing call, in server order (newest first)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    pub entries: Vec<FeedEntry>,
    /// Sender lookups that failed; those entries carry a placeholder sender
    pub lookup_failures: Vec<FetchError>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fewer than a full batch means there is no older history
    pub fn is_short(&self) -> bool {
        self.entries.len() < BATCH_SIZE
    }
}

#[derive(Default)]
struct DirectoryState {
    generation: u64,
    profiles: HashMap<UserId, SenderProfile>,
}

/// Sender profiles memoized for one feed session.
///
/// A ticket from a newer generation wipes the memo, so profiles never leak
/// from one opened channel into the next.
#[derive(Default)]
pub struct SenderDirectory {
    state: Mutex<DirectoryState>,
}

impl SenderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    async fn known(&self, generation: u64) -> HashMap<UserId, SenderProfile> {
        let mut state = self.state.lock().await;
        if generation > state.generation {
            state.generation = generation;
            state.profiles.clear();
        }
        if generation < state.generation {
            return HashMap::new();
        }
        state.profiles.clone()
    }

    async fn remember(&self, generation: u64, resolved: Vec<(UserId, SenderProfile)>) {
        let mut state = self.state.lock().await;
        if generation == state.generation {
            state.profiles.extend(resolved);
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.state.lock().await.profiles.len()
    }
}

/// List one batch and resolve its senders.
///
/// Each distinct sender not already memoized is looked up once, all lookups
/// concurrently. Entry order is the listing order regardless of which lookup
/// finishes first. A failed lookup yields a placeholder sender and is
/// recorded in [`Batch::lookup_failures`]; only a failed listing fails the
/// whole batch.
pub async fn fetch_batch<S: MessageSource + ?Sized>(
    source: &S,
    directory: &SenderDirectory,
    ticket: &FetchTicket,
) -> Result<Batch, FetchError> {
    let messages = source.list_messages(ticket.channel_id, ticket.start).await?;
    tracing::debug!(
        channel = %ticket.channel_id,
        start = ticket.start,
        count = messages.len(),
        "listed messages"
    );

    let mut resolved = directory.known(ticket.generation).await;
    let mut missing: Vec<UserId> = messages
        .iter()
        .map(|m| m.sender)
        .filter(|id| !resolved.contains_key(id))
        .collect();
    missing.sort_unstable();
    missing.dedup();

    let lookups = missing
        .iter()
        .map(|&id| async move { (id, source.get_user(id).await) });

    let mut fresh = Vec::new();
    let mut lookup_failures = Vec::new();
    for (id, result) in join_all(lookups).await {
        match result {
            Ok(profile) => {
                let sender = SenderProfile::from(profile);
                fresh.push((id, sender.clone()));
                resolved.insert(id, sender);
            }
            Err(e) => {
                tracing::warn!(user = %id, "sender lookup failed: {}", e);
                lookup_failures.push(e);
            }
        }
    }
    directory.remember(ticket.generation, fresh).await;

    let entries = messages
        .into_iter()
        .map(|message| {
            let sender = resolved
                .get(&message.sender)
                .cloned()
                .unwrap_or_else(|| SenderProfile::unknown(message.sender));
            FeedEntry { message, sender }
        })
        .collect();

    Ok(Batch {
        entries,
        lookup_failures,
    })
}
