//! The message feed loader: cursor, in-flight guard and feed generation for
//! the one channel currently on screen.
//!
//! The loader never talks to the network itself. It hands out
//! [`FetchTicket`]s, the backend resolves them, and [`FeedLoader::complete`]
//! applies the result to the render sink. Results carrying a ticket from an
//! older generation are dropped, so a slow response for a channel the user
//! already left can never render into the new one.

use std::collections::HashSet;

use super::fetch::{Batch, FetchDirection, FetchTicket};
use super::sink::{ErrorReporter, NodeUpdate, RenderSink};
use crate::error::{FeedError, FetchError};
use crate::model::{ChannelId, MessageId};

/// What applying a fetch result did to the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The ticket belonged to an older generation; nothing changed
    Stale,
    /// `count` new nodes were rendered
    Rendered { count: usize },
    /// The backward fetch came back empty; no more history
    Exhausted,
    /// The fetch or the render failed and was reported
    Failed,
    /// A message was deleted while the backward fetch was out, so the
    /// server's offsets may have moved under it. The batch was dropped and
    /// the next scroll to the top asks again at the corrected cursor.
    Shifted,
}

pub struct FeedLoader<S, R> {
    sink: S,
    reporter: R,
    channel: Option<ChannelId>,
    generation: u64,
    /// Messages fetched so far, as an offset into newest-first history
    start: usize,
    ready: bool,
    in_flight: bool,
    exhausted: bool,
    /// A delete landed while a backward fetch was in flight
    shifted: bool,
    rendered: HashSet<MessageId>,
}

impl<S: RenderSink, R: ErrorReporter> FeedLoader<S, R> {
    pub fn new(sink: S, reporter: R) -> Self {
        Self {
            sink,
            reporter,
            channel: None,
            generation: 0,
            start: 0,
            ready: false,
            in_flight: false,
            exhausted: false,
            shifted: false,
            rendered: HashSet::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Initial batch rendered; backward pagination allowed
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Open `channel_id`: drop whatever the previous channel left behind and
    /// issue the ticket for its most recent batch.
    pub fn initialize(&mut self, channel_id: ChannelId) -> FetchTicket {
        self.teardown();
        self.sink.clear();
        self.channel = Some(channel_id);
        self.in_flight = true;
        tracing::debug!(channel = %channel_id, generation = self.generation, "feed initialized");

        FetchTicket {
            generation: self.generation,
            channel_id,
            start: 0,
            direction: FetchDirection::Initial,
        }
    }

    /// The viewport reports it is scrolled to the top. Issues a ticket for the
    /// next older batch when the feed is ready, idle and not yet exhausted.
    pub fn on_scroll_to_top(&mut self) -> Option<FetchTicket> {
        let channel_id = self.channel?;
        if !self.ready || self.in_flight || self.exhausted {
            return None;
        }
        if self.sink.scroll_offset() > 0.0 {
            return None;
        }

        self.in_flight = true;
        self.shifted = false;
        self.sink.set_loading_indicator(true);
        tracing::debug!(channel = %channel_id, start = self.start, "fetching older batch");

        Some(FetchTicket {
            generation: self.generation,
            channel_id,
            start: self.start,
            direction: FetchDirection::Older,
        })
    }

    /// Apply the outcome of a ticket previously issued by this loader
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Batch, FetchError>,
    ) -> Completion {
        if ticket.generation != self.generation || Some(ticket.channel_id) != self.channel {
            tracing::warn!(
                channel = %ticket.channel_id,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale feed response"
            );
            return Completion::Stale;
        }
        if !self.in_flight {
            tracing::warn!(channel = %ticket.channel_id, "feed response without a pending fetch");
            return Completion::Stale;
        }

        let outcome = match ticket.direction {
            FetchDirection::Initial => self.complete_initial(result),
            FetchDirection::Older if self.shifted => {
                tracing::debug!(
                    ticket_start = ticket.start,
                    start = self.start,
                    "history shifted during fetch, dropping batch"
                );
                Completion::Shifted
            }
            FetchDirection::Older => self.complete_older(result),
        };
        self.in_flight = false;
        self.shifted = false;
        self.sink.set_loading_indicator(false);
        outcome
    }

    fn complete_initial(&mut self, result: Result<Batch, FetchError>) -> Completion {
        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                self.report(e.into());
                return Completion::Failed;
            }
        };
        self.report_lookup_failures(&batch);

        let fetched = batch.len();
        let exhausted = batch.is_short();
        let mut count = 0;
        // Server order is newest first; the view wants oldest at the top
        for entry in batch.entries.into_iter().rev() {
            if !self.rendered.insert(entry.message.id) {
                continue;
            }
            if let Err(e) = self.sink.append_to_bottom(&entry.message, &entry.sender) {
                self.rendered.remove(&entry.message.id);
                self.report(e.into());
                return Completion::Failed;
            }
            count += 1;
        }

        self.start = fetched;
        self.exhausted = exhausted;
        self.sink.scroll_to_bottom();
        self.ready = true;
        self.sink.set_top_watch(true);
        tracing::debug!(rendered = count, start = self.start, exhausted, "initial batch rendered");
        Completion::Rendered { count }
    }

    fn complete_older(&mut self, result: Result<Batch, FetchError>) -> Completion {
        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                self.report(e.into());
                return Completion::Failed;
            }
        };
        self.report_lookup_failures(&batch);

        if batch.is_empty() {
            self.exhausted = true;
            tracing::debug!(start = self.start, "history exhausted");
            return Completion::Exhausted;
        }

        let fetched = batch.len();
        let exhausted = batch.is_short();
        let mut inserted_height = 0.0;
        let mut count = 0;
        let mut failed = None;
        // Prepending newest-first one node at a time leaves the oldest on top
        for entry in batch.entries {
            if !self.rendered.insert(entry.message.id) {
                continue;
            }
            match self.sink.prepend_to_top(&entry.message, &entry.sender) {
                Ok(height) => {
                    inserted_height += height;
                    count += 1;
                }
                Err(e) => {
                    self.rendered.remove(&entry.message.id);
                    failed = Some(e);
                    break;
                }
            }
        }

        if inserted_height > 0.0 {
            let offset = self.sink.scroll_offset() + inserted_height;
            self.sink.set_scroll_offset(offset);
        }

        if let Some(e) = failed {
            self.report(e.into());
            return Completion::Failed;
        }

        self.start += fetched;
        self.exhausted = exhausted;
        tracing::debug!(rendered = count, start = self.start, exhausted, "older batch rendered");
        Completion::Rendered { count }
    }

    /// Release everything tied to the current channel
    pub fn teardown(&mut self) {
        self.sink.set_top_watch(false);
        self.sink.set_loading_indicator(false);
        self.generation += 1;
        self.channel = None;
        self.start = 0;
        self.ready = false;
        self.in_flight = false;
        self.exhausted = false;
        self.shifted = false;
        self.rendered.clear();
    }

    /// Change the rendered node for one message in place
    pub fn apply_update(&mut self, id: MessageId, update: &NodeUpdate) -> bool {
        self.sink.update_node(id, update)
    }

    /// Remove the rendered node for a deleted message.
    ///
    /// Deleting shifts every older message one slot closer in the server's
    /// newest-first offsets, so the cursor steps back by one. A backward
    /// fetch already in flight may have been listed on either side of the
    /// delete, so its batch is dropped when it lands.
    pub fn remove(&mut self, id: MessageId) -> bool {
        if self.ready && self.in_flight {
            self.shifted = true;
        }
        if !self.sink.remove_node(id) {
            return false;
        }
        self.rendered.remove(&id);
        self.start = self.start.saturating_sub(1);
        true
    }

    fn report_lookup_failures(&self, batch: &Batch) {
        for failure in &batch.lookup_failures {
            self.report(failure.clone().into());
        }
    }

    fn report(&self, error: FeedError) {
        tracing::error!("feed error: {}", error);
        self.reporter.report(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fetch::{fetch_batch, SenderDirectory};
    use crate::feed::testing::{message, FakeSource, RecordingSink, CHANNEL};
    use crate::model::{SenderProfile, UserId};
    use crossbeam_channel::{unbounded, Receiver, Sender};

    type Loader = FeedLoader<RecordingSink, Sender<FeedError>>;

    fn loader() -> (Loader, Receiver<FeedError>) {
        let (tx, rx) = unbounded();
        (FeedLoader::new(RecordingSink::default(), tx), rx)
    }

    async fn run(
        loader: &mut Loader,
        source: &FakeSource,
        directory: &SenderDirectory,
        ticket: &FetchTicket,
    ) -> Completion {
        let result = fetch_batch(source, directory, ticket).await;
        loader.complete(ticket, result)
    }

    fn batch_of(ids: impl IntoIterator<Item = u64>) -> Batch {
        Batch {
            entries: ids
                .into_iter()
                .map(|id| crate::feed::fetch::FeedEntry {
                    message: message(id, 1),
                    sender: SenderProfile::unknown(UserId(1)),
                })
                .collect(),
            lookup_failures: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_sixty_message_scenario() {
        let source = FakeSource::with_history(60, 4);
        let directory = SenderDirectory::new();
        let (mut loader, errors) = loader();

        let ticket = loader.initialize(CHANNEL);
        assert_eq!(ticket.start, 0);
        assert_eq!(
            run(&mut loader, &source, &directory, &ticket).await,
            Completion::Rendered { count: 25 }
        );
        assert_eq!(loader.sink().ids(), (36..=60).collect::<Vec<_>>());
        assert_eq!(loader.start(), 25);
        assert!(loader.sink().watch_armed);
        assert_eq!(loader.sink().bottom_scrolls, 1);

        loader.sink_mut().offset = 0.0;
        let ticket = loader.on_scroll_to_top().unwrap();
        assert_eq!(ticket.start, 25);
        assert!(loader.sink().loading);
        run(&mut loader, &source, &directory, &ticket).await;
        assert_eq!(loader.sink().ids(), (11..=60).collect::<Vec<_>>());
        assert_eq!(loader.start(), 50);
        assert!(!loader.sink().loading);

        loader.sink_mut().offset = 0.0;
        let ticket = loader.on_scroll_to_top().unwrap();
        assert_eq!(ticket.start, 50);
        assert_eq!(
            run(&mut loader, &source, &directory, &ticket).await,
            Completion::Rendered { count: 10 }
        );
        assert_eq!(loader.sink().ids(), (1..=60).collect::<Vec<_>>());
        assert_eq!(loader.start(), 60);
        assert!(loader.is_exhausted());

        // History exhausted: further scroll-to-top events do nothing
        let listings = source.listings();
        loader.sink_mut().offset = 0.0;
        assert!(loader.on_scroll_to_top().is_none());
        assert_eq!(loader.start(), 60);
        assert_eq!(source.listings(), listings);
        assert!(errors.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_scroll_offset_grows_by_inserted_height() {
        let source = FakeSource::with_history(40, 2);
        let directory = SenderDirectory::new();
        let (mut loader, _errors) = loader();

        let ticket = loader.initialize(CHANNEL);
        run(&mut loader, &source, &directory, &ticket).await;

        loader.sink_mut().offset = 0.0;
        let ticket = loader.on_scroll_to_top().unwrap();
        run(&mut loader, &source, &directory, &ticket).await;

        let expected: f32 = (1..=15)
            .map(|id| RecordingSink::row_height(MessageId(id)))
            .sum();
        assert_eq!(loader.sink().offset, expected);
    }

    #[test]
    fn test_scroll_requires_top_ready_and_idle() {
        let (mut loader, _errors) = loader();
        // Not initialized
        assert!(loader.on_scroll_to_top().is_none());

        let ticket = loader.initialize(CHANNEL);
        // Initial fetch still outstanding
        assert!(loader.on_scroll_to_top().is_none());
        loader.complete(&ticket, Ok(batch_of((1..=25).rev())));

        // Not at the top
        assert!(loader.sink().offset > 0.0);
        assert!(loader.on_scroll_to_top().is_none());

        loader.sink_mut().offset = 0.0;
        assert!(loader.on_scroll_to_top().is_some());
        // A second event at offset 0 while the first fetch is pending
        assert!(loader.on_scroll_to_top().is_none());
        assert!(loader.is_fetching());
    }

    #[test]
    fn test_failed_older_fetch_keeps_cursor() {
        let (mut loader, errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        loader.complete(&ticket, Ok(batch_of((26..=50).rev())));
        assert_eq!(loader.start(), 25);

        loader.sink_mut().offset = 0.0;
        let ticket = loader.on_scroll_to_top().unwrap();
        let outcome = loader.complete(&ticket, Err(FetchError::Network("timeout".into())));
        assert_eq!(outcome, Completion::Failed);
        assert_eq!(loader.start(), 25);
        assert!(!loader.sink().loading);
        assert!(!loader.is_fetching());
        assert!(matches!(errors.try_recv(), Ok(FeedError::Fetch(FetchError::Network(_)))));

        // Retry issues the same cursor and succeeds
        let retry = loader.on_scroll_to_top().unwrap();
        assert_eq!(retry.start, 25);
        loader.complete(&retry, Ok(batch_of((1..=25).rev())));
        assert_eq!(loader.start(), 50);
        assert_eq!(loader.sink().ids(), (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn test_failed_initial_fetch_leaves_feed_unarmed() {
        let (mut loader, errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        let outcome = loader.complete(
            &ticket,
            Err(FetchError::Server {
                status: 403,
                message: "Authorised user is not a member of this channel".into(),
            }),
        );
        assert_eq!(outcome, Completion::Failed);
        assert!(!loader.is_ready());
        assert!(!loader.sink().watch_armed);
        assert!(!loader.sink().loading);
        assert_eq!(loader.start(), 0);
        assert!(errors.try_recv().is_ok());
    }

    #[test]
    fn test_empty_older_batch_exhausts() {
        let (mut loader, _errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        loader.complete(&ticket, Ok(batch_of((1..=25).rev())));

        loader.sink_mut().offset = 0.0;
        let ticket = loader.on_scroll_to_top().unwrap();
        assert_eq!(loader.complete(&ticket, Ok(Batch::default())), Completion::Exhausted);
        assert_eq!(loader.start(), 25);
        assert!(!loader.sink().loading);
        assert!(loader.on_scroll_to_top().is_none());
    }

    #[test]
    fn test_short_initial_batch_exhausts() {
        let (mut loader, _errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        loader.complete(&ticket, Ok(batch_of((1..=3).rev())));
        assert_eq!(loader.sink().ids(), vec![1, 2, 3]);
        assert!(loader.is_exhausted());
        loader.sink_mut().offset = 0.0;
        assert!(loader.on_scroll_to_top().is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (mut loader, _errors) = loader();
        let old = loader.initialize(CHANNEL);
        let new = loader.initialize(ChannelId(2));
        assert!(new.generation > old.generation);

        assert_eq!(loader.complete(&old, Ok(batch_of([5, 4, 3]))), Completion::Stale);
        assert!(loader.sink().rows.is_empty());

        loader.complete(&new, Ok(batch_of([9, 8])));
        assert_eq!(loader.sink().ids(), vec![8, 9]);
        assert_eq!(loader.channel(), Some(ChannelId(2)));
    }

    #[test]
    fn test_response_after_teardown_is_discarded() {
        let (mut loader, _errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        loader.complete(&ticket, Ok(batch_of((1..=25).rev())));
        loader.sink_mut().offset = 0.0;
        let older = loader.on_scroll_to_top().unwrap();

        loader.teardown();
        assert!(!loader.sink().watch_armed);
        assert!(!loader.sink().loading);
        assert_eq!(loader.complete(&older, Ok(batch_of([0]))), Completion::Stale);
        assert_eq!(loader.start(), 0);
    }

    #[test]
    fn test_duplicates_are_not_rendered_twice() {
        let (mut loader, _errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        loader.complete(&ticket, Ok(batch_of((26..=50).rev())));

        // A message arrived upstream, so the next window overlaps by one
        loader.sink_mut().offset = 0.0;
        let ticket = loader.on_scroll_to_top().unwrap();
        loader.complete(&ticket, Ok(batch_of((2..=26).rev())));
        assert_eq!(loader.sink().ids(), (2..=50).collect::<Vec<_>>());
        assert_eq!(loader.start(), 50);
    }

    #[test]
    fn test_render_precondition_is_reported() {
        let (mut loader, errors) = loader();
        loader.sink_mut().detached = true;
        let ticket = loader.initialize(CHANNEL);
        assert_eq!(loader.complete(&ticket, Ok(batch_of([2, 1]))), Completion::Failed);
        assert!(matches!(errors.try_recv(), Ok(FeedError::Render(_))));
        assert!(!loader.is_ready());
    }

    #[test]
    fn test_lookup_failures_reported_but_batch_renders() {
        let (mut loader, errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        let mut batch = batch_of([3, 2, 1]);
        batch.lookup_failures.push(FetchError::Server {
            status: 400,
            message: "Invalid userId".into(),
        });
        assert_eq!(loader.complete(&ticket, Ok(batch)), Completion::Rendered { count: 3 });
        assert!(matches!(errors.try_recv(), Ok(FeedError::Fetch(FetchError::Server { .. }))));
    }

    #[test]
    fn test_update_and_remove_by_id() {
        let (mut loader, _errors) = loader();
        let ticket = loader.initialize(CHANNEL);
        loader.complete(&ticket, Ok(batch_of((1..=25).rev())));

        assert!(loader.apply_update(MessageId(7), &NodeUpdate::SetPinned(true)));
        assert!(loader.sink().row(7).unwrap().pinned);
        assert!(loader.apply_update(MessageId(7), &NodeUpdate::Edit("changed".into())));
        let row = loader.sink().row(7).unwrap();
        assert_eq!(row.message.as_deref(), Some("changed"));
        assert!(row.edited);

        assert!(loader.remove(MessageId(7)));
        assert!(loader.sink().row(7).is_none());
        assert_eq!(loader.start(), 24);
        assert!(!loader.remove(MessageId(7)));
        assert!(!loader.apply_update(MessageId(99), &NodeUpdate::SetPinned(true)));
    }

    /// Keep asking for older batches until history runs out
    async fn page_to_end(loader: &mut Loader, source: &FakeSource, directory: &SenderDirectory) {
        loop {
            loader.sink_mut().offset = 0.0;
            let Some(ticket) = loader.on_scroll_to_top() else {
                break;
            };
            run(loader, source, directory, &ticket).await;
        }
    }

    fn all_but(deleted: u64, n: u64) -> Vec<u64> {
        (1..=n).filter(|id| *id != deleted).collect()
    }

    #[tokio::test]
    async fn test_delete_before_pending_listing_leaves_no_gap() {
        let source = FakeSource::with_history(60, 4);
        let directory = SenderDirectory::new();
        let (mut loader, errors) = loader();

        let ticket = loader.initialize(CHANNEL);
        run(&mut loader, &source, &directory, &ticket).await;

        loader.sink_mut().offset = 0.0;
        let older = loader.on_scroll_to_top().unwrap();
        assert_eq!(older.start, 25);

        // The delete reaches the server before the listing does
        source.delete(MessageId(50));
        assert!(loader.remove(MessageId(50)));
        assert_eq!(loader.start(), 24);
        assert_eq!(
            run(&mut loader, &source, &directory, &older).await,
            Completion::Shifted
        );
        assert_eq!(loader.sink().ids(), all_but(50, 60)[35..].to_vec());
        assert_eq!(loader.start(), 24);
        assert!(!loader.sink().loading);
        assert!(!loader.is_fetching());

        page_to_end(&mut loader, &source, &directory).await;
        assert_eq!(loader.sink().ids(), all_but(50, 60));
        assert!(loader.is_exhausted());
        assert!(errors.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_after_pending_listing_leaves_no_gap() {
        let source = FakeSource::with_history(60, 4);
        let directory = SenderDirectory::new();
        let (mut loader, _errors) = loader();

        let ticket = loader.initialize(CHANNEL);
        run(&mut loader, &source, &directory, &ticket).await;

        loader.sink_mut().offset = 0.0;
        let older = loader.on_scroll_to_top().unwrap();
        // Listed first, deleted while the response is on its way back
        let listed = fetch_batch(&source, &directory, &older).await;
        source.delete(MessageId(50));
        assert!(loader.remove(MessageId(50)));
        assert_eq!(loader.complete(&older, listed), Completion::Shifted);

        page_to_end(&mut loader, &source, &directory).await;
        assert_eq!(loader.sink().ids(), all_but(50, 60));
    }

    #[tokio::test]
    async fn test_delete_while_idle_keeps_next_page_aligned() {
        let source = FakeSource::with_history(60, 4);
        let directory = SenderDirectory::new();
        let (mut loader, _errors) = loader();

        let ticket = loader.initialize(CHANNEL);
        run(&mut loader, &source, &directory, &ticket).await;

        source.delete(MessageId(40));
        assert!(loader.remove(MessageId(40)));
        page_to_end(&mut loader, &source, &directory).await;
        assert_eq!(loader.sink().ids(), all_but(40, 60));
    }
}
