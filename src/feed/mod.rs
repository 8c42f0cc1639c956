//! Paginated channel feed.
//!
//! - `fetch`: listing + sender resolution for one batch (backend side)
//! - `loader`: cursor, in-flight guard and generation token (UI side)
//! - `sink`: the render sink and error reporter seams
//! - `view`: the egui-facing render sink with its id -> row registry

pub mod fetch;
pub mod loader;
pub mod sink;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{
    fetch_batch, Batch, FeedEntry, FetchDirection, FetchTicket, MessageSource, SenderDirectory,
    BATCH_SIZE,
};
pub use loader::{Completion, FeedLoader};
pub use sink::{ErrorReporter, NodeUpdate, RenderSink};
pub use view::{FeedRow, FeedView, FixedRowHeight, RowMeasure, ScrollRequest};
