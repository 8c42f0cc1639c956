//! Channel view: header, feed and timestamp formatting.

mod format;
mod header;
mod render;

pub use format::{format_time_difference, reaction_label, REACTIONS};
pub use header::{render_channel_header, HeaderAction};
pub use render::{render_feed, FeedAction, GalleyMeasure};
