//! Side panels.

mod channel_list;

pub use channel_list::{filter_channels, render_channel_list, SidebarAction, SidebarState};
