//! UI rendering modules for the Slackr client.
//!
//! - `auth`: Login and registration screen
//! - `panels`: Channel sidebar
//! - `messages`: Channel header and message feed
//! - `dialogs`: Modal dialogs and toasts
//! - `theme`: Color schemes and styling utilities

pub mod auth;
pub mod dialogs;
pub mod messages;
pub mod panels;
pub mod theme;
