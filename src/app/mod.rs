//! Application module structure for SlackrApp
//!
//! - `core`: SlackrApp struct and initialization
//! - `events`: Event processing from backend
//! - `update`: Main update loop
//! - `dialogs`: Dialog rendering orchestration
//! - `ui`: Menu bar, sidebar, central panel and composer

pub mod core;
pub mod dialogs;
pub mod events;
pub mod ui;
pub mod update;

pub use core::SlackrApp;
