//! Slackr client library.
//!
//! A desktop client for the Slackr chat backend. The egui UI runs on the
//! main thread; a backend thread owns a Tokio runtime and talks to the REST
//! API. The two sides exchange `BackendAction`s and `GuiEvent`s over
//! crossbeam channels.

pub mod app;
pub mod backend;
pub mod config;
pub mod dialog_manager;
pub mod error;
pub mod events;
pub mod feed;
pub mod input_state;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod state;
pub mod ui;
pub mod validation;
