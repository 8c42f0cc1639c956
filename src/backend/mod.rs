/// Backend submodules for the REST round trips
///
/// - `client`: reqwest wrapper for the chat backend's HTTP API
/// - `handlers`: one async handler per `BackendAction`
/// - `main_loop`: runtime ownership and action dispatch
pub mod client;
mod handlers;
mod main_loop;

pub use client::RestClient;
pub use main_loop::run_backend;
