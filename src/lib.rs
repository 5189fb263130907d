//! Cruise signage message service.
//!
//! Wires the weather cache, scenario selector, request compiler, text
//! provider, and seat-availability transform behind a small HTTP API.

pub mod config;
pub mod server;
pub mod state;

pub use server::router;
pub use state::AppState;
