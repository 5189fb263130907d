pub mod client;
pub mod types;

pub use client::{ContentGenerator, GeminiClient};
pub use types::*;
