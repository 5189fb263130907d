//! Unified error type for the signage service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An external provider (weather, text generation, seat reservation)
    /// failed, timed out, or answered with a non-2xx status.
    #[error("{service} unavailable: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    /// A credential required for an external call is not configured.
    #[error("Missing configuration: {0}")]
    ConfigMissing(String),

    #[error("Config error: {0}")]
    Config(String),

    /// Upstream payload could not be interpreted at all.
    #[error("Unexpected payload shape: {0}")]
    DataShape(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Error::Upstream {
            service,
            message: message.into(),
        }
    }

    /// True for failures the caller may see again on a later attempt.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}

/// Longest upstream response body quoted in an error message, in chars.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Prefix of `body` at most `max` chars long, cut on a char boundary.
pub fn truncate_body(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
