//! Error types for gitea-client

use thiserror::Error;

/// Errors that can occur while talking to a Gitea server
#[derive(Error, Debug)]
pub enum GiteaError {
    /// Server URL cannot address the API
    #[error("Invalid Gitea server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    /// Transport-level failure (connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Gitea answered with a non-success status
    #[error("Gitea API returned {status} for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GiteaError {
    /// HTTP status code when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GiteaError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GiteaError {
    fn from(err: reqwest::Error) -> Self {
        GiteaError::Http(err.to_string())
    }
}
