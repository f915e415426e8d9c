#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod limits;
pub mod util;

pub use limits::{DEFAULT_ENDPOINT, SessionLimits};
pub use util::{ELLIPSIS, truncate};

/// Display format for turn and summary timestamps, e.g. `3:04:05 PM`.
pub const TIME_OF_DAY_FORMAT: &str = "%-I:%M:%S %p";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Assistant,
}

/// One utterance in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub content: String,
    pub origin: Origin,
    pub created_at: DateTime<Local>,
}

impl Turn {
    #[must_use]
    pub fn new(origin: Origin, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            origin,
            created_at: Local::now(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Origin::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Origin::Assistant, content)
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    /// Local time of day the turn was created, as shown to the user.
    #[must_use]
    pub fn display_time(&self) -> String {
        self.created_at.format(TIME_OF_DAY_FORMAT).to_string()
    }
}

/// A short record of one completed query/reply exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: Uuid,
    pub title: String,
    pub preview: String,
    pub created_at: DateTime<Local>,
}

impl SessionSummary {
    /// Build a summary from the submitted query and the reply it received.
    #[must_use]
    pub fn from_exchange(query: &str, reply: &str, limits: &SessionLimits) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: truncate(query, limits.title_max_chars),
            preview: truncate(reply, limits.preview_max_chars),
            created_at: Local::now(),
        }
    }

    #[must_use]
    pub fn display_time(&self) -> String {
        self.created_at.format(TIME_OF_DAY_FORMAT).to_string()
    }
}

/// Failure of a single query round-trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request could not be completed: {0}")]
    Request(String),

    #[error("endpoint returned non-success status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Stateless transport to the remote inference endpoint.
///
/// One call is one attempt. `history` is the transcript as it stood before
/// the user turn for `query` was appended.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn send(&self, query: &str, history: &[Turn]) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: QueryClient + ?Sized> QueryClient for Arc<T> {
    async fn send(&self, query: &str, history: &[Turn]) -> Result<String, TransportError> {
        (**self).send(query, history).await
    }
}
