//! Shared state and error types for polled data feeds.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Identifier of a registered feed, e.g. `"quotes"` or `"limits"`.
pub type FeedId = String;

/// Broad category of a failed fetch.
///
/// The synchronizer and the UI branch on the kind, never on the shape of the
/// underlying transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Connection-level failure, no response received.
    Network,
    /// The request timed out.
    Timeout,
    /// The server responded with a non-2xx status.
    Status(u16),
    /// The response body could not be decoded.
    Decode,
}

/// A failed fetch, tagged by kind.
///
/// Unlike `anyhow::Error` this is cheap to clone, which lets it live inside
/// published [`FeedState`] snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub detail: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, detail: impl Into<String>) -> Self {
        FetchError {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if let Some(status) = err.status() {
            FetchErrorKind::Status(status.as_u16())
        } else if err.is_decode() {
            FetchErrorKind::Decode
        } else {
            FetchErrorKind::Network
        };
        FetchError::new(kind, err.to_string())
    }
}

/// Latest published state of one feed.
///
/// Owned by the synchronizer; consumers receive clones and never write back.
/// `data` survives later failures, so `error.is_some() && data.is_some()`
/// means "stale but available" and should render as last-known-good values
/// with a warning, not as an error screen.
#[derive(Debug, Clone)]
pub struct FeedState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> FeedState<T> {
    /// State of a freshly registered feed: first fetch pending, nothing
    /// published yet.
    pub fn pending() -> Self {
        FeedState {
            data: None,
            loading: true,
            error: None,
            last_updated: None,
        }
    }

    /// True when an error is published alongside data from an earlier
    /// successful fetch.
    pub fn is_stale(&self) -> bool {
        self.error.is_some() && self.data.is_some()
    }
}

/// Fetch function for a feed. Must be re-invokable for every tick.
pub type FetchFn<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;

/// Everything the synchronizer needs to run one polling loop.
///
/// Immutable once registered; registering the same id again replaces the
/// descriptor and restarts its timer.
pub struct FeedDescriptor<T> {
    pub id: FeedId,
    pub fetch: FetchFn<T>,
    pub interval: Duration,
}

impl<T> FeedDescriptor<T> {
    pub fn new<F, Fut>(id: impl Into<FeedId>, interval: Duration, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        FeedDescriptor {
            id: id.into(),
            fetch: Box::new(move || Box::pin(fetch())),
            interval,
        }
    }
}
