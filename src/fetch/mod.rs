//! Data fetching: the [`Fetcher`] seam, its HTTP implementation, and errors.
//!
//! Components never talk to the network directly. The app owns an
//! `Arc<dyn Fetcher>`, spawns one task per effect execution, and posts the
//! outcome back to the event queue tagged with a [`FetchTicket`].

pub mod http;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpFetcher;

/// Path of the data endpoint the child component reads.
pub const DATA_ENDPOINT: &str = "/api/data";

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// Errors from a single fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The endpoint could not be resolved against the base URL.
    #[error("invalid endpoint url `{url}`")]
    InvalidUrl { url: String },

    /// Connecting, sending, or reading the body failed.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// The body was not valid JSON.
    #[error("malformed JSON body from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// The URL the failed request targeted.
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. } => url,
        }
    }
}

// ---------------------------------------------------------------------------
// FetchTicket
// ---------------------------------------------------------------------------

/// Sequence number of one effect execution's fetch.
///
/// Tickets increase monotonically per app; a completion whose ticket is not
/// the latest issued is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub u64);

impl FetchTicket {
    /// The ticket after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Source of JSON payloads, keyed by endpoint path.
///
/// Object-safe so the app can hold any implementation behind an `Arc`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue `GET endpoint` and decode the body as JSON.
    async fn fetch(&self, endpoint: &str) -> Result<Value, FetchError>;
}
