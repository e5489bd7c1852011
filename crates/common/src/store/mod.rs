//! Content-addressed store surface.
//!
//! Capsule payloads never live on the ledger; the ledger holds a
//! [`ContentRef`] pointing into an external content-addressed store. This
//! module defines that reference type, the [`ContentStore`] provider trait,
//! and the error taxonomy that lets callers tell "unreachable" apart from
//! "corrupt" at resolution time.
//!
//! # Architecture
//!
//! ```text
//! CapsuleManager --publish--> ContentStore --ref--> Ledger record
//!       |                         |
//!       +------resolve------------+
//!              (GET/HEAD via read gateway)
//! ```
//!
//! Two implementations ship with the crate:
//!
//! - [`PinningStore`]: a pinning API + read gateway client (the store the
//!   production system talks to)
//! - [`MemoryStore`]: an in-memory store for tests and local development
//!
//! Content addressing itself is delegated to the store: the same bytes pin
//! to the same (or an equivalently-resolvable) reference, which is all the
//! lifecycle logic relies on.

mod gateway;
mod memory;
mod pinning;

pub use gateway::Gateway;
pub use memory::MemoryStore;
pub use pinning::PinningStore;

use std::fmt::{self, Debug, Display};

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use serde::{Deserialize, Serialize};

/// A reference into the content-addressed store.
///
/// Usually a bare content hash resolved through the read gateway; may also
/// be an already-absolute retrieval URL, which passes through URL mapping
/// unchanged (see [`Gateway::url_for`]).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the reference is already a full retrieval URL.
    pub fn is_absolute_url(&self) -> bool {
        self.0.starts_with("http://") || self.0.starts_with("https://")
    }

    /// True for the empty/zero reference the ledger returns when no capsule
    /// exists for an account.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentRef({})", self.0)
    }
}

impl From<&str> for ContentRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Content fetched from the store, with the content type the store reported
/// at read time. Upload-time metadata can be stale or wrong; the store is
/// the source of truth here.
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub bytes: Bytes,
    pub content_type: Mime,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store or gateway could not be reached at all.
    #[error("content store unreachable: {0}")]
    Transport(String),
    /// The store refused to pin the payload.
    #[error("pin rejected: {0}")]
    PinRejected(String),
    /// The gateway has no content at the reference.
    #[error("content not found: {0}")]
    NotFound(ContentRef),
    /// The gateway answered with an unexpected status.
    #[error("gateway returned status {status} for {reference}")]
    Gateway { status: u16, reference: ContentRef },
    /// The content was fetched but is not the JSON we expected.
    #[error("content at {reference} is not valid JSON: {reason}")]
    Parse { reference: ContentRef, reason: String },
    /// The reference or gateway base does not form a valid URL.
    #[error("invalid content url: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Provider trait for the content-addressed store.
///
/// Implementations must be cheap to clone; handles share any underlying
/// connection state.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug + Clone + 'static {
    /// Pin raw bytes, returning a stable reference.
    ///
    /// `name` and `declared_mime` are upload-time hints for the store; they
    /// are never trusted at read time.
    async fn pin_bytes(
        &self,
        name: &str,
        declared_mime: &Mime,
        bytes: Bytes,
    ) -> Result<ContentRef, StoreError>;

    /// Pin a JSON document, returning a stable reference.
    async fn pin_json(&self, value: serde_json::Value) -> Result<ContentRef, StoreError>;

    /// Fetch raw content and the content type the store declares for it.
    async fn fetch(&self, reference: &ContentRef) -> Result<FetchedContent, StoreError>;

    /// Probe the content type without fetching the body (HEAD).
    async fn head_content_type(&self, reference: &ContentRef) -> Result<Mime, StoreError>;

    /// Fetch and parse a JSON document at `reference`.
    ///
    /// Fails with [`StoreError::Transport`] when the store is unreachable
    /// and [`StoreError::Parse`] when the bytes are not JSON; callers rely
    /// on the distinction.
    async fn resolve_json(&self, reference: &ContentRef) -> Result<serde_json::Value, StoreError> {
        let content = self.fetch(reference).await?;
        serde_json::from_slice(&content.bytes).map_err(|e| StoreError::Parse {
            reference: reference.clone(),
            reason: e.to_string(),
        })
    }

    /// Fetch raw content for previews/downloads.
    ///
    /// Same as [`ContentStore::fetch`]; named for symmetry with
    /// [`ContentStore::resolve_json`] at the call sites that consume file
    /// payloads.
    async fn resolve_binary(&self, reference: &ContentRef) -> Result<FetchedContent, StoreError> {
        self.fetch(reference).await
    }
}
