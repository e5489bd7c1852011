//! # Metadata Envelope
//!
//! The envelope is the JSON document a capsule's content reference points
//! at. The ledger never sees it; it lives in the content-addressed store
//! and carries everything human-readable about the capsule:
//!
//! - **Display**: title, message, creation instant
//! - **Audit**: creator account, unlock time duplicated from the ledger
//! - **File payload**: reference, name, declared type, and size, present
//!   only when a file was attached
//! - **`intendedRecipient`**: informational only. It is never consulted by
//!   any access decision; the open paths ignore it entirely.
//!
//! Field names are camelCase on the wire, matching the documents already in
//! circulation. Envelopes are immutable once pinned; editing means pinning
//! a new envelope and re-creating the capsule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::store::ContentRef;

/// Title used when the creator left it blank.
pub const DEFAULT_TITLE: &str = "Time Capsule";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// The JSON document stored at a capsule's content reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataEnvelope {
    #[serde(default = "default_title")]
    pub title: String,
    /// Plain-text message; may be absent when the capsule carries a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// The owner account that created the capsule.
    pub created_by: Address,
    /// Unlock instant, duplicated from the ledger for display and audit.
    pub unlock_time: i64,
    /// Informational label only; never an access rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intended_recipient: Option<Address>,
    /// Content reference of the attached file, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hash: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Declared (upload-time) content type; the store's answer wins at
    /// read time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl MetadataEnvelope {
    pub fn new(
        title: Option<String>,
        message: Option<String>,
        created_by: Address,
        created_at: DateTime<Utc>,
        unlock_time: i64,
        intended_recipient: Option<Address>,
    ) -> Self {
        let title = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => default_title(),
        };
        Self {
            title,
            message,
            created_at,
            created_by,
            unlock_time,
            intended_recipient,
            file_hash: None,
            file_name: None,
            file_type: None,
            file_size: None,
        }
    }

    /// Record an attached file payload that has been pinned separately.
    pub fn attach_file(
        &mut self,
        file_hash: ContentRef,
        file_name: String,
        file_type: String,
        file_size: u64,
    ) {
        self.file_hash = Some(file_hash);
        self.file_name = Some(file_name);
        self.file_type = Some(file_type);
        self.file_size = Some(file_size);
    }

    /// A capsule has content iff its envelope has a non-empty message or a
    /// file reference. Envelopes with neither are never accepted at
    /// creation.
    pub fn has_content(&self) -> bool {
        let has_message = self
            .message
            .as_deref()
            .map(|m| !m.trim().is_empty())
            .unwrap_or(false);
        has_message || self.file_hash.is_some()
    }
}
