use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::store::ContentRef;

use super::envelope::MetadataEnvelope;
use super::state::CapsulePhase;

/// Resolution outcome for a capsule's metadata envelope.
///
/// A failed resolution is not a failed view: the ledger fields stay usable
/// and the reason travels with the view so a consumer can tell "no content"
/// apart from "content retrieval failed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MetadataState {
    Resolved { envelope: MetadataEnvelope },
    Unavailable { reason: String },
}

impl MetadataState {
    pub fn envelope(&self) -> Option<&MetadataEnvelope> {
        match self {
            MetadataState::Resolved { envelope } => Some(envelope),
            MetadataState::Unavailable { .. } => None,
        }
    }
}

/// Read-only projection of one capsule for one caller at one instant.
///
/// The raw ledger fields come first; everything below `opened` is derived
/// at view time and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleView {
    pub owner: Address,
    pub content_ref: ContentRef,
    pub unlock_time: i64,
    pub opened: bool,

    /// `now >= unlock_time`, recomputed from the caller's clock.
    pub is_unlocked: bool,
    /// Content is visible only after the explicit open transition; unlock
    /// alone never reveals it.
    pub can_access_content: bool,
    /// Whether the viewing caller is the owner.
    pub is_owner: bool,
    pub phase: CapsulePhase,

    pub metadata: MetadataState,
}
