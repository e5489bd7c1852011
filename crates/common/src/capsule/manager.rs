use chrono::Utc;

use crate::address::Address;
use crate::ledger::{Ledger, LedgerError, TxReceipt};
use crate::store::{ContentRef, ContentStore, StoreError};

use super::envelope::MetadataEnvelope;
use super::payload::{CapsulePayload, ValidationError};
use super::state::{is_unlocked, CapsulePhase};
use super::view::{CapsuleView, MetadataState};

/// Outcome of a successful capsule creation.
#[derive(Debug, Clone)]
pub struct CapsuleCreated {
    pub receipt: TxReceipt,
    /// Reference of the pinned metadata envelope, as written to the ledger.
    pub content_ref: ContentRef,
}

/// The caller is not permitted to perform the requested transition.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("capsule is still locked until {unlock_time}")]
    StillLocked { unlock_time: i64 },
    #[error("capsule has already been opened")]
    AlreadyOpened,
}

#[derive(Debug, thiserror::Error)]
pub enum CapsuleError {
    #[error("invalid capsule: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("content store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to encode metadata envelope: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no capsule exists for {0}")]
    NotFound(Address),
}

/// Session context for capsule operations.
///
/// Owns the caller identity, the ledger handle, and the store handle for
/// one logical session; construct one per session and drop it when the
/// session ends. There is no hidden shared state: concurrent sessions are
/// independent values coordinating only through the ledger itself.
///
/// The manager holds no mutable capsule state of its own, so an abandoned
/// in-flight call leaves nothing half-updated.
#[derive(Debug, Clone)]
pub struct CapsuleManager<L, S> {
    caller: Address,
    ledger: L,
    store: S,
}

impl<L, S> CapsuleManager<L, S>
where
    L: Ledger,
    S: ContentStore,
{
    pub fn new(caller: Address, ledger: L, store: S) -> Self {
        Self {
            caller,
            ledger,
            store,
        }
    }

    pub fn caller(&self) -> &Address {
        &self.caller
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a capsule from `payload`.
    ///
    /// Validates every precondition before touching the ledger or the
    /// store, then pins the file (if any), pins the envelope, and submits
    /// the ledger write, in that order. Ledger rejections surface
    /// unchanged. If the ledger write fails after pinning succeeded the
    /// pinned content is left orphaned; pinning is idempotent, so a retry
    /// of the whole operation converges.
    pub async fn create(&self, payload: CapsulePayload) -> Result<CapsuleCreated, CapsuleError> {
        self.create_at(payload, Utc::now().timestamp()).await
    }

    /// [`CapsuleManager::create`] with an explicit validation instant.
    pub async fn create_at(
        &self,
        payload: CapsulePayload,
        now: i64,
    ) -> Result<CapsuleCreated, CapsuleError> {
        let recipient = payload.validate(now)?;

        let mut envelope = MetadataEnvelope::new(
            payload.title.clone(),
            payload.message.clone(),
            self.caller,
            Utc::now(),
            payload.unlock_time,
            recipient,
        );

        if let Some(file) = &payload.file {
            let mime = file.mime();
            let file_ref = self
                .store
                .pin_bytes(&file.name, &mime, file.bytes.clone())
                .await?;
            envelope.attach_file(
                file_ref,
                file.name.clone(),
                mime.to_string(),
                file.bytes.len() as u64,
            );
        }

        let content_ref = self
            .store
            .pin_json(serde_json::to_value(&envelope)?)
            .await?;

        let receipt = match self.ledger.create(&content_ref, payload.unlock_time).await {
            Ok(receipt) => receipt,
            Err(e) => {
                // pinned content stays orphaned; acceptable, see module docs
                tracing::warn!(
                    %content_ref,
                    error = %e,
                    "ledger write failed after pinning; pinned content orphaned"
                );
                return Err(e.into());
            }
        };

        tracing::info!(
            owner = %self.caller,
            %content_ref,
            unlock_time = payload.unlock_time,
            tx = %receipt,
            "capsule created"
        );
        Ok(CapsuleCreated {
            receipt,
            content_ref,
        })
    }

    /// Read-only projection of `owner`'s capsule for this caller.
    ///
    /// A missing capsule is `Ok(None)`. Metadata resolution failures
    /// produce a view with [`MetadataState::Unavailable`] rather than an
    /// error; the ledger fields remain usable.
    pub async fn view(&self, owner: &Address) -> Result<Option<CapsuleView>, CapsuleError> {
        self.view_at(owner, Utc::now().timestamp()).await
    }

    /// [`CapsuleManager::view`] evaluated at an explicit instant.
    pub async fn view_at(
        &self,
        owner: &Address,
        now: i64,
    ) -> Result<Option<CapsuleView>, CapsuleError> {
        let Some(record) = self.ledger.record(owner).await? else {
            return Ok(None);
        };

        let metadata = match self.store.resolve_json(&record.content_ref).await {
            Ok(value) => match serde_json::from_value::<MetadataEnvelope>(value) {
                Ok(envelope) => MetadataState::Resolved { envelope },
                Err(e) => {
                    tracing::warn!(reference = %record.content_ref, error = %e, "envelope malformed");
                    MetadataState::Unavailable {
                        reason: StoreError::Parse {
                            reference: record.content_ref.clone(),
                            reason: e.to_string(),
                        }
                        .to_string(),
                    }
                }
            },
            Err(e) => {
                tracing::warn!(reference = %record.content_ref, error = %e, "envelope unresolvable");
                MetadataState::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        Ok(Some(CapsuleView {
            owner: record.owner,
            content_ref: record.content_ref.clone(),
            unlock_time: record.unlock_time,
            opened: record.opened,
            is_unlocked: is_unlocked(record.unlock_time, now),
            can_access_content: record.opened,
            is_owner: self.caller == record.owner,
            phase: CapsulePhase::at(&record, now),
            metadata,
        }))
    }

    /// Transition `owner`'s capsule to opened.
    ///
    /// The owner may open their own capsule; anyone may open on the
    /// owner's behalf. Both paths require the unlock time to have passed
    /// and the capsule to still be unopened; every other case is rejected
    /// locally, without spending a ledger transaction, with the specific
    /// reason.
    pub async fn open(&self, owner: &Address) -> Result<TxReceipt, CapsuleError> {
        self.open_at(owner, Utc::now().timestamp()).await
    }

    /// [`CapsuleManager::open`] evaluated at an explicit instant.
    pub async fn open_at(&self, owner: &Address, now: i64) -> Result<TxReceipt, CapsuleError> {
        let record = self
            .ledger
            .record(owner)
            .await?
            .ok_or_else(|| CapsuleError::NotFound(*owner))?;

        if record.opened {
            return Err(AccessError::AlreadyOpened.into());
        }
        if !is_unlocked(record.unlock_time, now) {
            return Err(AccessError::StillLocked {
                unlock_time: record.unlock_time,
            }
            .into());
        }

        let result = if self.caller == record.owner {
            self.ledger.open().await
        } else {
            self.ledger.open_on_behalf(owner).await
        };

        let receipt = result.map_err(|e| match e {
            // lost a serialized open race; same reason as the local check
            LedgerError::AlreadyOpened => CapsuleError::Access(AccessError::AlreadyOpened),
            other => CapsuleError::Ledger(other),
        })?;

        tracing::info!(owner = %owner, caller = %self.caller, tx = %receipt, "capsule opened");
        Ok(receipt)
    }
}
