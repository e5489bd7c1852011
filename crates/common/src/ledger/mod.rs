//! Ledger surface.
//!
//! The ledger is the authoritative store of capsule records: one record per
//! owner account, created by the owner, opened exactly once. It serializes
//! concurrent open attempts (first to commit wins) and is the only party
//! that ever mutates the `opened` flag. Everything the lifecycle logic
//! consumes fits in four calls:
//!
//! - `record(owner)` — public read, absent records are `None`
//! - `create(content_ref, unlock_time)` — write the session account's
//!   capsule, replacing any prior one
//! - `open()` — open the session account's own capsule
//! - `open_on_behalf(owner)` — permissionless open once the unlock time has
//!   passed
//!
//! A [`Ledger`] handle is already bound to a session account, the way a
//! connected wallet is; the handle is the session, not a global.

mod memory;
mod rpc;

pub use memory::MemoryLedger;
pub use rpc::RpcLedger;

use std::fmt::{self, Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::store::ContentRef;

/// A capsule record as the ledger stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleRecord {
    /// The account that created the capsule. Immutable.
    pub owner: Address,
    /// Reference to the metadata envelope in the content store. Set once.
    pub content_ref: ContentRef,
    /// Absolute unlock instant, seconds since epoch. Immutable.
    pub unlock_time: i64,
    /// One-way flag; flips to `true` exactly once.
    pub opened: bool,
}

/// Identifier of a committed ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
}

impl TxReceipt {
    pub fn new(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
        }
    }
}

impl Display for TxReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tx_hash)
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger node could not be reached or the call never completed.
    #[error("ledger transport error: {0}")]
    Transport(String),
    /// The ledger executed the call and refused it; the underlying reason
    /// passes through unchanged.
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// A serialized open transition was lost to an earlier committer.
    #[error("capsule has already been opened")]
    AlreadyOpened,
}

/// Provider trait for the capsule ledger.
///
/// Handles are bound to a session account and must be cheap to clone;
/// clones share the underlying connection or state.
#[async_trait]
pub trait Ledger: Send + Sync + Debug + Clone + 'static {
    /// The account this handle submits transactions as.
    fn account(&self) -> &Address;

    /// Read the capsule record for an owner. Public; no record is `None`,
    /// never an error.
    async fn record(&self, owner: &Address) -> Result<Option<CapsuleRecord>, LedgerError>;

    /// Create (or replace) the session account's capsule.
    ///
    /// The unlock-time bounds are an application-level invariant validated
    /// before submission; the ledger accepts whatever it is given.
    async fn create(
        &self,
        content_ref: &ContentRef,
        unlock_time: i64,
    ) -> Result<TxReceipt, LedgerError>;

    /// Open the session account's own capsule.
    ///
    /// Must fail [`LedgerError::AlreadyOpened`] if a prior open committed
    /// first, and [`LedgerError::Rejected`] while the capsule is still
    /// time-locked.
    async fn open(&self) -> Result<TxReceipt, LedgerError>;

    /// Open another account's capsule. Permissionless once the unlock time
    /// has passed; same failure contract as [`Ledger::open`].
    async fn open_on_behalf(&self, owner: &Address) -> Result<TxReceipt, LedgerError>;
}
