use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::address::Address;
use crate::capsule::state::is_unlocked;
use crate::store::ContentRef;

use super::{CapsuleRecord, Ledger, LedgerError, TxReceipt};

/// In-memory ledger.
///
/// Reproduces the transition rules the production ledger enforces: one
/// record per owner (re-creation replaces), opens rejected while
/// time-locked, and first-commit-wins serialization of concurrent opens
/// under the write lock.
///
/// Handles derived with [`MemoryLedger::session`] share state, so multiple
/// "wallets" can act against one ledger in tests.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    inner: Arc<RwLock<MemoryLedgerInner>>,
    account: Address,
}

#[derive(Debug, Default)]
struct MemoryLedgerInner {
    capsules: HashMap<Address, CapsuleRecord>,
    read_calls: u64,
    write_calls: u64,
}

impl MemoryLedger {
    pub fn new(account: Address) -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryLedgerInner::default())),
            account,
        }
    }

    /// Derive a handle for another account over the same ledger state.
    pub fn session(&self, account: Address) -> Self {
        Self {
            inner: self.inner.clone(),
            account,
        }
    }

    /// Number of read calls made against the shared ledger.
    pub fn read_calls(&self) -> u64 {
        self.inner.read().expect("ledger lock poisoned").read_calls
    }

    /// Number of write (transaction) calls made against the shared ledger.
    pub fn write_calls(&self) -> u64 {
        self.inner.read().expect("ledger lock poisoned").write_calls
    }

    fn receipt() -> TxReceipt {
        TxReceipt::new(format!("0x{}", Uuid::new_v4().simple()))
    }

    fn open_record(
        inner: &mut MemoryLedgerInner,
        owner: &Address,
    ) -> Result<TxReceipt, LedgerError> {
        inner.write_calls += 1;
        let record = inner
            .capsules
            .get_mut(owner)
            .ok_or_else(|| LedgerError::Rejected(format!("no capsule exists for {}", owner)))?;
        if record.opened {
            return Err(LedgerError::AlreadyOpened);
        }
        let now = chrono::Utc::now().timestamp();
        if !is_unlocked(record.unlock_time, now) {
            return Err(LedgerError::Rejected(
                "capsule unlock time has not passed".to_string(),
            ));
        }
        record.opened = true;
        Ok(Self::receipt())
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    fn account(&self) -> &Address {
        &self.account
    }

    async fn record(&self, owner: &Address) -> Result<Option<CapsuleRecord>, LedgerError> {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        inner.read_calls += 1;
        Ok(inner.capsules.get(owner).cloned())
    }

    async fn create(
        &self,
        content_ref: &ContentRef,
        unlock_time: i64,
    ) -> Result<TxReceipt, LedgerError> {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        inner.write_calls += 1;
        // re-creation replaces the prior capsule for this account
        inner.capsules.insert(
            self.account,
            CapsuleRecord {
                owner: self.account,
                content_ref: content_ref.clone(),
                unlock_time,
                opened: false,
            },
        );
        Ok(Self::receipt())
    }

    async fn open(&self) -> Result<TxReceipt, LedgerError> {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        let account = self.account;
        Self::open_record(&mut inner, &account)
    }

    async fn open_on_behalf(&self, owner: &Address) -> Result<TxReceipt, LedgerError> {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        Self::open_record(&mut inner, owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::test_addr;

    #[tokio::test]
    async fn test_create_then_read() {
        let ledger = MemoryLedger::new(test_addr(1));
        ledger
            .create(&ContentRef::from("Qm123"), 42)
            .await
            .unwrap();
        let record = ledger.record(&test_addr(1)).await.unwrap().unwrap();
        assert_eq!(record.owner, test_addr(1));
        assert_eq!(record.content_ref, ContentRef::from("Qm123"));
        assert_eq!(record.unlock_time, 42);
        assert!(!record.opened);
    }

    #[tokio::test]
    async fn test_recreate_replaces() {
        let ledger = MemoryLedger::new(test_addr(1));
        ledger.create(&ContentRef::from("QmA"), 1).await.unwrap();
        ledger.create(&ContentRef::from("QmB"), 2).await.unwrap();
        let record = ledger.record(&test_addr(1)).await.unwrap().unwrap();
        assert_eq!(record.content_ref, ContentRef::from("QmB"));
        assert!(!record.opened);
    }

    #[tokio::test]
    async fn test_open_is_first_commit_wins() {
        let ledger = MemoryLedger::new(test_addr(1));
        let past = chrono::Utc::now().timestamp() - 60;
        ledger.create(&ContentRef::from("QmA"), past).await.unwrap();

        ledger.open().await.unwrap();
        let err = ledger.open().await.unwrap_err();
        assert_eq!(err, LedgerError::AlreadyOpened);

        // losing from another session surfaces the same way
        let other = ledger.session(test_addr(2));
        let err = other.open_on_behalf(&test_addr(1)).await.unwrap_err();
        assert_eq!(err, LedgerError::AlreadyOpened);
    }

    #[tokio::test]
    async fn test_open_rejected_while_locked() {
        let ledger = MemoryLedger::new(test_addr(1));
        let future = chrono::Utc::now().timestamp() + 3600;
        ledger
            .create(&ContentRef::from("QmA"), future)
            .await
            .unwrap();
        let err = ledger.open().await.unwrap_err();
        assert!(matches!(err, LedgerError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_missing_record_reads_none() {
        let ledger = MemoryLedger::new(test_addr(1));
        assert_eq!(ledger.record(&test_addr(9)).await.unwrap(), None);
    }
}
