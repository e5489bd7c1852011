//! Shared fixtures for capsule tests.
//!
//! One [`TestNet`] is one shared ledger plus one shared content store;
//! sessions derived from it act as independent callers the way separate
//! browser sessions would.

use crate::address::Address;
use crate::capsule::CapsuleManager;
use crate::ledger::MemoryLedger;
use crate::store::MemoryStore;

/// Deterministic test address: twenty copies of `tag`.
pub fn test_addr(tag: u8) -> Address {
    Address::from_bytes([tag; 20])
}

/// A memory-backed ledger + store pair shared by every derived session.
#[derive(Debug, Clone)]
pub struct TestNet {
    ledger: MemoryLedger,
    store: MemoryStore,
}

impl TestNet {
    pub fn new() -> Self {
        Self {
            // the base handle's account is arbitrary; sessions rebind it
            ledger: MemoryLedger::new(test_addr(0)),
            store: MemoryStore::new(),
        }
    }

    /// A manager acting as `caller` against the shared ledger and store.
    pub fn session(&self, caller: Address) -> CapsuleManager<MemoryLedger, MemoryStore> {
        CapsuleManager::new(caller, self.ledger.session(caller), self.store.clone())
    }

    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

impl Default for TestNet {
    fn default() -> Self {
        Self::new()
    }
}
