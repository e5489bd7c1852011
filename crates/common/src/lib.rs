/**
 * Caller identity type.
 *  Format-validated account addresses,
 *  never existence-checked.
 */
pub mod address;
/**
 * Capsule domain logic.
 *  The metadata envelope, creation payload
 *  validation, the derived lifecycle state,
 *  and the session-scoped manager that
 *  orchestrates create/view/open against
 *  the ledger and the content store.
 */
pub mod capsule;
/**
 * Display helpers for sizes, dates, and
 *  time remaining until unlock.
 */
pub mod format;
/**
 * Ledger surface.
 *  The authoritative store of capsule records
 *  and the only party allowed to flip the
 *  opened flag. Trait plus in-memory and
 *  HTTP node client implementations.
 */
pub mod ledger;
/**
 * Content-addressed store surface.
 *  Publishes payloads for a stable reference
 *  and resolves references back to typed
 *  content through a read gateway.
 */
pub mod store;
/**
 * Shared fixtures for tests: memory-backed
 *  sessions over one ledger and store.
 */
pub mod testkit;
/**
 * Helper for exposing build version
 *  information.
 */
pub mod version;

pub mod prelude {
    pub use crate::address::{Address, AddressError};
    pub use crate::capsule::{
        AccessError, CapsuleError, CapsuleManager, CapsulePayload, CapsulePhase, CapsuleView,
        MetadataEnvelope, ValidationError,
    };
    pub use crate::ledger::{CapsuleRecord, Ledger, LedgerError, TxReceipt};
    pub use crate::store::{ContentRef, ContentStore, StoreError};
    pub use crate::version::build_info;
}
