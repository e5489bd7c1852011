//! Capsule lifecycle and access-control logic
//!
//! A capsule pairs a content reference with an unlock time and a one-way
//! `opened` flag, one per owner account. This module holds everything that
//! decides what a capsule is and who may do what to it:
//!
//! - **[`MetadataEnvelope`]**: the JSON document describing the payload,
//!   stored in the content-addressed store
//! - **[`CapsulePayload`]**: creation input plus its fail-fast validation
//! - **[`CapsulePhase`]** and [`state::is_unlocked`]: the derived lifecycle
//!   state, a pure function of wall-clock time
//! - **[`CapsuleView`]**: the read-only projection combining ledger state
//!   with resolved metadata
//! - **[`CapsuleManager`]**: the session context orchestrating create /
//!   view / open against the ledger and the content store
//!
//! # Lifecycle
//!
//! ```text
//! CREATED(locked) --[now >= unlock_time]--> CREATED(unlockable)
//!                                                  |
//!                                    [open by owner OR by anyone]
//!                                                  |
//!                                                  v
//!                                               OPENED (terminal)
//! ```
//!
//! The locked -> unlockable edge is never stored anywhere; it is evaluated
//! from the current time at every read. Opening is the only persisted
//! transition, and it is the ledger's to serialize.
//!
//! # The two-step gate
//!
//! Time passing unlocks *eligibility to open*; the explicit open transition
//! unlocks *visibility*. `can_access_content` therefore tracks the ledger's
//! `opened` flag and nothing else. Do not collapse the two steps into a
//! single time check.

pub mod envelope;
pub mod manager;
pub mod payload;
pub mod state;
pub mod view;

pub use envelope::MetadataEnvelope;
pub use manager::{AccessError, CapsuleCreated, CapsuleError, CapsuleManager};
pub use payload::{CapsulePayload, FilePayload, ValidationError, MAX_FILE_SIZE};
pub use state::{is_unlocked, CapsulePhase};
pub use view::{CapsuleView, MetadataState};
