//! Derived lifecycle state.
//!
//! Nothing here is ever persisted. Whether a capsule is unlocked is a pure
//! function of its (immutable, public) unlock time and the caller's clock,
//! recomputed on every read; caching it would only invite drift.

use serde::{Deserialize, Serialize};

use crate::ledger::CapsuleRecord;

/// Whether the unlock instant has passed: `now >= unlock_time`.
pub fn is_unlocked(unlock_time: i64, now: i64) -> bool {
    now >= unlock_time
}

/// The lifecycle phase of a capsule at a given instant.
///
/// `Opened` is terminal. The `Locked`/`Unlockable` distinction is evaluated
/// from `now`, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapsulePhase {
    Locked,
    Unlockable,
    Opened,
}

impl CapsulePhase {
    pub fn at(record: &CapsuleRecord, now: i64) -> Self {
        if record.opened {
            CapsulePhase::Opened
        } else if is_unlocked(record.unlock_time, now) {
            CapsulePhase::Unlockable
        } else {
            CapsulePhase::Locked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ContentRef;
    use crate::testkit::test_addr;

    fn record(unlock_time: i64, opened: bool) -> CapsuleRecord {
        CapsuleRecord {
            owner: test_addr(1),
            content_ref: ContentRef::from("QmTest"),
            unlock_time,
            opened,
        }
    }

    #[test]
    fn test_is_unlocked_boundary() {
        assert!(!is_unlocked(100, 99));
        assert!(is_unlocked(100, 100));
        assert!(is_unlocked(100, 101));
    }

    #[test]
    fn test_is_unlocked_monotonic_in_time() {
        let unlock = 1000;
        let mut was_unlocked = false;
        for now in 990..1010 {
            let unlocked = is_unlocked(unlock, now);
            assert!(!was_unlocked || unlocked, "unlock state went backwards");
            was_unlocked = unlocked;
        }
    }

    #[test]
    fn test_phase_transitions() {
        assert_eq!(CapsulePhase::at(&record(100, false), 50), CapsulePhase::Locked);
        assert_eq!(
            CapsulePhase::at(&record(100, false), 100),
            CapsulePhase::Unlockable
        );
        // opened is terminal regardless of clock
        assert_eq!(CapsulePhase::at(&record(100, true), 50), CapsulePhase::Opened);
        assert_eq!(CapsulePhase::at(&record(100, true), 500), CapsulePhase::Opened);
    }
}
