//! Shared test utilities for capsule integration tests
#![allow(dead_code)]

use chrono::Utc;

use common::address::Address;
use common::capsule::{CapsulePayload, MetadataEnvelope};
use common::ledger::Ledger;
use common::store::{ContentRef, ContentStore};
use common::testkit::TestNet;

pub use common::testkit::test_addr;

pub fn now() -> i64 {
    Utc::now().timestamp()
}

pub fn message_payload(message: &str, unlock_time: i64) -> CapsulePayload {
    CapsulePayload {
        message: Some(message.to_string()),
        unlock_time,
        ..Default::default()
    }
}

/// Plant a capsule directly through the ledger and store, bypassing the
/// manager's future-only validation. Lets tests set unlock times in the
/// past without sleeping.
pub async fn seed_capsule(
    net: &TestNet,
    owner: Address,
    message: &str,
    unlock_time: i64,
) -> ContentRef {
    seed_capsule_with_recipient(net, owner, message, unlock_time, None).await
}

pub async fn seed_capsule_with_recipient(
    net: &TestNet,
    owner: Address,
    message: &str,
    unlock_time: i64,
    recipient: Option<Address>,
) -> ContentRef {
    let envelope = MetadataEnvelope::new(
        None,
        Some(message.to_string()),
        owner,
        Utc::now(),
        unlock_time,
        recipient,
    );
    let reference = net
        .store()
        .pin_json(serde_json::to_value(&envelope).unwrap())
        .await
        .unwrap();
    net.ledger()
        .session(owner)
        .create(&reference, unlock_time)
        .await
        .unwrap();
    reference
}
