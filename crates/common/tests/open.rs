//! Integration tests for the open transition: authorization, idempotence,
//! and the permissionless on-behalf path

mod common;

use self::common::{message_payload, now, seed_capsule, seed_capsule_with_recipient, test_addr};

use ::common::capsule::{AccessError, CapsuleError};
use ::common::testkit::TestNet;

#[tokio::test]
async fn test_owner_cannot_open_before_unlock() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    alice
        .create(message_payload("patience", now() + 3600))
        .await
        .unwrap();
    let writes_after_create = net.ledger().write_calls();

    let err = alice.open(&test_addr(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Access(AccessError::StillLocked { .. })
    ));
    // rejected locally; no transaction was spent
    assert_eq!(net.ledger().write_calls(), writes_after_create);
}

#[tokio::test]
async fn test_stranger_cannot_open_before_unlock() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));
    let mallory = net.session(test_addr(2));

    alice
        .create(message_payload("patience", now() + 3600))
        .await
        .unwrap();

    let err = mallory.open(&test_addr(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Access(AccessError::StillLocked { .. })
    ));
}

#[tokio::test]
async fn test_owner_opens_after_unlock() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    seed_capsule(&net, test_addr(1), "hello future", now() - 60).await;

    alice.open(&test_addr(1)).await.unwrap();

    let view = alice.view(&test_addr(1)).await.unwrap().unwrap();
    assert!(view.opened);
    assert!(view.can_access_content);
    assert_eq!(
        view.metadata.envelope().unwrap().message.as_deref(),
        Some("hello future")
    );
}

#[tokio::test]
async fn test_open_is_idempotent_rejection() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    seed_capsule(&net, test_addr(1), "once", now() - 60).await;

    alice.open(&test_addr(1)).await.unwrap();
    let err = alice.open(&test_addr(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Access(AccessError::AlreadyOpened)
    ));
}

#[tokio::test]
async fn test_anyone_opens_on_behalf_after_unlock() {
    let net = TestNet::new();
    let bob = net.session(test_addr(2));
    let carol = net.session(test_addr(3));

    seed_capsule(&net, test_addr(1), "for whoever asks", now() - 60).await;

    // a non-owner releases the capsule
    bob.open(&test_addr(1)).await.unwrap();

    // a second non-owner gets the specific already-opened reason
    let err = carol.open(&test_addr(1)).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Access(AccessError::AlreadyOpened)
    ));
}

#[tokio::test]
async fn test_intended_recipient_is_never_enforced() {
    let net = TestNet::new();
    // recipient label names carol, but dave opens it
    seed_capsule_with_recipient(
        &net,
        test_addr(1),
        "addressed to carol",
        now() - 60,
        Some(test_addr(3)),
    )
    .await;

    let dave = net.session(test_addr(4));
    dave.open(&test_addr(1)).await.unwrap();
}

#[tokio::test]
async fn test_open_missing_capsule_is_not_found() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    let err = alice.open(&test_addr(9)).await.unwrap_err();
    assert!(matches!(err, CapsuleError::NotFound(owner) if owner == test_addr(9)));
}

#[tokio::test]
async fn test_concurrent_opens_have_one_winner() {
    let net = TestNet::new();
    seed_capsule(&net, test_addr(1), "contested", now() - 60).await;

    let bob = net.session(test_addr(2));
    let carol = net.session(test_addr(3));

    let addr = test_addr(1);
    let (b, c) = tokio::join!(bob.open(&addr), carol.open(&addr));

    let winners = [&b, &c].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one open must commit");

    let loser = if b.is_ok() { c } else { b };
    assert!(matches!(
        loser.unwrap_err(),
        CapsuleError::Access(AccessError::AlreadyOpened)
    ));
}
