//! Integration tests for capsule creation

mod common;

use bytes::Bytes;
use self::common::{message_payload, now, test_addr};

use ::common::capsule::{
    CapsuleError, CapsulePayload, FilePayload, MetadataState, ValidationError,
};
use ::common::store::ContentStore;
use ::common::testkit::TestNet;

#[tokio::test]
async fn test_create_and_view_message_capsule() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    let created = alice
        .create(message_payload("hello", now() + 3600))
        .await
        .unwrap();
    assert!(created.receipt.tx_hash.starts_with("0x"));

    let view = alice.view(&test_addr(1)).await.unwrap().unwrap();
    assert_eq!(view.content_ref, created.content_ref);
    let envelope = view.metadata.envelope().unwrap();
    assert_eq!(envelope.message.as_deref(), Some("hello"));
    assert_eq!(envelope.title, "Time Capsule");
    assert_eq!(envelope.created_by, test_addr(1));
}

#[tokio::test]
async fn test_empty_payload_makes_no_external_calls() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    let payload = CapsulePayload {
        unlock_time: now() + 3600,
        ..Default::default()
    };
    let err = alice.create(payload).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Validation(ValidationError::EmptyContent)
    ));

    // fail fast: nothing touched the ledger or the store
    assert_eq!(net.ledger().read_calls(), 0);
    assert_eq!(net.ledger().write_calls(), 0);
    assert_eq!(net.store().pin_calls(), 0);
}

#[tokio::test]
async fn test_invalid_recipient_makes_no_external_calls() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    let mut payload = message_payload("hello", now() + 3600);
    payload.recipient = Some("0xnope".to_string());
    let err = alice.create(payload).await.unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Validation(ValidationError::InvalidRecipient(_))
    ));
    assert_eq!(net.ledger().write_calls(), 0);
    assert_eq!(net.store().pin_calls(), 0);
}

#[tokio::test]
async fn test_unlock_time_boundaries() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));
    let base = now();
    let ten_years = 10 * 365 * 24 * 60 * 60;

    let err = alice
        .create_at(message_payload("x", base), base)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Validation(ValidationError::UnlockTimeNotFuture)
    ));

    let err = alice
        .create_at(message_payload("x", base + ten_years + 1), base)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CapsuleError::Validation(ValidationError::UnlockTimeTooFar)
    ));

    alice
        .create_at(message_payload("x", base + 1), base)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_with_file_payload() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    let payload = CapsulePayload {
        title: Some("Holiday photo".to_string()),
        file: Some(FilePayload {
            name: "beach.png".to_string(),
            declared_mime: None,
            bytes: Bytes::from_static(b"\x89PNG fake image data"),
        }),
        unlock_time: now() + 3600,
        ..Default::default()
    };
    alice.create(payload).await.unwrap();
    // file pin + envelope pin
    assert_eq!(net.store().pin_calls(), 2);

    let view = alice.view(&test_addr(1)).await.unwrap().unwrap();
    let envelope = view.metadata.envelope().unwrap();
    assert_eq!(envelope.file_name.as_deref(), Some("beach.png"));
    assert_eq!(envelope.file_type.as_deref(), Some("image/png"));
    assert_eq!(envelope.file_size, Some(20));

    // the file payload itself resolves through the store
    let file_ref = envelope.file_hash.clone().unwrap();
    let content = net.store().resolve_binary(&file_ref).await.unwrap();
    assert_eq!(&content.bytes[..], b"\x89PNG fake image data");
    assert_eq!(content.content_type.as_ref(), "image/png");
}

#[tokio::test]
async fn test_store_failure_leaves_ledger_untouched() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    net.store().set_offline(true);
    let err = alice
        .create(message_payload("hello", now() + 3600))
        .await
        .unwrap_err();
    assert!(matches!(err, CapsuleError::Store(_)));
    assert_eq!(net.ledger().write_calls(), 0);
}

#[tokio::test]
async fn test_recreate_replaces_prior_capsule() {
    let net = TestNet::new();
    let alice = net.session(test_addr(1));

    alice
        .create(message_payload("first", now() + 3600))
        .await
        .unwrap();
    let second = alice
        .create(message_payload("second", now() + 7200))
        .await
        .unwrap();

    let view = alice.view(&test_addr(1)).await.unwrap().unwrap();
    assert_eq!(view.content_ref, second.content_ref);
    assert!(!view.opened);
    match view.metadata {
        MetadataState::Resolved { envelope } => {
            assert_eq!(envelope.message.as_deref(), Some("second"))
        }
        MetadataState::Unavailable { reason } => panic!("metadata unavailable: {}", reason),
    }
}
