use bytes::Bytes;
use chrono::DateTime;
use mime::Mime;

use crate::address::{Address, AddressError};

/// Largest accepted file payload, in bytes.
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Furthest-out accepted unlock time, relative to creation: 10 years of
/// 365 days.
pub const MAX_UNLOCK_WINDOW_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// A file attached to a capsule at creation time.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    /// Upload-time content type hint; guessed from the name when absent.
    pub declared_mime: Option<Mime>,
    pub bytes: Bytes,
}

impl FilePayload {
    /// The content type to declare when pinning: the caller's hint, or a
    /// guess from the file name, or octet-stream.
    pub fn mime(&self) -> Mime {
        self.declared_mime
            .clone()
            .unwrap_or_else(|| mime_guess::from_path(&self.name).first_or_octet_stream())
    }
}

/// Creation input for a capsule.
#[derive(Debug, Clone, Default)]
pub struct CapsulePayload {
    pub title: Option<String>,
    pub message: Option<String>,
    pub file: Option<FilePayload>,
    /// Absolute unlock instant, seconds since epoch.
    pub unlock_time: i64,
    /// Optional recipient label; format-validated, stored as metadata only.
    pub recipient: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("provide a message or a file")]
    EmptyContent,
    #[error("unlock time is not a recognized date: {0}")]
    UnparseableUnlockTime(String),
    #[error("unlock time must be in the future")]
    UnlockTimeNotFuture,
    #[error("unlock time cannot be more than 10 years in the future")]
    UnlockTimeTooFar,
    #[error("recipient address is invalid: {0}")]
    InvalidRecipient(#[from] AddressError),
    #[error("file '{name}' is {size} bytes, over the {limit} byte limit")]
    FileTooLarge {
        name: String,
        size: usize,
        limit: usize,
    },
}

/// Parse a user-supplied unlock time string into unix seconds.
///
/// Accepts RFC 3339 (`2031-01-01T00:00:00Z`) or a bare unix-seconds
/// integer. Range checks happen in [`CapsulePayload::validate`], not here.
pub fn parse_unlock_time(input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    if let Ok(secs) = trimmed.parse::<i64>() {
        return Ok(secs);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.timestamp())
        .map_err(|_| ValidationError::UnparseableUnlockTime(input.to_string()))
}

impl CapsulePayload {
    /// Check every creation precondition against `now`, before any external
    /// call is made. Returns the parsed recipient address, if one was
    /// given.
    pub fn validate(&self, now: i64) -> Result<Option<Address>, ValidationError> {
        let has_message = self
            .message
            .as_deref()
            .map(|m| !m.trim().is_empty())
            .unwrap_or(false);
        if !has_message && self.file.is_none() {
            return Err(ValidationError::EmptyContent);
        }

        // strictly future; unlock_time == now is rejected
        if self.unlock_time <= now {
            return Err(ValidationError::UnlockTimeNotFuture);
        }
        if self.unlock_time > now + MAX_UNLOCK_WINDOW_SECS {
            return Err(ValidationError::UnlockTimeTooFar);
        }

        if let Some(file) = &self.file {
            if file.bytes.len() > MAX_FILE_SIZE {
                return Err(ValidationError::FileTooLarge {
                    name: file.name.clone(),
                    size: file.bytes.len(),
                    limit: MAX_FILE_SIZE,
                });
            }
        }

        self.recipient
            .as_deref()
            .map(|r| r.parse::<Address>())
            .transpose()
            .map_err(ValidationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_800_000_000;

    fn message_payload(unlock_time: i64) -> CapsulePayload {
        CapsulePayload {
            message: Some("hello".to_string()),
            unlock_time,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_content_rejected() {
        let payload = CapsulePayload {
            unlock_time: NOW + 60,
            ..Default::default()
        };
        assert_eq!(payload.validate(NOW), Err(ValidationError::EmptyContent));

        let whitespace = CapsulePayload {
            message: Some("   ".to_string()),
            unlock_time: NOW + 60,
            ..Default::default()
        };
        assert_eq!(whitespace.validate(NOW), Err(ValidationError::EmptyContent));
    }

    #[test]
    fn test_unlock_time_boundaries() {
        // now itself: strict future only
        assert_eq!(
            message_payload(NOW).validate(NOW),
            Err(ValidationError::UnlockTimeNotFuture)
        );
        // one second out is fine
        assert!(message_payload(NOW + 1).validate(NOW).is_ok());
        // exactly ten years out is fine
        assert!(message_payload(NOW + MAX_UNLOCK_WINDOW_SECS)
            .validate(NOW)
            .is_ok());
        // one second past the window is not
        assert_eq!(
            message_payload(NOW + MAX_UNLOCK_WINDOW_SECS + 1).validate(NOW),
            Err(ValidationError::UnlockTimeTooFar)
        );
        // the past certainly is not
        assert_eq!(
            message_payload(NOW - 1).validate(NOW),
            Err(ValidationError::UnlockTimeNotFuture)
        );
    }

    #[test]
    fn test_recipient_validation() {
        let mut payload = message_payload(NOW + 60);
        payload.recipient = Some("0x00a329c0648769a73afac7f9381e08fb43dbea72".to_string());
        let recipient = payload.validate(NOW).unwrap();
        assert!(recipient.is_some());

        payload.recipient = Some("not-an-address".to_string());
        assert!(matches!(
            payload.validate(NOW),
            Err(ValidationError::InvalidRecipient(_))
        ));
    }

    #[test]
    fn test_file_size_limit() {
        let payload = CapsulePayload {
            file: Some(FilePayload {
                name: "big.bin".to_string(),
                declared_mime: None,
                bytes: Bytes::from(vec![0u8; MAX_FILE_SIZE + 1]),
            }),
            unlock_time: NOW + 60,
            ..Default::default()
        };
        assert!(matches!(
            payload.validate(NOW),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_file_only_payload_is_content() {
        let payload = CapsulePayload {
            file: Some(FilePayload {
                name: "note.txt".to_string(),
                declared_mime: None,
                bytes: Bytes::from_static(b"hi"),
            }),
            unlock_time: NOW + 60,
            ..Default::default()
        };
        assert!(payload.validate(NOW).is_ok());
    }

    #[test]
    fn test_declared_mime_falls_back_to_guess() {
        let file = FilePayload {
            name: "photo.png".to_string(),
            declared_mime: None,
            bytes: Bytes::from_static(b"fake"),
        };
        assert_eq!(file.mime().as_ref(), "image/png");

        let unknown = FilePayload {
            name: "mystery".to_string(),
            declared_mime: None,
            bytes: Bytes::from_static(b"fake"),
        };
        assert_eq!(unknown.mime(), mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn test_parse_unlock_time() {
        assert_eq!(parse_unlock_time("1800000000").unwrap(), 1_800_000_000);
        assert_eq!(
            parse_unlock_time("2031-01-01T00:00:00Z").unwrap(),
            1_924_992_000
        );
        assert!(matches!(
            parse_unlock_time("next tuesday"),
            Err(ValidationError::UnparseableUnlockTime(_))
        ));
    }
}
