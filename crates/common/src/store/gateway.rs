use url::Url;

use super::{ContentRef, StoreError};

/// Read gateway for the content-addressed store.
///
/// Owns the reference-to-URL mapping: a pure, injective function of the
/// reference string. Already-absolute references pass through unchanged
/// rather than being joined onto the base (and double-encoded).
#[derive(Debug, Clone)]
pub struct Gateway {
    base: Url,
}

impl Gateway {
    /// Create a gateway from its base URL, e.g.
    /// `https://gateway.pinata.cloud/ipfs/`.
    ///
    /// A trailing slash is appended if missing so that joins extend the
    /// path instead of replacing its last segment.
    pub fn new(base: impl AsRef<str>) -> Result<Self, StoreError> {
        let raw = base.as_ref();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };
        let base = Url::parse(&normalized).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Map a reference to its retrieval URL.
    pub fn url_for(&self, reference: &ContentRef) -> Result<Url, StoreError> {
        if reference.is_absolute_url() {
            return Url::parse(reference.as_str())
                .map_err(|e| StoreError::InvalidUrl(e.to_string()));
        }
        self.base
            .join(reference.as_str())
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))
    }
}
