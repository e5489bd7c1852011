use std::fmt::{self, Debug};
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{ContentRef, ContentStore, FetchedContent, Gateway, StoreError};

const PIN_FILE_PATH: &str = "pinning/pinFileToIPFS";
const PIN_JSON_PATH: &str = "pinning/pinJSONToIPFS";
const API_KEY_HEADER: &str = "pinata_api_key";
const API_SECRET_HEADER: &str = "pinata_secret_api_key";

/// Pinning-service response carrying the content hash.
#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Content store backed by a pinning API for writes and a read gateway for
/// retrieval.
///
/// The write surface is the Pinata-shaped `pinFileToIPFS` / `pinJSONToIPFS`
/// pair with api-key headers; reads go through [`Gateway`] with plain `GET`
/// and `HEAD` requests.
#[derive(Clone)]
pub struct PinningStore {
    client: Client,
    api_base: Url,
    api_key: String,
    api_secret: String,
    gateway: Gateway,
}

impl Debug for PinningStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // api credentials stay out of logs
        f.debug_struct("PinningStore")
            .field("api_base", &self.api_base.as_str())
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl PinningStore {
    pub fn new(
        api_base: impl AsRef<str>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        gateway: Gateway,
    ) -> Result<Self, StoreError> {
        let raw = api_base.as_ref();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };
        let api_base = Url::parse(&normalized).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_base,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            gateway,
        })
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    fn pin_url(&self, path: &str) -> Result<Url, StoreError> {
        self.api_base
            .join(path)
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))
    }

    async fn check_pin_response(response: reqwest::Response) -> Result<ContentRef, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::PinRejected(format!("{}: {}", status, body)));
        }
        let pinned: PinResponse = response.json().await?;
        Ok(ContentRef::new(pinned.ipfs_hash))
    }

    fn parse_content_type(headers: &reqwest::header::HeaderMap) -> Mime {
        headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Mime::from_str(v).ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }
}

#[async_trait]
impl ContentStore for PinningStore {
    async fn pin_bytes(
        &self,
        name: &str,
        declared_mime: &Mime,
        bytes: Bytes,
    ) -> Result<ContentRef, StoreError> {
        let part = Part::bytes(bytes.to_vec())
            .file_name(name.to_string())
            .mime_str(declared_mime.as_ref())
            .map_err(|e| StoreError::PinRejected(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.pin_url(PIN_FILE_PATH)?)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_SECRET_HEADER, &self.api_secret)
            .multipart(form)
            .send()
            .await?;

        let reference = Self::check_pin_response(response).await?;
        tracing::debug!(%reference, name, "pinned file payload");
        Ok(reference)
    }

    async fn pin_json(&self, value: serde_json::Value) -> Result<ContentRef, StoreError> {
        let response = self
            .client
            .post(self.pin_url(PIN_JSON_PATH)?)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_SECRET_HEADER, &self.api_secret)
            .json(&value)
            .send()
            .await?;

        let reference = Self::check_pin_response(response).await?;
        tracing::debug!(%reference, "pinned json document");
        Ok(reference)
    }

    async fn fetch(&self, reference: &ContentRef) -> Result<FetchedContent, StoreError> {
        let url = self.gateway.url_for(reference)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(reference.clone()));
        }
        if !status.is_success() {
            return Err(StoreError::Gateway {
                status: status.as_u16(),
                reference: reference.clone(),
            });
        }

        let content_type = Self::parse_content_type(response.headers());
        let bytes = response.bytes().await?;
        Ok(FetchedContent {
            bytes,
            content_type,
        })
    }

    async fn head_content_type(&self, reference: &ContentRef) -> Result<Mime, StoreError> {
        let url = self.gateway.url_for(reference)?;
        let response = self.client.head(url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(reference.clone()));
        }
        if !status.is_success() {
            return Err(StoreError::Gateway {
                status: status.as_u16(),
                reference: reference.clone(),
            });
        }

        Ok(Self::parse_content_type(response.headers()))
    }
}
