use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::capsule::{payload::parse_unlock_time, CapsuleError, CapsulePayload, FilePayload};

use crate::daemon::http_server::api::client::ApiRequest;
use crate::daemon::ServiceState;

use super::capsule_error_status;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Capsule title (optional)
    #[arg(long)]
    #[serde(default)]
    pub title: Option<String>,

    /// Message to seal in the capsule
    #[arg(long)]
    #[serde(default)]
    pub message: Option<String>,

    /// Unlock time: RFC 3339 (2031-01-01T00:00:00Z) or unix seconds
    #[arg(long)]
    pub unlock_time: String,

    /// Optional: intended recipient address (metadata only, never enforced)
    #[arg(long)]
    #[serde(default)]
    pub recipient: Option<String>,

    /// Optional: name of an attached file
    #[arg(long)]
    #[serde(default)]
    pub file_name: Option<String>,

    /// Base64-encoded file content (set by the CLI from --file)
    #[arg(skip)]
    #[serde(default)]
    pub file_base64: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub tx_hash: String,
    /// Reference of the pinned metadata envelope
    pub content_ref: String,
    pub unlock_time: i64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, CreateError> {
    let unlock_time = parse_unlock_time(&req.unlock_time).map_err(CapsuleError::Validation)?;

    let file = match (&req.file_name, &req.file_base64) {
        (Some(name), Some(encoded)) => {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(CreateError::BadFileEncoding)?;
            Some(FilePayload {
                name: name.clone(),
                declared_mime: mime_guess::from_path(name).first(),
                bytes: Bytes::from(bytes),
            })
        }
        (None, Some(_)) => return Err(CreateError::MissingFileName),
        _ => None,
    };

    let payload = CapsulePayload {
        title: req.title,
        message: req.message,
        file,
        unlock_time,
        recipient: req.recipient,
    };

    let created = state.manager().create(payload).await?;

    Ok((
        http::StatusCode::OK,
        Json(CreateResponse {
            tx_hash: created.receipt.tx_hash,
            content_ref: created.content_ref.to_string(),
            unlock_time,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("invalid file encoding: {0}")]
    BadFileEncoding(base64::DecodeError),
    #[error("file content provided without a file name")]
    MissingFileName,
    #[error(transparent)]
    Capsule(#[from] CapsuleError),
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::BadFileEncoding(_) | CreateError::MissingFileName => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            CreateError::Capsule(err) => {
                (capsule_error_status(&err), err.to_string()).into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateRequest {
    type Response = CreateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/capsule/create").unwrap();
        client.post(full_url).json(&self)
    }
}
