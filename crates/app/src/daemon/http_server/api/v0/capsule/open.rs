use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::capsule::CapsuleError;
use common::prelude::{Address, AddressError};

use crate::daemon::http_server::api::client::ApiRequest;
use crate::daemon::ServiceState;

use super::capsule_error_status;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct OpenRequest {
    /// Owner address of the capsule to open. Opening someone else's
    /// capsule goes through the permissionless on-behalf path.
    #[arg(long)]
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenResponse {
    pub tx_hash: String,
    /// Whether the daemon account opened its own capsule or acted on
    /// behalf of the owner
    pub on_behalf: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<OpenRequest>,
) -> Result<impl IntoResponse, OpenError> {
    let owner: Address = req.owner.parse()?;

    let receipt = state.manager().open(&owner).await?;
    let on_behalf = state.manager().caller() != &owner;

    Ok((
        http::StatusCode::OK,
        Json(OpenResponse {
            tx_hash: receipt.tx_hash,
            on_behalf,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("invalid owner address: {0}")]
    BadAddress(#[from] AddressError),
    #[error(transparent)]
    Capsule(#[from] CapsuleError),
}

impl IntoResponse for OpenError {
    fn into_response(self) -> Response {
        match self {
            OpenError::BadAddress(_) => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            OpenError::Capsule(err) => {
                (capsule_error_status(&err), err.to_string()).into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for OpenRequest {
    type Response = OpenResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/capsule/open").unwrap();
        client.post(full_url).json(&self)
    }
}
