use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::capsule::{CapsuleError, CapsuleView};
use common::prelude::{Address, AddressError};

use crate::daemon::http_server::api::client::ApiRequest;
use crate::daemon::ServiceState;

use super::capsule_error_status;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ViewRequest {
    /// Owner address of the capsule to view
    #[arg(long)]
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    /// False when no capsule exists for the owner; not an error
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capsule: Option<CapsuleView>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<ViewRequest>,
) -> Result<impl IntoResponse, ViewError> {
    let owner: Address = req.owner.parse()?;

    let capsule = state.manager().view(&owner).await?;

    Ok((
        http::StatusCode::OK,
        Json(ViewResponse {
            found: capsule.is_some(),
            capsule,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("invalid owner address: {0}")]
    BadAddress(#[from] AddressError),
    #[error(transparent)]
    Capsule(#[from] CapsuleError),
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match self {
            ViewError::BadAddress(_) => {
                (http::StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ViewError::Capsule(err) => {
                (capsule_error_status(&err), err.to_string()).into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for ViewRequest {
    type Response = ViewResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/capsule/view").unwrap();
        client.post(full_url).json(&self)
    }
}
