use axum::routing::post;
use axum::Router;
use http::StatusCode;

pub mod create;
pub mod open;
pub mod view;

use common::capsule::{AccessError, CapsuleError};

use crate::daemon::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/create", post(create::handler))
        .route("/view", post(view::handler))
        .route("/open", post(open::handler))
        .with_state(state)
}

/// Shared status mapping for manager errors. Each error keeps its specific
/// reason in the response body; only the outermost status code is generic.
pub(crate) fn capsule_error_status(err: &CapsuleError) -> StatusCode {
    match err {
        CapsuleError::Validation(_) => StatusCode::BAD_REQUEST,
        CapsuleError::Access(AccessError::StillLocked { .. }) => StatusCode::FORBIDDEN,
        CapsuleError::Access(AccessError::AlreadyOpened) => StatusCode::CONFLICT,
        CapsuleError::NotFound(_) => StatusCode::NOT_FOUND,
        CapsuleError::Ledger(_) | CapsuleError::Store(_) => StatusCode::BAD_GATEWAY,
        CapsuleError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
