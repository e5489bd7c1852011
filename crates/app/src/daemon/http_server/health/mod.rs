use axum::routing::get;
use axum::Router;

mod healthz;
mod version;

use crate::daemon::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/healthz", get(healthz::handler))
        .route("/version", get(version::handler))
        .with_state(state)
}
