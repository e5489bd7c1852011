use axum::Router;

pub mod capsule;

use crate::daemon::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/capsule", capsule::router(state.clone()))
        .with_state(state)
}
