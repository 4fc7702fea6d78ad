use crate::modules::flows::controller::{create_flow, get_flow, get_flows, record_visit};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Targeting-gated flow management.
pub fn init_flows_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_flows).post(create_flow))
        .route("/{id}", get(get_flow))
}

/// Public landing-page surface, no authentication. The path parameter
/// is the flow slug; it shares the `{id}` name with the sibling routes
/// because the router requires one name per position.
pub fn init_public_flows_router() -> Router<AppState> {
    Router::new().route("/{id}/visit", post(record_visit))
}
