use crate::modules::leads::controller::{
    accept_lead, assign_lead, create_lead, get_lead, get_leads, set_lead_status,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Operations-gated lead desk.
pub fn init_leads_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_leads))
        .route("/{id}", get(get_lead))
        .route("/{id}/accept", post(accept_lead))
        .route("/{id}/status", post(set_lead_status))
        .route("/{id}/assign", post(assign_lead))
}

/// Public capture endpoint, no authentication.
pub fn init_public_leads_router() -> Router<AppState> {
    Router::new().route("/", post(create_lead))
}
