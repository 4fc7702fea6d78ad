use crate::modules::orders::controller::{advance_order, get_order, get_orders};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Warehouse-admin-gated fulfilment desk.
pub fn init_orders_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", post(advance_order))
}
