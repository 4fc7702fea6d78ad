use crate::modules::products::controller::{
    adjust_stock, create_product, delete_product, get_product, get_products, update_product,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Warehouse-gated catalogue mutations.
pub fn init_products_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/{id}", axum::routing::put(update_product).delete(delete_product))
        .route("/{id}/stock", post(adjust_stock))
}

/// Read-only catalogue for any authenticated role. Merged with the
/// mutation router at the same prefix; methods keep them apart.
pub fn init_catalogue_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_products))
        .route("/{id}", get(get_product))
}
