use crate::middleware::route_access::route_access_middleware;
use crate::modules::panel::controller::{
    dashboard_landing, dashboard_subpath, login_surface, panel_entry,
};
use crate::state::AppState;
use axum::{Router, middleware, routing::get};

/// Cookie-gated panel surface. `/kirish` stays outside the guard so the
/// login redirect target is always reachable.
pub fn init_panel_router() -> Router<AppState> {
    let guarded = Router::new()
        .route("/panel", get(panel_entry))
        .route("/dashboard", get(panel_entry))
        .route("/dashboard/{segment}", get(dashboard_landing))
        .route("/dashboard/{segment}/{*rest}", get(dashboard_subpath))
        .layer(middleware::from_fn(route_access_middleware));

    Router::new()
        .route("/kirish", get(login_surface))
        .merge(guarded)
}
