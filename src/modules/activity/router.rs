use axum::{Router, routing::get};

use crate::modules::activity::controller::list_activity;
use crate::state::AppState;

pub fn init_activity_router() -> Router<AppState> {
    Router::new().route("/", get(list_activity))
}
