use crate::modules::users::controller::{
    block_user, change_password, create_user, delete_user, get_user, get_users, unblock_user,
    update_profile, update_user,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Admin-gated user management. The delete operation additionally
/// carries a SuperAdmin-only extractor.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/block", post(block_user))
        .route("/{id}/unblock", post(unblock_user))
}

/// Self-service profile routes, open to any authenticated caller.
pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profile", axum::routing::put(update_profile))
        .route("/profile/change-password", post(change_password))
}
