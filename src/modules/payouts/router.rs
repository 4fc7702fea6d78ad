use crate::modules::payouts::controller::{
    approve_payout, get_my_payouts, get_payouts, mark_payout_paid, reject_payout, request_payout,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Payout surface. Requesting and "mine" are open to any authenticated
/// caller; listing and decisions carry admin extractors per handler.
pub fn init_payouts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_payouts).post(request_payout))
        .route("/mine", get(get_my_payouts))
        .route("/{id}/approve", post(approve_payout))
        .route("/{id}/reject", post(reject_payout))
        .route("/{id}/paid", post(mark_payout_paid))
}
