use crate::modules::transactions::controller::{
    create_transaction, get_balance, get_my_transactions, get_transactions,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Admin-gated transaction ledger.
pub fn init_transactions_router() -> Router<AppState> {
    Router::new().route("/", get(get_transactions).post(create_transaction))
}

/// The caller's own ledger view, open to any authenticated caller.
pub fn init_my_transactions_router() -> Router<AppState> {
    Router::new().route("/mine", get(get_my_transactions))
}

/// Current balance of the caller.
pub fn init_balance_router() -> Router<AppState> {
    Router::new().route("/", get(get_balance))
}
