use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde_json::json;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::transactions::model::{
    BalanceResponse, CreateTransactionDto, PaginatedTransactionsResponse, Transaction,
    TransactionFilterParams,
};
use crate::modules::transactions::service::TransactionService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Record a credit or debit against a user
#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 200, description = "Recorded transaction", body = Transaction),
        (status = 400, description = "Insufficient balance", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn create_transaction(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateTransactionDto>,
) -> Result<Json<Transaction>, AppError> {
    let actor = auth_user.user_id()?;
    let record = TransactionService::create(&state.db, dto, actor).await?;

    state.activity.emit(
        NewActivity::new(actor, "transactions:create")
            .with_meta(json!({
                "transaction_id": record.id,
                "target_user_id": record.user_id,
                "kind": record.kind,
                "amount": record.amount,
            }))
            .with_request_context(&headers),
    );

    Ok(Json(record))
}

/// List transactions with filters and pagination
#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Page of transactions", body = PaginatedTransactionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionFilterParams>,
) -> Result<Json<PaginatedTransactionsResponse>, AppError> {
    let page = TransactionService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// List the caller's own transactions
#[utoipa::path(
    get,
    path = "/api/transactions/mine",
    responses(
        (status = 200, description = "Page of own transactions", body = PaginatedTransactionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_my_transactions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut params): Query<TransactionFilterParams>,
) -> Result<Json<PaginatedTransactionsResponse>, AppError> {
    params.user_id = Some(auth_user.user_id()?);
    let page = TransactionService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// Get the caller's current balance
#[utoipa::path(
    get,
    path = "/api/balance",
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_balance(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<BalanceResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let balance = TransactionService::balance_of(&state.db, user_id).await?;
    Ok(Json(BalanceResponse { user_id, balance }))
}
