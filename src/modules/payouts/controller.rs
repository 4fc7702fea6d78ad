use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::payouts::model::{
    PaginatedPayoutsResponse, Payout, PayoutFilterParams, RejectPayoutDto, RequestPayoutDto,
};
use crate::modules::payouts::service::PayoutService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Request a withdrawal of earned rewards
#[utoipa::path(
    post,
    path = "/api/payouts",
    request_body = RequestPayoutDto,
    responses(
        (status = 200, description = "Filed payout request", body = Payout),
        (status = 400, description = "Amount exceeds balance", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn request_payout(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<RequestPayoutDto>,
) -> Result<Json<Payout>, AppError> {
    let user_id = auth_user.user_id()?;
    let payout = PayoutService::request(&state.db, user_id, dto).await?;

    state.activity.emit(
        NewActivity::new(user_id, "payouts:request")
            .with_meta(json!({ "payout_id": payout.id, "amount": payout.amount }))
            .with_request_context(&headers),
    );

    Ok(Json(payout))
}

/// List the caller's own payout requests
#[utoipa::path(
    get,
    path = "/api/payouts/mine",
    responses(
        (status = 200, description = "Page of own payouts", body = PaginatedPayoutsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_my_payouts(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut params): Query<PayoutFilterParams>,
) -> Result<Json<PaginatedPayoutsResponse>, AppError> {
    params.user_id = Some(auth_user.user_id()?);
    let page = PayoutService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// List all payout requests. Operation-level gate: admins only, while
/// the rest of this router admits any authenticated caller.
#[utoipa::path(
    get,
    path = "/api/payouts",
    responses(
        (status = 200, description = "Page of payouts", body = PaginatedPayoutsResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
#[instrument(skip(state, _gate))]
pub async fn get_payouts(
    State(state): State<AppState>,
    RequireAdmin(_gate): RequireAdmin,
    Query(params): Query<PayoutFilterParams>,
) -> Result<Json<PaginatedPayoutsResponse>, AppError> {
    let page = PayoutService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// Approve a pending payout and debit the requester's balance
#[utoipa::path(
    post,
    path = "/api/payouts/{id}/approve",
    responses(
        (status = 200, description = "Approved payout", body = Payout),
        (status = 400, description = "Not pending or insufficient balance", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
#[instrument(skip(state, gate, headers))]
pub async fn approve_payout(
    State(state): State<AppState>,
    RequireAdmin(gate): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Payout>, AppError> {
    let actor = gate.user_id()?;
    let payout = PayoutService::approve(&state.db, id, actor).await?;

    state.activity.emit(
        NewActivity::new(actor, "payouts:approve")
            .with_meta(json!({ "payout_id": id, "amount": payout.amount }))
            .with_request_context(&headers),
    );

    Ok(Json(payout))
}

/// Reject a pending payout with a comment
#[utoipa::path(
    post,
    path = "/api/payouts/{id}/reject",
    request_body = RejectPayoutDto,
    responses(
        (status = 200, description = "Rejected payout", body = Payout),
        (status = 400, description = "Not pending", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
#[instrument(skip(state, gate, headers, dto))]
pub async fn reject_payout(
    State(state): State<AppState>,
    RequireAdmin(gate): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<RejectPayoutDto>,
) -> Result<Json<Payout>, AppError> {
    let actor = gate.user_id()?;
    let payout = PayoutService::reject(&state.db, id, actor, dto.comment).await?;

    state.activity.emit(
        NewActivity::new(actor, "payouts:reject")
            .with_meta(json!({ "payout_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(payout))
}

/// Mark an approved payout as actually paid out
#[utoipa::path(
    post,
    path = "/api/payouts/{id}/paid",
    responses(
        (status = 200, description = "Payout marked paid", body = Payout),
        (status = 400, description = "Not approved", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payouts"
)]
#[instrument(skip(state, gate, headers))]
pub async fn mark_payout_paid(
    State(state): State<AppState>,
    RequireAdmin(gate): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Payout>, AppError> {
    let payout = PayoutService::mark_paid(&state.db, id).await?;

    state.activity.emit(
        NewActivity::new(gate.user_id()?, "payouts:paid")
            .with_meta(json!({ "payout_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(payout))
}
