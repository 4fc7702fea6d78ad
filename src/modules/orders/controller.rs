use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::orders::model::{
    AdvanceOrderDto, Order, OrderFilterParams, PaginatedOrdersResponse,
};
use crate::modules::orders::service::OrderService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// List orders with filters and pagination
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Page of orders", body = PaginatedOrdersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn get_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderFilterParams>,
) -> Result<Json<PaginatedOrdersResponse>, AppError> {
    let page = OrderService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// Get one order by id
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = OrderService::get(&state.db, id).await?;
    Ok(Json(order))
}

/// Advance an order through its fulfilment lifecycle
#[utoipa::path(
    post,
    path = "/api/orders/{id}/status",
    request_body = AdvanceOrderDto,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "Transition not allowed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn advance_order(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(dto): Json<AdvanceOrderDto>,
) -> Result<Json<Order>, AppError> {
    let actor = auth_user.user_id()?;
    let order = OrderService::advance(&state.db, id, dto.status, actor).await?;

    state.activity.emit(
        NewActivity::new(actor, "orders:advance")
            .with_meta(json!({ "order_id": id, "status": dto.status }))
            .with_request_context(&headers),
    );

    Ok(Json(order))
}
