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
use crate::modules::flows::model::{
    CreateFlowDto, Flow, FlowFilterParams, PaginatedFlowsResponse, VisitResponse,
};
use crate::modules::flows::service::FlowService;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a flow owned by the caller
#[utoipa::path(
    post,
    path = "/api/flows",
    request_body = CreateFlowDto,
    responses(
        (status = 200, description = "Created flow", body = Flow),
        (status = 400, description = "Unknown or inactive product", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Flows"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn create_flow(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateFlowDto>,
) -> Result<Json<Flow>, AppError> {
    let owner = auth_user.user_id()?;
    let flow = FlowService::create(&state.db, owner, dto).await?;

    state.activity.emit(
        NewActivity::new(owner, "flows:create")
            .with_meta(json!({ "flow_id": flow.id, "slug": flow.slug }))
            .with_request_context(&headers),
    );

    Ok(Json(flow))
}

/// List flows. Targetologs see only their own; TargetAdmin and the
/// admin roles see everything.
#[utoipa::path(
    get,
    path = "/api/flows",
    responses(
        (status = 200, description = "Page of flows", body = PaginatedFlowsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Flows"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_flows(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(mut params): Query<FlowFilterParams>,
) -> Result<Json<PaginatedFlowsResponse>, AppError> {
    if auth_user.role() == Some(UserRole::Targetolog) {
        params.targetolog_id = Some(auth_user.user_id()?);
    }
    let page = FlowService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// Get one flow by id. Targetologs can only read their own.
#[utoipa::path(
    get,
    path = "/api/flows/{id}",
    responses(
        (status = 200, description = "Flow", body = Flow),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Flows"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_flow(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Flow>, AppError> {
    let flow = FlowService::get(&state.db, id).await?;

    if auth_user.role() == Some(UserRole::Targetolog) && flow.targetolog_id != auth_user.user_id()?
    {
        return Err(AppError::forbidden("Flow belongs to another targetolog"));
    }

    Ok(Json(flow))
}

/// Public visit counter for a flow landing page
#[utoipa::path(
    post,
    path = "/api/flows/{slug}/visit",
    responses(
        (status = 200, description = "Updated visit count", body = VisitResponse),
        (status = 404, description = "Unknown slug", body = ErrorResponse)
    ),
    tag = "Flows"
)]
#[instrument(skip(state))]
pub async fn record_visit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<VisitResponse>, AppError> {
    let visits = FlowService::record_visit(&state.db, &slug).await?;
    Ok(Json(VisitResponse { slug, visits }))
}
