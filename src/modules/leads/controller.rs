use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::leads::model::{
    AcceptLeadDto, AssignOperatorDto, CreateLeadDto, Lead, LeadFilterParams,
    PaginatedLeadsResponse, SetLeadStatusDto,
};
use crate::modules::leads::service::LeadService;
use crate::modules::orders::model::Order;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AcceptedLeadResponse {
    pub lead: Lead,
    pub order: Order,
}

/// Capture a lead from a public flow landing page
#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = CreateLeadDto,
    responses(
        (status = 200, description = "Captured lead", body = Lead),
        (status = 404, description = "Unknown flow slug", body = ErrorResponse)
    ),
    tag = "Leads"
)]
#[instrument(skip(state, dto))]
pub async fn create_lead(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateLeadDto>,
) -> Result<Json<Lead>, AppError> {
    let lead = LeadService::create(&state.db, dto).await?;
    Ok(Json(lead))
}

/// List leads with filters and pagination
#[utoipa::path(
    get,
    path = "/api/leads",
    responses(
        (status = 200, description = "Page of leads", body = PaginatedLeadsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leads"
)]
#[instrument(skip(state))]
pub async fn get_leads(
    State(state): State<AppState>,
    Query(params): Query<LeadFilterParams>,
) -> Result<Json<PaginatedLeadsResponse>, AppError> {
    let page = LeadService::list(&state.db, &params).await?;
    Ok(Json(page))
}

/// Get one lead by id
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leads"
)]
#[instrument(skip(state))]
pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, AppError> {
    let lead = LeadService::get(&state.db, id).await?;
    Ok(Json(lead))
}

/// Accept a lead and open the order for it
#[utoipa::path(
    post,
    path = "/api/leads/{id}/accept",
    request_body = AcceptLeadDto,
    responses(
        (status = 200, description = "Accepted lead with its order", body = AcceptedLeadResponse),
        (status = 400, description = "Lead not open or not enough stock", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leads"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn accept_lead(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AcceptLeadDto>,
) -> Result<Json<AcceptedLeadResponse>, AppError> {
    let operator = auth_user.user_id()?;
    let (lead, order) = LeadService::accept(&state.db, id, operator, dto.quantity).await?;

    state.activity.emit(
        NewActivity::new(operator, "leads:accept")
            .with_meta(json!({ "lead_id": id, "order_id": order.id }))
            .with_request_context(&headers),
    );

    Ok(Json(AcceptedLeadResponse { lead, order }))
}

/// Move a lead to a non-accepted status
#[utoipa::path(
    post,
    path = "/api/leads/{id}/status",
    request_body = SetLeadStatusDto,
    responses(
        (status = 200, description = "Updated lead", body = Lead),
        (status = 400, description = "Accepted must go through accept", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leads"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn set_lead_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(dto): Json<SetLeadStatusDto>,
) -> Result<Json<Lead>, AppError> {
    let lead = LeadService::set_status(&state.db, id, dto.status).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "leads:set-status")
            .with_meta(json!({ "lead_id": id, "status": dto.status }))
            .with_request_context(&headers),
    );

    Ok(Json(lead))
}

/// Assign a lead to an operator
#[utoipa::path(
    post,
    path = "/api/leads/{id}/assign",
    request_body = AssignOperatorDto,
    responses(
        (status = 200, description = "Updated lead", body = Lead),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Leads"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn assign_lead(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(dto): Json<AssignOperatorDto>,
) -> Result<Json<Lead>, AppError> {
    let lead = LeadService::assign_operator(&state.db, id, dto.operator_id).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "leads:assign")
            .with_meta(json!({ "lead_id": id, "operator_id": dto.operator_id }))
            .with_request_context(&headers),
    );

    Ok(Json(lead))
}
