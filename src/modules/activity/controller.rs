use axum::{Json, extract::Query, extract::State};
use tracing::instrument;

use crate::modules::activity::model::{ActivityFilterParams, PaginatedActivityResponse};
use crate::modules::activity::service::ActivityService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Browse the activity log (admins only; the log itself is append-only,
/// there is no mutation surface).
#[utoipa::path(
    get,
    path = "/api/activity",
    params(
        ("user_id" = Option<String>, Query, description = "Filter by user"),
        ("action" = Option<String>, Query, description = "Filter by action substring")
    ),
    responses(
        (status = 200, description = "Activity log page", body = PaginatedActivityResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Activity"
)]
#[instrument(skip(state))]
pub async fn list_activity(
    State(state): State<AppState>,
    Query(params): Query<ActivityFilterParams>,
) -> Result<Json<PaginatedActivityResponse>, AppError> {
    let (data, meta) = ActivityService::list(&state.db, &params).await?;
    Ok(Json(PaginatedActivityResponse { data, meta }))
}
