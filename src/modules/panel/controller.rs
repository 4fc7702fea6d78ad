use axum::{
    Json,
    extract::{Path, Query},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::route_access::PANEL_PATH;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PanelView {
    pub path: String,
    pub segment: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginView {
    pub path: String,
    /// Return target carried through from the guard's redirect.
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

/// Generic panel entry. Never actually renders for a signed-in caller;
/// the route guard bounces them to their canonical dashboard first.
#[utoipa::path(
    get,
    path = "/panel",
    responses((status = 200, description = "Panel entry", body = PanelView)),
    tag = "Panel"
)]
#[instrument]
pub async fn panel_entry() -> Result<Json<PanelView>, AppError> {
    Ok(Json(PanelView {
        path: PANEL_PATH.to_string(),
        segment: String::new(),
    }))
}

/// Login surface. Unauthenticated by design; echoes the return target
/// so the client can come back after signing in.
#[utoipa::path(
    get,
    path = "/kirish",
    responses((status = 200, description = "Login surface", body = LoginView)),
    tag = "Panel"
)]
#[instrument]
pub async fn login_surface(Query(query): Query<LoginQuery>) -> Result<Json<LoginView>, AppError> {
    Ok(Json(LoginView {
        path: crate::middleware::route_access::LOGIN_PATH.to_string(),
        redirect: query.redirect,
    }))
}

/// Per-role dashboard landing. Only reachable with the caller's own
/// segment; the guard rewrites everything else.
#[utoipa::path(
    get,
    path = "/dashboard/{segment}",
    responses((status = 200, description = "Dashboard landing", body = PanelView)),
    tag = "Panel"
)]
#[instrument]
pub async fn dashboard_landing(Path(segment): Path<String>) -> Result<Json<PanelView>, AppError> {
    Ok(Json(PanelView {
        path: format!("/dashboard/{segment}"),
        segment,
    }))
}

/// Dashboard subpath catch-all under the caller's own segment.
#[instrument]
pub async fn dashboard_subpath(
    Path((segment, rest)): Path<(String, String)>,
) -> Result<Json<PanelView>, AppError> {
    Ok(Json(PanelView {
        path: format!("/dashboard/{segment}/{rest}"),
        segment,
    }))
}
