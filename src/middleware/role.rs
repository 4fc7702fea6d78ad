//! Role-based authorization for the API surface.
//!
//! Two complementary declaration styles, both backed by the same gate:
//!
//! 1. Router-group layers via [`require_roles`] and the `require_*`
//!    helpers, the coarse-grained declaration.
//! 2. Per-operation extractors ([`RequireSuperAdmin`], [`RequireAdmin`])
//!    attached to a single handler, which extend whatever the group
//!    layer already demands.
//!
//! An empty required set admits any authenticated caller. A claim without
//! role data is rejected as `Unauthorized` (missing identity data), not
//! `Forbidden` (role mismatch).

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// The role authorization gate.
///
/// Admission holds iff the required set is empty or the caller's
/// (normalized) role is a member.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if allowed_roles.is_empty() {
        return Ok(());
    }

    let user_role = auth_user
        .role()
        .ok_or_else(|| AppError::unauthorized("Token carries no role claim"))?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(())
}

/// Middleware that authenticates the request and checks the caller's
/// role against `allowed_roles`.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/users", get(list_users))
///     .layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, &allowed_roles)?;

    let mut req = Request::from_parts(parts, body);
    // Make the claims available to the handler without re-verifying.
    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

/// Any authenticated caller; the empty required set.
pub async fn require_authenticated(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, Vec::new()).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Back-office administrators (SuperAdmin and Admin).
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![UserRole::SuperAdmin, UserRole::Admin],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Warehouse surface: admins plus sklad-admin and ta'minotchi.
pub async fn require_warehouse(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::SkladAdmin,
            UserRole::Taminotchi,
        ],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Call-center surface: admins plus oper-admin and operators.
pub async fn require_operations(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::OperAdmin,
            UserRole::Operator,
        ],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Traffic surface: admins plus target-admin and targetologs.
pub async fn require_targeting(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::TargetAdmin,
            UserRole::Targetolog,
        ],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Order fulfilment surface: admins plus sklad-admin.
pub async fn require_sklad(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![UserRole::SuperAdmin, UserRole::Admin, UserRole::SkladAdmin],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Per-operation extractor: SuperAdmin only.
///
/// ```rust,ignore
/// pub async fn delete_user(
///     _gate: RequireSuperAdmin,
///     State(state): State<AppState>,
/// ) -> Result<Json<MessageResponse>, AppError> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, &[UserRole::SuperAdmin])?;
        Ok(RequireSuperAdmin(auth_user))
    }
}

/// Per-operation extractor: SuperAdmin or Admin.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, &[UserRole::SuperAdmin, UserRole::Admin])?;
        Ok(RequireAdmin(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::model::Claims;
    use axum::http::StatusCode;

    fn auth_user_with_role(role: Option<&str>) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            phone: "998901234567".to_string(),
            role: role.map(|r| r.to_string()),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_empty_required_set_admits_any_authenticated() {
        let auth_user = auth_user_with_role(Some("operator"));
        assert!(check_any_role(&auth_user, &[]).is_ok());

        // Even a claim with no role passes an empty requirement.
        let no_role = auth_user_with_role(None);
        assert!(check_any_role(&no_role, &[]).is_ok());
    }

    #[test]
    fn test_member_role_is_admitted() {
        let auth_user = auth_user_with_role(Some("admin"));
        assert!(check_any_role(&auth_user, &[UserRole::SuperAdmin, UserRole::Admin]).is_ok());
    }

    #[test]
    fn test_non_member_role_is_forbidden() {
        let auth_user = auth_user_with_role(Some("operator"));
        let err = check_any_role(&auth_user, &[UserRole::SuperAdmin, UserRole::Admin]).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_role_claim_is_unauthorized_not_forbidden() {
        let auth_user = auth_user_with_role(None);
        let err = check_any_role(&auth_user, &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_unknown_role_normalizes_before_membership_test() {
        // Garbled role normalizes to the default role, so it is admitted
        // exactly where the default role is.
        let auth_user = auth_user_with_role(Some("garbled-nonsense"));
        assert!(check_any_role(&auth_user, &[UserRole::DEFAULT]).is_ok());
        let err = check_any_role(&auth_user, &[UserRole::SuperAdmin]).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_admission_property_over_all_roles() {
        // For all roles R and sets S: admitted iff S empty or R in S.
        for role in UserRole::ALL {
            let auth_user = auth_user_with_role(Some(role.as_slug()));
            for required in UserRole::ALL {
                let result = check_any_role(&auth_user, &[required]);
                assert_eq!(result.is_ok(), role == required);
            }
        }
    }
}
