use axum::{Json, extract::State, http::HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use serde_json::json;
use time::Duration;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::middleware::route_access::{
    ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, ROLE_COOKIE, USER_ID_COOKIE,
};
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, MessageResponse, RefreshRequest, RefreshResponse,
};
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::User;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Session cookies live for 30 days when "remember me" is requested,
/// otherwise they are session-scoped.
const REMEMBER_MAX_AGE_DAYS: i64 = 30;

fn session_cookie(name: &'static str, value: String, remember: bool) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value)).path("/").same_site(SameSite::Lax);
    if remember {
        builder = builder.max_age(Duration::days(REMEMBER_MAX_AGE_DAYS));
    }
    builder.build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}

/// Log in with phone and password.
///
/// On success the response body carries the token pair, and the four
/// panel session cookies (access token, refresh token, role slug, user
/// id) are set for the dashboard surface.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Account blocked", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip(state, jar, dto, headers))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let remember = dto.remember;
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;

    state.activity.emit(
        NewActivity::new(response.user.id, "login")
            .with_meta(json!({ "remember": remember }))
            .with_request_context(&headers),
    );

    let jar = jar
        .add(session_cookie(
            ACCESS_TOKEN_COOKIE,
            response.access_token.clone(),
            remember,
        ))
        .add(session_cookie(
            REFRESH_TOKEN_COOKIE,
            response.refresh_token.clone(),
            remember,
        ))
        .add(session_cookie(
            ROLE_COOKIE,
            response.user.role.as_slug().to_string(),
            remember,
        ))
        .add(session_cookie(
            USER_ID_COOKIE,
            response.user.id.to_string(),
            remember,
        ));

    Ok((jar, Json(response)))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response = AuthService::refresh_access_token(dto, &state.jwt_config)?;
    Ok(Json(response))
}

/// Log out: clears the panel session cookies.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(skip(state, jar, headers, auth_user))]
pub async fn logout_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let user_id = auth_user.user_id()?;
    state
        .activity
        .emit(NewActivity::new(user_id, "logout").with_request_context(&headers));

    let jar = jar
        .remove(removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE))
        .remove(removal_cookie(ROLE_COOKIE))
        .remove(removal_cookie(USER_ID_COOKIE));

    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

/// The authenticated caller's own record.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(skip(state, auth_user))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user = AuthService::get_user(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}
