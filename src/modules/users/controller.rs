use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireSuperAdmin;
use crate::modules::activity::model::NewActivity;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::users::model::{
    ChangePasswordDto, CreateUserDto, PaginatedUsersResponse, UpdateProfileDto, UpdateUserDto,
    User, UserFilterParams,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::create_user(&state.db, dto).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "users:create")
            .with_meta(json!({ "created_user_id": user.id }))
            .with_request_context(&headers),
    );

    Ok(Json(user))
}

/// List users with filters and pagination
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let (data, meta) = UserService::list_users(&state.db, &params).await?;
    Ok(Json(PaginatedUsersResponse { data, meta }))
}

/// Get one user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Update a user (name, phone, role)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "users:update")
            .with_meta(json!({ "target_user_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(user))
}

/// Delete a user. Operation-level gate: SuperAdmin only, stricter than
/// the admin group layer on the rest of this router.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, gate, headers))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireSuperAdmin(gate): RequireSuperAdmin,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(&state.db, id).await?;

    state.activity.emit(
        NewActivity::new(gate.user_id()?, "users:delete")
            .with_meta(json!({ "target_user_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}

/// Block a user account
#[utoipa::path(
    post,
    path = "/api/users/{id}/block",
    responses(
        (status = 200, description = "Blocked user", body = User),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, headers))]
pub async fn block_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = UserService::set_blocked(&state.db, id, true).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "users:block")
            .with_meta(json!({ "target_user_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(user))
}

/// Unblock a user account
#[utoipa::path(
    post,
    path = "/api/users/{id}/unblock",
    responses(
        (status = 200, description = "Unblocked user", body = User),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, headers))]
pub async fn unblock_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = UserService::set_blocked(&state.db, id, false).await?;

    state.activity.emit(
        NewActivity::new(auth_user.user_id()?, "users:unblock")
            .with_meta(json!({ "target_user_id": id }))
            .with_request_context(&headers),
    );

    Ok(Json(user))
}

/// Update the caller's own profile
#[utoipa::path(
    put,
    path = "/api/users/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user = UserService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(user))
}

/// Change the caller's own password
#[utoipa::path(
    post,
    path = "/api/users/profile/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Wrong current password", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, auth_user, headers, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    UserService::change_password(&state.db, user_id, dto).await?;

    state
        .activity
        .emit(NewActivity::new(user_id, "users:change-password").with_request_context(&headers));

    Ok(Json(MessageResponse {
        message: "Password changed".to_string(),
    }))
}
