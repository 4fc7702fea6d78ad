use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_token};
use crate::utils::password::verify_password;

use super::model::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            first_name: String,
            last_name: String,
            phone: String,
            role: UserRole,
            balance: i64,
            is_blocked: bool,
            password: String,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT id, first_name, last_name, phone, role, balance, is_blocked,
                   password, created_at, updated_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(&dto.phone)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by phone")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::unauthorized("Invalid phone or password"))?;

        let is_valid = verify_password(&dto.password, &user_with_password.password)?;
        if !is_valid {
            return Err(AppError::unauthorized("Invalid phone or password"));
        }

        if user_with_password.is_blocked {
            return Err(AppError::forbidden("Account is blocked"));
        }

        let access_token = create_access_token(
            user_with_password.id,
            &user_with_password.phone,
            &user_with_password.role,
            jwt_config,
        )?;
        let refresh_token = create_refresh_token(
            user_with_password.id,
            &user_with_password.phone,
            &user_with_password.role,
            jwt_config,
        )?;

        let user = User {
            id: user_with_password.id,
            first_name: user_with_password.first_name,
            last_name: user_with_password.last_name,
            phone: user_with_password.phone,
            role: user_with_password.role,
            balance: user_with_password.balance,
            is_blocked: user_with_password.is_blocked,
            created_at: user_with_password.created_at,
            updated_at: user_with_password.updated_at,
        };

        Ok(LoginResponse {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Exchange a valid refresh token for a fresh access token. The role
    /// is re-read from the refresh claims; a refresh token without role
    /// data cannot mint an access token.
    pub fn refresh_access_token(
        dto: RefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_token(&dto.refresh_token, jwt_config)?;

        let role_slug = claims
            .role
            .as_deref()
            .ok_or_else(|| AppError::unauthorized("Token carries no role claim"))?;
        let role = UserRole::normalize(role_slug);

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))?;

        let access_token = create_access_token(user_id, &claims.phone, &role, jwt_config)?;
        Ok(RefreshResponse { access_token })
    }

    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone, role, balance, is_blocked,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_refresh_round_trip() {
        let config = test_jwt_config();
        let user_id = Uuid::new_v4();
        let refresh_token =
            create_refresh_token(user_id, "998901234567", &UserRole::Operator, &config).unwrap();

        let response = AuthService::refresh_access_token(
            RefreshRequest { refresh_token },
            &config,
        )
        .unwrap();

        let claims = verify_token(&response.access_token, &config).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role.as_deref(), Some("operator"));
    }

    #[test]
    fn test_refresh_with_garbage_token_is_unauthorized() {
        let config = test_jwt_config();
        let err = AuthService::refresh_access_token(
            RefreshRequest {
                refresh_token: "not-a-token".to_string(),
            },
            &config,
        )
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }
}
