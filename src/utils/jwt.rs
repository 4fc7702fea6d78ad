use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

pub fn create_access_token(
    user_id: Uuid,
    phone: &str,
    role: &UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    mint_token(user_id, phone, role, jwt_config.access_token_expiry, jwt_config)
}

pub fn create_refresh_token(
    user_id: Uuid,
    phone: &str,
    role: &UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    mint_token(user_id, phone, role, jwt_config.refresh_token_expiry, jwt_config)
}

fn mint_token(
    user_id: Uuid,
    phone: &str,
    role: &UserRole,
    expiry_secs: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = now + expiry_secs;

    let claims = Claims {
        sub: user_id.to_string(),
        phone: phone.to_string(),
        role: Some(role.as_slug().to_string()),
        exp: exp as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = test_jwt_config();
        let user_id = Uuid::new_v4();
        let token =
            create_access_token(user_id, "998901234567", &UserRole::SkladAdmin, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.phone, "998901234567");
        assert_eq!(claims.role.as_deref(), Some("skladadmin"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // A config with a negative expiry mints a token whose exp is an
        // hour in the past, well outside the default validation leeway.
        let config = JwtConfig {
            access_token_expiry: -3600,
            ..test_jwt_config()
        };
        let token =
            create_access_token(Uuid::new_v4(), "998901234567", &UserRole::Operator, &config)
                .unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let config = test_jwt_config();
        let token =
            create_access_token(Uuid::new_v4(), "998901234567", &UserRole::Admin, &config).unwrap();

        let other = JwtConfig {
            secret: "a_different_secret_entirely".to_string(),
            ..config
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
