use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::User;

/// JWT claims attached to every authenticated request.
///
/// `role` is optional on the wire: a token minted without a role claim is
/// treated as a data-integrity problem by the authorization gate
/// (Unauthorized), which is distinct from a plain role mismatch
/// (Forbidden).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub phone: String,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 9))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Extends the panel session cookies to 30 days.
    #[serde(default)]
    pub remember: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_role_defaults_to_none() {
        let json = r#"{"sub":"abc","phone":"998901234567","exp":1,"iat":0}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_login_request_remember_defaults_false() {
        let json = r#"{"phone":"998901234567","password":"secret"}"#;
        let req: LoginRequest = serde_json::from_str(json).unwrap();
        assert!(!req.remember);
    }
}
