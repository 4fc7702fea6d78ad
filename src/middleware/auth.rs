use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer credential and provides the
/// authenticated caller's claims.
///
/// The credential is read from the `Authorization: Bearer` header, with a
/// `?token=` query parameter fallback for surfaces that cannot set
/// headers. Both go through the same verification path.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn phone(&self) -> &str {
        &self.0.phone
    }

    /// The raw role slug from the claims, if any.
    pub fn role_slug(&self) -> Option<&str> {
        self.0.role.as_deref()
    }

    /// The caller's role, normalized fail-open for unknown slugs.
    /// Returns `None` only when the claim carries no role at all.
    pub fn role(&self) -> Option<UserRole> {
        self.role_slug().map(UserRole::normalize)
    }
}

/// Locate a bearer token in the request: header first, then the
/// `?token=` query parameter. Absence is not an error here; the
/// authentication gate decides what missing state means.
pub fn extract_bearer_token(parts: &Parts) -> Option<String> {
    if let Some(header_value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        return header_value
            .strip_prefix("Bearer ")
            .map(|token| token.to_string());
    }

    parts.uri.query().and_then(|query| {
        query.split('&').find_map(|pair| {
            pair.strip_prefix("token=")
                .filter(|token| !token.is_empty())
                .map(|token| token.to_string())
        })
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("Missing authorization credential"))?;

        let claims = verify_token(&token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(uri: &str, auth_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extract_from_header() {
        let parts = parts_for("/api/users", Some("Bearer abc123"));
        assert_eq!(extract_bearer_token(&parts), Some("abc123".to_string()));
    }

    #[test]
    fn test_header_without_bearer_prefix_is_none() {
        let parts = parts_for("/api/users", Some("Basic abc123"));
        assert_eq!(extract_bearer_token(&parts), None);
    }

    #[test]
    fn test_query_fallback_when_header_absent() {
        let parts = parts_for("/api/users?foo=1&token=xyz", None);
        assert_eq!(extract_bearer_token(&parts), Some("xyz".to_string()));
    }

    #[test]
    fn test_header_wins_over_query() {
        let parts = parts_for("/api/users?token=from-query", Some("Bearer from-header"));
        assert_eq!(
            extract_bearer_token(&parts),
            Some("from-header".to_string())
        );
    }

    #[test]
    fn test_empty_query_token_is_none() {
        let parts = parts_for("/api/users?token=", None);
        assert_eq!(extract_bearer_token(&parts), None);
    }

    #[test]
    fn test_role_helpers() {
        let auth_user = AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            phone: "998901234567".to_string(),
            role: Some("operator".to_string()),
            exp: 9999999999,
            iat: 1234567890,
        });
        assert_eq!(auth_user.role(), Some(UserRole::Operator));

        let no_role = AuthUser(Claims {
            role: None,
            ..auth_user.0.clone()
        });
        assert_eq!(no_role.role(), None);

        let garbled = AuthUser(Claims {
            role: Some("???".to_string()),
            ..auth_user.0
        });
        assert_eq!(garbled.role(), Some(UserRole::DEFAULT));
    }
}
