//! User data models and DTOs.
//!
//! This module contains the user entity, the closed [`UserRole`] set and
//! its canonical dashboard mapping, and the request/response DTOs for
//! user management.

use crate::utils::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The fixed, closed set of panel roles.
///
/// Every role maps one-to-one to a dashboard route segment via
/// [`UserRole::dashboard_segment`]. Unknown slugs coming from cookies or
/// stale tokens are normalized with [`UserRole::normalize`] rather than
/// rejected, so a garbled role value can never break panel routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    TargetAdmin,
    OperAdmin,
    SkladAdmin,
    Taminotchi,
    Targetolog,
    Operator,
}

impl UserRole {
    /// All roles, in privilege order. Kept in sync with the enum by the
    /// exhaustiveness checks below.
    pub const ALL: [UserRole; 8] = [
        UserRole::SuperAdmin,
        UserRole::Admin,
        UserRole::TargetAdmin,
        UserRole::OperAdmin,
        UserRole::SkladAdmin,
        UserRole::Taminotchi,
        UserRole::Targetolog,
        UserRole::Operator,
    ];

    /// Role new accounts fall back to when the stored slug is unknown.
    pub const DEFAULT: UserRole = UserRole::Targetolog;

    pub fn as_slug(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "superadmin",
            UserRole::Admin => "admin",
            UserRole::TargetAdmin => "targetadmin",
            UserRole::OperAdmin => "operadmin",
            UserRole::SkladAdmin => "skladadmin",
            UserRole::Taminotchi => "taminotchi",
            UserRole::Targetolog => "targetolog",
            UserRole::Operator => "operator",
        }
    }

    pub fn from_slug(slug: &str) -> Option<UserRole> {
        match slug {
            "superadmin" => Some(UserRole::SuperAdmin),
            "admin" => Some(UserRole::Admin),
            "targetadmin" => Some(UserRole::TargetAdmin),
            "operadmin" => Some(UserRole::OperAdmin),
            "skladadmin" => Some(UserRole::SkladAdmin),
            "taminotchi" => Some(UserRole::Taminotchi),
            "targetolog" => Some(UserRole::Targetolog),
            "operator" => Some(UserRole::Operator),
            _ => None,
        }
    }

    /// Fail-open normalization: unknown slugs become [`UserRole::DEFAULT`].
    pub fn normalize(slug: &str) -> UserRole {
        Self::from_slug(slug).unwrap_or(Self::DEFAULT)
    }

    /// The single dashboard segment this role always lands on.
    ///
    /// The match is exhaustive on purpose: adding a role without a
    /// segment is a compile error, not a runtime fallthrough.
    pub fn dashboard_segment(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "superadmin",
            UserRole::Admin => "admin",
            UserRole::TargetAdmin => "targetadmin",
            UserRole::OperAdmin => "operadmin",
            UserRole::SkladAdmin => "skladadmin",
            UserRole::Taminotchi => "taminotchi",
            UserRole::Targetolog => "targetolog",
            UserRole::Operator => "operator",
        }
    }

    pub fn dashboard_path(&self) -> String {
        format!("/dashboard/{}", self.dashboard_segment())
    }
}

/// A back-office user.
///
/// The password hash never leaves the service layer; this struct is the
/// response-safe shape.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: UserRole,
    /// Current balance in so'm.
    pub balance: i64,
    pub is_blocked: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 9))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Option<UserRole>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[validate(length(min = 9))]
    pub phone: Option<String>,
    pub role: Option<UserRole>,
}

/// Profile update for the caller's own record; role changes go through
/// the admin endpoint.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    #[serde(alias = "old_password")]
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// Query parameters for filtering users.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn test_slug_round_trip_all_roles() {
        for role in UserRole::ALL {
            assert_eq!(UserRole::from_slug(role.as_slug()), Some(role));
        }
    }

    #[test]
    fn test_dashboard_mapping_is_injective_and_total() {
        let segments: HashSet<&str> = UserRole::ALL
            .iter()
            .map(|r| r.dashboard_segment())
            .collect();
        assert_eq!(segments.len(), UserRole::ALL.len());
        for role in UserRole::ALL {
            assert!(!role.dashboard_segment().is_empty());
        }
    }

    #[test]
    fn test_normalize_unknown_slug_falls_back_to_default() {
        assert_eq!(UserRole::normalize("???garbled???"), UserRole::DEFAULT);
        assert_eq!(UserRole::normalize(""), UserRole::DEFAULT);
        assert_eq!(UserRole::normalize("superadmin"), UserRole::SuperAdmin);
    }

    #[test]
    fn test_role_serde_slugs() {
        let json = serde_json::to_string(&UserRole::SkladAdmin).unwrap();
        assert_eq!(json, r#""skladadmin""#);
        let role: UserRole = serde_json::from_str(r#""operadmin""#).unwrap();
        assert_eq!(role, UserRole::OperAdmin);
    }

    #[test]
    fn test_dashboard_path() {
        assert_eq!(UserRole::Operator.dashboard_path(), "/dashboard/operator");
        assert_eq!(
            UserRole::SuperAdmin.dashboard_path(),
            "/dashboard/superadmin"
        );
    }

    #[test]
    fn test_create_user_dto_validation() {
        let dto = CreateUserDto {
            first_name: "Aziz".to_string(),
            last_name: "Karimov".to_string(),
            phone: "998901234567".to_string(),
            password: "password123".to_string(),
            role: Some(UserRole::Operator),
        };
        assert!(dto.validate().is_ok());

        let dto_short_password = CreateUserDto {
            password: "short".to_string(),
            ..dto.clone()
        };
        assert!(dto_short_password.validate().is_err());

        let dto_short_phone = CreateUserDto {
            phone: "12345".to_string(),
            ..dto
        };
        assert!(dto_short_phone.validate().is_err());
    }

    #[test]
    fn test_change_password_dto_accepts_old_password_alias() {
        let json = r#"{"old_password":"current","new_password":"longenough1"}"#;
        let dto: ChangePasswordDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.current_password, "current");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_user_serialization_skips_nothing_sensitive() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Aziz".to_string(),
            last_name: "Karimov".to_string(),
            phone: "998901234567".to_string(),
            role: UserRole::Targetolog,
            balance: 125_000,
            is_blocked: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let serialized = serde_json::to_string(&user).unwrap();
        assert!(serialized.contains("998901234567"));
        assert!(serialized.contains(r#""role":"targetolog""#));
        assert!(!serialized.contains("password"));
    }
}
