//! Activity log models.
//!
//! Activity records are append-only: they are created on authenticated
//! actions, never mutated or deleted, and a failed write never aborts the
//! operation that triggered it.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::serde::deserialize_optional_uuid;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub ip: Option<String>,
    pub device: Option<String>,
    #[schema(value_type = Object)]
    pub meta: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A pending activity record, emitted by handlers and written by the
/// background logger.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub action: String,
    pub ip: Option<String>,
    pub device: Option<String>,
    pub meta: Option<serde_json::Value>,
}

impl NewActivity {
    pub fn new(user_id: Uuid, action: impl Into<String>) -> Self {
        Self {
            user_id,
            action: action.into(),
            ip: None,
            device: None,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_request_context(mut self, headers: &HeaderMap) -> Self {
        self.ip = client_ip(headers);
        self.device = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        self
    }
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        // May contain a chain of proxies; the first entry is the client.
        if let Some(first) = forwarded.split(',').next() {
            return Some(first.trim().to_string());
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Query parameters for browsing the activity log.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ActivityFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedActivityResponse {
    pub data: Vec<ActivityLog>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));

        let activity =
            NewActivity::new(Uuid::new_v4(), "login").with_request_context(&headers);
        assert_eq!(activity.ip.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_device_from_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("Mozilla/5.0"));

        let activity =
            NewActivity::new(Uuid::new_v4(), "login").with_request_context(&headers);
        assert_eq!(activity.device.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_missing_headers_leave_fields_empty() {
        let headers = HeaderMap::new();
        let activity =
            NewActivity::new(Uuid::new_v4(), "logout").with_request_context(&headers);
        assert!(activity.ip.is_none());
        assert!(activity.device.is_none());
    }
}
