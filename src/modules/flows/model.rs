use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::serde::deserialize_optional_uuid;

/// A targetolog's traffic link for one product. The slug is the public
/// handle leads and visits come in through.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Flow {
    pub id: Uuid,
    pub targetolog_id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub slug: String,
    pub visits: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateFlowDto {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 120, message = "Name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FlowFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub targetolog_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub product_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedFlowsResponse {
    pub data: Vec<Flow>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitResponse {
    pub slug: String,
    pub visits: i64,
}

/// URL-safe slug from a flow name plus a uuid-derived suffix for
/// uniqueness. Non-alphanumeric runs collapse to single hyphens.
pub fn make_slug(name: &str, id: Uuid) -> String {
    let mut base = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            base.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            base.push('-');
            last_hyphen = true;
        }
    }
    let base = base.trim_matches('-');
    let suffix = &id.simple().to_string()[..8];
    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_slug_collapses_separators() {
        let id = Uuid::nil();
        let slug = make_slug("Yozgi   aksiya! #1", id);
        assert_eq!(slug, "yozgi-aksiya-1-00000000");
    }

    #[test]
    fn test_make_slug_empty_name_falls_back_to_suffix() {
        let id = Uuid::nil();
        assert_eq!(make_slug("***", id), "00000000");
    }

    #[test]
    fn test_make_slug_unique_per_id() {
        let a = make_slug("oqim", Uuid::new_v4());
        let b = make_slug("oqim", Uuid::new_v4());
        assert_ne!(a, b);
    }
}
