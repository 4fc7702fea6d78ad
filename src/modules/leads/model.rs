use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::serde::deserialize_optional_uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Accepted,
    Sending,
    Cancelled,
    Hold,
}

/// A prospective buyer captured from a flow landing page. Created
/// anonymously; worked by the operator team.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Lead {
    pub id: Uuid,
    pub flow_id: Option<Uuid>,
    pub product_id: Uuid,
    pub name: String,
    pub phone: String,
    pub status: LeadStatus,
    pub operator_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Public capture payload, keyed by flow slug.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateLeadDto {
    #[validate(length(min = 1))]
    pub flow_slug: String,
    #[validate(length(min = 1, max = 120, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 9, message = "Phone number is too short"))]
    pub phone: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct AcceptLeadDto {
    #[validate(range(min = 1, max = 1000))]
    pub quantity: i32,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct SetLeadStatusDto {
    pub status: LeadStatus,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct AssignOperatorDto {
    pub operator_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeadFilterParams {
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub operator_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub flow_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedLeadsResponse {
    pub data: Vec<Lead>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_lead_status_serde_slugs() {
        assert_eq!(
            serde_json::to_string(&LeadStatus::New).unwrap(),
            r#""new""#
        );
        let status: LeadStatus = serde_json::from_str(r#""hold""#).unwrap();
        assert_eq!(status, LeadStatus::Hold);
    }

    #[test]
    fn test_create_lead_dto_validation() {
        let dto = CreateLeadDto {
            flow_slug: "yozgi-aksiya-1a2b3c4d".to_string(),
            name: "Aziza".to_string(),
            phone: "998901234567".to_string(),
        };
        assert!(dto.validate().is_ok());

        let dto = CreateLeadDto {
            phone: "12345".to_string(),
            ..dto
        };
        assert!(dto.validate().is_err());
    }
}
