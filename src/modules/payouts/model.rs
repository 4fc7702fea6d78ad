use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::serde::deserialize_optional_uuid;

/// Lifecycle of a withdrawal request. Approval debits the requester's
/// balance; `Paid` only records that the money actually went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payout_status", rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Payout {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Requested amount in so'm.
    pub amount: i64,
    pub card_number: String,
    pub status: PayoutStatus,
    pub comment: Option<String>,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RequestPayoutDto {
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(length(min = 8, message = "Card number is too short"))]
    pub card_number: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RejectPayoutDto {
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PayoutFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub user_id: Option<Uuid>,
    pub status: Option<PayoutStatus>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedPayoutsResponse {
    pub data: Vec<Payout>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_serde_slugs() {
        assert_eq!(
            serde_json::to_string(&PayoutStatus::Pending).unwrap(),
            r#""pending""#
        );
        let status: PayoutStatus = serde_json::from_str(r#""paid""#).unwrap();
        assert_eq!(status, PayoutStatus::Paid);
    }

    #[test]
    fn test_request_payout_dto_validation() {
        let dto = RequestPayoutDto {
            amount: 0,
            card_number: "8600123412341234".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = RequestPayoutDto { amount: 100_000, ..dto };
        assert!(dto.validate().is_ok());

        let dto = RequestPayoutDto {
            amount: 100_000,
            card_number: "8600".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
