use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::serde::deserialize_optional_uuid;

/// Direction of a balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// A balance movement on a user account. The user's stored balance is
/// adjusted in the same database transaction that inserts the row.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Amount in so'm, always positive; direction is `kind`.
    pub amount: i64,
    pub kind: TransactionKind,
    pub reason: String,
    pub note: Option<String>,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTransactionDto {
    pub user_id: Uuid,
    #[validate(range(min = 1))]
    pub amount: i64,
    pub kind: TransactionKind,
    #[validate(length(min = 1))]
    pub reason: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransactionFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub user_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedTransactionsResponse {
    pub data: Vec<Transaction>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceResponse {
    pub user_id: Uuid,
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_kind_serde_slugs() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Credit).unwrap(),
            r#""credit""#
        );
        let kind: TransactionKind = serde_json::from_str(r#""debit""#).unwrap();
        assert_eq!(kind, TransactionKind::Debit);
    }

    #[test]
    fn test_create_transaction_dto_rejects_non_positive_amount() {
        let dto = CreateTransactionDto {
            user_id: Uuid::new_v4(),
            amount: 0,
            kind: TransactionKind::Credit,
            reason: "bonus".to_string(),
            note: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateTransactionDto { amount: 50_000, ..dto };
        assert!(dto.validate().is_ok());
    }
}
