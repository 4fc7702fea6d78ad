use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::serde::deserialize_optional_uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    Packed,
    Shipped,
    Delivered,
    Returned,
}

impl OrderStatus {
    /// Forward transitions of the fulfilment lifecycle. Delivery is the
    /// compensation event; a return releases the reserved stock.
    pub fn can_advance_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Packed, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (OrderStatus::Shipped, OrderStatus::Returned)
                | (OrderStatus::Delivered, OrderStatus::Returned)
        )
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub product_id: Uuid,
    pub flow_id: Option<Uuid>,
    pub quantity: i32,
    /// Sale total in so'm at acceptance time.
    pub total: i64,
    pub status: OrderStatus,
    pub handled_by: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct AdvanceOrderDto {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderFilterParams {
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub flow_id: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub product_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedOrdersResponse {
    pub data: Vec<Order>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde_slugs() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Packed).unwrap(),
            r#""packed""#
        );
        let status: OrderStatus = serde_json::from_str(r#""returned""#).unwrap();
        assert_eq!(status, OrderStatus::Returned);
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert!(OrderStatus::Packed.can_advance_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_advance_to(OrderStatus::Delivered));
        assert!(OrderStatus::Shipped.can_advance_to(OrderStatus::Returned));
        assert!(OrderStatus::Delivered.can_advance_to(OrderStatus::Returned));

        assert!(!OrderStatus::Packed.can_advance_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_advance_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Returned.can_advance_to(OrderStatus::Packed));
        assert!(!OrderStatus::Packed.can_advance_to(OrderStatus::Packed));
    }
}
