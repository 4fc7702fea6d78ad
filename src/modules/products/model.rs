use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Sale price in so'm.
    pub price: i64,
    /// Reward credited to the flow's targetolog per delivered order.
    pub payment: i64,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    pub payment: i64,
    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    pub payment: Option<i64>,
    pub is_active: Option<bool>,
}

/// Relative stock adjustment; negative for write-offs.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct AdjustStockDto {
    #[validate(range(min = -100_000, max = 100_000))]
    pub delta: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductFilterParams {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::utils::serde::deserialize_optional_bool")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedProductsResponse {
    pub data: Vec<Product>,
    pub meta: crate::utils::pagination::PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_product_dto_validation() {
        let dto = CreateProductDto {
            name: "".to_string(),
            description: None,
            price: 120_000,
            payment: 15_000,
            stock: 40,
        };
        assert!(dto.validate().is_err());

        let dto = CreateProductDto {
            name: "Choy to'plami".to_string(),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let dto = CreateProductDto {
            name: "Atir".to_string(),
            description: None,
            price: -1,
            payment: 0,
            stock: 0,
        };
        assert!(dto.validate().is_err());
    }
}
