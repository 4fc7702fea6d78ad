use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::products::model::{
    CreateProductDto, PaginatedProductsResponse, Product, ProductFilterParams, UpdateProductDto,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, payment, stock, is_active, created_at, updated_at";

pub struct ProductService;

impl ProductService {
    pub async fn create(db: &PgPool, dto: CreateProductDto) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, payment, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.payment)
        .bind(dto.stock)
        .fetch_one(db)
        .await
        .context("Failed to insert product")
        .map_err(AppError::database)
    }

    pub async fn list(
        db: &PgPool,
        params: &ProductFilterParams,
    ) -> Result<PaginatedProductsResponse, AppError> {
        let name_pattern = params.name.as_ref().map(|n| format!("%{n}%"));

        let data = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(&name_pattern)
        .bind(params.is_active)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch products")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            "#,
        )
        .bind(&name_pattern)
        .bind(params.is_active)
        .fetch_one(db)
        .await
        .context("Failed to count products")
        .map_err(AppError::database)?;

        Ok(PaginatedProductsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch product")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Product with id {id} not found")))
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateProductDto,
    ) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                payment = COALESCE($5, payment),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.payment)
        .bind(dto.is_active)
        .fetch_optional(db)
        .await
        .context("Failed to update product")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Product with id {id} not found")))
    }

    /// Relative stock adjustment; never lets the count go negative.
    pub async fn adjust_stock(db: &PgPool, id: Uuid, delta: i32) -> Result<Product, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch stock")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Product with id {id} not found")))?;

        if stock + delta < 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Stock cannot go negative"
            )));
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET stock = stock + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(delta)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to adjust stock")
        .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(product)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete product")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Product with id {id} not found"
            )));
        }

        Ok(())
    }
}
