use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::flows::model::{
    CreateFlowDto, Flow, FlowFilterParams, PaginatedFlowsResponse, make_slug,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const FLOW_COLUMNS: &str =
    "id, targetolog_id, product_id, name, slug, visits, created_at, updated_at";

pub struct FlowService;

impl FlowService {
    pub async fn create(
        db: &PgPool,
        targetolog_id: Uuid,
        dto: CreateFlowDto,
    ) -> Result<Flow, AppError> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND is_active)",
        )
        .bind(dto.product_id)
        .fetch_one(db)
        .await
        .context("Failed to check product")
        .map_err(AppError::database)?;

        if !product_exists {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Product does not exist or is inactive"
            )));
        }

        let id = Uuid::new_v4();
        let slug = make_slug(&dto.name, id);

        sqlx::query_as::<_, Flow>(&format!(
            r#"
            INSERT INTO flows (id, targetolog_id, product_id, name, slug)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {FLOW_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(targetolog_id)
        .bind(dto.product_id)
        .bind(&dto.name)
        .bind(&slug)
        .fetch_one(db)
        .await
        .context("Failed to insert flow")
        .map_err(AppError::database)
    }

    pub async fn list(
        db: &PgPool,
        params: &FlowFilterParams,
    ) -> Result<PaginatedFlowsResponse, AppError> {
        let data = sqlx::query_as::<_, Flow>(&format!(
            r#"
            SELECT {FLOW_COLUMNS}
            FROM flows
            WHERE ($1::uuid IS NULL OR targetolog_id = $1)
              AND ($2::uuid IS NULL OR product_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(params.targetolog_id)
        .bind(params.product_id)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch flows")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM flows
            WHERE ($1::uuid IS NULL OR targetolog_id = $1)
              AND ($2::uuid IS NULL OR product_id = $2)
            "#,
        )
        .bind(params.targetolog_id)
        .bind(params.product_id)
        .fetch_one(db)
        .await
        .context("Failed to count flows")
        .map_err(AppError::database)?;

        Ok(PaginatedFlowsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<Flow, AppError> {
        sqlx::query_as::<_, Flow>(&format!("SELECT {FLOW_COLUMNS} FROM flows WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch flow")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Flow with id {id} not found")))
    }

    pub async fn get_by_slug(db: &PgPool, slug: &str) -> Result<Flow, AppError> {
        sqlx::query_as::<_, Flow>(&format!("SELECT {FLOW_COLUMNS} FROM flows WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(db)
            .await
            .context("Failed to fetch flow")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Flow '{slug}' not found")))
    }

    /// Public visit counter bump. Returns the new count.
    pub async fn record_visit(db: &PgPool, slug: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE flows
            SET visits = visits + 1, updated_at = NOW()
            WHERE slug = $1
            RETURNING visits
            "#,
        )
        .bind(slug)
        .fetch_optional(db)
        .await
        .context("Failed to record visit")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Flow '{slug}' not found")))
    }
}
