use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::flows::service::FlowService;
use crate::modules::leads::model::{
    CreateLeadDto, Lead, LeadFilterParams, LeadStatus, PaginatedLeadsResponse,
};
use crate::modules::orders::model::Order;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const LEAD_COLUMNS: &str =
    "id, flow_id, product_id, name, phone, status, operator_id, created_at, updated_at";

pub struct LeadService;

impl LeadService {
    /// Anonymous capture through a flow slug.
    pub async fn create(db: &PgPool, dto: CreateLeadDto) -> Result<Lead, AppError> {
        let flow = FlowService::get_by_slug(db, &dto.flow_slug).await?;

        sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (flow_id, product_id, name, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(flow.id)
        .bind(flow.product_id)
        .bind(&dto.name)
        .bind(&dto.phone)
        .fetch_one(db)
        .await
        .context("Failed to insert lead")
        .map_err(AppError::database)
    }

    pub async fn list(
        db: &PgPool,
        params: &LeadFilterParams,
    ) -> Result<PaginatedLeadsResponse, AppError> {
        let data = sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM leads
            WHERE ($1::lead_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR operator_id = $2)
              AND ($3::uuid IS NULL OR flow_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(params.status)
        .bind(params.operator_id)
        .bind(params.flow_id)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch leads")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM leads
            WHERE ($1::lead_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR operator_id = $2)
              AND ($3::uuid IS NULL OR flow_id = $3)
            "#,
        )
        .bind(params.status)
        .bind(params.operator_id)
        .bind(params.flow_id)
        .fetch_one(db)
        .await
        .context("Failed to count leads")
        .map_err(AppError::database)?;

        Ok(PaginatedLeadsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch lead")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lead with id {id} not found")))
    }

    /// Accept a new lead: marks it accepted, takes ownership, reserves
    /// stock and opens the order, all in one database transaction.
    pub async fn accept(
        db: &PgPool,
        id: Uuid,
        operator_id: Uuid,
        quantity: i32,
    ) -> Result<(Lead, Order), AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch lead")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lead with id {id} not found")))?;

        if lead.status != LeadStatus::New && lead.status != LeadStatus::Hold {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Lead is not open for acceptance"
            )));
        }

        let (price, stock) = sqlx::query_as::<_, (i64, i32)>(
            "SELECT price, stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(lead.product_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to fetch product")
        .map_err(AppError::database)?;

        if stock < quantity {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Not enough stock for this order"
            )));
        }

        sqlx::query("UPDATE products SET stock = stock - $2, updated_at = NOW() WHERE id = $1")
            .bind(lead.product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await
            .context("Failed to reserve stock")
            .map_err(AppError::database)?;

        let updated = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET status = 'accepted', operator_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(operator_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update lead")
        .map_err(AppError::database)?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (lead_id, product_id, flow_id, quantity, total, handled_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, lead_id, product_id, flow_id, quantity, total, status,
                      handled_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(lead.product_id)
        .bind(lead.flow_id)
        .bind(quantity)
        .bind(price * quantity as i64)
        .bind(operator_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to open order")
        .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok((updated, order))
    }

    pub async fn set_status(
        db: &PgPool,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<Lead, AppError> {
        if status == LeadStatus::Accepted {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Use the accept operation to accept a lead"
            )));
        }

        sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(db)
        .await
        .context("Failed to update lead status")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lead with id {id} not found")))
    }

    pub async fn assign_operator(
        db: &PgPool,
        id: Uuid,
        operator_id: Uuid,
    ) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET operator_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(operator_id)
        .fetch_optional(db)
        .await
        .context("Failed to assign operator")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Lead with id {id} not found")))
    }
}
