use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction as SqlxTx};
use uuid::Uuid;

use crate::modules::orders::model::{
    Order, OrderFilterParams, OrderStatus, PaginatedOrdersResponse,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const ORDER_COLUMNS: &str =
    "id, lead_id, product_id, flow_id, quantity, total, status, handled_by, created_at, updated_at";

pub struct OrderService;

impl OrderService {
    pub async fn list(
        db: &PgPool,
        params: &OrderFilterParams,
    ) -> Result<PaginatedOrdersResponse, AppError> {
        let data = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR flow_id = $2)
              AND ($3::uuid IS NULL OR product_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(params.status)
        .bind(params.flow_id)
        .bind(params.product_id)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch orders")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM orders
            WHERE ($1::order_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR flow_id = $2)
              AND ($3::uuid IS NULL OR product_id = $3)
            "#,
        )
        .bind(params.status)
        .bind(params.flow_id)
        .bind(params.product_id)
        .fetch_one(db)
        .await
        .context("Failed to count orders")
        .map_err(AppError::database)?;

        Ok(PaginatedOrdersResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<Order, AppError> {
        sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch order")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Order with id {id} not found")))
    }

    /// Advance the fulfilment status. Delivery credits the flow's
    /// targetolog with the product reward; a return undoes that credit
    /// if it happened and releases the stock. All in one transaction.
    pub async fn advance(
        db: &PgPool,
        id: Uuid,
        next: OrderStatus,
        handled_by: Uuid,
    ) -> Result<Order, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch order")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Order with id {id} not found")))?;

        if !order.status.can_advance_to(next) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Order cannot move from {:?} to {:?}",
                order.status,
                next
            )));
        }

        match next {
            OrderStatus::Delivered => {
                Self::credit_reward(&mut tx, &order, handled_by).await?;
            }
            OrderStatus::Returned => {
                if order.status == OrderStatus::Delivered {
                    Self::revoke_reward(&mut tx, &order, handled_by).await?;
                }
                sqlx::query(
                    "UPDATE products SET stock = stock + $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(order.product_id)
                .bind(order.quantity)
                .execute(&mut *tx)
                .await
                .context("Failed to release stock")
                .map_err(AppError::database)?;
            }
            _ => {}
        }

        let updated = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = $2, handled_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(next)
        .bind(handled_by)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update order")
        .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(updated)
    }

    async fn credit_reward(
        tx: &mut SqlxTx<'_, Postgres>,
        order: &Order,
        handled_by: Uuid,
    ) -> Result<(), AppError> {
        let Some(flow_id) = order.flow_id else {
            return Ok(());
        };

        let (targetolog_id, payment) = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT f.targetolog_id, p.payment
            FROM flows f
            JOIN products p ON p.id = f.product_id
            WHERE f.id = $1
            "#,
        )
        .bind(flow_id)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to resolve reward")
        .map_err(AppError::database)?;

        if payment == 0 {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (user_id, amount, kind, reason, note, created_by)
            VALUES ($1, $2, 'credit', 'order delivered', $3, $4)
            "#,
        )
        .bind(targetolog_id)
        .bind(payment)
        .bind(format!("order {}", order.id))
        .bind(handled_by)
        .execute(&mut **tx)
        .await
        .context("Failed to insert reward credit")
        .map_err(AppError::database)?;

        sqlx::query("UPDATE users SET balance = balance + $2, updated_at = NOW() WHERE id = $1")
            .bind(targetolog_id)
            .bind(payment)
            .execute(&mut **tx)
            .await
            .context("Failed to credit balance")
            .map_err(AppError::database)?;

        Ok(())
    }

    async fn revoke_reward(
        tx: &mut SqlxTx<'_, Postgres>,
        order: &Order,
        handled_by: Uuid,
    ) -> Result<(), AppError> {
        let Some(flow_id) = order.flow_id else {
            return Ok(());
        };

        let (targetolog_id, payment) = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT f.targetolog_id, p.payment
            FROM flows f
            JOIN products p ON p.id = f.product_id
            WHERE f.id = $1
            "#,
        )
        .bind(flow_id)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to resolve reward")
        .map_err(AppError::database)?;

        if payment == 0 {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (user_id, amount, kind, reason, note, created_by)
            VALUES ($1, $2, 'debit', 'order returned', $3, $4)
            "#,
        )
        .bind(targetolog_id)
        .bind(payment)
        .bind(format!("order {}", order.id))
        .bind(handled_by)
        .execute(&mut **tx)
        .await
        .context("Failed to insert reward reversal")
        .map_err(AppError::database)?;

        sqlx::query("UPDATE users SET balance = balance - $2, updated_at = NOW() WHERE id = $1")
            .bind(targetolog_id)
            .bind(payment)
            .execute(&mut **tx)
            .await
            .context("Failed to debit balance")
            .map_err(AppError::database)?;

        Ok(())
    }
}
