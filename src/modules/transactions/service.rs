use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::transactions::model::{
    CreateTransactionDto, PaginatedTransactionsResponse, Transaction, TransactionFilterParams,
    TransactionKind,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const TX_COLUMNS: &str = "id, user_id, amount, kind, reason, note, created_by, created_at";

pub struct TransactionService;

impl TransactionService {
    /// Insert a movement and apply the balance delta atomically. A debit
    /// that would take the balance negative is rejected.
    pub async fn create(
        db: &PgPool,
        dto: CreateTransactionDto,
        created_by: Uuid,
    ) -> Result<Transaction, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let delta = match dto.kind {
            TransactionKind::Credit => dto.amount,
            TransactionKind::Debit => -dto.amount,
        };

        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT balance FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(dto.user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock user balance")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("User with id {} not found", dto.user_id))
        })?;

        if balance + delta < 0 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Insufficient balance"
            )));
        }

        let record = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions (user_id, amount, kind, reason, note, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TX_COLUMNS}
            "#
        ))
        .bind(dto.user_id)
        .bind(dto.amount)
        .bind(dto.kind)
        .bind(&dto.reason)
        .bind(&dto.note)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert transaction")
        .map_err(AppError::database)?;

        sqlx::query("UPDATE users SET balance = balance + $2, updated_at = NOW() WHERE id = $1")
            .bind(dto.user_id)
            .bind(delta)
            .execute(&mut *tx)
            .await
            .context("Failed to apply balance delta")
            .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(record)
    }

    pub async fn list(
        db: &PgPool,
        params: &TransactionFilterParams,
    ) -> Result<PaginatedTransactionsResponse, AppError> {
        let data = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TX_COLUMNS}
            FROM transactions
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::transaction_kind IS NULL OR kind = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(params.user_id)
        .bind(params.kind)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch transactions")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::transaction_kind IS NULL OR kind = $2)
            "#,
        )
        .bind(params.user_id)
        .bind(params.kind)
        .fetch_one(db)
        .await
        .context("Failed to count transactions")
        .map_err(AppError::database)?;

        Ok(PaginatedTransactionsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    pub async fn balance_of(db: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT balance FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch balance")
            .map_err(AppError::database)?
            .ok_or_else(|| {
                AppError::not_found(anyhow::anyhow!("User with id {} not found", user_id))
            })
    }
}
