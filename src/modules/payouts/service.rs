use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::payouts::model::{
    PaginatedPayoutsResponse, Payout, PayoutFilterParams, PayoutStatus, RequestPayoutDto,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const PAYOUT_COLUMNS: &str =
    "id, user_id, amount, card_number, status, comment, decided_by, decided_at, created_at";

pub struct PayoutService;

impl PayoutService {
    /// File a withdrawal request. The balance is only checked here as a
    /// courtesy; the authoritative check happens at approval time.
    pub async fn request(
        db: &PgPool,
        user_id: Uuid,
        dto: RequestPayoutDto,
    ) -> Result<Payout, AppError> {
        let balance = sqlx::query_scalar::<_, i64>("SELECT balance FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await
            .context("Failed to fetch balance")
            .map_err(AppError::database)?;

        if balance < dto.amount {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Requested amount exceeds balance"
            )));
        }

        sqlx::query_as::<_, Payout>(&format!(
            r#"
            INSERT INTO payouts (user_id, amount, card_number)
            VALUES ($1, $2, $3)
            RETURNING {PAYOUT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(dto.amount)
        .bind(&dto.card_number)
        .fetch_one(db)
        .await
        .context("Failed to insert payout")
        .map_err(AppError::database)
    }

    pub async fn list(
        db: &PgPool,
        params: &PayoutFilterParams,
    ) -> Result<PaginatedPayoutsResponse, AppError> {
        let data = sqlx::query_as::<_, Payout>(&format!(
            r#"
            SELECT {PAYOUT_COLUMNS}
            FROM payouts
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::payout_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(params.user_id)
        .bind(params.status)
        .bind(params.pagination.limit())
        .bind(params.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch payouts")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM payouts
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::payout_status IS NULL OR status = $2)
            "#,
        )
        .bind(params.user_id)
        .bind(params.status)
        .fetch_one(db)
        .await
        .context("Failed to count payouts")
        .map_err(AppError::database)?;

        Ok(PaginatedPayoutsResponse {
            data,
            meta: PaginationMeta::new(total, &params.pagination),
        })
    }

    /// Approve a pending payout: debits the requester's balance and
    /// writes the ledger row in one database transaction.
    pub async fn approve(db: &PgPool, id: Uuid, decided_by: Uuid) -> Result<Payout, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let payout = sqlx::query_as::<_, Payout>(&format!(
            "SELECT {PAYOUT_COLUMNS} FROM payouts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch payout")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Payout with id {id} not found")))?;

        if payout.status != PayoutStatus::Pending {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Payout is not pending"
            )));
        }

        let balance =
            sqlx::query_scalar::<_, i64>("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
                .bind(payout.user_id)
                .fetch_one(&mut *tx)
                .await
                .context("Failed to fetch balance")
                .map_err(AppError::database)?;

        if balance < payout.amount {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Insufficient balance"
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (user_id, amount, kind, reason, note, created_by)
            VALUES ($1, $2, 'debit', 'payout', $3, $4)
            "#,
        )
        .bind(payout.user_id)
        .bind(payout.amount)
        .bind(format!("payout {id}"))
        .bind(decided_by)
        .execute(&mut *tx)
        .await
        .context("Failed to insert payout debit")
        .map_err(AppError::database)?;

        sqlx::query("UPDATE users SET balance = balance - $2, updated_at = NOW() WHERE id = $1")
            .bind(payout.user_id)
            .bind(payout.amount)
            .execute(&mut *tx)
            .await
            .context("Failed to debit balance")
            .map_err(AppError::database)?;

        let updated = sqlx::query_as::<_, Payout>(&format!(
            r#"
            UPDATE payouts
            SET status = 'approved', decided_by = $2, decided_at = NOW()
            WHERE id = $1
            RETURNING {PAYOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(decided_by)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update payout status")
        .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(updated)
    }

    pub async fn reject(
        db: &PgPool,
        id: Uuid,
        decided_by: Uuid,
        comment: String,
    ) -> Result<Payout, AppError> {
        let updated = sqlx::query_as::<_, Payout>(&format!(
            r#"
            UPDATE payouts
            SET status = 'rejected', comment = $3, decided_by = $2, decided_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING {PAYOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(decided_by)
        .bind(comment)
        .fetch_optional(db)
        .await
        .context("Failed to reject payout")
        .map_err(AppError::database)?;

        updated.ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!("Payout is not pending or does not exist"))
        })
    }

    pub async fn mark_paid(db: &PgPool, id: Uuid) -> Result<Payout, AppError> {
        let updated = sqlx::query_as::<_, Payout>(&format!(
            r#"
            UPDATE payouts
            SET status = 'paid'
            WHERE id = $1 AND status = 'approved'
            RETURNING {PAYOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to mark payout paid")
        .map_err(AppError::database)?;

        updated.ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!("Payout is not approved or does not exist"))
        })
    }
}
