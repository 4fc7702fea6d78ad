use anyhow::Context;
use sqlx::PgPool;

use crate::modules::activity::model::{ActivityFilterParams, ActivityLog, NewActivity};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct ActivityService;

impl ActivityService {
    /// Insert one activity row. Callers on the request path go through
    /// [`ActivityLogger`](crate::modules::activity::logger::ActivityLogger)
    /// instead of calling this directly.
    pub async fn record(db: &PgPool, entry: &NewActivity) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, ip, device, meta)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.ip)
        .bind(&entry.device)
        .bind(&entry.meta)
        .execute(db)
        .await
        .context("Failed to insert activity log")
        .map_err(AppError::database)?;

        Ok(())
    }

    pub async fn list(
        db: &PgPool,
        params: &ActivityFilterParams,
    ) -> Result<(Vec<ActivityLog>, PaginationMeta), AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();
        let action_pattern = params.action.as_ref().map(|a| format!("%{}%", a));

        let rows = sqlx::query_as::<_, ActivityLog>(
            r#"
            SELECT id, user_id, action, ip, device, meta, created_at
            FROM activity_logs
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR action ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(params.user_id)
        .bind(&action_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch activity logs")
        .map_err(AppError::database)?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM activity_logs
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR action ILIKE $2)
            "#,
        )
        .bind(params.user_id)
        .bind(&action_pattern)
        .fetch_one(db)
        .await
        .context("Failed to count activity logs")
        .map_err(AppError::database)?;

        Ok((rows, PaginationMeta::new(total, &params.pagination)))
    }
}
