use async_trait::async_trait;
use myrun_application::RunRepository;
use myrun_core::{AppError, AppResult};
use myrun_domain::{NewRun, RunId, RunRecord};
use sqlx::PgPool;

use crate::run_row::{InsertRunRow, RunRow};

/// PostgreSQL-backed run repository for deployments that reach the database directly.
#[derive(Clone)]
pub struct PostgresRunRepository {
    pool: PgPool,
}

impl PostgresRunRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RunRepository for PostgresRunRepository {
    async fn insert_run(&self, run: NewRun) -> AppResult<RunRecord> {
        let row = InsertRunRow::from(run);

        sqlx::query_as::<_, RunRow>(
            r#"
            INSERT INTO myrun_tb (run_date, run_distance, run_place, run_image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, run_date, run_distance, run_place, run_image_url
            "#,
        )
        .bind(row.run_date)
        .bind(row.run_distance)
        .bind(row.run_place)
        .bind(row.run_image_url)
        .fetch_one(&self.pool)
        .await
        .map(RunRecord::from)
        .map_err(|error| AppError::Internal(format!("failed to insert run: {error}")))
    }

    async fn list_runs(&self) -> AppResult<Vec<RunRecord>> {
        let rows = sqlx::query_as::<_, RunRow>(
            r#"
            SELECT id, created_at, run_date, run_distance, run_place, run_image_url
            FROM myrun_tb
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list runs: {error}")))?;

        Ok(rows.into_iter().map(RunRecord::from).collect())
    }

    async fn delete_run(&self, run_id: RunId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM myrun_tb
            WHERE id = $1
            "#,
        )
        .bind(run_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete run: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("run '{run_id}' does not exist")));
        }

        Ok(())
    }
}
