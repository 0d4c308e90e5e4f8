use async_trait::async_trait;
use myrun_core::AppResult;
use myrun_domain::{NewRun, RunId, RunRecord};

/// Repository port for the run table.
#[async_trait]
pub trait RunRepository: Send + Sync {
    /// Inserts one run and returns the stored row.
    async fn insert_run(&self, run: NewRun) -> AppResult<RunRecord>;

    /// Lists every run, newest `created_at` first.
    async fn list_runs(&self) -> AppResult<Vec<RunRecord>>;

    /// Deletes one run. Returns `AppError::NotFound` when no row matched.
    async fn delete_run(&self, run_id: RunId) -> AppResult<()>;
}
