use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use myrun_application::{ObjectStorage, RunRepository};
use myrun_core::{AppError, AppResult};
use myrun_domain::{ImageContentType, NewRun, RunId, RunRecord, SIGNED_OBJECT_PATH_PREFIX};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory run repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRunRepository {
    rows: RwLock<Vec<RunRecord>>,
}

impl InMemoryRunRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RunRepository for InMemoryRunRepository {
    async fn insert_run(&self, run: NewRun) -> AppResult<RunRecord> {
        let record = RunRecord::new(
            RunId::new(),
            Utc::now(),
            Some(run.fields.run_date()),
            Some(run.fields.run_distance().kilometres()),
            Some(run.fields.run_place().as_str().to_owned()),
            run.run_image_url,
        );

        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_runs(&self) -> AppResult<Vec<RunRecord>> {
        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(rows)
    }

    async fn delete_run(&self, run_id: RunId) -> AppResult<()> {
        let mut rows = self.rows.write().await;
        let position = rows
            .iter()
            .position(|row| row.id() == run_id)
            .ok_or_else(|| AppError::NotFound(format!("run '{run_id}' does not exist")))?;

        rows.remove(position);
        Ok(())
    }
}

/// In-memory bucket that signs URLs against a fixed base URL.
#[derive(Debug)]
pub struct InMemoryObjectStorage {
    base_url: String,
    bucket: String,
    objects: RwLock<HashMap<String, (ImageContentType, Vec<u8>)>>,
}

impl InMemoryObjectStorage {
    /// Creates an empty bucket.
    #[must_use]
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the stored keys in sorted order.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys = self.objects.read().await.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: ImageContentType,
    ) -> AppResult<()> {
        self.objects
            .write()
            .await
            .insert(key.to_owned(), (content_type, bytes));
        Ok(())
    }

    async fn create_signed_url(&self, key: &str, ttl_seconds: u64) -> AppResult<String> {
        if !self.objects.read().await.contains_key(key) {
            return Err(AppError::NotFound(format!("object '{key}' does not exist")));
        }

        Ok(format!(
            "{}{SIGNED_OBJECT_PATH_PREFIX}{}/{key}?token={}&expires_in={ttl_seconds}",
            self.base_url,
            self.bucket,
            Uuid::new_v4()
        ))
    }

    async fn remove_object(&self, key: &str) -> AppResult<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}
