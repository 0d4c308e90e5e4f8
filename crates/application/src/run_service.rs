//! Run logging application service.
//!
//! Coordinates the run table and the photo bucket: logging a run uploads its
//! photo before inserting the row, and listing re-signs every stored photo
//! reference so private buckets stay readable from the browser.

use std::sync::Arc;

use myrun_core::{AppError, AppResult};
use myrun_domain::{RunId, RunRecord};
use tracing::warn;

use crate::{ObjectStorage, RunRepository};

mod create;
mod listing;

#[cfg(test)]
mod tests;

/// Lifetime of signed photo URLs handed to the browser: seven days.
pub const DEFAULT_SIGNED_URL_TTL_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Static settings for [`RunService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunServiceConfig {
    /// Backend base URL used to build public object URLs.
    pub public_base_url: String,
    /// Bucket that holds run photos.
    pub bucket: String,
    /// Lifetime of signed URLs returned by listings.
    pub signed_url_ttl_seconds: u64,
}

/// Photo attached to a run submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunImageUpload {
    /// File name reported by the client.
    pub file_name: String,
    /// MIME type reported by the client.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Raw run submission as typed into the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRunInput {
    /// Run date, `YYYY-MM-DD`.
    pub run_date: Option<String>,
    /// Distance in kilometres.
    pub run_distance: Option<String>,
    /// Where the run took place.
    pub run_place: Option<String>,
    /// Optional photo.
    pub image: Option<RunImageUpload>,
}

/// Run row paired with the URL the browser should load its photo from.
#[derive(Debug, Clone, PartialEq)]
pub struct RunListing {
    /// Stored row.
    pub record: RunRecord,
    /// Signed photo URL, absent when the row has no photo or signing failed.
    pub display_image_url: Option<String>,
}

/// Application service for logging, listing and deleting runs.
#[derive(Clone)]
pub struct RunService {
    repository: Arc<dyn RunRepository>,
    storage: Arc<dyn ObjectStorage>,
    config: RunServiceConfig,
}

impl RunService {
    /// Creates a service from its ports.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RunRepository>,
        storage: Arc<dyn ObjectStorage>,
        config: RunServiceConfig,
    ) -> Self {
        Self {
            repository,
            storage,
            config,
        }
    }

    /// Deletes one run row. The stored photo is left in the bucket.
    pub async fn delete_run(&self, run_id: RunId) -> AppResult<()> {
        self.repository.delete_run(run_id).await.map_err(|error| {
            warn!(error = %error, run_id = %run_id, "run delete failed");
            user_facing(error, "failed to delete run")
        })
    }
}

/// Replaces adapter detail with a user-facing message, keeping the category.
fn user_facing(error: AppError, message: &str) -> AppError {
    match error {
        AppError::Upstream(_) => AppError::Upstream(message.to_owned()),
        AppError::Internal(_) => AppError::Internal(message.to_owned()),
        other => other,
    }
}
