use futures::future::join_all;
use myrun_core::AppResult;
use myrun_domain::{RunRecord, bucket_relative_key, normalize_object_path};
use tracing::warn;

use super::{RunListing, RunService, user_facing};

impl RunService {
    /// Lists runs newest first, each with a freshly signed photo URL.
    ///
    /// Signing requests run concurrently and settle independently: a row whose
    /// photo cannot be signed is listed without a photo.
    pub async fn list_runs(&self) -> AppResult<Vec<RunListing>> {
        let records = self.repository.list_runs().await.map_err(|error| {
            warn!(error = %error, "run listing failed");
            user_facing(error, "failed to load runs")
        })?;

        let display_urls = join_all(
            records
                .iter()
                .map(|record| self.signed_display_url(record)),
        )
        .await;

        Ok(records
            .into_iter()
            .zip(display_urls)
            .map(|(record, display_image_url)| RunListing {
                record,
                display_image_url,
            })
            .collect())
    }

    async fn signed_display_url(&self, record: &RunRecord) -> Option<String> {
        let bucket = self.config.bucket.as_str();
        let object_path = normalize_object_path(record.run_image_url(), bucket)?;
        let key = bucket_relative_key(object_path.as_str(), bucket);

        match self
            .storage
            .create_signed_url(key, self.config.signed_url_ttl_seconds)
            .await
        {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(
                    error = %error,
                    run_id = %record.id(),
                    object_path = %object_path,
                    "failed to sign run image url"
                );
                None
            }
        }
    }
}
