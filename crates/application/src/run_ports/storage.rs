use async_trait::async_trait;
use myrun_core::AppResult;
use myrun_domain::ImageContentType;

/// Port for the bucket holding run photos.
///
/// Keys are relative to the bucket the adapter was configured with.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes an object, replacing any existing object under the same key.
    async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: ImageContentType,
    ) -> AppResult<()>;

    /// Returns a URL granting read access to `key` for `ttl_seconds`.
    async fn create_signed_url(&self, key: &str, ttl_seconds: u64) -> AppResult<String>;

    /// Removes an object.
    async fn remove_object(&self, key: &str) -> AppResult<()>;
}
