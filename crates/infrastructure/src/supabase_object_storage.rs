use async_trait::async_trait;
use myrun_application::ObjectStorage;
use myrun_core::{AppError, AppResult};
use myrun_domain::ImageContentType;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::supabase_client::{SupabaseConfig, SupabaseHttp, decode_json};

const STORAGE_API_PATH: &str = "/storage/v1";

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Supabase storage bucket adapter.
#[derive(Clone)]
pub struct SupabaseObjectStorage {
    http: SupabaseHttp,
    bucket: String,
}

impl SupabaseObjectStorage {
    /// Creates an adapter bound to one bucket.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        config: SupabaseConfig,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            http: SupabaseHttp::new(http_client, config),
            bucket: bucket.into(),
        }
    }

    /// Builds `/storage/v1/<segments..>/<bucket>/<key>`, escaping each key segment.
    fn object_endpoint(&self, operation: &[&str], key: Option<&str>) -> AppResult<Url> {
        let mut url = Url::parse(self.http.endpoint(STORAGE_API_PATH).as_str())
            .map_err(|error| AppError::Internal(format!("invalid storage url: {error}")))?;
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("storage url cannot carry a path".to_owned()))?
            .extend(operation)
            .push(self.bucket.as_str())
            .extend(key.into_iter().flat_map(|key| key.split('/')));

        Ok(url)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseObjectStorage {
    async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: ImageContentType,
    ) -> AppResult<()> {
        let url = self.object_endpoint(&["object"], Some(key))?;
        let request = self
            .http
            .request(Method::POST, url.as_str())
            .header(CONTENT_TYPE, content_type.as_mime())
            .header("x-upsert", "true")
            .header("cache-control", "max-age=3600")
            .body(bytes);

        self.http
            .send(request, format!("failed to upload object '{key}'").as_str())
            .await?;

        Ok(())
    }

    async fn create_signed_url(&self, key: &str, ttl_seconds: u64) -> AppResult<String> {
        let context = format!("failed to sign object '{key}'");
        let url = self.object_endpoint(&["object", "sign"], Some(key))?;
        let request = self
            .http
            .request(Method::POST, url.as_str())
            .json(&json!({ "expiresIn": ttl_seconds }));

        let response = self.http.send(request, context.as_str()).await?;
        let signed = decode_json::<SignedUrlResponse>(response, context.as_str()).await?;

        let absolute = self
            .http
            .endpoint(format!("{STORAGE_API_PATH}{}", signed.signed_url).as_str());
        Url::parse(absolute.as_str())
            .map(String::from)
            .map_err(|error| AppError::Upstream(format!("{context}: invalid signed url: {error}")))
    }

    async fn remove_object(&self, key: &str) -> AppResult<()> {
        let url = self.object_endpoint(&["object"], None)?;
        let request = self
            .http
            .request(Method::DELETE, url.as_str())
            .json(&json!({ "prefixes": [key] }));

        self.http
            .send(request, format!("failed to remove object '{key}'").as_str())
            .await?;

        Ok(())
    }
}
