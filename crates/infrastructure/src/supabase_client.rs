use myrun_core::{AppError, AppResult};
use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;

/// Connection settings shared by the Supabase adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://<project>.supabase.co`.
    pub base_url: String,
    /// Key sent as both the `apikey` header and the bearer token.
    pub api_key: String,
}

/// Authenticated HTTP access to one Supabase project.
#[derive(Clone)]
pub(crate) struct SupabaseHttp {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseHttp {
    pub(crate) fn new(client: reqwest::Client, config: SupabaseConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key,
        }
    }

    /// Joins a path starting with `/` onto the project base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
    }

    /// Sends a request, mapping transport failures and non-2xx statuses to
    /// `AppError::Upstream`.
    pub(crate) async fn send(&self, request: RequestBuilder, context: &str) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("{context}: {error}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        debug!(%status, context, "supabase request rejected");
        Err(AppError::Upstream(format!(
            "{context}: status {status}: {body}"
        )))
    }
}

pub(crate) async fn decode_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> AppResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|error| AppError::Upstream(format!("{context}: invalid response body: {error}")))
}
