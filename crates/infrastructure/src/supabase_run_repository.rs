use async_trait::async_trait;
use myrun_application::RunRepository;
use myrun_core::{AppError, AppResult};
use myrun_domain::{NewRun, RunId, RunRecord};
use reqwest::Method;

use crate::run_row::{InsertRunRow, RunRow};
use crate::supabase_client::{SupabaseConfig, SupabaseHttp, decode_json};

const REST_API_PATH: &str = "/rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Run table adapter speaking to Supabase's PostgREST endpoint.
#[derive(Clone)]
pub struct SupabaseRunRepository {
    http: SupabaseHttp,
    table: String,
}

impl SupabaseRunRepository {
    /// Creates a repository for `table`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        config: SupabaseConfig,
        table: impl Into<String>,
    ) -> Self {
        Self {
            http: SupabaseHttp::new(http_client, config),
            table: table.into(),
        }
    }

    fn table_endpoint(&self, query: &str) -> String {
        self.http
            .endpoint(format!("{REST_API_PATH}/{}?{query}", self.table).as_str())
    }
}

#[async_trait]
impl RunRepository for SupabaseRunRepository {
    async fn insert_run(&self, run: NewRun) -> AppResult<RunRecord> {
        let context = "failed to insert run";
        let url = self.table_endpoint("select=*");
        let request = self
            .http
            .request(Method::POST, url.as_str())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[InsertRunRow::from(run)]);

        let response = self.http.send(request, context).await?;
        decode_json::<Vec<RunRow>>(response, context)
            .await?
            .into_iter()
            .next()
            .map(RunRecord::from)
            .ok_or_else(|| AppError::Upstream(format!("{context}: no row was returned")))
    }

    async fn list_runs(&self) -> AppResult<Vec<RunRecord>> {
        let context = "failed to list runs";
        let url = self.table_endpoint("select=*&order=created_at.desc");
        let request = self.http.request(Method::GET, url.as_str());

        let response = self.http.send(request, context).await?;
        Ok(decode_json::<Vec<RunRow>>(response, context)
            .await?
            .into_iter()
            .map(RunRecord::from)
            .collect())
    }

    async fn delete_run(&self, run_id: RunId) -> AppResult<()> {
        let context = format!("failed to delete run '{run_id}'");
        let url = self.table_endpoint(format!("id=eq.{run_id}").as_str());
        let request = self
            .http
            .request(Method::DELETE, url.as_str())
            .header("Prefer", RETURN_REPRESENTATION);

        let response = self.http.send(request, context.as_str()).await?;
        let deleted = decode_json::<Vec<RunRow>>(response, context.as_str()).await?;
        if deleted.is_empty() {
            return Err(AppError::NotFound(format!("run '{run_id}' does not exist")));
        }

        Ok(())
    }
}
