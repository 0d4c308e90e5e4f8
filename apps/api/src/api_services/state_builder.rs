use std::sync::Arc;
use std::time::Duration;

use myrun_application::{RunRepository, RunService, RunServiceConfig};
use myrun_core::AppError;
use myrun_infrastructure::{PostgresRunRepository, SupabaseObjectStorage, SupabaseRunRepository};
use tracing::info;

use crate::api_config::{ApiConfig, RunRepositoryConfig};
use crate::state::AppState;

use super::connect_and_migrate;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    let run_repository: Arc<dyn RunRepository> = match &config.run_repository {
        RunRepositoryConfig::Supabase { table } => {
            info!(table = %table, "using supabase run repository");
            Arc::new(SupabaseRunRepository::new(
                http_client.clone(),
                config.supabase.clone(),
                table.as_str(),
            ))
        }
        RunRepositoryConfig::Postgres { database_url } => {
            info!("using postgres run repository");
            let pool = connect_and_migrate(database_url).await?;
            Arc::new(PostgresRunRepository::new(pool))
        }
    };

    let storage = Arc::new(SupabaseObjectStorage::new(
        http_client,
        config.supabase.clone(),
        config.storage_bucket.as_str(),
    ));

    Ok(AppState {
        run_service: RunService::new(
            run_repository,
            storage,
            RunServiceConfig {
                public_base_url: config.supabase.base_url.clone(),
                bucket: config.storage_bucket.clone(),
                signed_url_ttl_seconds: config.signed_url_ttl_seconds,
            },
        ),
    })
}
