use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use myrun_application::DEFAULT_SIGNED_URL_TTL_SECONDS;
use myrun_core::AppError;
use myrun_infrastructure::SupabaseConfig;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_STORAGE_BUCKET: &str = "myrun_bk";
const DEFAULT_RUNS_TABLE: &str = "myrun_tb";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunRepositoryConfig {
    Supabase { table: String },
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub supabase: SupabaseConfig,
    pub storage_bucket: String,
    pub signed_url_ttl_seconds: u64,
    pub run_repository: RunRepositoryConfig,
    pub max_upload_bytes: usize,
    pub http_timeout_seconds: u64,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = EnvLookup(lookup);

        let base_url = vars.required_non_empty("SUPABASE_URL")?;
        Url::parse(base_url.as_str())
            .map_err(|error| AppError::Validation(format!("invalid SUPABASE_URL: {error}")))?;
        let api_key = vars.required_non_empty("SUPABASE_API_KEY")?;

        let storage_bucket = vars.or_default("STORAGE_BUCKET", DEFAULT_STORAGE_BUCKET);
        let signed_url_ttl_seconds =
            vars.parsed_or("SIGNED_URL_TTL_SECONDS", DEFAULT_SIGNED_URL_TTL_SECONDS)?;
        if signed_url_ttl_seconds == 0 {
            return Err(AppError::Validation(
                "SIGNED_URL_TTL_SECONDS must be greater than 0".to_owned(),
            ));
        }

        let run_repository = match vars.or_default("RUN_REPOSITORY", "supabase").as_str() {
            "supabase" => RunRepositoryConfig::Supabase {
                table: vars.or_default("RUNS_TABLE", DEFAULT_RUNS_TABLE),
            },
            "postgres" => RunRepositoryConfig::Postgres {
                database_url: vars.required_non_empty("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "RUN_REPOSITORY must be either 'supabase' or 'postgres', got '{other}'"
                )));
            }
        };

        if migrate_only && !matches!(run_repository, RunRepositoryConfig::Postgres { .. }) {
            return Err(AppError::Validation(
                "the migrate command requires RUN_REPOSITORY=postgres".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            supabase: SupabaseConfig { base_url, api_key },
            storage_bucket,
            signed_url_ttl_seconds,
            run_repository,
            max_upload_bytes: vars.parsed_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            http_timeout_seconds: vars
                .parsed_or("HTTP_TIMEOUT_SECONDS", DEFAULT_HTTP_TIMEOUT_SECONDS)?,
            frontend_url: vars.or_default("FRONTEND_URL", "http://localhost:3000"),
            api_host: vars.or_default("API_HOST", "127.0.0.1"),
            api_port: vars.parsed_or("API_PORT", 3001)?,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

struct EnvLookup<F>(F);

impl<F> EnvLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn non_empty(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required_non_empty(&self, name: &str) -> Result<String, AppError> {
        match (self.0)(name) {
            None => Err(AppError::Validation(format!("{name} is required"))),
            Some(value) if value.trim().is_empty() => {
                Err(AppError::Validation(format!("{name} must not be empty")))
            }
            Some(value) => Ok(value),
        }
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.non_empty(name).unwrap_or_else(|| default.to_owned())
    }

    fn parsed_or<T>(&self, name: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.non_empty(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
            })
            .transpose()
            .map(|value| value.unwrap_or(default))
    }
}
