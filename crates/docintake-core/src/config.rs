//! Configuration module
//!
//! Settings are read from the environment (a `.env` file is honoured through
//! `dotenvy`) into [`IntakeConfig`] and validated once at startup.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::classification::OverridePolicy;
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const MAX_DOCUMENT_SIZE_MB: usize = 50;
const DEFAULT_S3_BUCKET: &str = "company-documents";
const DEFAULT_ALLOWED_EXTENSIONS: &str = "pdf,xlsx,xls,csv,doc,docx,odt,ods,txt,jpg,jpeg,png";
const DEFAULT_AUTHORITATIVE_TYPES: &str = "leasing_document,collateral_document,other";
const ANALYSIS_DISPATCH_TIMEOUT_SECS: u64 = 10;
const SMTP_PORT: u16 = 587;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Where analysis requests are sent after a successful intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchBackend {
    /// POST to an external event endpoint
    Http,
    /// Insert into the `analysis_tasks` table
    Database,
    Disabled,
}

impl FromStr for DispatchBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(DispatchBackend::Http),
            "database" | "db" => Ok(DispatchBackend::Database),
            "disabled" | "none" | "off" => Ok(DispatchBackend::Disabled),
            other => Err(anyhow::anyhow!("Unknown analysis dispatch backend: {}", other)),
        }
    }
}

impl Display for DispatchBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DispatchBackend::Http => write!(f, "http"),
            DispatchBackend::Database => write!(f, "database"),
            DispatchBackend::Disabled => write!(f, "disabled"),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    pub log_format: Option<String>,
}

/// Document intake service configuration
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Hetzner, ...)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    // Intake rules
    pub max_document_size_bytes: usize,
    pub document_allowed_extensions: Vec<String>,
    pub override_policy: OverridePolicy,
    // Analysis dispatch
    pub analysis_dispatch_backend: Option<DispatchBackend>,
    pub analysis_event_url: Option<String>,
    pub analysis_event_key: Option<String>,
    pub analysis_dispatch_timeout_secs: u64,
    // Email notifications
    pub email_notifications_enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
    pub frontend_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IntakeConfig>);

impl Config {
    fn inner(&self) -> &IntakeConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IntakeConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production(&self.inner().base.environment)
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> Option<&str> {
        self.inner().base.jwt_issuer.as_deref()
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn json_logs(&self) -> bool {
        self.inner()
            .base
            .log_format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> &str {
        &self.inner().s3_bucket
    }

    /// `S3_REGION`, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.inner().max_document_size_bytes
    }

    pub fn document_allowed_extensions(&self) -> &[String] {
        &self.inner().document_allowed_extensions
    }

    pub fn override_policy(&self) -> &OverridePolicy {
        &self.inner().override_policy
    }

    /// Explicit `ANALYSIS_DISPATCH_BACKEND`, otherwise `http` when an event URL
    /// is configured and `disabled` when not.
    pub fn analysis_dispatch_backend(&self) -> DispatchBackend {
        self.inner().effective_dispatch_backend()
    }

    pub fn analysis_event_url(&self) -> Option<&str> {
        self.inner().analysis_event_url.as_deref()
    }

    pub fn analysis_event_key(&self) -> Option<&str> {
        self.inner().analysis_event_key.as_deref()
    }

    pub fn analysis_dispatch_timeout_secs(&self) -> u64 {
        self.inner().analysis_dispatch_timeout_secs
    }

    pub fn email_notifications_enabled(&self) -> bool {
        self.inner().email_notifications_enabled
    }

    pub fn smtp_host(&self) -> Option<&str> {
        self.inner().smtp_host.as_deref()
    }

    pub fn smtp_port(&self) -> u16 {
        self.inner().smtp_port
    }

    pub fn smtp_user(&self) -> Option<&str> {
        self.inner().smtp_user.as_deref()
    }

    pub fn smtp_password(&self) -> Option<&str> {
        self.inner().smtp_password.as_deref()
    }

    pub fn smtp_from(&self) -> Option<&str> {
        self.inner().smtp_from.as_deref()
    }

    pub fn smtp_tls(&self) -> bool {
        self.inner().smtp_tls
    }

    pub fn frontend_url(&self) -> Option<&str> {
        self.inner().frontend_url.as_deref()
    }
}

fn is_production(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    raw.map(|s| s.trim().to_lowercase())
        .and_then(|s| match s.as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values
    /// are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(p) => p
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins: parse_cors(&var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string())),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: var("JWT_ISSUER"),
            environment,
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            log_format: var("LOG_FORMAT"),
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let max_document_size_mb = var("MAX_DOCUMENT_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_DOCUMENT_SIZE_MB);

        let override_policy = OverridePolicy::parse_list(
            &var("AUTHORITATIVE_DOCUMENT_TYPES")
                .unwrap_or_else(|| DEFAULT_AUTHORITATIVE_TYPES.to_string()),
        )
        .map_err(|e| anyhow::anyhow!("AUTHORITATIVE_DOCUMENT_TYPES: {}", e))?;

        let analysis_dispatch_backend = var("ANALYSIS_DISPATCH_BACKEND")
            .map(|raw| raw.parse::<DispatchBackend>())
            .transpose()?;

        let config = IntakeConfig {
            base,
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: var("S3_BUCKET").unwrap_or_else(|| DEFAULT_S3_BUCKET.to_string()),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            max_document_size_bytes: max_document_size_mb * 1024 * 1024,
            document_allowed_extensions: parse_list(
                &var("DOCUMENT_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|| DEFAULT_ALLOWED_EXTENSIONS.to_string()),
            ),
            override_policy,
            analysis_dispatch_backend,
            analysis_event_url: var("ANALYSIS_EVENT_URL"),
            analysis_event_key: var("ANALYSIS_EVENT_KEY"),
            analysis_dispatch_timeout_secs: var("ANALYSIS_DISPATCH_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(ANALYSIS_DISPATCH_TIMEOUT_SECS),
            email_notifications_enabled: parse_bool(var("EMAIL_NOTIFICATIONS_ENABLED"), false),
            smtp_host: var("SMTP_HOST"),
            smtp_port: var("SMTP_PORT")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&p: &u16| p > 0)
                .unwrap_or(SMTP_PORT),
            smtp_user: var("SMTP_USER"),
            smtp_password: var("SMTP_PASSWORD"),
            smtp_from: var("SMTP_FROM"),
            smtp_tls: parse_bool(var("SMTP_TLS"), true),
            frontend_url: var("FRONTEND_URL"),
        };

        config.validate()?;
        Ok(config)
    }

    fn effective_dispatch_backend(&self) -> DispatchBackend {
        match self.analysis_dispatch_backend {
            Some(backend) => backend,
            None if self.analysis_event_url.is_some() => DispatchBackend::Http,
            None => DispatchBackend::Disabled,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if is_production(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be greater than 0"));
        }

        if self.document_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "DOCUMENT_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.effective_dispatch_backend() == DispatchBackend::Http
            && self.analysis_event_url.is_none()
        {
            return Err(anyhow::anyhow!(
                "ANALYSIS_DISPATCH_BACKEND=http requires ANALYSIS_EVENT_URL to be set"
            ));
        }

        if self.email_notifications_enabled && (self.smtp_host.is_none() || self.smtp_from.is_none())
        {
            return Err(anyhow::anyhow!(
                "EMAIL_NOTIFICATIONS_ENABLED=true requires SMTP_HOST and SMTP_FROM to be set"
            ));
        }

        Ok(())
    }
}

fn parse_cors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
