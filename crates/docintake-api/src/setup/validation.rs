//! Configuration validation
//!
//! Hard errors come from `Config::validate`; this adds startup warnings for
//! settings that are legal but suspicious.

use anyhow::Result;
use docintake_core::{Config, DispatchBackend};

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.jwt_issuer().is_none() {
        tracing::warn!("JWT_ISSUER not set in production - tokens from any issuer sharing the secret are accepted");
    }

    if config.analysis_dispatch_backend() == DispatchBackend::Disabled {
        tracing::warn!("Analysis dispatch disabled - uploaded documents will stay pending");
    }

    if config.analysis_dispatch_backend() == DispatchBackend::Http
        && config.analysis_event_key().is_none()
    {
        tracing::warn!("ANALYSIS_EVENT_KEY not set - event endpoint requests are unauthenticated");
    }

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
