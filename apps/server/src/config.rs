use std::{net::SocketAddr, time::Duration};

use anyhow::{bail, Context};
use goldquote_core::quotes::CacheConfig;
use goldquote_market_data::provider::yahoo::DEFAULT_CHART_URL;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub refresh_interval: Duration,
    pub upstream_url: String,
    pub upstream_timeout: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = match (var("GQ_LISTEN_ADDR"), var("PORT")) {
            (Some(addr), _) => addr
                .parse()
                .with_context(|| format!("Invalid GQ_LISTEN_ADDR: {}", addr))?,
            (None, Some(port)) => {
                let port: u16 = port
                    .parse()
                    .with_context(|| format!("Invalid PORT: {}", port))?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let refresh_secs = parse_u64(&var, "GQ_REFRESH_INTERVAL_SECS", 300)?;
        if refresh_secs == 0 {
            bail!("GQ_REFRESH_INTERVAL_SECS must be greater than zero");
        }

        let upstream_url = var("GQ_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_CHART_URL.into());
        let upstream_timeout_ms = parse_u64(&var, "GQ_UPSTREAM_TIMEOUT_MS", 10_000)?;
        let cors_allow = var("GQ_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout_ms = parse_u64(&var, "GQ_REQUEST_TIMEOUT_MS", 30_000)?;

        Ok(Self {
            listen_addr,
            refresh_interval: Duration::from_secs(refresh_secs),
            upstream_url,
            upstream_timeout: Duration::from_millis(upstream_timeout_ms),
            cors_allow,
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            refresh_interval: self.refresh_interval,
            fetch_timeout: self.upstream_timeout,
        }
    }
}

fn parse_u64(var: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> anyhow::Result<u64> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", key, value)),
        None => Ok(default),
    }
}
