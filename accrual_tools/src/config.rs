use std::{env, time::Duration};

use log::*;

const DEFAULT_ACCRUAL_ADDRESS: &str = "http://127.0.0.1:8081";
const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AccrualConfig {
    /// Base URL of the accrual service, without a trailing slash, e.g. `http://accrual.local:8081`
    pub base_url: String,
    /// Upper bound on a single request to the accrual service, including reading the body.
    pub timeout: Duration,
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_ACCRUAL_ADDRESS.to_string(), timeout: DEFAULT_ORACLE_TIMEOUT }
    }
}

impl AccrualConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self { base_url: normalize_base_url(base_url), timeout }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = env::var("ACCRUAL_SYSTEM_ADDRESS").unwrap_or_else(|_| {
            warn!("🪛️ ACCRUAL_SYSTEM_ADDRESS not set, using {DEFAULT_ACCRUAL_ADDRESS} as default");
            DEFAULT_ACCRUAL_ADDRESS.to_string()
        });
        let timeout = env::var("LPG_ORACLE_TIMEOUT_SECS")
            .map_err(|_| {
                info!(
                    "🪛️ LPG_ORACLE_TIMEOUT_SECS is not set. Using the default value of {}s.",
                    DEFAULT_ORACLE_TIMEOUT.as_secs()
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for LPG_ORACLE_TIMEOUT_SECS. {e}"))
            })
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ORACLE_TIMEOUT);
        Self::new(&base_url, timeout)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }
}

/// Accepts bare `host:port` addresses as well as full URLs.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}
