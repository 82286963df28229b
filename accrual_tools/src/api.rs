use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};

use crate::{
    config::AccrualConfig,
    data_objects::{AccrualResponse, OracleReply},
    AccrualApiError,
};

/// Cooldown applied when the service rate-limits us without saying for how long.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// The behaviour the reconciliation worker needs from the accrual service.
#[allow(async_fn_in_trait)]
pub trait AccrualOracle {
    /// Ask the service about the order with the given number.
    async fn fetch_accrual(&self, number: &str) -> Result<OracleReply, AccrualApiError>;
}

#[derive(Clone)]
pub struct AccrualApi {
    config: AccrualConfig,
    client: Arc<Client>,
}

impl AccrualApi {
    pub fn new(config: AccrualConfig) -> Result<Self, AccrualApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AccrualApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, number: &str) -> String {
        format!("{}/api/orders/{number}", self.config.base_url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> AccrualApiError {
        if e.is_timeout() {
            AccrualApiError::Timeout(self.config.timeout.as_secs())
        } else {
            AccrualApiError::RequestError(e.to_string())
        }
    }
}

impl AccrualOracle for AccrualApi {
    async fn fetch_accrual(&self, number: &str) -> Result<OracleReply, AccrualApiError> {
        let url = self.url(number);
        trace!("🧮️ GET {url}");
        let response = self.client.get(&url).send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let reply = match status {
            StatusCode::OK => {
                let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;
                let accrual = serde_json::from_slice::<AccrualResponse>(&body).map_err(|e| {
                    AccrualApiError::JsonError(format!("{e}. Body: {}", String::from_utf8_lossy(&body)))
                })?;
                OracleReply::Accrual(accrual)
            },
            StatusCode::NO_CONTENT => OracleReply::NoData,
            StatusCode::TOO_MANY_REQUESTS => {
                let header = response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok());
                OracleReply::RateLimited(parse_retry_after(header))
            },
            other => OracleReply::Unexpected(other.as_u16()),
        };
        trace!("🧮️ Order {number}: {status} -> {reply:?}");
        Ok(reply)
    }
}

/// Interprets a `Retry-After` header given in delta-seconds. Missing or unparseable values (including the HTTP-date
/// form, which the accrual service does not use) fall back to [`DEFAULT_RETRY_AFTER`].
pub fn parse_retry_after(value: Option<&str>) -> Duration {
    match value.map(|v| v.trim().parse::<u64>()) {
        Some(Ok(secs)) => Duration::from_secs(secs),
        Some(Err(e)) => {
            warn!("🧮️ Could not parse Retry-After header ({e}). Backing off for {}s", DEFAULT_RETRY_AFTER.as_secs());
            DEFAULT_RETRY_AFTER
        },
        None => {
            warn!("🧮️ Rate limited without a Retry-After header. Backing off for {}s", DEFAULT_RETRY_AFTER.as_secs());
            DEFAULT_RETRY_AFTER
        },
    }
}
