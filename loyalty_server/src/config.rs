//! Server configuration.
//!
//! Every setting is read from the environment (a `.env` file is honoured), with sensible defaults. The three
//! addresses can also be given on the command line, which takes precedence over the environment.
//!
//! | Variable                   | Default                      |
//! |----------------------------|------------------------------|
//! | `RUN_ADDRESS`              | `127.0.0.1:8080`             |
//! | `DATABASE_URI`             | `sqlite://data/loyalty.db`   |
//! | `ACCRUAL_SYSTEM_ADDRESS`   | `http://127.0.0.1:8081`      |
//! | `LPG_POLL_INTERVAL_SECS`   | `5`                          |
//! | `LPG_ORACLE_TIMEOUT_SECS`  | `10`                         |
//! | `LPG_MAX_BACKOFF_TICKS`    | `32` (`0` disables backoff)  |
//! | `LPG_JWT_SECRET`           | random, per process          |
//! | `LPG_TOKEN_LIFETIME_HOURS` | `24`                         |
//! | `LPG_SECURE_COOKIE`        | `false`                      |
use std::{env, str::FromStr, time::Duration};

use accrual_tools::AccrualConfig;
use log::*;
use lpg_common::{parse_boolean_flag, Secret};
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::cli::CliArgs;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/loyalty.db";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_BACKOFF_TICKS: u32 = 32;
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub accrual: AccrualConfig,
    pub worker: WorkerConfig,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            accrual: AccrualConfig::default(),
            worker: WorkerConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let (host, port) = env::var("RUN_ADDRESS")
            .ok()
            .and_then(|s| {
                parse_run_address(&s)
                    .map_err(|e| {
                        error!("🪛️ {e} Using the default, {DEFAULT_HOST}:{DEFAULT_PORT}, instead.");
                    })
                    .ok()
            })
            .unwrap_or_else(|| (DEFAULT_HOST.to_string(), DEFAULT_PORT));
        let database_url = env::var("DATABASE_URI").ok().unwrap_or_else(|| {
            info!("🪛️ DATABASE_URI is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let accrual = AccrualConfig::new_from_env_or_default();
        let worker = WorkerConfig::from_env_or_default();
        let auth = AuthConfig::from_env_or_default();
        Self { host, port, database_url, accrual, worker, auth }
    }

    /// Command-line values win over whatever was read from the environment.
    pub fn with_cli_args(mut self, args: &CliArgs) -> Self {
        if let Some((host, port)) = &args.run_address {
            self.host = host.clone();
            self.port = *port;
        }
        if let Some(url) = &args.database_uri {
            self.database_url = url.clone();
        }
        if let Some(url) = &args.accrual_address {
            self.accrual = self.accrual.with_base_url(url);
        }
        self
    }
}

//--------------------------------------     WorkerConfig      ---------------------------------------------------------
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Time between reconciliation passes.
    pub poll_interval: Duration,
    /// Upper bound, in ticks, on how long an order that keeps failing is left alone. Zero retries every order on
    /// every tick.
    pub max_backoff_ticks: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, max_backoff_ticks: DEFAULT_MAX_BACKOFF_TICKS }
    }
}

impl WorkerConfig {
    pub fn from_env_or_default() -> Self {
        let poll_interval = env_number::<u64>("LPG_POLL_INTERVAL_SECS")
            .filter(|secs| {
                if *secs == 0 {
                    warn!("🪛️ LPG_POLL_INTERVAL_SECS must be at least 1. Using the default.");
                }
                *secs > 0
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let max_backoff_ticks = env_number::<u32>("LPG_MAX_BACKOFF_TICKS").unwrap_or(DEFAULT_MAX_BACKOFF_TICKS);
        Self { poll_interval, max_backoff_ticks }
    }
}

//--------------------------------------      AuthConfig       ---------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC key for signing access tokens.
    pub jwt_secret: Secret<String>,
    pub token_lifetime: chrono::Duration,
    /// Sets the `Secure` attribute on the access token cookie. Turn on when serving over HTTPS.
    pub secure_cookie: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Secret::new(random_secret()),
            token_lifetime: chrono::Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS),
            secure_cookie: false,
        }
    }
}

impl AuthConfig {
    pub fn from_env_or_default() -> Self {
        let jwt_secret = match env::var("LPG_JWT_SECRET") {
            Ok(s) if !s.is_empty() => Secret::new(s),
            _ => {
                warn!(
                    "🚨️ LPG_JWT_SECRET is not set. A random signing key will be used, which means access tokens will \
                     not survive a restart, nor be accepted by other instances. Set LPG_JWT_SECRET in production."
                );
                Secret::new(random_secret())
            },
        };
        let token_lifetime = env_number::<i64>("LPG_TOKEN_LIFETIME_HOURS")
            .filter(|h| *h > 0)
            .map(chrono::Duration::hours)
            .unwrap_or_else(|| chrono::Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS));
        let secure_cookie = env::var("LPG_SECURE_COOKIE")
            .ok()
            .and_then(|v| {
                parse_boolean_flag(&v).map_err(|e| warn!("🪛️ Invalid LPG_SECURE_COOKIE. {e}. Using the default.")).ok()
            })
            .unwrap_or(false);
        Self { jwt_secret, token_lifetime, secure_cookie }
    }
}

fn random_secret() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect()
}

/// Reads and parses a numeric environment variable, logging (and ignoring) values that don't parse.
fn env_number<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = env::var(name).ok()?;
    value
        .trim()
        .parse::<T>()
        .map_err(|e| warn!("🪛️ Invalid configuration value for {name} ({value}). {e}. Using the default."))
        .ok()
}

/// Parses a bind address. Accepts `host:port`, `:port` and a bare `port`; the last two bind to all interfaces.
pub fn parse_run_address(s: &str) -> Result<(String, u16), String> {
    let s = s.trim();
    let s = s.strip_prefix("http://").unwrap_or(s);
    let (host, port) = match s.rsplit_once(':') {
        Some((host, port)) => (host, port),
        None => ("", s),
    };
    let port = port.parse::<u16>().map_err(|e| format!("{s} is not a valid run address. {e}."))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let host = if host.is_empty() { "0.0.0.0" } else { host };
    Ok((host.to_string(), port))
}
