use std::{env, env::VarError};

use clap::Parser;

use crate::config::parse_run_address;

/// Loyalty points gateway server.
///
/// Every option can also be set through the environment (or a `.env` file). Options given here take precedence.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct CliArgs {
    /// Address to listen on, e.g. `localhost:8080` or `:8080` [env: RUN_ADDRESS]
    #[arg(short = 'a', long = "address", value_parser = parse_run_address)]
    pub run_address: Option<(String, u16)>,
    /// Database URL, e.g. `sqlite://data/loyalty.db` [env: DATABASE_URI]
    #[arg(short = 'd', long = "database")]
    pub database_uri: Option<String>,
    /// Base URL of the accrual service [env: ACCRUAL_SYSTEM_ADDRESS]
    #[arg(short = 'r', long = "accrual")]
    pub accrual_address: Option<String>,
    /// Print the configuration-related environment variables and exit
    #[arg(long)]
    pub show_env: bool,
}

pub fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "RUN_ADDRESS",
        "DATABASE_URI",
        "ACCRUAL_SYSTEM_ADDRESS",
        "LPG_POLL_INTERVAL_SECS",
        "LPG_ORACLE_TIMEOUT_SECS",
        "LPG_MAX_BACKOFF_TICKS",
        "LPG_TOKEN_LIFETIME_HOURS",
        "LPG_SECURE_COOKIE",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
