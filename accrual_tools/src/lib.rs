//! Client for the external accrual service (the "oracle") that decides whether a purchase order earns loyalty points,
//! and how many.
//!
//! The service exposes a single endpoint, `GET {base}/api/orders/{number}`. [`AccrualApi`] wraps it and folds the
//! handful of status codes it can return into an [`OracleReply`], so that callers deal with a closed set of outcomes
//! rather than raw HTTP responses.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::{parse_retry_after, AccrualApi, AccrualOracle, DEFAULT_RETRY_AFTER};
pub use config::AccrualConfig;
pub use data_objects::{AccrualResponse, OracleReply, OracleStatus};
pub use error::AccrualApiError;
