use std::{fmt::Display, time::Duration};

use lpg_common::Points;
use serde::{Deserialize, Serialize};

/// The statuses the accrual service can report. `NEW` is a purely local state and is never returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OracleStatus {
    Registered,
    Invalid,
    Processing,
    Processed,
}

impl Display for OracleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleStatus::Registered => write!(f, "REGISTERED"),
            OracleStatus::Invalid => write!(f, "INVALID"),
            OracleStatus::Processing => write!(f, "PROCESSING"),
            OracleStatus::Processed => write!(f, "PROCESSED"),
        }
    }
}

/// Body of a `200 OK` reply.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AccrualResponse {
    pub order: String,
    pub status: OracleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
}

/// Everything a query to the accrual service can result in, short of a transport or decoding failure.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleReply {
    /// The service knows the order and has an opinion on it.
    Accrual(AccrualResponse),
    /// `204`: the service has not seen this order (yet).
    NoData,
    /// `429`: back off for (at least) the given time.
    RateLimited(Duration),
    /// Any other status code.
    Unexpected(u16),
}
