use lpg_common::Points;
use thiserror::Error;

use crate::db_types::OrderNumber;

#[derive(Debug, Clone, Error)]
pub enum LoyaltyDbError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderNumber),
    #[error("The login {0} is already taken")]
    LoginTaken(String),
    #[error("A withdrawal against receipt {0} has already been recorded")]
    WithdrawalAlreadyExists(OrderNumber),
    #[error("Insufficient funds. Requested {requested}, but only {available} is available")]
    InsufficientFunds { available: Points, requested: Points },
    #[error("The accrual outcome is not allowed: {0}")]
    IllegalOutcome(String),
}

impl From<sqlx::Error> for LoyaltyDbError {
    fn from(e: sqlx::Error) -> Self {
        LoyaltyDbError::DatabaseError(e.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for LoyaltyDbError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        LoyaltyDbError::DatabaseError(format!("Migration failed. {e}"))
    }
}
