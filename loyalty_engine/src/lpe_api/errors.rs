use lpg_common::Points;
use thiserror::Error;

use crate::{db_types::OrderNumber, traits::LoyaltyDbError};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Order number {0} is not a valid receipt number")]
    InvalidOrderNumber(String),
    #[error("Order {0} has already been uploaded by another user")]
    OrderOwnedByAnotherUser(OrderNumber),
    #[error("Database error: {0}")]
    DatabaseError(#[from] LoyaltyDbError),
}

#[derive(Debug, Clone, Error)]
pub enum AccrualFlowError {
    #[error("The accrual service sent an unusable verdict: {0}")]
    InvalidOutcome(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderNumber),
    #[error("Database error: {0}")]
    DatabaseError(LoyaltyDbError),
}

impl From<LoyaltyDbError> for AccrualFlowError {
    fn from(e: LoyaltyDbError) -> Self {
        match e {
            LoyaltyDbError::OrderNotFound(n) => Self::OrderNotFound(n),
            LoyaltyDbError::IllegalOutcome(s) => Self::InvalidOutcome(s),
            e => Self::DatabaseError(e),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum WithdrawalError {
    #[error("Order number {0} is not a valid receipt number")]
    InvalidOrderNumber(String),
    #[error("Withdrawal amounts must be positive, not {0}")]
    NonPositiveSum(Points),
    #[error("Insufficient funds. Requested {requested}, but only {available} is available")]
    InsufficientFunds { available: Points, requested: Points },
    #[error("Receipt {0} has already been used for a withdrawal")]
    DuplicateWithdrawal(OrderNumber),
    #[error("Database error: {0}")]
    DatabaseError(LoyaltyDbError),
}

impl From<LoyaltyDbError> for WithdrawalError {
    fn from(e: LoyaltyDbError) -> Self {
        match e {
            LoyaltyDbError::InsufficientFunds { available, requested } => {
                Self::InsufficientFunds { available, requested }
            },
            LoyaltyDbError::WithdrawalAlreadyExists(n) => Self::DuplicateWithdrawal(n),
            e => Self::DatabaseError(e),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Invalid credentials format: {0}")]
    MalformedCredentials(String),
    #[error("The login {0} is already taken")]
    LoginTaken(String),
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("Could not hash password. {0}")]
    PasswordHashError(String),
    #[error("Database error: {0}")]
    DatabaseError(LoyaltyDbError),
}

impl From<LoyaltyDbError> for AuthApiError {
    fn from(e: LoyaltyDbError) -> Self {
        match e {
            LoyaltyDbError::LoginTaken(login) => Self::LoginTaken(login),
            e => Self::DatabaseError(e),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] LoyaltyDbError),
}
