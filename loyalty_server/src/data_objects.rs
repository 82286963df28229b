//! Request and response bodies for the HTTP API.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use loyalty_engine::db_types::{Balance, Order, OrderStatusType, Points, Withdrawal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credentials({}, ****)", self.login)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    /// The receipt number the points are spent against.
    pub order: String,
    pub sum: Points,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub number: String,
    pub status: OrderStatusType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Order> for OrderEntry {
    fn from(order: Order) -> Self {
        Self {
            number: order.number.to_string(),
            status: order.status,
            accrual: order.accrual,
            uploaded_at: order.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Points available to spend.
    pub current: Points,
    pub withdrawn: Points,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self { current: balance.available(), withdrawn: balance.withdrawn }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalEntry {
    pub order: String,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

impl From<Withdrawal> for WithdrawalEntry {
    fn from(w: Withdrawal) -> Self {
        Self { order: w.order_number.to_string(), sum: w.sum, processed_at: w.processed_at }
    }
}
