use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use lpg_common::Points;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order has been uploaded, but the accrual service has not reported on it yet.
    New,
    /// The accrual service knows about the order, but has not started calculating the reward.
    Registered,
    /// The reward is being calculated.
    Processing,
    /// Terminal. The reward has been calculated and credited.
    Processed,
    /// Terminal. The accrual service will not award anything for this order.
    Invalid,
}

impl OrderStatusType {
    /// `PROCESSED` and `INVALID` orders never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::Invalid)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::New => write!(f, "NEW"),
            OrderStatusType::Registered => write!(f, "REGISTERED"),
            OrderStatusType::Processing => write!(f, "PROCESSING"),
            OrderStatusType::Processed => write!(f, "PROCESSED"),
            OrderStatusType::Invalid => write!(f, "INVALID"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "REGISTERED" => Ok(Self::Registered),
            "PROCESSING" => Ok(Self::Processing),
            "PROCESSED" => Ok(Self::Processed),
            "INVALID" => Ok(Self::Invalid),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------      OrderNumber      ---------------------------------------------------------
/// The merchant's receipt number. Unique across the whole system, whoever uploaded it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderNumber(pub String);

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderNumber {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl OrderNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub number: OrderNumber,
    pub user_id: i64,
    pub status: OrderStatusType,
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub number: OrderNumber,
    pub user_id: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(number: OrderNumber, user_id: i64) -> Self {
        Self { number, user_id, uploaded_at: Utc::now() }
    }
}

//--------------------------------------       Balance         ---------------------------------------------------------
/// Lifetime totals for a user. What they can still spend is `earned - withdrawn`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct Balance {
    pub earned: Points,
    pub withdrawn: Points,
}

impl Balance {
    pub fn available(&self) -> Points {
        self.earned - self.withdrawn
    }
}

//--------------------------------------      Withdrawal       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Withdrawal {
    pub id: i64,
    pub user_id: i64,
    pub order_number: OrderNumber,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub user_id: i64,
    pub order_number: OrderNumber,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

impl NewWithdrawal {
    pub fn new(user_id: i64, order_number: OrderNumber, sum: Points) -> Self {
        Self { user_id, order_number, sum, processed_at: Utc::now() }
    }
}

//--------------------------------------      UserAccount      ---------------------------------------------------------
#[derive(Clone, FromRow)]
pub struct UserAccount {
    pub id: i64,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
