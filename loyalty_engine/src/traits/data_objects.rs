use crate::db_types::Order;

/// Result of an idempotent order insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOrderResult {
    /// The order number was new and has been stored with status `NEW`.
    Inserted(Order),
    /// The order number was already on file. The stored order is returned untouched; it may belong to someone else.
    AlreadyExists(Order),
}

impl InsertOrderResult {
    pub fn order(&self) -> &Order {
        match self {
            Self::Inserted(o) | Self::AlreadyExists(o) => o,
        }
    }
}

/// What happened when an accrual verdict was applied to an order.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeApplied {
    /// The order moved to the new status. If it became `PROCESSED`, its accrual has been added to the owner's balance.
    Updated(Order),
    /// The order had already reached a terminal status, so nothing was changed.
    AlreadyFinal(Order),
}

impl OutcomeApplied {
    pub fn order(&self) -> &Order {
        match self {
            Self::Updated(o) | Self::AlreadyFinal(o) => o,
        }
    }
}
