use crate::db_types::Order;

/// The successful outcomes of an order upload.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderSubmission {
    /// A new order, now waiting for the accrual service.
    Created(Order),
    /// The same user uploaded this number before. Nothing changed.
    AlreadySubmitted(Order),
}

impl OrderSubmission {
    pub fn order(&self) -> &Order {
        match self {
            Self::Created(o) | Self::AlreadySubmitted(o) => o,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}
