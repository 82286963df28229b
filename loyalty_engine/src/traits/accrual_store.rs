use lpg_common::Points;

use crate::{
    db_types::{Order, OrderNumber, OrderStatusType},
    traits::{LoyaltyDbError, OutcomeApplied},
};

/// The storage operations the accrual reconciliation worker relies on.
#[allow(async_fn_in_trait)]
pub trait AccrualStore {
    /// Every order whose status is `NEW`, `REGISTERED` or `PROCESSING`, oldest first.
    async fn fetch_non_terminal_orders(&self) -> Result<Vec<Order>, LoyaltyDbError>;

    /// Atomically records the accrual service's verdict for an order.
    ///
    /// * If the order is not terminal, its status (and accrual) are overwritten. If the new status is `PROCESSED`, the
    ///   accrual is added to the owner's earned total in the same transaction.
    /// * If the order is already terminal, nothing changes and [`OutcomeApplied::AlreadyFinal`] is returned. This is
    ///   what makes a replayed `PROCESSED` verdict credit the user exactly once.
    ///
    /// Returns [`LoyaltyDbError::OrderNotFound`] if the number is unknown.
    async fn apply_order_outcome(
        &self,
        number: &OrderNumber,
        status: OrderStatusType,
        accrual: Option<Points>,
    ) -> Result<OutcomeApplied, LoyaltyDbError>;
}
