use std::fmt::Debug;

use log::*;
use lpg_common::Points;

use crate::{
    db_types::{Order, OrderNumber, OrderStatusType},
    lpe_api::errors::AccrualFlowError,
    traits::{AccrualStore, OutcomeApplied},
};

/// `AccrualFlowApi` is the engine-side half of accrual reconciliation. It hands out the orders still waiting for a
/// verdict and records verdicts, crediting points exactly once per order.
pub struct AccrualFlowApi<B> {
    db: B,
}

impl<B> Debug for AccrualFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccrualFlowApi")
    }
}

impl<B> AccrualFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AccrualFlowApi<B>
where B: AccrualStore
{
    /// Orders in `NEW`, `REGISTERED` or `PROCESSING`, oldest first.
    pub async fn pending_orders(&self) -> Result<Vec<Order>, AccrualFlowError> {
        let orders = self.db.fetch_non_terminal_orders().await?;
        Ok(orders)
    }

    /// Records a verdict from the accrual service.
    ///
    /// A `PROCESSED` verdict without an accrual credits nothing. Accruals that arrive with any other status are
    /// ignored. Negative accruals and attempts to move an order back to `NEW` are rejected without touching storage.
    pub async fn apply_outcome(
        &self,
        number: &OrderNumber,
        status: OrderStatusType,
        accrual: Option<Points>,
    ) -> Result<OutcomeApplied, AccrualFlowError> {
        if status == OrderStatusType::New {
            return Err(AccrualFlowError::InvalidOutcome(format!("{number} cannot be moved back to NEW")));
        }
        if let Some(a) = accrual.filter(|a| a.is_negative()) {
            return Err(AccrualFlowError::InvalidOutcome(format!("Negative accrual {a} for {number}")));
        }
        let accrual = match (status, accrual) {
            (OrderStatusType::Processed, None) => {
                warn!("🔄️🧮️ Order {number} is PROCESSED but carries no accrual. Crediting nothing.");
                Some(Points::default())
            },
            (OrderStatusType::Processed, a) => a,
            (s, Some(a)) => {
                debug!("🔄️🧮️ Ignoring accrual of {a} for order {number} in state {s}");
                None
            },
            (_, None) => None,
        };
        let result = self.db.apply_order_outcome(number, status, accrual).await?;
        match &result {
            OutcomeApplied::Updated(order) => {
                debug!("🔄️🧮️ Order {} is now {} (accrual: {:?})", order.number, order.status, order.accrual)
            },
            OutcomeApplied::AlreadyFinal(order) => {
                debug!("🔄️🧮️ Order {} was already {}. Verdict {status} ignored", order.number, order.status)
            },
        }
        Ok(result)
    }
}
