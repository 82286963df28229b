use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewOrder, OrderNumber},
    helpers::is_valid_luhn,
    lpe_api::{errors::OrderFlowError, order_objects::OrderSubmission},
    traits::{InsertOrderResult, OrderManagement},
};

/// `OrderFlowApi` accepts receipt numbers uploaded by users and queues them for the accrual service.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Submit an order number on behalf of `user_id`.
    ///
    /// The number must pass the Luhn check. Uploading the same number twice is a no-op for its owner, and a
    /// [`OrderFlowError::OrderOwnedByAnotherUser`] for everyone else.
    pub async fn submit_order(&self, user_id: i64, number: &str) -> Result<OrderSubmission, OrderFlowError> {
        if !is_valid_luhn(number) {
            debug!("🔄️📦️ Rejecting order [{number}] from user #{user_id}. Checksum failed");
            return Err(OrderFlowError::InvalidOrderNumber(number.to_string()));
        }
        let order = NewOrder::new(OrderNumber::from(number), user_id);
        match self.db.insert_order(order).await? {
            InsertOrderResult::Inserted(order) => {
                info!("🔄️📦️ Order [{}] uploaded by user #{user_id}", order.number);
                Ok(OrderSubmission::Created(order))
            },
            InsertOrderResult::AlreadyExists(order) if order.user_id == user_id => {
                debug!("🔄️📦️ Order [{}] was already uploaded by user #{user_id}", order.number);
                Ok(OrderSubmission::AlreadySubmitted(order))
            },
            InsertOrderResult::AlreadyExists(order) => {
                warn!(
                    "🔄️📦️ User #{user_id} tried to upload order [{}], which belongs to user #{}",
                    order.number, order.user_id
                );
                Err(OrderFlowError::OrderOwnedByAnotherUser(order.number))
            },
        }
    }
}
