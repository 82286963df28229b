//! Read-only queries about a user's orders and points.

use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Balance, Order, Withdrawal},
    lpe_api::errors::AccountApiError,
    traits::{LedgerManagement, OrderManagement},
};

/// The `AccountApi` provides a unified API for a user's order history, balance and withdrawals.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: OrderManagement + LedgerManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Orders uploaded by the user, newest first.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, AccountApiError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        trace!("User #{user_id} has {} orders", orders.len());
        Ok(orders)
    }

    pub async fn balance_for_user(&self, user_id: i64) -> Result<Balance, AccountApiError> {
        let balance = self.db.fetch_balance(user_id).await?;
        Ok(balance)
    }

    /// Withdrawals made by the user, newest first.
    pub async fn withdrawals_for_user(&self, user_id: i64) -> Result<Vec<Withdrawal>, AccountApiError> {
        let withdrawals = self.db.fetch_withdrawals(user_id).await?;
        trace!("User #{user_id} has {} withdrawals", withdrawals.len());
        Ok(withdrawals)
    }
}
