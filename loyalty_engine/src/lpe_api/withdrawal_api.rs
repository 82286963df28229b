use std::fmt::Debug;

use log::*;
use lpg_common::Points;

use crate::{
    db_types::{NewWithdrawal, OrderNumber, Withdrawal},
    helpers::is_valid_luhn,
    lpe_api::errors::WithdrawalError,
    traits::LedgerManagement,
};

/// `WithdrawalApi` spends a user's points against a receipt number.
pub struct WithdrawalApi<B> {
    db: B,
}

impl<B> Debug for WithdrawalApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WithdrawalApi")
    }
}

impl<B> WithdrawalApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> WithdrawalApi<B>
where B: LedgerManagement
{
    /// Withdraw `sum` points from the user's balance against the receipt `order_number`.
    ///
    /// The balance is checked up front so that obviously unaffordable requests never reach the write path, but the
    /// authoritative check is the conditional debit in [`LedgerManagement::record_withdrawal`]. Nothing is retried
    /// here: every failure is returned to the caller and leaves the ledger untouched.
    pub async fn withdraw(&self, user_id: i64, order_number: &str, sum: Points) -> Result<Withdrawal, WithdrawalError> {
        if !is_valid_luhn(order_number) {
            return Err(WithdrawalError::InvalidOrderNumber(order_number.to_string()));
        }
        if !sum.is_positive() {
            return Err(WithdrawalError::NonPositiveSum(sum));
        }
        let balance = self.db.fetch_balance(user_id).await?;
        if balance.available() < sum {
            debug!("💸️ User #{user_id} asked for {sum}, but only has {}", balance.available());
            return Err(WithdrawalError::InsufficientFunds { available: balance.available(), requested: sum });
        }
        let withdrawal = NewWithdrawal::new(user_id, OrderNumber::from(order_number), sum);
        let record = self.db.record_withdrawal(withdrawal).await?;
        info!("💸️ User #{user_id} withdrew {sum} against receipt {order_number}");
        Ok(record)
    }
}
