use crate::{
    db_types::{Balance, NewWithdrawal, Withdrawal},
    traits::LoyaltyDbError,
};

#[allow(async_fn_in_trait)]
pub trait LedgerManagement {
    /// The user's lifetime totals. Users that have never been credited have a zero balance.
    async fn fetch_balance(&self, user_id: i64) -> Result<Balance, LoyaltyDbError>;

    /// Debits the user's balance and appends the withdrawal record as one atomic step.
    ///
    /// The funds check and the debit are a single conditional update, so two concurrent withdrawals can never take the
    /// balance below zero. Fails with [`LoyaltyDbError::InsufficientFunds`] if `earned - withdrawn < sum`, and with
    /// [`LoyaltyDbError::WithdrawalAlreadyExists`] if the receipt number has already been spent. Neither failure
    /// changes any state.
    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, LoyaltyDbError>;

    /// The user's withdrawals, newest first.
    async fn fetch_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, LoyaltyDbError>;
}
