//! `SqliteDatabase` is a concrete implementation of a loyalty engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use lpg_common::Points;
use sqlx::{migrate, SqlitePool};

use super::db::{balances, new_pool, orders, users, withdrawals};
use crate::{
    db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatusType, UserAccount, Withdrawal},
    traits::{
        AccrualStore,
        AuthManagement,
        InsertOrderResult,
        LedgerManagement,
        LoyaltyDbError,
        OrderManagement,
        OutcomeApplied,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, creating the database file if necessary.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, LoyaltyDbError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), LoyaltyDbError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete for {}", self.url);
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), LoyaltyDbError> {
        self.pool.close().await;
        Ok(())
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LoyaltyDbError> {
        let mut tx = self.pool.begin().await?;
        let result = orders::idempotent_insert(order, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_number(number, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }
}

impl AccrualStore for SqliteDatabase {
    async fn fetch_non_terminal_orders(&self) -> Result<Vec<Order>, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_non_terminal_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn apply_order_outcome(
        &self,
        number: &OrderNumber,
        status: OrderStatusType,
        accrual: Option<Points>,
    ) -> Result<OutcomeApplied, LoyaltyDbError> {
        if status == OrderStatusType::New {
            return Err(LoyaltyDbError::IllegalOutcome(format!("{number} cannot be moved back to NEW")));
        }
        if accrual.is_some_and(|a| a.is_negative()) {
            return Err(LoyaltyDbError::IllegalOutcome(format!("Negative accrual for {number}")));
        }
        // Only processed orders carry an accrual
        let accrual = match status {
            OrderStatusType::Processed => Some(accrual.unwrap_or_default()),
            _ => None,
        };
        let mut tx = self.pool.begin().await?;
        let updated = orders::update_pending_order(number, status, accrual, &mut tx).await?;
        let result = match updated {
            Some(order) => {
                if order.status == OrderStatusType::Processed {
                    let amount = order.accrual.unwrap_or_default();
                    if amount.is_positive() {
                        balances::credit(order.user_id, amount, &mut tx).await?;
                    }
                    debug!("🗃️ Order {} processed. Credited {amount} to user #{}", order.number, order.user_id);
                }
                OutcomeApplied::Updated(order)
            },
            None => {
                let existing = orders::fetch_order_by_number(number, &mut tx)
                    .await?
                    .ok_or_else(|| LoyaltyDbError::OrderNotFound(number.clone()))?;
                trace!("🗃️ Order {number} is already {}. Ignoring {status}", existing.status);
                OutcomeApplied::AlreadyFinal(existing)
            },
        };
        tx.commit().await?;
        Ok(result)
    }
}

impl LedgerManagement for SqliteDatabase {
    async fn fetch_balance(&self, user_id: i64) -> Result<Balance, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        let balance = balances::fetch_balance(user_id, &mut conn).await?;
        Ok(balance)
    }

    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, LoyaltyDbError> {
        let mut tx = self.pool.begin().await?;
        let user_id = withdrawal.user_id;
        let sum = withdrawal.sum;
        if !balances::try_debit(user_id, sum, &mut tx).await? {
            let balance = balances::fetch_balance(user_id, &mut tx).await?;
            tx.rollback().await?;
            return Err(LoyaltyDbError::InsufficientFunds { available: balance.available(), requested: sum });
        }
        // Dropping the transaction on error rolls back the debit as well.
        let record = withdrawals::insert_withdrawal(withdrawal, &mut tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn fetch_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        let withdrawals = withdrawals::fetch_withdrawals_for_user(user_id, &mut conn).await?;
        Ok(withdrawals)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserAccount, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        users::create_user(login, password_hash, &mut conn).await
    }

    async fn fetch_user_by_login(&self, login: &str) -> Result<Option<UserAccount>, LoyaltyDbError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_login(login, &mut conn).await?;
        Ok(user)
    }
}
