use crate::{
    db_types::{NewOrder, Order, OrderNumber},
    traits::{InsertOrderResult, LoyaltyDbError},
};

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Stores a new order with status `NEW` in a single atomic step.
    ///
    /// This call is idempotent on the order number: if the number is already on file (for any user), nothing is
    /// written and the existing order is returned as [`InsertOrderResult::AlreadyExists`]. Concurrent inserts of the
    /// same number result in exactly one row.
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LoyaltyDbError>;

    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, LoyaltyDbError>;

    /// All orders uploaded by the user, newest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LoyaltyDbError>;
}
