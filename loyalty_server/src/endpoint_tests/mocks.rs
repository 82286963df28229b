use loyalty_engine::{
    db_types::{Balance, NewOrder, NewWithdrawal, Order, OrderNumber, UserAccount, Withdrawal},
    traits::{AuthManagement, InsertOrderResult, LedgerManagement, LoyaltyDbError, OrderManagement},
};
use mockall::mock;

mock! {
    pub Backend {}
    impl OrderManagement for Backend {
        async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, LoyaltyDbError>;
        async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, LoyaltyDbError>;
        async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, LoyaltyDbError>;
    }
    impl LedgerManagement for Backend {
        async fn fetch_balance(&self, user_id: i64) -> Result<Balance, LoyaltyDbError>;
        async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, LoyaltyDbError>;
        async fn fetch_withdrawals(&self, user_id: i64) -> Result<Vec<Withdrawal>, LoyaltyDbError>;
    }
    impl AuthManagement for Backend {
        async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserAccount, LoyaltyDbError>;
        async fn fetch_user_by_login(&self, login: &str) -> Result<Option<UserAccount>, LoyaltyDbError>;
    }
}
