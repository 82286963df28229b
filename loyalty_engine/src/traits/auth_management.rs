use crate::{db_types::UserAccount, traits::LoyaltyDbError};

#[allow(async_fn_in_trait)]
pub trait AuthManagement {
    /// Creates a user. Fails with [`LoyaltyDbError::LoginTaken`] if the login exists already.
    async fn create_user(&self, login: &str, password_hash: &str) -> Result<UserAccount, LoyaltyDbError>;

    async fn fetch_user_by_login(&self, login: &str) -> Result<Option<UserAccount>, LoyaltyDbError>;
}
