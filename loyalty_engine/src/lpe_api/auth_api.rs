use std::fmt::Debug;

use log::*;

use crate::{
    db_types::UserAccount,
    helpers::{hash_password, verify_password},
    lpe_api::errors::AuthApiError,
    traits::AuthManagement,
};

/// `AuthApi` registers users and checks their credentials. Issuing access tokens is left to the caller.
pub struct AuthApi<B> {
    db: B,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B>
where B: AuthManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a new user. Logins are case-sensitive and must be unique.
    pub async fn register(&self, login: &str, password: &str) -> Result<UserAccount, AuthApiError> {
        validate_credentials(login, password)?;
        let password = password.to_string();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?
            .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?;
        let user = self.db.create_user(login, &hash).await?;
        info!("🔑️ Registered new user #{} ({})", user.id, user.login);
        Ok(user)
    }

    /// Returns the user if the password matches. An unknown login and a wrong password are indistinguishable.
    pub async fn login(&self, login: &str, password: &str) -> Result<UserAccount, AuthApiError> {
        validate_credentials(login, password)?;
        let user = self.db.fetch_user_by_login(login).await?.ok_or_else(|| {
            debug!("🔑️ Login attempt for unknown user {login}");
            AuthApiError::InvalidCredentials
        })?;
        let password = password.to_string();
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?;
        if !valid {
            debug!("🔑️ Wrong password for user #{}", user.id);
            return Err(AuthApiError::InvalidCredentials);
        }
        Ok(user)
    }
}

fn validate_credentials(login: &str, password: &str) -> Result<(), AuthApiError> {
    if login.trim().is_empty() {
        return Err(AuthApiError::MalformedCredentials("login cannot be empty".into()));
    }
    if password.is_empty() {
        return Err(AuthApiError::MalformedCredentials("password cannot be empty".into()));
    }
    Ok(())
}
