use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use super::is_unique_violation;
use crate::{db_types::UserAccount, traits::LoyaltyDbError};

pub async fn create_user(
    login: &str,
    password_hash: &str,
    conn: &mut SqliteConnection,
) -> Result<UserAccount, LoyaltyDbError> {
    let result = sqlx::query_as::<_, UserAccount>(
        "INSERT INTO users (login, password_hash, created_at) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(login)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🧑️ Created user #{} ({})", user.id, user.login);
            Ok(user)
        },
        Err(e) if is_unique_violation(&e) => Err(LoyaltyDbError::LoginTaken(login.to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_user_by_login(login: &str, conn: &mut SqliteConnection) -> Result<Option<UserAccount>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE login = $1").bind(login).fetch_optional(conn).await?;
    Ok(user)
}
