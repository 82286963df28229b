use chrono::Utc;
use lpg_common::Points;
use sqlx::SqliteConnection;

use crate::db_types::Balance;

/// Users without a balance row have never been credited, and so have a zero balance.
pub async fn fetch_balance(user_id: i64, conn: &mut SqliteConnection) -> Result<Balance, sqlx::Error> {
    let balance: Option<Balance> = sqlx::query_as("SELECT earned, withdrawn FROM balances WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(balance.unwrap_or_default())
}

/// Adds `amount` to the user's earned total, creating the balance row if needed.
pub async fn credit(user_id: i64, amount: Points, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO balances (user_id, earned, withdrawn, updated_at) VALUES ($1, $2, 0, $3)
            ON CONFLICT (user_id) DO UPDATE SET earned = earned + excluded.earned, updated_at = excluded.updated_at
        "#,
    )
    .bind(user_id)
    .bind(amount.value())
    .bind(Utc::now())
    .execute(conn)
    .await?;
    Ok(())
}

/// Adds `amount` to the user's withdrawn total if, and only if, at least that much is available. The check and the
/// debit are one statement. Returns `false` (and changes nothing) when funds are insufficient.
pub async fn try_debit(user_id: i64, amount: Points, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE balances SET withdrawn = withdrawn + $1, updated_at = $2
            WHERE user_id = $3 AND earned - withdrawn >= $1
        "#,
    )
    .bind(amount.value())
    .bind(Utc::now())
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}
