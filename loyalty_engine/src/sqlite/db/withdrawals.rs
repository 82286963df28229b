use log::debug;
use sqlx::SqliteConnection;

use super::is_unique_violation;
use crate::{
    db_types::{NewWithdrawal, Withdrawal},
    traits::LoyaltyDbError,
};

pub async fn insert_withdrawal(
    withdrawal: NewWithdrawal,
    conn: &mut SqliteConnection,
) -> Result<Withdrawal, LoyaltyDbError> {
    let result = sqlx::query_as::<_, Withdrawal>(
        r#"
            INSERT INTO withdrawals (user_id, order_number, sum, processed_at) VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(withdrawal.user_id)
    .bind(withdrawal.order_number.as_str())
    .bind(withdrawal.sum.value())
    .bind(withdrawal.processed_at)
    .fetch_one(conn)
    .await;
    match result {
        Ok(w) => {
            debug!("💸️ Withdrawal #{} of {} against {} recorded for user #{}", w.id, w.sum, w.order_number, w.user_id);
            Ok(w)
        },
        Err(e) if is_unique_violation(&e) => Err(LoyaltyDbError::WithdrawalAlreadyExists(withdrawal.order_number)),
        Err(e) => Err(e.into()),
    }
}

/// The user's withdrawals, newest first.
pub async fn fetch_withdrawals_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Withdrawal>, sqlx::Error> {
    let withdrawals = sqlx::query_as("SELECT * FROM withdrawals WHERE user_id = $1 ORDER BY processed_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(withdrawals)
}
