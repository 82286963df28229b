use chrono::Utc;
use log::{debug, trace};
use lpg_common::Points;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderNumber, OrderStatusType},
    traits::{InsertOrderResult, LoyaltyDbError},
};

/// Inserts the order into the database, or returns the order already on file under the same number.
///
/// The insert is the first statement, so when this runs inside a transaction the write lock is taken up front and
/// concurrent callers serialise on it.
pub async fn idempotent_insert(
    order: NewOrder,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, LoyaltyDbError> {
    let inserted: Option<Order> = sqlx::query_as(
        r#"
            INSERT INTO orders (number, user_id, status, uploaded_at, updated_at)
            VALUES ($1, $2, 'NEW', $3, $3)
            ON CONFLICT (number) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(order.number.as_str())
    .bind(order.user_id)
    .bind(order.uploaded_at)
    .fetch_optional(&mut *conn)
    .await?;
    match inserted {
        Some(order) => {
            debug!("📝️ Order [{}] inserted with id {} for user #{}", order.number, order.id, order.user_id);
            Ok(InsertOrderResult::Inserted(order))
        },
        None => {
            let existing = fetch_order_by_number(&order.number, conn)
                .await?
                .ok_or_else(|| LoyaltyDbError::DatabaseError(format!("Order {} vanished mid-insert", order.number)))?;
            trace!("📝️ Order [{}] already exists (user #{})", existing.number, existing.user_id);
            Ok(InsertOrderResult::AlreadyExists(existing))
        },
    }
}

pub async fn fetch_order_by_number(
    number: &OrderNumber,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE number = $1").bind(number.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Orders uploaded by the user, newest first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY uploaded_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Orders the accrual service still has to rule on, oldest first.
pub async fn fetch_non_terminal_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as(
        r#"
            SELECT * FROM orders
            WHERE status IN ('NEW', 'REGISTERED', 'PROCESSING')
            ORDER BY uploaded_at ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Overwrites status and accrual, but only if the order is not terminal yet. Returns the updated order, or `None` if
/// the order does not exist or was already terminal.
pub async fn update_pending_order(
    number: &OrderNumber,
    status: OrderStatusType,
    accrual: Option<Points>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET status = $1, accrual = $2, updated_at = $3
            WHERE number = $4 AND status IN ('NEW', 'REGISTERED', 'PROCESSING')
            RETURNING *;
        "#,
    )
    .bind(status)
    .bind(accrual.map(|a| a.value()))
    .bind(Utc::now())
    .bind(number.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
