use cucumber::{then, when};
use loyalty_engine::db_types::{OrderNumber, OrderStatusType, Points};

use crate::cucumber::{loyalty_world::points, LoyaltyWorld};

#[when(expr = "{word} uploads order {word}")]
async fn upload_order(world: &mut LoyaltyWorld, login: String, number: String) {
    let system = world.system();
    let user_id = system.user_id(&login);
    let result = system.orders().submit_order(user_id, &number).await;
    system.last_error = result.err().map(|e| e.to_string());
}

#[when(expr = "the accrual service reports order {word} as {word}")]
async fn report_status(world: &mut LoyaltyWorld, number: String, status: String) {
    apply_verdict(world, number, status, None).await;
}

#[when(expr = "the accrual service reports order {word} as {word} with {float} points")]
async fn report_accrual(world: &mut LoyaltyWorld, number: String, status: String, amount: f64) {
    apply_verdict(world, number, status, Some(points(amount))).await;
}

async fn apply_verdict(world: &mut LoyaltyWorld, number: String, status: String, accrual: Option<Points>) {
    let system = world.system();
    let status = status.parse::<OrderStatusType>().expect("Not a valid order status");
    let result = system.accruals().apply_outcome(&OrderNumber::from(number), status, accrual).await;
    system.last_error = result.err().map(|e| e.to_string());
}

#[when(expr = "{word} withdraws {float} points against receipt {word}")]
async fn withdraw(world: &mut LoyaltyWorld, login: String, amount: f64, receipt: String) {
    let system = world.system();
    let user_id = system.user_id(&login);
    let result = system.withdrawals().withdraw(user_id, &receipt, points(amount)).await;
    system.last_error = result.err().map(|e| e.to_string());
}

#[then(expr = "order {word} has status {word}")]
async fn check_status(world: &mut LoyaltyWorld, number: String, status: String) {
    let system = world.system();
    let order = loyalty_engine::OrderManagement::fetch_order_by_number(&system.db, &OrderNumber::from(number.as_str()))
        .await
        .expect("Error fetching order")
        .unwrap_or_else(|| panic!("Order {number} does not exist"));
    assert_eq!(order.status.to_string(), status);
}

#[then(expr = "order {word} belongs to {word}")]
async fn check_owner(world: &mut LoyaltyWorld, number: String, login: String) {
    let system = world.system();
    let user_id = system.user_id(&login);
    let orders = system.accounts().orders_for_user(user_id).await.expect("Error fetching orders");
    assert!(orders.iter().any(|o| o.number.as_str() == number), "{login} does not own order {number}");
}

#[then(expr = "{word} has earned {float} points")]
async fn check_earned(world: &mut LoyaltyWorld, login: String, amount: f64) {
    let system = world.system();
    let balance = system.accounts().balance_for_user(system.user_id(&login)).await.expect("Error fetching balance");
    assert_eq!(balance.earned, points(amount));
}

#[then(expr = "{word} has withdrawn {float} points")]
async fn check_withdrawn(world: &mut LoyaltyWorld, login: String, amount: f64) {
    let system = world.system();
    let balance = system.accounts().balance_for_user(system.user_id(&login)).await.expect("Error fetching balance");
    assert_eq!(balance.withdrawn, points(amount));
}

#[then(expr = "{word} has {float} points available")]
async fn check_available(world: &mut LoyaltyWorld, login: String, amount: f64) {
    let system = world.system();
    let balance = system.accounts().balance_for_user(system.user_id(&login)).await.expect("Error fetching balance");
    assert_eq!(balance.available(), points(amount));
}

#[then(expr = "{word} has {int} withdrawal(s)")]
async fn check_withdrawal_count(world: &mut LoyaltyWorld, login: String, count: usize) {
    let system = world.system();
    let history =
        system.accounts().withdrawals_for_user(system.user_id(&login)).await.expect("Error fetching withdrawals");
    assert_eq!(history.len(), count);
}

#[then(expr = "there are {int} pending orders")]
async fn check_pending(world: &mut LoyaltyWorld, count: usize) {
    let pending = world.system().accruals().pending_orders().await.expect("Error fetching pending orders");
    assert_eq!(pending.len(), count);
}

#[then("the last request succeeded")]
async fn check_success(world: &mut LoyaltyWorld) {
    let system = world.system();
    assert!(system.last_error.is_none(), "Expected success, got {:?}", system.last_error);
}

#[then(expr = "the last request failed with {string}")]
async fn check_failure(world: &mut LoyaltyWorld, message: String) {
    let system = world.system();
    match &system.last_error {
        Some(e) => assert!(e.contains(&message), "Expected an error containing '{message}', got '{e}'"),
        None => panic!("Expected an error containing '{message}', but the request succeeded"),
    }
}
