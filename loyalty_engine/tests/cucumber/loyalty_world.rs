use std::collections::HashMap;

use cucumber::World;
use log::*;
use loyalty_engine::{
    db_types::Points,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    AccountApi,
    AccrualFlowApi,
    OrderFlowApi,
    SqliteDatabase,
    WithdrawalApi,
};

#[derive(Default, Debug, World)]
pub struct LoyaltyWorld {
    pub system: Option<LoyaltySystem>,
}

#[derive(Debug)]
pub struct LoyaltySystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub users: HashMap<String, i64>,
    pub last_error: Option<String>,
}

impl LoyaltyWorld {
    pub fn system(&mut self) -> &mut LoyaltySystem {
        self.system.as_mut().expect("Loyalty system not initialised. Start with 'Given a fresh install'")
    }
}

impl LoyaltySystem {
    pub async fn new() -> Self {
        let db_path = random_db_path();
        let db = prepare_test_env(&db_path).await;
        debug!("Created database: {db_path}");
        Self { db_path, db, users: HashMap::new(), last_error: None }
    }

    pub fn user_id(&self, login: &str) -> i64 {
        *self.users.get(login).unwrap_or_else(|| panic!("User {login} has not been created"))
    }

    pub fn orders(&self) -> OrderFlowApi<SqliteDatabase> {
        OrderFlowApi::new(self.db.clone())
    }

    pub fn accruals(&self) -> AccrualFlowApi<SqliteDatabase> {
        AccrualFlowApi::new(self.db.clone())
    }

    pub fn withdrawals(&self) -> WithdrawalApi<SqliteDatabase> {
        WithdrawalApi::new(self.db.clone())
    }

    pub fn accounts(&self) -> AccountApi<SqliteDatabase> {
        AccountApi::new(self.db.clone())
    }
}

pub fn points(value: f64) -> Points {
    Points::try_from(value).expect("Not a valid points value")
}
