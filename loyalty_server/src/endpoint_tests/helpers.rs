use actix_web::{
    http::{header::HeaderMap, StatusCode},
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{TimeZone, Utc};
use log::debug;
use loyalty_engine::db_types::{Order, OrderNumber, OrderStatusType, Points, UserAccount};
use lpg_common::Secret;

use crate::{auth::TokenIssuer, config::AuthConfig, server::json_config};

// A fixed key so that tokens issued here are accepted by the app under test. DO NOT re-use it anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("endpoint-tests-only-9f3a1c".into()),
        token_lifetime: chrono::Duration::hours(1),
        secure_cookie: false,
    }
}

pub fn user(id: i64, login: &str) -> UserAccount {
    UserAccount {
        id,
        login: login.to_string(),
        password_hash: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub fn issue_token(user_id: i64) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(&user(user_id, "alice")).expect("Failed to sign token")
}

pub fn bearer(user_id: i64) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", issue_token(user_id)))
}

pub fn order(number: &str, user_id: i64, status: OrderStatusType, accrual: Option<i64>) -> Order {
    let ts = Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap();
    Order {
        id: 1,
        number: OrderNumber::from(number),
        user_id,
        status,
        accrual: accrual.map(Points::from_points),
        uploaded_at: ts,
        updated_at: ts,
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

/// Sends `req` to an app configured with `configure`, using the same token issuer and JSON settings as the real
/// server.
pub async fn send<F>(req: TestRequest, configure: F) -> Reply
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new()
        .app_data(web::Data::new(TokenIssuer::new(&get_auth_config())))
        .app_data(json_config())
        .service(web::scope("/api/user").configure(configure));
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let headers = res.headers().clone();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    debug!("Response: {status} {body}");
    Reply { status, headers, body }
}
