use actix_web::{
    http::{
        header::{ContentType, AUTHORIZATION, SET_COOKIE},
        StatusCode,
    },
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use loyalty_engine::{helpers::hash_password, traits::LoyaltyDbError, AuthApi};

use super::{
    helpers::{get_auth_config, send, user},
    mocks::MockBackend,
};
use crate::{
    auth::{TokenIssuer, AUTH_COOKIE},
    routes::{LoginRoute, RegisterRoute},
};

fn configure_with(backend: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(RegisterRoute::<MockBackend>::new())
            .service(LoginRoute::<MockBackend>::new())
            .app_data(web::Data::new(AuthApi::new(backend)));
    }
}

fn post(path: &str, body: &str) -> TestRequest {
    TestRequest::post().uri(path).insert_header(ContentType::json()).set_payload(body.to_string())
}

fn registered_as_alice() -> MockBackend {
    let hash = hash_password("s3cret").expect("Could not hash password");
    let mut backend = MockBackend::new();
    backend.expect_fetch_user_by_login().withf(|login| login == "alice").returning(move |_| {
        let mut alice = user(3, "alice");
        alice.password_hash = hash.clone();
        Ok(Some(alice))
    });
    backend.expect_fetch_user_by_login().returning(|_| Ok(None));
    backend
}

/// Checks that the response carries a valid token for `user_id` in both the header and the cookie.
fn assert_logged_in(reply: &super::helpers::Reply, user_id: i64) {
    let header = reply.headers.get(AUTHORIZATION).expect("No Authorization header").to_str().unwrap();
    let token = header.strip_prefix("Bearer ").expect("Not a bearer token");
    let claims = TokenIssuer::new(&get_auth_config()).validate(token).expect("Token is not valid");
    assert_eq!(claims.sub, user_id.to_string());
    let cookie = reply.headers.get(SET_COOKIE).expect("No cookie was set").to_str().unwrap();
    assert!(cookie.starts_with(&format!("{AUTH_COOKIE}={token}")));
    assert!(cookie.contains("HttpOnly"));
}

#[actix_web::test]
async fn register_new_user() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockBackend::new();
    backend
        .expect_create_user()
        .withf(|login, hash| login == "alice" && hash.starts_with("$argon2"))
        .times(1)
        .returning(|login, _| Ok(user(3, login)));
    let req = post("/api/user/register", r#"{"login":"alice","password":"s3cret"}"#);
    let reply = send(req, configure_with(backend)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_logged_in(&reply, 3);
}

#[actix_web::test]
async fn register_taken_login() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockBackend::new();
    backend.expect_create_user().returning(|login, _| Err(LoyaltyDbError::LoginTaken(login.to_string())));
    let req = post("/api/user/register", r#"{"login":"alice","password":"s3cret"}"#);
    let reply = send(req, configure_with(backend)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert!(reply.headers.get(AUTHORIZATION).is_none());
}

#[actix_web::test]
async fn register_malformed_requests() {
    let _ = env_logger::try_init().ok();
    let req = post("/api/user/register", r#"{"login":"alice","password":""}"#);
    let reply = send(req, configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let reply = send(post("/api/user/register", r#"{"login":"alice"}"#), configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    let req = TestRequest::post().uri("/api/user/register").set_payload("alice:s3cret");
    let reply = send(req, configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn login_with_correct_password() {
    let _ = env_logger::try_init().ok();
    let reply =
        send(post("/api/user/login", r#"{"login":"alice","password":"s3cret"}"#), configure_with(registered_as_alice()))
            .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_logged_in(&reply, 3);
}

#[actix_web::test]
async fn login_failures_look_the_same() {
    let _ = env_logger::try_init().ok();
    let wrong_password =
        send(post("/api/user/login", r#"{"login":"alice","password":"S3cret"}"#), configure_with(registered_as_alice()))
            .await;
    let unknown_user =
        send(post("/api/user/login", r#"{"login":"bob","password":"s3cret"}"#), configure_with(registered_as_alice()))
            .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}
