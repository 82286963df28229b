use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use loyalty_engine::{
    db_types::{Order, OrderStatusType},
    traits::InsertOrderResult,
    AccountApi,
    OrderFlowApi,
};
use serde_json::json;

use super::{
    helpers::{bearer, order, send},
    mocks::MockBackend,
};
use crate::routes::{MyOrdersRoute, UploadOrderRoute};

fn configure_with(backend: MockBackend) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(UploadOrderRoute::<MockBackend>::new())
            .service(MyOrdersRoute::<MockBackend>::new())
            .app_data(web::Data::new(OrderFlowApi::new(backend)))
            // History queries go through a second, expectation-free mock
            .app_data(web::Data::new(AccountApi::new(MockBackend::new())));
    }
}

fn configure_history(orders: Vec<Order>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_orders_for_user().withf(|id| *id == 7).returning(move |_| Ok(orders.clone()));
        cfg.service(MyOrdersRoute::<MockBackend>::new()).app_data(web::Data::new(AccountApi::new(backend)));
    }
}

fn upload(number: &str) -> TestRequest {
    TestRequest::post().uri("/api/user/orders").insert_header(ContentType::plaintext()).set_payload(number.to_string())
}

#[actix_web::test]
async fn upload_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let reply = send(upload("79927398713"), configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(reply.json()["error"].as_str().unwrap().contains("No access token"));
}

#[actix_web::test]
async fn upload_rejects_forged_tokens() {
    let _ = env_logger::try_init().ok();
    let (name, mut value) = bearer(7);
    let len = value.len();
    value.replace_range(len - 6..len - 1, "AAAAA");
    let reply = send(upload("79927398713").insert_header((name, value)), configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn new_orders_are_accepted() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockBackend::new();
    backend
        .expect_insert_order()
        .withf(|o| o.number.as_str() == "79927398713" && o.user_id == 7)
        .times(1)
        .returning(|o| {
            let inserted = order(o.number.as_str(), o.user_id, OrderStatusType::New, None);
            Ok(InsertOrderResult::Inserted(inserted))
        });
    let reply = send(upload("79927398713").insert_header(bearer(7)), configure_with(backend)).await;
    assert_eq!(reply.status, StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn repeat_uploads_are_ok() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockBackend::new();
    backend.expect_insert_order().returning(|o| {
        Ok(InsertOrderResult::AlreadyExists(order(o.number.as_str(), 7, OrderStatusType::Processing, None)))
    });
    // Surrounding whitespace is ignored
    let reply = send(upload(" 79927398713\n").insert_header(bearer(7)), configure_with(backend)).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[actix_web::test]
async fn orders_owned_by_someone_else_conflict() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockBackend::new();
    backend.expect_insert_order().returning(|o| {
        Ok(InsertOrderResult::AlreadyExists(order(o.number.as_str(), 8, OrderStatusType::New, None)))
    });
    let reply = send(upload("79927398713").insert_header(bearer(7)), configure_with(backend)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn bad_checksums_are_unprocessable() {
    let _ = env_logger::try_init().ok();
    let reply = send(upload("79927398710").insert_header(bearer(7)), configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    let reply = send(upload("abc123").insert_header(bearer(7)), configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn uploads_must_be_plain_text() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(ContentType::json())
        .insert_header(bearer(7))
        .set_payload(r#""79927398713""#);
    let reply = send(req, configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(upload("   ").insert_header(bearer(7)), configure_with(MockBackend::new())).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn no_orders_is_no_content() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/user/orders").insert_header(bearer(7));
    let reply = send(req, configure_history(vec![])).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(reply.body.is_empty());
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let orders = vec![
        order("12345678903", 7, OrderStatusType::Processed, Some(500)),
        order("79927398713", 7, OrderStatusType::Processing, None),
    ];
    let req = TestRequest::get().uri("/api/user/orders").insert_header(bearer(7));
    let reply = send(req, configure_history(orders)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.json(),
        json!([
            { "number": "12345678903", "status": "PROCESSED", "accrual": 500.0, "uploaded_at": "2024-03-15T18:30:00Z" },
            { "number": "79927398713", "status": "PROCESSING", "uploaded_at": "2024-03-15T18:30:00Z" },
        ])
    );
}
