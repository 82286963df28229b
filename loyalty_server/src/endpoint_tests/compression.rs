use std::io::{Read, Write};

use actix_web::{
    dev::{Service, ServiceResponse},
    http::{
        header::{ContentType, ACCEPT_ENCODING, CONTENT_ENCODING},
        StatusCode,
    },
    middleware::Compress,
    test,
    test::TestRequest,
    web,
    App,
};
use chrono::{TimeZone, Utc};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use loyalty_engine::{
    db_types::{Balance, Points, Withdrawal},
    WithdrawalApi,
};

use super::{
    helpers::{bearer, get_auth_config},
    mocks::MockBackend,
};
use crate::{
    auth::TokenIssuer,
    routes::WithdrawRoute,
    server::{access_log, json_config},
};

fn gzip(data: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn gunzip(data: &[u8]) -> String {
    let mut decoded = String::new();
    GzDecoder::new(data).read_to_string(&mut decoded).expect("Response body is not gzip");
    decoded
}

fn backend_with_withdrawals() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_fetch_balance().returning(|_| {
        Ok(Balance { earned: Points::from_points(800), withdrawn: Points::default() })
    });
    backend.expect_record_withdrawal().returning(|w| {
        Ok(Withdrawal {
            id: 1,
            user_id: w.user_id,
            order_number: w.order_number,
            sum: w.sum,
            processed_at: Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
        })
    });
    backend
}

/// Middleware stack as mounted by `create_server_instance`.
async fn call(req: TestRequest, backend: MockBackend) -> ServiceResponse {
    let app = App::new()
        .wrap(access_log())
        .wrap(Compress::default())
        .app_data(json_config())
        .app_data(web::Data::new(TokenIssuer::new(&get_auth_config())))
        .app_data(web::Data::new(WithdrawalApi::new(backend)))
        .service(web::scope("/api/user").service(WithdrawRoute::<MockBackend>::new()));
    let service = test::init_service(app).await;
    service.call(req.to_request()).await.expect("Request failed").map_into_boxed_body()
}

fn gzipped_withdrawal(body: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .insert_header(ContentType::json())
        .insert_header((CONTENT_ENCODING, "gzip"))
        .insert_header((ACCEPT_ENCODING, "gzip"))
        .insert_header(bearer(7))
        .set_payload(gzip(body))
}

#[actix_web::test]
async fn gzip_bodies_are_decoded_and_replies_compressed() {
    let _ = env_logger::try_init().ok();
    let req = gzipped_withdrawal(r#"{"order": "2377225624", "sum": 751.5}"#);
    let res = call(req, backend_with_withdrawals()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(CONTENT_ENCODING).map(|v| v.to_str().unwrap()), Some("gzip"));
    let body = test::read_body(res).await;
    let reply: serde_json::Value = serde_json::from_str(&gunzip(&body)).unwrap();
    assert_eq!(reply["order"], "2377225624");
    assert_eq!(reply["sum"], 751.5);
}

#[actix_web::test]
async fn plain_replies_without_accept_encoding() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/api/user/balance/withdraw")
        .insert_header(ContentType::json())
        .insert_header(bearer(7))
        .set_payload(r#"{"order": "2377225624", "sum": 10}"#);
    let res = call(req, backend_with_withdrawals()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(CONTENT_ENCODING).is_none());
    let reply: serde_json::Value = serde_json::from_slice(&test::read_body(res).await).unwrap();
    assert_eq!(reply["sum"], 10.0);
}

#[actix_web::test]
async fn malformed_gzip_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut backend = MockBackend::new();
    backend.expect_record_withdrawal().never();
    let res = call(gzipped_withdrawal(r#"{"order": "2377225624", "sum": "#), backend).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let gzipped = res.headers().get(CONTENT_ENCODING).is_some_and(|v| v == "gzip");
    let body = test::read_body(res).await;
    let body = if gzipped { gunzip(&body) } else { String::from_utf8_lossy(&body).into_owned() };
    let reply: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(reply["error"].is_string());
}
