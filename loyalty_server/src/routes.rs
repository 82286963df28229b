//! Request handler definitions
//!
//! Define each route and its handler here. Everything except the health check is mounted under `/api/user` (see
//! [`crate::server::create_server_instance`]).
//!
//! Handlers must not block the worker thread they run on. All storage access goes through the async engine APIs, and
//! password hashing is moved onto the blocking pool by [`AuthApi`].
use actix_web::{
    get,
    http::header,
    web,
    HttpRequest,
    HttpResponse,
    Responder,
};
use log::*;
use loyalty_engine::{
    db_types::UserAccount,
    traits::{AuthManagement, LedgerManagement, OrderManagement},
    AccountApi,
    AuthApi,
    OrderFlowApi,
    WithdrawalApi,
};

use crate::{
    auth::{AuthenticatedUser, TokenIssuer},
    data_objects::{BalanceResponse, Credentials, JsonResponse, OrderEntry, WithdrawalEntry, WithdrawalRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/register" impl AuthManagement);
/// Creates a new account and logs the user straight in.
///
/// Responds with `409 Conflict` if the login is taken, and `400 Bad Request` if either field is empty.
pub async fn register<A: AuthManagement>(
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<A>>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let Credentials { login, password } = body.into_inner();
    debug!("💻️ POST register for {login}");
    let user = api.register(&login, &password).await?;
    info!("💻️ New user #{} registered as {}", user.id, user.login);
    token_response(&issuer, &user)
}

route!(login => Post "/login" impl AuthManagement);
/// Exchanges a login and password for an access token.
///
/// An unknown login and a wrong password both produce the same `401 Unauthorized` response.
pub async fn login<A: AuthManagement>(
    body: web::Json<Credentials>,
    api: web::Data<AuthApi<A>>,
    issuer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let Credentials { login, password } = body.into_inner();
    debug!("💻️ POST login for {login}");
    let user = api.login(&login, &password).await?;
    token_response(&issuer, &user)
}

fn token_response(issuer: &TokenIssuer, user: &UserAccount) -> Result<HttpResponse, ServerError> {
    let token = issuer.issue_token(user)?;
    trace!("💻️ Issued access token for user #{}", user.id);
    Ok(HttpResponse::Ok()
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .cookie(issuer.cookie(token))
        .json(JsonResponse::success(format!("Logged in as {}", user.login))))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(upload_order => Post "/orders" impl OrderManagement);
/// Uploads a receipt number for accrual.
///
/// The body is the bare number, sent as `text/plain`.
/// * `202 Accepted`: the order is new and has been queued for the accrual service.
/// * `200 OK`: this user already uploaded the number. Nothing changed.
/// * `409 Conflict`: another user owns the number.
/// * `422 Unprocessable Entity`: the number fails the Luhn check.
pub async fn upload_order<A: OrderManagement>(
    req: HttpRequest,
    user: AuthenticatedUser,
    body: String,
    api: web::Data<OrderFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    if !is_plain_text(&req) {
        debug!("💻️ Rejected order upload from user #{} with the wrong content type", user.user_id);
        return Err(ServerError::InvalidRequestBody("Order numbers must be sent as text/plain".into()));
    }
    let number = body.trim();
    if number.is_empty() {
        return Err(ServerError::InvalidRequestBody("The request body is empty".into()));
    }
    debug!("💻️ POST order {number} for user #{}", user.user_id);
    let submission = api.submit_order(user.user_id, number).await?;
    if submission.is_new() {
        Ok(HttpResponse::Accepted().json(JsonResponse::success(format!("Order {number} accepted for processing"))))
    } else {
        Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order {number} was already uploaded"))))
    }
}

fn is_plain_text(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/plain"))
        .unwrap_or(false)
}

route!(my_orders => Get "/orders" impl OrderManagement, LedgerManagement);
/// The user's orders, newest first. `204 No Content` if they have none.
pub async fn my_orders<A: OrderManagement + LedgerManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for user #{}", user.user_id);
    let orders = api.orders_for_user(user.user_id).await?;
    if orders.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let orders = orders.into_iter().map(OrderEntry::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(orders))
}

//----------------------------------------------   Balance  ----------------------------------------------------
route!(my_balance => Get "/balance" impl OrderManagement, LedgerManagement);
pub async fn my_balance<A: OrderManagement + LedgerManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_balance for user #{}", user.user_id);
    let balance = api.balance_for_user(user.user_id).await?;
    Ok(HttpResponse::Ok().json(BalanceResponse::from(balance)))
}

//----------------------------------------------   Withdrawals  ----------------------------------------------------
route!(withdraw => Post "/balance/withdraw" impl LedgerManagement);
/// Spends points against a new receipt number.
///
/// * `402 Payment Required`: the balance does not cover the sum. Nothing is debited.
/// * `409 Conflict`: the receipt was already used for a withdrawal.
/// * `422 Unprocessable Entity`: the receipt number fails the Luhn check.
pub async fn withdraw<A: LedgerManagement>(
    user: AuthenticatedUser,
    body: web::Json<WithdrawalRequest>,
    api: web::Data<WithdrawalApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let WithdrawalRequest { order, sum } = body.into_inner();
    debug!("💻️ POST withdraw {sum} against {order} for user #{}", user.user_id);
    let withdrawal = api.withdraw(user.user_id, &order, sum).await?;
    Ok(HttpResponse::Ok().json(WithdrawalEntry::from(withdrawal)))
}

route!(my_withdrawals => Get "/withdrawals" impl OrderManagement, LedgerManagement);
/// The user's withdrawals, newest first. `204 No Content` if they have none.
pub async fn my_withdrawals<A: OrderManagement + LedgerManagement>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<A>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_withdrawals for user #{}", user.user_id);
    let withdrawals = api.withdrawals_for_user(user.user_id).await?;
    if withdrawals.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }
    let withdrawals = withdrawals.into_iter().map(WithdrawalEntry::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(withdrawals))
}
