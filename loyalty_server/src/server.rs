use std::time::Duration;

use accrual_tools::AccrualApi;
use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    http::KeepAlive,
    middleware::{Compress, Logger},
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use loyalty_engine::{AccountApi, AuthApi, OrderFlowApi, SqliteDatabase, WithdrawalApi};
use tokio_util::sync::CancellationToken;

use crate::{
    accrual_worker::start_accrual_worker,
    auth::TokenIssuer,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        LoginRoute,
        MyBalanceRoute,
        MyOrdersRoute,
        MyWithdrawalsRoute,
        RegisterRoute,
        UploadOrderRoute,
        WithdrawRoute,
    },
};

const MAX_DB_CONNECTIONS: u32 = 25;

/// Opens (and migrates) the database, starts the accrual worker and serves HTTP until the server is stopped, e.g. by
/// SIGINT. The worker is then cancelled and awaited before returning.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mut db = SqliteDatabase::new_with_url(&config.database_url, MAX_DB_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Database is ready at {}", config.database_url);
    let oracle = AccrualApi::new(config.accrual.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🧮️ Using the accrual service at {}", config.accrual.base_url);

    let worker_config = config.worker;
    let srv = create_server_instance(config, db.clone())?;
    let shutdown = CancellationToken::new();
    let worker = start_accrual_worker(db.clone(), oracle, worker_config, shutdown.clone());

    let result = srv.await.map_err(ServerError::from);
    info!("🚀️ HTTP server has stopped. Stopping the accrual worker");
    shutdown.cancel();
    if let Err(e) = worker.await {
        error!("🕰️ Accrual worker did not shut down cleanly. {e}");
    }
    if let Err(e) = db.close().await {
        warn!("🗃️ Could not close the database cleanly. {e}");
    }
    result
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let issuer = web::Data::new(TokenIssuer::new(&config.auth));
    let srv = HttpServer::new(move || {
        let orders_api = OrderFlowApi::new(db.clone());
        let accounts_api = AccountApi::new(db.clone());
        let withdrawal_api = WithdrawalApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let user_scope = web::scope("/api/user")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase>::new())
            .service(UploadOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(MyBalanceRoute::<SqliteDatabase>::new())
            .service(WithdrawRoute::<SqliteDatabase>::new())
            .service(MyWithdrawalsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(access_log())
            .wrap(Compress::default())
            .app_data(json_config())
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(withdrawal_api))
            .app_data(web::Data::new(auth_api))
            .app_data(issuer.clone())
            .service(health)
            .service(user_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("🚀️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

pub fn access_log() -> Logger {
    Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lpg::access_log")
}

/// Malformed JSON bodies get the same `{"error": ...}` treatment as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        debug!("💻️ Invalid JSON body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
