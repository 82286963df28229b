//! # Loyalty points gateway server
//! This crate hosts the HTTP front end of the loyalty points gateway, and the background worker that reconciles
//! uploaded orders with the external accrual service. It is responsible for:
//! * Registering users and issuing access tokens.
//! * Accepting receipt (order) numbers from users and queueing them for accrual.
//! * Polling the accrual service and crediting points once an order is processed.
//! * Reporting balances and order history, and debiting points on withdrawal.
//!
//! ## Configuration
//! The server is configured via environment variables and command-line flags. See [config](config/index.html) for
//! more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/user/register`, `/api/user/login`: Account creation and login.
//! * `/api/user/orders`: Upload a receipt number (`POST`), or list your orders (`GET`).
//! * `/api/user/balance`, `/api/user/balance/withdraw`, `/api/user/withdrawals`: Points balance and spending.
pub mod accrual_worker;
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
