//! # Loyalty engine public API
//!
//! The `lpe_api` module exposes the programmatic API for the loyalty engine. The API is modular, so that clients can
//! pick the functionality they need, and each piece only asks for the storage traits it actually uses.
//!
//! * [`order_flow_api`] accepts order uploads from users.
//! * [`accrual_flow_api`] is what the reconciliation worker uses to find pending orders and record verdicts.
//! * [`withdrawal_api`] spends points.
//! * [`accounts_api`] answers the read-only history and balance queries.
//! * [`auth_api`] registers users and checks their credentials.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the required traits:
//!
//! ```rust,ignore
//! use loyalty_engine::{AccountApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/loyalty.db", 5).await?;
//! // SqliteDatabase implements OrderManagement and LedgerManagement
//! let api = AccountApi::new(db);
//! let balance = api.balance_for_user(user_id).await?;
//! ```
pub mod accounts_api;
pub mod accrual_flow_api;
pub mod auth_api;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod withdrawal_api;
