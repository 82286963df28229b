//! #  Storage contracts.
//!
//! This module defines the behaviour a storage *backend* has to expose to the loyalty engine. The engine's public API
//! (see [`crate::OrderFlowApi`] and friends) is generic over these traits, so the HTTP layer and the accrual worker
//! never talk to a database directly.
//!
//! * [`OrderManagement`] stores uploaded orders and answers order-history queries.
//! * [`AccrualStore`] is the narrow view the reconciliation worker needs: which orders are still pending, and an atomic
//!   "apply this verdict" operation.
//! * [`LedgerManagement`] owns balances and the append-only withdrawal log.
//! * [`AuthManagement`] stores user credentials.
//!
//! Every mutating method is atomic: either all of its effects are visible or none are.
mod accrual_store;
mod auth_management;
mod data_objects;
mod errors;
mod ledger_management;
mod order_management;

pub use accrual_store::AccrualStore;
pub use auth_management::AuthManagement;
pub use data_objects::{InsertOrderResult, OutcomeApplied};
pub use errors::LoyaltyDbError;
pub use ledger_management::LedgerManagement;
pub use order_management::OrderManagement;
