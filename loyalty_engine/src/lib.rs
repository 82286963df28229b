//! Loyalty Engine
//!
//! The loyalty engine holds the core logic of the loyalty points gateway: users upload receipt numbers, an external
//! accrual service decides how many points each receipt earns, and users spend those points.
//!
//! The library is divided into three main sections:
//! 1. Storage contracts ([`mod@traits`]) and the SQLite backend that implements them. You should never need to access
//!    the database directly. The exception is the data types, which are defined in [`mod@db_types`] and are public.
//! 2. The engine public API ([`mod@lpe_api`]): order uploads, accrual reconciliation, withdrawals, history queries and
//!    user registration. Each API is generic over the storage traits it needs, so it can be tested against mocks.
//! 3. Stateless [`mod@helpers`], such as the Luhn checksum used to validate receipt numbers.
pub mod db_types;
pub mod helpers;
mod lpe_api;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(feature = "test_utils")]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use lpe_api::{
    accounts_api::AccountApi,
    accrual_flow_api::AccrualFlowApi,
    auth_api::AuthApi,
    errors::{AccountApiError, AccrualFlowError, AuthApiError, OrderFlowError, WithdrawalError},
    order_flow_api::OrderFlowApi,
    order_objects,
    withdrawal_api::WithdrawalApi,
};
pub use traits::{
    AccrualStore,
    AuthManagement,
    InsertOrderResult,
    LedgerManagement,
    LoyaltyDbError,
    OrderManagement,
    OutcomeApplied,
};
