//! SQLite backend for the loyalty engine.
//!
//! [`SqliteDatabase`] implements every storage trait in [`crate::traits`]. The low-level queries live in [`db`] as
//! plain functions over a `&mut SqliteConnection`, so they can be composed inside a single transaction.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
