//! SQLite backend for the Juegos game tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The achievement engine runs on that
//! thread too, against a [`ledger::UserLedger`] borrowing the open
//! transaction.

mod encode;
mod lists;
mod schema;
mod store;

pub mod error;
pub mod ledger;

pub use error::{Error, Result};
pub use store::SqliteStore;
