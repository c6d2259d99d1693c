//! Core types, the achievement catalog and the evaluation engine for Juegos.
//!
//! This crate is deliberately free of database dependencies. Storage backends
//! implement [`aggregates::Aggregates`] and [`engine::Ledger`]; the engine and
//! every catalog condition are written against those traits only.

pub mod achievement;
pub mod aggregates;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod library;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod testing;
