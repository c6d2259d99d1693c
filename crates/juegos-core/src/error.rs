//! Error types for `juegos-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("rating must be between 0 and 10, got {0}")]
  RatingOutOfRange(f64),

  #[error("unknown game list: {0:?}")]
  UnknownList(String),

  #[error("unknown ranking order: {0:?}")]
  UnknownOrder(String),

  #[error("unknown ranking period: {0:?}")]
  UnknownPeriod(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
