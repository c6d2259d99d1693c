//! Error type for `juegos-store-sqlite`.

use juegos_core::library::GameList;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] juegos_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("game not found: {0}")]
  GameNotFound(i64),

  /// The game is not in the list the operation requires.
  #[error("game {game_id} is not in the {list} list")]
  NotInList { game_id: i64, list: GameList },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
