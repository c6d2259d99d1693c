//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with millisecond precision,
//! so lexical order matches chronological order. List-valued game metadata is
//! stored as compact JSON.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use juegos_core::{
  aggregates::genre_names,
  library::{Game, GameList, NewGame, PlayedEntry, QueuedEntry},
};
use rusqlite::{Row, types::Type};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store persists.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Millis, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Read a timestamp column inside a row mapper.
pub fn column_dt(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let raw: String = row.get(idx)?;
  decode_dt(&raw)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── GameList ────────────────────────────────────────────────────────────────

pub fn list_table(list: GameList) -> &'static str {
  match list {
    GameList::Played => "user_played",
    GameList::Pending => "user_pending",
    GameList::InProgress => "user_in_progress",
  }
}

// ─── JSON lists ──────────────────────────────────────────────────────────────

pub fn encode_names(names: &[String]) -> Result<String> { Ok(serde_json::to_string(names)?) }

/// A [`NewGame`] with every column already in its stored form, ready to move
/// into a connection closure.
pub struct EncodedGame {
  pub rawg_id:    i64,
  pub name:       String,
  pub released:   Option<String>,
  pub image_url:  Option<String>,
  pub genres:     String,
  pub platforms:  String,
  pub metacritic: Option<i64>,
  pub raw_json:   String,
}

impl EncodedGame {
  pub fn new(game: &NewGame) -> Result<Self> {
    Ok(Self {
      rawg_id:    game.rawg_id,
      name:       game.name.clone(),
      released:   game.released.clone(),
      image_url:  game.image_url.clone(),
      genres:     encode_names(&game.genres)?,
      platforms:  encode_names(&game.platforms)?,
      metacritic: game.metacritic,
      raw_json:   serde_json::to_string(game)?,
    })
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for a [`RawGame`], with the `games` table aliased as `g`.
pub const GAME_COLUMNS: &str =
  "g.id, g.rawg_id, g.name, g.released, g.image_url, g.genres, g.metacritic";

/// Number of columns in [`GAME_COLUMNS`].
pub const GAME_COLUMN_COUNT: usize = 7;

/// Raw values read directly from a `games` row.
pub struct RawGame {
  pub id:         i64,
  pub rawg_id:    i64,
  pub name:       String,
  pub released:   Option<String>,
  pub image_url:  Option<String>,
  pub genres:     Option<String>,
  pub metacritic: Option<i64>,
}

impl RawGame {
  /// Read [`GAME_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(at)?,
      rawg_id:    row.get(at + 1)?,
      name:       row.get(at + 2)?,
      released:   row.get(at + 3)?,
      image_url:  row.get(at + 4)?,
      genres:     row.get(at + 5)?,
      metacritic: row.get(at + 6)?,
    })
  }

  pub fn into_game(self) -> Game {
    Game {
      id:         self.id,
      rawg_id:    self.rawg_id,
      name:       self.name,
      released:   self.released,
      image_url:  self.image_url,
      genres:     genre_names(self.genres.as_deref()),
      metacritic: self.metacritic,
    }
  }
}

/// A `user_played` row joined with its game.
pub struct RawPlayed {
  pub game:      RawGame,
  pub rating:    f64,
  pub opinion:   Option<String>,
  pub completed: bool,
  pub played_at: String,
}

impl RawPlayed {
  /// Read [`GAME_COLUMNS`] followed by rating, opinion, completed, played_at.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    let n = GAME_COLUMN_COUNT;
    Ok(Self {
      game:      RawGame::from_row(row, 0)?,
      rating:    row.get(n)?,
      opinion:   row.get(n + 1)?,
      completed: row.get(n + 2)?,
      played_at: row.get(n + 3)?,
    })
  }

  pub fn into_entry(self) -> Result<PlayedEntry> {
    Ok(PlayedEntry {
      game:      self.game.into_game(),
      rating:    self.rating,
      opinion:   self.opinion,
      completed: self.completed,
      played_at: decode_dt(&self.played_at)?,
    })
  }
}

/// A `user_pending` or `user_in_progress` row joined with its game.
pub struct RawQueued {
  pub game:     RawGame,
  pub added_at: String,
}

impl RawQueued {
  /// Read [`GAME_COLUMNS`] followed by added_at.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      game:     RawGame::from_row(row, 0)?,
      added_at: row.get(GAME_COLUMN_COUNT)?,
    })
  }

  pub fn into_entry(self) -> Result<QueuedEntry> {
    Ok(QueuedEntry { game: self.game.into_game(), added_at: decode_dt(&self.added_at)? })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let a = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap() + chrono::Duration::milliseconds(5);
    let c = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
    assert_eq!(encode_dt(a), "2026-10-01T00:00:00.000Z");
    assert!(encode_dt(a) < encode_dt(b));
    assert!(encode_dt(b) < encode_dt(c));
  }

  #[test]
  fn timestamps_roundtrip_at_store_precision() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn encoded_genres_read_back() {
    let game = NewGame {
      rawg_id: 3328,
      name: "The Witcher 3: Wild Hunt".into(),
      genres: vec!["Action".into(), "RPG".into()],
      ..Default::default()
    };
    let encoded = EncodedGame::new(&game).unwrap();
    assert_eq!(encoded.genres, r#"["Action","RPG"]"#);
    assert_eq!(encoded.platforms, "[]");
    assert_eq!(genre_names(Some(&encoded.genres)), game.genres);
    let raw: serde_json::Value = serde_json::from_str(&encoded.raw_json).unwrap();
    assert_eq!(raw["rawg_id"], 3328);
  }
}
