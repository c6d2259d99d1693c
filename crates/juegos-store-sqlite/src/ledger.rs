//! [`UserLedger`], the per-user view the achievement engine runs against.
//!
//! A ledger borrows a connection (in practice an open transaction) and never
//! commits; the caller owns the transaction boundary.

use chrono::{DateTime, Utc};
use juegos_core::{
  aggregates::{
    Aggregates, count_in_genre, distinct_genres, genre_names, largest_genre_group,
    month_start, year_start,
  },
  engine::{Ledger, UnlockRecord},
};
use rusqlite::{Connection, params};

use crate::encode::{column_dt, encode_dt};

pub struct UserLedger<'c> {
  conn:    &'c Connection,
  user_id: i64,
  now:     DateTime<Utc>,
}

impl<'c> UserLedger<'c> {
  /// `now` fixes the calendar windows and is not used for unlock timestamps.
  pub fn new(conn: &'c Connection, user_id: i64, now: DateTime<Utc>) -> Self {
    Self { conn, user_id, now }
  }

  fn count(&self, sql: &str) -> rusqlite::Result<u32> {
    self.conn.prepare_cached(sql)?.query_row(params![self.user_id], |r| r.get(0))
  }

  fn completed_since(&self, since: DateTime<Utc>) -> rusqlite::Result<u32> {
    self
      .conn
      .prepare_cached(
        "SELECT COUNT(*) FROM user_played
         WHERE user_id = ?1 AND completed = 1 AND played_at >= ?2",
      )?
      .query_row(params![self.user_id, encode_dt(since)], |r| r.get(0))
  }

  /// Genre names of every played entry, one list per entry.
  fn played_genres(&self) -> rusqlite::Result<Vec<Vec<String>>> {
    let mut stmt = self.conn.prepare_cached(
      "SELECT g.genres FROM user_played up
       JOIN games g ON g.id = up.game_id
       WHERE up.user_id = ?1",
    )?;
    let rows = stmt.query_map(params![self.user_id], |r| r.get::<_, Option<String>>(0))?;
    rows
      .map(|raw| raw.map(|raw| genre_names(raw.as_deref())))
      .collect()
  }
}

impl Aggregates for UserLedger<'_> {
  type Error = rusqlite::Error;

  fn pending_count(&self) -> rusqlite::Result<u32> {
    self.count("SELECT COUNT(*) FROM user_pending WHERE user_id = ?1")
  }

  fn completed_count(&self) -> rusqlite::Result<u32> {
    self.count("SELECT COUNT(*) FROM user_played WHERE user_id = ?1 AND completed = 1")
  }

  fn abandoned_count(&self) -> rusqlite::Result<u32> {
    self.count("SELECT COUNT(*) FROM user_played WHERE user_id = ?1 AND completed = 0")
  }

  fn played_count(&self) -> rusqlite::Result<u32> {
    self.count("SELECT COUNT(*) FROM user_played WHERE user_id = ?1")
  }

  fn completed_this_month(&self) -> rusqlite::Result<u32> {
    self.completed_since(month_start(self.now))
  }

  fn completed_this_year(&self) -> rusqlite::Result<u32> {
    self.completed_since(year_start(self.now))
  }

  fn played_in_genre(&self, token: &str) -> rusqlite::Result<u32> {
    let genres = self.played_genres()?;
    Ok(count_in_genre(genres.iter().map(Vec::as_slice), token))
  }

  fn distinct_genre_count(&self) -> rusqlite::Result<u32> {
    let genres = self.played_genres()?;
    Ok(distinct_genres(genres.iter().map(Vec::as_slice)))
  }

  fn top_genre_count(&self) -> rusqlite::Result<u32> {
    let genres = self.played_genres()?;
    Ok(largest_genre_group(genres.iter().map(Vec::as_slice)))
  }

  fn unlock_count(&self) -> rusqlite::Result<u32> {
    self.count("SELECT COUNT(*) FROM user_achievements WHERE user_id = ?1")
  }

  fn unlock_count_excluding(&self, achievement_id: &str) -> rusqlite::Result<u32> {
    self
      .conn
      .prepare_cached(
        "SELECT COUNT(*) FROM user_achievements
         WHERE user_id = ?1 AND achievement_id != ?2",
      )?
      .query_row(params![self.user_id, achievement_id], |r| r.get(0))
  }
}

impl Ledger for UserLedger<'_> {
  fn is_unlocked(&self, achievement_id: &str) -> rusqlite::Result<bool> {
    self
      .conn
      .prepare_cached(
        "SELECT EXISTS(
           SELECT 1 FROM user_achievements WHERE user_id = ?1 AND achievement_id = ?2
         )",
      )?
      .query_row(params![self.user_id, achievement_id], |r| r.get(0))
  }

  fn unlocked(&self) -> rusqlite::Result<Vec<UnlockRecord>> {
    let mut stmt = self.conn.prepare_cached(
      "SELECT achievement_id, unlocked_at FROM user_achievements
       WHERE user_id = ?1
       ORDER BY unlocked_at, rowid",
    )?;
    let rows = stmt.query_map(params![self.user_id], |r| {
      Ok(UnlockRecord { achievement_id: r.get(0)?, unlocked_at: column_dt(r, 1)? })
    })?;
    rows.collect()
  }

  fn insert_unlock(&self, achievement_id: &str, at: DateTime<Utc>) -> rusqlite::Result<bool> {
    let changed = self
      .conn
      .prepare_cached(
        "INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at)
         VALUES (?1, ?2, ?3)",
      )?
      .execute(params![self.user_id, achievement_id, encode_dt(at)])?;
    Ok(changed == 1)
  }

  fn delete_unlock(&self, achievement_id: &str) -> rusqlite::Result<bool> {
    let changed = self
      .conn
      .prepare_cached(
        "DELETE FROM user_achievements WHERE user_id = ?1 AND achievement_id = ?2",
      )?
      .execute(params![self.user_id, achievement_id])?;
    Ok(changed == 1)
  }
}
