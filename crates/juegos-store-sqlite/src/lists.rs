//! Synchronous list mutations, run inside a caller-owned transaction.
//!
//! [`move_to_list`] is the only way a game enters a list, which keeps every
//! (user, game) pair in at most one of them.

use chrono::{DateTime, Utc};
use juegos_core::library::{GameList, Placement};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::encode::{EncodedGame, column_dt, encode_dt, list_table};

/// What [`move_to_list`] did.
#[derive(Debug)]
pub struct Moved {
  /// `played_at` for played entries, `added_at` otherwise.
  pub at:        DateTime<Utc>,
  /// Lists the game was removed from to make the move.
  pub displaced: Vec<GameList>,
  /// An existing played entry changed between completed and abandoned.
  pub reflagged: bool,
}

/// Return the internal id of the game with this catalog id, inserting it
/// first if it is not cached yet. An existing row is left untouched.
pub fn get_or_create_game(conn: &Connection, game: &EncodedGame) -> rusqlite::Result<i64> {
  conn
    .prepare_cached(
      "INSERT INTO games (
         rawg_id, name, released, image_url, genres, platforms, metacritic, raw_json
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
       ON CONFLICT(rawg_id) DO NOTHING",
    )?
    .execute(params![
      game.rawg_id,
      game.name,
      game.released,
      game.image_url,
      game.genres,
      game.platforms,
      game.metacritic,
      game.raw_json,
    ])?;
  conn
    .prepare_cached("SELECT id FROM games WHERE rawg_id = ?1")?
    .query_row(params![game.rawg_id], |r| r.get(0))
}

pub fn game_exists(conn: &Connection, game_id: i64) -> rusqlite::Result<bool> {
  conn
    .prepare_cached("SELECT EXISTS(SELECT 1 FROM games WHERE id = ?1)")?
    .query_row(params![game_id], |r| r.get(0))
}

/// Put `game_id` in the list named by `placement`, removing it from the
/// other two.
///
/// Re-recording a played game overwrites rating, opinion and completion and
/// refreshes `played_at`. Re-adding a queued game keeps its `added_at`.
pub fn move_to_list(
  conn: &Connection,
  user_id: i64,
  game_id: i64,
  placement: &Placement,
  now: DateTime<Utc>,
) -> rusqlite::Result<Moved> {
  let target = placement.list();

  let mut displaced = Vec::new();
  for list in GameList::ALL.into_iter().filter(|l| *l != target) {
    if remove(conn, user_id, game_id, list)? {
      displaced.push(list);
    }
  }

  let mut reflagged = false;
  let at = match placement {
    Placement::Played { rating, opinion, completed } => {
      let previous: Option<bool> = conn
        .prepare_cached("SELECT completed FROM user_played WHERE user_id = ?1 AND game_id = ?2")?
        .query_row(params![user_id, game_id], |r| r.get(0))
        .optional()?;
      reflagged = previous.is_some_and(|was| was != *completed);
      conn
        .prepare_cached(
          "INSERT INTO user_played (user_id, game_id, rating, opinion, completed, played_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(user_id, game_id) DO UPDATE SET
             rating    = excluded.rating,
             opinion   = excluded.opinion,
             completed = excluded.completed,
             played_at = excluded.played_at",
        )?
        .execute(params![user_id, game_id, rating.get(), opinion, completed, encode_dt(now)])?;
      now
    }
    Placement::Pending | Placement::InProgress => {
      let table = list_table(target);
      conn
        .prepare_cached(&format!(
          "INSERT INTO {table} (user_id, game_id, added_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(user_id, game_id) DO NOTHING"
        ))?
        .execute(params![user_id, game_id, encode_dt(now)])?;
      conn
        .prepare_cached(&format!(
          "SELECT added_at FROM {table} WHERE user_id = ?1 AND game_id = ?2"
        ))?
        .query_row(params![user_id, game_id], |r| column_dt(r, 0))?
    }
  };

  Ok(Moved { at, displaced, reflagged })
}

/// Delete `game_id` from one list. Returns `false` if it was not there.
pub fn remove(
  conn: &Connection,
  user_id: i64,
  game_id: i64,
  list: GameList,
) -> rusqlite::Result<bool> {
  let table = list_table(list);
  let changed = conn
    .prepare_cached(&format!("DELETE FROM {table} WHERE user_id = ?1 AND game_id = ?2"))?
    .execute(params![user_id, game_id])?;
  Ok(changed > 0)
}

/// Set the completion flag of a played entry. Returns `false` if the game is
/// not in the played list.
pub fn set_completed(
  conn: &Connection,
  user_id: i64,
  game_id: i64,
  completed: bool,
) -> rusqlite::Result<bool> {
  let changed = conn
    .prepare_cached(
      "UPDATE user_played SET completed = ?3 WHERE user_id = ?1 AND game_id = ?2",
    )?
    .execute(params![user_id, game_id, completed])?;
  Ok(changed > 0)
}

/// Every list holding `game_id` for this user. At most one outside of a
/// broken invariant.
pub fn lists_containing(
  conn: &Connection,
  user_id: i64,
  game_id: i64,
) -> rusqlite::Result<Vec<GameList>> {
  let mut lists = Vec::new();
  for list in GameList::ALL {
    let table = list_table(list);
    let found = conn
      .prepare_cached(&format!("SELECT 1 FROM {table} WHERE user_id = ?1 AND game_id = ?2"))?
      .query_row(params![user_id, game_id], |_| Ok(()))
      .optional()?;
    if found.is_some() {
      lists.push(list);
    }
  }
  Ok(lists)
}
