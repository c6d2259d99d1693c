//! [`SqliteStore`], the game tracker backed by a single SQLite file.
//!
//! Every mutating operation runs as one `call` on the connection thread and
//! one transaction: the list change, revocation and evaluation commit
//! together or not at all.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, params};
use tracing::{debug, info};

use juegos_core::{
  achievement::{AchievementStatus, AchievementSummary},
  catalog::ENTRY_ACHIEVEMENT,
  engine,
  library::{
    Competition, CompetitionRow, Game, GameList, Library, NewGame, Period, Placed, Placement,
    PlayedEntry, QueuedEntry, Ranking, RankingOrder, Reevaluated, Removed, User, Welcomed,
  },
};

use crate::{
  Error, Result,
  encode::{
    EncodedGame, GAME_COLUMNS, RawGame, RawPlayed, RawQueued, encode_dt, list_table, now,
  },
  ledger::UserLedger,
  lists,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A game tracker store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ─── Users ─────────────────────────────────────────────────────────────────

  /// Create the user unless the slug is taken, then return the stored row.
  pub async fn ensure_user(&self, name: &str, slug: &str) -> Result<User> {
    let name = name.to_owned();
    let slug = slug.to_owned();
    let user = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO users (name, slug) VALUES (?1, ?2)",
          params![name, slug],
        )?;
        let user = conn.query_row(
          "SELECT id, name, slug FROM users WHERE slug = ?1",
          params![slug],
          |r| Ok(User { id: r.get(0)?, name: r.get(1)?, slug: r.get(2)? }),
        )?;
        Ok(user)
      })
      .await?;
    Ok(user)
  }

  /// All users, by name.
  pub async fn list_users(&self) -> Result<Vec<User>> {
    let users = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT id, name, slug FROM users ORDER BY name")?;
        let rows = stmt
          .query_map([], |r| Ok(User { id: r.get(0)?, name: r.get(1)?, slug: r.get(2)? }))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(users)
  }

  pub async fn user(&self, slug: &str) -> Result<Option<User>> {
    let slug = slug.to_owned();
    let user = self
      .conn
      .call(move |conn| {
        let user = conn
          .query_row(
            "SELECT id, name, slug FROM users WHERE slug = ?1",
            params![slug],
            |r| Ok(User { id: r.get(0)?, name: r.get(1)?, slug: r.get(2)? }),
          )
          .optional()?;
        Ok(user)
      })
      .await?;
    Ok(user)
  }

  async fn require_user(&self, slug: &str) -> Result<User> {
    self.user(slug).await?.ok_or_else(|| Error::UserNotFound(slug.to_owned()))
  }

  // ─── Games ─────────────────────────────────────────────────────────────────

  /// Cache a catalog game, keeping the existing row if its `rawg_id` is known.
  pub async fn upsert_game(&self, game: &NewGame) -> Result<Game> {
    let encoded = EncodedGame::new(game)?;
    let raw = self
      .conn
      .call(move |conn| {
        let id = lists::get_or_create_game(conn, &encoded)?;
        let raw = conn.query_row(
          &format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.id = ?1"),
          params![id],
          |r| RawGame::from_row(r, 0),
        )?;
        Ok(raw)
      })
      .await?;
    Ok(raw.into_game())
  }

  pub async fn game(&self, game_id: i64) -> Result<Option<Game>> {
    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!("SELECT {GAME_COLUMNS} FROM games g WHERE g.id = ?1"),
            params![game_id],
            |r| RawGame::from_row(r, 0),
          )
          .optional()?;
        Ok(raw)
      })
      .await?;
    Ok(raw.map(RawGame::into_game))
  }

  // ─── Triggers ──────────────────────────────────────────────────────────────

  /// Cache `game` and place it in a list for `slug`, in one transaction.
  pub async fn record(&self, slug: &str, game: &NewGame, placement: Placement) -> Result<Placed> {
    let user = self.require_user(slug).await?;
    let encoded = EncodedGame::new(game)?;
    let now = now();

    let placed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let game_id = lists::get_or_create_game(&tx, &encoded)?;
        let placed = place(&tx, user.id, game_id, &placement, now)?;
        tx.commit()?;
        Ok(placed)
      })
      .await?;

    log_placed(slug, &placed);
    Ok(placed)
  }

  /// Place an already cached game in a list for `slug`.
  pub async fn move_game(
    &self,
    slug: &str,
    game_id: i64,
    placement: Placement,
  ) -> Result<Placed> {
    let user = self.require_user(slug).await?;
    let now = now();

    let placed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !lists::game_exists(&tx, game_id)? {
          return Ok(None);
        }
        let placed = place(&tx, user.id, game_id, &placement, now)?;
        tx.commit()?;
        Ok(Some(placed))
      })
      .await?
      .ok_or(Error::GameNotFound(game_id))?;

    log_placed(slug, &placed);
    Ok(placed)
  }

  /// Mark a played game as completed or abandoned, then revoke and
  /// re-evaluate.
  pub async fn set_completed(
    &self,
    slug: &str,
    game_id: i64,
    completed: bool,
  ) -> Result<Reevaluated> {
    let user = self.require_user(slug).await?;
    let now = now();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !lists::set_completed(&tx, user.id, game_id, completed)? {
          return Ok(None);
        }
        let ledger = UserLedger::new(&tx, user.id, now);
        let revoked = engine::revoke_if_invalid(&ledger)?;
        let newly_unlocked = engine::evaluate_and_unlock(&ledger, now)?;
        tx.commit()?;
        Ok(Some(Reevaluated { newly_unlocked, revoked }))
      })
      .await?
      .ok_or(Error::NotInList { game_id, list: GameList::Played })?;

    debug!(user = slug, game_id, completed, "completion flag set");
    log_unlocks(slug, &outcome.newly_unlocked);
    log_revocations(slug, &outcome.revoked);
    Ok(outcome)
  }

  /// Take a game out of one list and revoke what no longer holds.
  pub async fn remove(&self, slug: &str, game_id: i64, list: GameList) -> Result<Removed> {
    let user = self.require_user(slug).await?;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = lists::remove(&tx, user.id, game_id, list)?;
        let ledger = UserLedger::new(&tx, user.id, now());
        let revoked = engine::revoke_if_invalid(&ledger)?;
        tx.commit()?;
        Ok(Removed { removed, revoked })
      })
      .await?;

    debug!(user = slug, game_id, %list, removed = outcome.removed, "removed from list");
    log_revocations(slug, &outcome.revoked);
    Ok(outcome)
  }

  /// Grant the entry achievement. Later calls grant nothing.
  pub async fn first_login(&self, slug: &str) -> Result<Welcomed> {
    let newly_unlocked = self
      .unlock_achievement(slug, ENTRY_ACHIEVEMENT)
      .await?
      .into_iter()
      .collect();
    Ok(Welcomed { newly_unlocked })
  }

  // ─── Achievements ──────────────────────────────────────────────────────────

  /// Run evaluate-and-unlock for `slug` on its own.
  pub async fn evaluate_achievements(&self, slug: &str) -> Result<Vec<AchievementSummary>> {
    let unlocked = self
      .with_ledger(slug, |ledger, now| engine::evaluate_and_unlock(ledger, now))
      .await?;
    log_unlocks(slug, &unlocked);
    Ok(unlocked)
  }

  /// Run revoke-if-invalid for `slug` on its own.
  pub async fn revoke_achievements(&self, slug: &str) -> Result<Vec<String>> {
    let revoked = self.with_ledger(slug, |ledger, _| engine::revoke_if_invalid(ledger)).await?;
    log_revocations(slug, &revoked);
    Ok(revoked)
  }

  /// Unlock an achievement without checking its condition. `None` if the id
  /// is unknown or already unlocked.
  pub async fn unlock_achievement(
    &self,
    slug: &str,
    achievement_id: &str,
  ) -> Result<Option<AchievementSummary>> {
    let id = achievement_id.to_owned();
    let unlocked = self
      .with_ledger(slug, move |ledger, now| engine::manual_unlock(ledger, &id, now))
      .await?;
    if let Some(summary) = &unlocked {
      log_unlocks(slug, std::slice::from_ref(summary));
    }
    Ok(unlocked)
  }

  /// Every catalog entry with its unlock time or current progress.
  pub async fn achievements(&self, slug: &str) -> Result<Vec<AchievementStatus>> {
    self.with_ledger(slug, |ledger, _| engine::standings(ledger)).await
  }

  /// Run `f` against the ledger of `slug` inside one transaction.
  async fn with_ledger<F, R>(&self, slug: &str, f: F) -> Result<R>
  where
    F: FnOnce(&UserLedger<'_>, DateTime<Utc>) -> rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let user = self.require_user(slug).await?;
    let now = now();
    let out = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let out = f(&UserLedger::new(&tx, user.id, now), now)?;
        tx.commit()?;
        Ok(out)
      })
      .await?;
    Ok(out)
  }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  /// The three lists of `slug`. Played entries best rated first.
  pub async fn library(&self, slug: &str) -> Result<Library> {
    let user = self.require_user(slug).await?;
    let played = self.played_entries(user.id, RankingOrder::Rating).await?;
    let pending = self.queued_entries(user.id, GameList::Pending).await?;
    let in_progress = self.queued_entries(user.id, GameList::InProgress).await?;
    Ok(Library { user, played, pending, in_progress })
  }

  /// Played entries of `slug`, descending by `order`.
  pub async fn ranking(&self, slug: &str, order: RankingOrder) -> Result<Ranking> {
    let user = self.require_user(slug).await?;
    let ranking = self.played_entries(user.id, order).await?;
    Ok(Ranking { user, ranking })
  }

  /// Played entries per user inside `period`, most first. Users with no
  /// entries are listed with a zero count.
  pub async fn competition(&self, period: Period) -> Result<Competition> {
    let since = period.since(now());
    let since_str = since.map(encode_dt);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT u.id, u.name, u.slug, COUNT(up.id) AS count
           FROM users u
           LEFT JOIN user_played up
             ON up.user_id = u.id AND (?1 IS NULL OR up.played_at >= ?1)
           GROUP BY u.id
           ORDER BY count DESC, u.name",
        )?;
        let rows = stmt
          .query_map(params![since_str], |r| {
            Ok(CompetitionRow {
              user:  User { id: r.get(0)?, name: r.get(1)?, slug: r.get(2)? },
              count: r.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(Competition { period, since, ranking: rows })
  }

  /// Every list holding `game_id` for `slug`.
  pub async fn lists_containing(&self, slug: &str, game_id: i64) -> Result<Vec<GameList>> {
    let user = self.require_user(slug).await?;
    let lists = self
      .conn
      .call(move |conn| Ok(lists::lists_containing(conn, user.id, game_id)?))
      .await?;
    Ok(lists)
  }

  async fn played_entries(&self, user_id: i64, order: RankingOrder) -> Result<Vec<PlayedEntry>> {
    let order_by = match order {
      RankingOrder::Rating => "up.rating DESC, up.played_at DESC",
      RankingOrder::PlayedAt => "up.played_at DESC",
    };
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GAME_COLUMNS}, up.rating, up.opinion, up.completed, up.played_at
           FROM user_played up
           JOIN games g ON g.id = up.game_id
           WHERE up.user_id = ?1
           ORDER BY {order_by}"
        ))?;
        let rows = stmt
          .query_map(params![user_id], RawPlayed::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawPlayed::into_entry).collect()
  }

  async fn queued_entries(&self, user_id: i64, list: GameList) -> Result<Vec<QueuedEntry>> {
    let table = list_table(list);
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {GAME_COLUMNS}, q.added_at
           FROM {table} q
           JOIN games g ON g.id = q.game_id
           WHERE q.user_id = ?1
           ORDER BY q.added_at DESC"
        ))?;
        let rows = stmt
          .query_map(params![user_id], RawQueued::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawQueued::into_entry).collect()
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Move a game and bring the user's achievements up to date.
///
/// Revocation runs when the move displaced the game from another list or
/// flipped the completion flag of an existing played entry.
fn place(
  conn: &rusqlite::Connection,
  user_id: i64,
  game_id: i64,
  placement: &Placement,
  now: DateTime<Utc>,
) -> rusqlite::Result<Placed> {
  let moved = lists::move_to_list(conn, user_id, game_id, placement, now)?;
  let ledger = UserLedger::new(conn, user_id, now);

  let revoked = if moved.displaced.is_empty() && !moved.reflagged {
    Vec::new()
  } else {
    engine::revoke_if_invalid(&ledger)?
  };
  let newly_unlocked = engine::evaluate_and_unlock(&ledger, now)?;

  Ok(Placed { game_id, list: placement.list(), at: moved.at, newly_unlocked, revoked })
}

fn log_placed(slug: &str, placed: &Placed) {
  debug!(user = slug, game_id = placed.game_id, list = %placed.list, "game placed");
  log_unlocks(slug, &placed.newly_unlocked);
  log_revocations(slug, &placed.revoked);
}

fn log_unlocks(slug: &str, unlocked: &[AchievementSummary]) {
  for summary in unlocked {
    info!(user = slug, achievement = summary.id, "achievement unlocked");
  }
}

fn log_revocations(slug: &str, revoked: &[String]) {
  for id in revoked {
    info!(user = slug, achievement = %id, "achievement revoked");
  }
}
