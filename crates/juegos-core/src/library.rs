//! Users, games and the three game lists, plus the outcome types returned by
//! the list-mutation triggers.
//!
//! A (user, game) pair lives in at most one list at a time. Callers never
//! touch lists directly; they hand a [`Placement`] to the store, which moves
//! the game and re-runs the achievement engine.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  achievement::AchievementSummary,
  aggregates::{month_start, year_start},
};

// ─── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:   i64,
  pub name: String,
  pub slug: String,
}

// ─── Games ───────────────────────────────────────────────────────────────────

/// Catalog metadata for a game, as supplied by the external catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
  pub rawg_id:    i64,
  pub name:       String,
  pub released:   Option<String>,
  pub image_url:  Option<String>,
  #[serde(default)]
  pub genres:     Vec<String>,
  #[serde(default)]
  pub platforms:  Vec<String>,
  pub metacritic: Option<i64>,
}

/// A cached catalog game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
  pub id:         i64,
  pub rawg_id:    i64,
  pub name:       String,
  pub released:   Option<String>,
  pub image_url:  Option<String>,
  pub genres:     Vec<String>,
  pub metacritic: Option<i64>,
}

// ─── Lists ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameList {
  Played,
  Pending,
  InProgress,
}

impl GameList {
  pub const ALL: [GameList; 3] = [Self::Played, Self::Pending, Self::InProgress];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Played => "played",
      Self::Pending => "pending",
      Self::InProgress => "in_progress",
    }
  }
}

impl fmt::Display for GameList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for GameList {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "played" | "jugados" => Ok(Self::Played),
      "pending" | "pendientes" => Ok(Self::Pending),
      "in_progress" | "in-progress" | "jugando" => Ok(Self::InProgress),
      other => Err(Error::UnknownList(other.to_owned())),
    }
  }
}

/// A rating between 0 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Rating(f64);

impl Rating {
  pub fn new(value: f64) -> Result<Self> {
    if (0.0..=10.0).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::RatingOutOfRange(value))
    }
  }

  pub fn get(self) -> f64 { self.0 }
}

/// Where a game should end up for a user.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
  /// Record as played. Re-recording overwrites rating, opinion and
  /// completion and refreshes the timestamp.
  Played {
    rating:    Rating,
    opinion:   Option<String>,
    completed: bool,
  },
  Pending,
  InProgress,
}

impl Placement {
  pub fn list(&self) -> GameList {
    match self {
      Self::Played { .. } => GameList::Played,
      Self::Pending => GameList::Pending,
      Self::InProgress => GameList::InProgress,
    }
  }
}

// ─── Read models ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayedEntry {
  #[serde(flatten)]
  pub game:      Game,
  pub rating:    f64,
  pub opinion:   Option<String>,
  pub completed: bool,
  pub played_at: DateTime<Utc>,
}

/// An entry of the pending or in-progress list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueuedEntry {
  #[serde(flatten)]
  pub game:     Game,
  pub added_at: DateTime<Utc>,
}

/// Everything a user has in their three lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Library {
  pub user:        User,
  /// Best rated first, then most recent.
  pub played:      Vec<PlayedEntry>,
  /// Most recently added first.
  pub pending:     Vec<QueuedEntry>,
  pub in_progress: Vec<QueuedEntry>,
}

// ─── Rankings ────────────────────────────────────────────────────────────────

/// Sort key for a user's played ranking, always descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingOrder {
  #[default]
  Rating,
  PlayedAt,
}

impl FromStr for RankingOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().as_str() {
      "rating" => Ok(Self::Rating),
      "played_at" | "played-at" => Ok(Self::PlayedAt),
      _ => Err(Error::UnknownOrder(s.to_owned())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
  pub user:    User,
  pub ranking: Vec<PlayedEntry>,
}

/// Window for the cross-user competition ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
  Month,
  Year,
  #[default]
  All,
}

impl Period {
  /// Start of the window containing `now`; `None` for all time.
  pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match self {
      Self::Month => Some(month_start(now)),
      Self::Year => Some(year_start(now)),
      Self::All => None,
    }
  }
}

impl FromStr for Period {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().as_str() {
      "month" => Ok(Self::Month),
      "year" => Ok(Self::Year),
      "all" => Ok(Self::All),
      _ => Err(Error::UnknownPeriod(s.to_owned())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionRow {
  pub user:  User,
  /// Played entries (completed or abandoned) inside the window.
  pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competition {
  pub period:  Period,
  pub since:   Option<DateTime<Utc>>,
  pub ranking: Vec<CompetitionRow>,
}

// ─── Trigger outcomes ────────────────────────────────────────────────────────

/// Result of moving a game into a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placed {
  pub game_id:        i64,
  pub list:           GameList,
  /// `played_at` for played entries, `added_at` otherwise.
  pub at:             DateTime<Utc>,
  pub newly_unlocked: Vec<AchievementSummary>,
  /// Non-empty only when the move displaced the game from another list.
  pub revoked:        Vec<String>,
}

/// Result of toggling the completion flag of a played entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reevaluated {
  pub newly_unlocked: Vec<AchievementSummary>,
  pub revoked:        Vec<String>,
}

/// Result of removing a game from a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Removed {
  /// `false` if the game was not in that list.
  pub removed: bool,
  pub revoked: Vec<String>,
}

/// Result of the first-login grant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcomed {
  /// Zero or one element.
  pub newly_unlocked: Vec<AchievementSummary>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn rating_bounds() {
    assert!(Rating::new(0.0).is_ok());
    assert!(Rating::new(10.0).is_ok());
    assert_eq!(Rating::new(7.5).unwrap().get(), 7.5);
    assert!(matches!(Rating::new(10.5), Err(Error::RatingOutOfRange(_))));
    assert!(matches!(Rating::new(-1.0), Err(Error::RatingOutOfRange(_))));
    assert!(Rating::new(f64::NAN).is_err());
  }

  #[test]
  fn list_names() {
    for list in GameList::ALL {
      assert_eq!(list.as_str().parse::<GameList>().unwrap(), list);
    }
    assert_eq!("jugando".parse::<GameList>().unwrap(), GameList::InProgress);
    assert!(matches!("wishlist".parse::<GameList>(), Err(Error::UnknownList(_))));
  }

  #[test]
  fn period_windows() {
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
    assert_eq!(
      Period::Month.since(now),
      Some(Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(
      Period::Year.since(now),
      Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(Period::All.since(now), None);
    assert_eq!("MONTH".parse::<Period>().unwrap(), Period::Month);
  }

  #[test]
  fn placement_lists() {
    let played = Placement::Played {
      rating:    Rating::new(8.0).unwrap(),
      opinion:   None,
      completed: true,
    };
    assert_eq!(played.list(), GameList::Played);
    assert_eq!(Placement::Pending.list(), GameList::Pending);
    assert_eq!(Placement::InProgress.list(), GameList::InProgress);
  }

  #[test]
  fn outcomes_use_camel_case() {
    let placed = Placed {
      game_id:        3,
      list:           GameList::InProgress,
      at:             Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
      newly_unlocked: vec![],
      revoked:        vec![],
    };
    let json = serde_json::to_value(&placed).unwrap();
    assert_eq!(json["gameId"], 3);
    assert_eq!(json["list"], "in_progress");
    assert!(json["newlyUnlocked"].as_array().unwrap().is_empty());
  }
}
