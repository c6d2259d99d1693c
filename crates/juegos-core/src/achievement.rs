//! Achievement definitions and the read models the engine hands back.
//!
//! A definition is plain data: display metadata plus a declarative
//! [`Condition`]. Conditions are evaluated against any [`Aggregates`]
//! implementation, so every rule can be exercised without a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{aggregates::Aggregates, catalog};

// ─── Display metadata ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  General,
  #[serde(rename = "mensual")]
  Monthly,
  #[serde(rename = "anual")]
  Yearly,
  Abandonment,
  Terror,
  Soulslike,
  Rpg,
  HackAndSlash,
  Shooters,
  Strategy,
  Indies,
  Metroidvania,
  Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  Insane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
  Common,
  Uncommon,
  Rare,
}

// ─── Conditions ──────────────────────────────────────────────────────────────

/// A scalar read from [`Aggregates`] that a threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
  Completed,
  Pending,
  Abandoned,
  Played,
  CompletedThisMonth,
  CompletedThisYear,
  /// Played entries whose genre names contain this lowercase token.
  Genre(&'static str),
}

impl Metric {
  pub fn read<A: Aggregates + ?Sized>(&self, agg: &A) -> Result<u32, A::Error> {
    match *self {
      Self::Completed => agg.completed_count(),
      Self::Pending => agg.pending_count(),
      Self::Abandoned => agg.abandoned_count(),
      Self::Played => agg.played_count(),
      Self::CompletedThisMonth => agg.completed_this_month(),
      Self::CompletedThisYear => agg.completed_this_year(),
      Self::Genre(token) => agg.played_in_genre(token),
    }
  }
}

/// When an achievement is considered earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
  /// Never true under automatic evaluation; granted only by
  /// [`engine::manual_unlock`](crate::engine::manual_unlock) and never
  /// revoked.
  Manual,
  /// Never true.
  Never,
  /// `metric >= threshold`. The only kind that reports progress.
  AtLeast(Metric, u32),
  /// More abandoned than completed, with at least one completed.
  MoreAbandonedThanCompleted,
  /// At least this many played and none completed.
  PlayedNoneCompleted(u32),
  /// At least this many pending and none completed.
  PendingNoneCompleted(u32),
  /// Some single genre name appears on at least this many played entries.
  SingleGenreAtLeast(u32),
  /// At least this many distinct genre names across played entries.
  DistinctGenresAtLeast(u32),
  /// The user holds exactly one unlock record.
  OnlyOneUnlocked,
  /// Every other catalog entry is unlocked. Evaluated after all others.
  AllOthersUnlocked,
}

/// How far a locked threshold achievement is from unlocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
  pub current: u32,
  pub target:  u32,
}

// ─── Definition ──────────────────────────────────────────────────────────────

/// One immutable catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
  pub id:          &'static str,
  pub title:       &'static str,
  pub description: &'static str,
  pub category:    Category,
  pub difficulty:  Difficulty,
  pub rarity:      Rarity,
  pub icon:        &'static str,
  pub condition:   Condition,
}

impl Achievement {
  /// Evaluate this achievement's condition for the user behind `agg`.
  pub fn check<A: Aggregates + ?Sized>(&self, agg: &A) -> Result<bool, A::Error> {
    Ok(match self.condition {
      Condition::Manual | Condition::Never => false,
      Condition::AtLeast(metric, n) => metric.read(agg)? >= n,
      Condition::MoreAbandonedThanCompleted => {
        let abandoned = agg.abandoned_count()?;
        let completed = agg.completed_count()?;
        abandoned > completed && completed > 0
      }
      Condition::PlayedNoneCompleted(n) => {
        agg.played_count()? >= n && agg.completed_count()? == 0
      }
      Condition::PendingNoneCompleted(n) => {
        agg.pending_count()? >= n && agg.completed_count()? == 0
      }
      Condition::SingleGenreAtLeast(n) => agg.top_genre_count()? >= n,
      Condition::DistinctGenresAtLeast(n) => agg.distinct_genre_count()? >= n,
      Condition::OnlyOneUnlocked => agg.unlock_count()? == 1,
      Condition::AllOthersUnlocked => {
        let others = catalog::CATALOG.len().saturating_sub(1);
        let held = agg.unlock_count_excluding(self.id)?;
        usize::try_from(held).is_ok_and(|held| held >= others)
      }
    })
  }

  /// Current progress towards the threshold, for threshold conditions only.
  pub fn progress<A: Aggregates + ?Sized>(
    &self,
    agg: &A,
  ) -> Result<Option<Progress>, A::Error> {
    match self.condition {
      Condition::AtLeast(metric, target) => Ok(Some(Progress {
        current: metric.read(agg)?,
        target,
      })),
      _ => Ok(None),
    }
  }

  pub fn has_progress(&self) -> bool {
    matches!(self.condition, Condition::AtLeast(..))
  }

  /// Manual achievements are exempt from automatic revocation.
  pub fn is_revocable(&self) -> bool {
    !matches!(self.condition, Condition::Manual)
  }

  /// Whether this entry depends on the unlock state of every other entry.
  pub fn is_meta(&self) -> bool {
    matches!(self.condition, Condition::AllOthersUnlocked)
  }

  pub fn summary(&self, unlocked_at: DateTime<Utc>) -> AchievementSummary {
    AchievementSummary {
      id: self.id,
      title: self.title,
      description: self.description,
      category: self.category,
      difficulty: self.difficulty,
      rarity: self.rarity,
      icon: self.icon,
      unlocked_at,
    }
  }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// An achievement that has just been unlocked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementSummary {
  pub id:          &'static str,
  pub title:       &'static str,
  pub description: &'static str,
  pub category:    Category,
  pub difficulty:  Difficulty,
  pub rarity:      Rarity,
  pub icon:        &'static str,
  pub unlocked_at: DateTime<Utc>,
}

/// One row of a user's achievement listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStatus {
  pub id:          &'static str,
  pub title:       &'static str,
  pub description: &'static str,
  pub category:    Category,
  pub difficulty:  Difficulty,
  pub rarity:      Rarity,
  pub icon:        &'static str,
  pub unlocked_at: Option<DateTime<Utc>>,
  /// Present only while locked, and only for threshold achievements.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub progress:    Option<Progress>,
}
