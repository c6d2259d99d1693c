//! The achievement evaluation engine.
//!
//! Every operation runs synchronously against a [`Ledger`], which is scoped
//! to one user and typically wraps a single storage transaction. Storage
//! errors are returned unchanged; the engine never retries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
  achievement::{Achievement, AchievementStatus, AchievementSummary},
  aggregates::Aggregates,
  catalog::{self, CATALOG},
};

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// A persisted unlock: user `X` earned achievement `achievement_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockRecord {
  pub achievement_id: String,
  pub unlocked_at:    DateTime<Utc>,
}

/// Unlock-record access for one user, on top of that user's aggregates.
pub trait Ledger: Aggregates {
  fn is_unlocked(&self, achievement_id: &str) -> Result<bool, Self::Error>;

  /// All unlock records, oldest first.
  fn unlocked(&self) -> Result<Vec<UnlockRecord>, Self::Error>;

  /// Insert an unlock record. Returns `false` when a record for this
  /// achievement already exists; that outcome is not an error.
  fn insert_unlock(
    &self,
    achievement_id: &str,
    at: DateTime<Utc>,
  ) -> Result<bool, Self::Error>;

  /// Delete an unlock record. Returns `false` if there was none.
  fn delete_unlock(&self, achievement_id: &str) -> Result<bool, Self::Error>;
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// Catalog entries in evaluation order: every ordinary entry in declaration
/// order, then the entries that depend on the others' unlock state.
fn evaluation_order() -> impl Iterator<Item = &'static Achievement> {
  let ordinary = CATALOG.iter().filter(|a| !a.is_meta());
  let meta = CATALOG.iter().filter(|a| a.is_meta());
  ordinary.chain(meta)
}

/// Unlock every achievement whose condition now holds.
///
/// Returns summaries of the achievements unlocked by this call, in
/// evaluation order. A second call with no intervening change returns an
/// empty list.
pub fn evaluate_and_unlock<L: Ledger + ?Sized>(
  ledger: &L,
  now: DateTime<Utc>,
) -> Result<Vec<AchievementSummary>, L::Error> {
  let mut unlocked = Vec::new();

  for achievement in evaluation_order() {
    if ledger.is_unlocked(achievement.id)? {
      continue;
    }
    if !achievement.check(ledger)? {
      continue;
    }
    // Lost a race with a concurrent writer: already unlocked, nothing to report.
    if ledger.insert_unlock(achievement.id, now)? {
      unlocked.push(achievement.summary(now));
    }
  }

  Ok(unlocked)
}

/// Delete unlock records whose condition no longer holds.
///
/// The manual entry achievement is never revoked, and records whose id is
/// not in the catalog are left alone. Returns the revoked ids.
pub fn revoke_if_invalid<L: Ledger + ?Sized>(ledger: &L) -> Result<Vec<String>, L::Error> {
  let mut records: Vec<(&'static Achievement, UnlockRecord)> = ledger
    .unlocked()?
    .into_iter()
    .filter_map(|record| catalog::find(&record.achievement_id).map(|a| (a, record)))
    .filter(|(a, _)| a.is_revocable())
    .collect();
  // Meta entries must see the outcome of every other revocation.
  records.sort_by_key(|(a, _)| a.is_meta());

  let mut revoked = Vec::new();
  for (achievement, record) in records {
    if achievement.check(ledger)? {
      continue;
    }
    // Another writer may have deleted it first; only report our own deletes.
    if ledger.delete_unlock(achievement.id)? {
      revoked.push(record.achievement_id);
    }
  }

  Ok(revoked)
}

/// Unlock `achievement_id` without evaluating its condition.
///
/// Returns `None` for an unknown id or an achievement the user already
/// holds. Only the first-login flow should call this.
pub fn manual_unlock<L: Ledger + ?Sized>(
  ledger: &L,
  achievement_id: &str,
  now: DateTime<Utc>,
) -> Result<Option<AchievementSummary>, L::Error> {
  let Some(achievement) = catalog::find(achievement_id) else {
    return Ok(None);
  };
  if ledger.is_unlocked(achievement.id)? {
    return Ok(None);
  }
  let inserted = ledger.insert_unlock(achievement.id, now)?;
  Ok(inserted.then(|| achievement.summary(now)))
}

/// The full catalog as seen by one user: unlock time where unlocked, and
/// progress where locked and measurable.
pub fn standings<L: Ledger + ?Sized>(ledger: &L) -> Result<Vec<AchievementStatus>, L::Error> {
  let unlocked: HashMap<String, DateTime<Utc>> = ledger
    .unlocked()?
    .into_iter()
    .map(|r| (r.achievement_id, r.unlocked_at))
    .collect();

  CATALOG
    .iter()
    .map(|a| {
      let unlocked_at = unlocked.get(a.id).copied();
      let progress = match unlocked_at {
        Some(_) => None,
        None => a.progress(ledger)?,
      };
      Ok(AchievementStatus {
        id: a.id,
        title: a.title,
        description: a.description,
        category: a.category,
        difficulty: a.difficulty,
        rarity: a.rarity,
        icon: a.icon,
        unlocked_at,
        progress,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{
    achievement::Progress,
    catalog::{ENTRY_ACHIEVEMENT, META_ACHIEVEMENT},
    testing::{FakeLedger, StorageDown},
  };

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap() }

  fn ids(summaries: &[AchievementSummary]) -> Vec<&'static str> {
    summaries.iter().map(|s| s.id).collect()
  }

  #[test]
  fn empty_history_unlocks_nothing() {
    let ledger = FakeLedger::default();
    assert!(evaluate_and_unlock(&ledger, now()).unwrap().is_empty());
  }

  #[test]
  fn completed_thresholds() {
    let ledger = FakeLedger { completed: 5, month: 5, year: 5, ..Default::default() };

    let unlocked = ids(&evaluate_and_unlock(&ledger, now()).unwrap());
    assert!(unlocked.contains(&"uno_completado"));
    assert!(unlocked.contains(&"cinco_completados"));
    assert!(!unlocked.contains(&"diez_completados"));
    assert!(!unlocked.contains(&ENTRY_ACHIEVEMENT));
  }

  #[test]
  fn evaluation_is_idempotent() {
    let ledger = FakeLedger { completed: 3, pending: 4, ..Default::default() };

    assert!(!evaluate_and_unlock(&ledger, now()).unwrap().is_empty());
    assert!(evaluate_and_unlock(&ledger, now()).unwrap().is_empty());
  }

  #[test]
  fn summaries_carry_metadata_and_timestamp() {
    let ledger = FakeLedger { pending: 3, ..Default::default() };
    manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap();
    let unlocked = evaluate_and_unlock(&ledger, now()).unwrap();

    assert_eq!(unlocked.len(), 1);
    let s = &unlocked[0];
    assert_eq!(s.id, "tres_pendientes");
    assert_eq!(s.title, "Tres en la lista");
    assert_eq!(s.icon, "list");
    assert_eq!(s.unlocked_at, now());
    assert!(ledger.is_unlocked("tres_pendientes").unwrap());
  }

  #[test]
  fn abandonment_ratio() {
    let ledger = FakeLedger { completed: 1, abandoned: 2, ..Default::default() };
    let unlocked = ids(&evaluate_and_unlock(&ledger, now()).unwrap());
    assert!(unlocked.contains(&"mas_abandonos_que_completados"));

    let none_completed = FakeLedger { abandoned: 2, ..Default::default() };
    let unlocked = ids(&evaluate_and_unlock(&none_completed, now()).unwrap());
    assert!(!unlocked.contains(&"mas_abandonos_que_completados"));
  }

  #[test]
  fn meta_achievement_sees_same_pass_unlocks() {
    let ledger = FakeLedger { completed: 1, ..Default::default() };
    for a in CATALOG.iter() {
      if a.id != META_ACHIEVEMENT && a.id != "uno_completado" {
        ledger.insert_unlock(a.id, now()).unwrap();
      }
    }

    let unlocked = ids(&evaluate_and_unlock(&ledger, now()).unwrap());
    assert_eq!(unlocked, vec!["uno_completado", META_ACHIEVEMENT]);
  }

  #[test]
  fn meta_achievement_needs_every_other_entry() {
    let ledger = FakeLedger::default();
    for a in CATALOG.iter().filter(|a| !a.is_meta()).skip(1) {
      ledger.insert_unlock(a.id, now()).unwrap();
    }

    let unlocked = ids(&evaluate_and_unlock(&ledger, now()).unwrap());
    assert!(!unlocked.contains(&META_ACHIEVEMENT));
  }

  #[test]
  fn lost_insert_race_is_not_reported() {
    let ledger = FakeLedger { pending: 3, lose_races: true, ..Default::default() };
    assert!(evaluate_and_unlock(&ledger, now()).unwrap().is_empty());
    assert!(ledger.is_unlocked("tres_pendientes").unwrap());
  }

  #[test]
  fn lost_delete_race_is_not_reported() {
    let mut ledger = FakeLedger { pending: 3, ..Default::default() };
    manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap();
    evaluate_and_unlock(&ledger, now()).unwrap();
    assert!(ledger.is_unlocked("tres_pendientes").unwrap());

    ledger.pending = 2;
    ledger.lose_races = true;
    assert!(revoke_if_invalid(&ledger).unwrap().is_empty());
    assert!(!ledger.is_unlocked("tres_pendientes").unwrap());
  }

  #[test]
  fn revoke_drops_invalid_thresholds() {
    let mut ledger = FakeLedger { pending: 3, ..Default::default() };
    manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap();
    evaluate_and_unlock(&ledger, now()).unwrap();

    ledger.pending = 2;
    assert_eq!(revoke_if_invalid(&ledger).unwrap(), vec!["tres_pendientes"]);
    assert!(!ledger.is_unlocked("tres_pendientes").unwrap());
    assert!(revoke_if_invalid(&ledger).unwrap().is_empty());
  }

  #[test]
  fn revoke_never_touches_entry_achievement() {
    let ledger = FakeLedger::default();
    manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap();

    assert!(revoke_if_invalid(&ledger).unwrap().is_empty());
    assert!(ledger.is_unlocked(ENTRY_ACHIEVEMENT).unwrap());
  }

  #[test]
  fn revoke_ignores_unknown_ids() {
    let ledger = FakeLedger::default();
    ledger.insert_unlock("retired_achievement", now()).unwrap();

    assert!(revoke_if_invalid(&ledger).unwrap().is_empty());
    assert!(ledger.is_unlocked("retired_achievement").unwrap());
  }

  #[test]
  fn revoke_evaluates_meta_last() {
    let ledger = FakeLedger::default();
    ledger.insert_unlock(META_ACHIEVEMENT, now()).unwrap();
    for a in CATALOG.iter().filter(|a| !a.is_meta()) {
      ledger.insert_unlock(a.id, now()).unwrap();
    }

    let revoked = revoke_if_invalid(&ledger).unwrap();
    assert_eq!(revoked.last().map(String::as_str), Some(META_ACHIEVEMENT));
    assert!(!revoked.iter().any(|id| id == ENTRY_ACHIEVEMENT));
  }

  #[test]
  fn manual_unlock_is_single_shot() {
    let ledger = FakeLedger::default();

    let first = manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap();
    assert_eq!(first.map(|s| s.id), Some(ENTRY_ACHIEVEMENT));
    assert!(manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap().is_none());
    assert_eq!(ledger.unlocked().unwrap().len(), 1);
  }

  #[test]
  fn manual_unlock_unknown_id() {
    let ledger = FakeLedger::default();
    assert!(manual_unlock(&ledger, "no_existe", now()).unwrap().is_none());
    assert!(ledger.unlocked().unwrap().is_empty());
  }

  #[test]
  fn only_entry_unlocked() {
    let ledger = FakeLedger::default();
    manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()).unwrap();

    let unlocked = ids(&evaluate_and_unlock(&ledger, now()).unwrap());
    assert_eq!(unlocked, vec!["solo_entraste"]);
  }

  #[test]
  fn standings_report_progress_only_while_locked() {
    let ledger = FakeLedger { completed: 3, ..Default::default() };
    evaluate_and_unlock(&ledger, now()).unwrap();

    let standings = standings(&ledger).unwrap();
    assert_eq!(standings.len(), CATALOG.len());

    let by_id = |id: &str| standings.iter().find(|s| s.id == id).unwrap();
    let one = by_id("uno_completado");
    assert_eq!(one.unlocked_at, Some(now()));
    assert!(one.progress.is_none());

    let five = by_id("cinco_completados");
    assert!(five.unlocked_at.is_none());
    assert_eq!(five.progress, Some(Progress { current: 3, target: 5 }));

    assert!(by_id(ENTRY_ACHIEVEMENT).progress.is_none());
    assert!(by_id("mas_abandonos_que_completados").progress.is_none());
  }

  #[test]
  fn storage_errors_propagate() {
    let ledger = FakeLedger { broken: true, ..Default::default() };
    assert_eq!(evaluate_and_unlock(&ledger, now()), Err(StorageDown));
    assert_eq!(revoke_if_invalid(&ledger), Err(StorageDown));
    assert_eq!(manual_unlock(&ledger, ENTRY_ACHIEVEMENT, now()), Err(StorageDown));
  }
}
