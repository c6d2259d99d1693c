//! In-memory [`Ledger`] used by the engine and catalog tests.

use std::cell::RefCell;

use chrono::{DateTime, Utc};

use crate::{
  aggregates::{self, Aggregates},
  engine::{Ledger, UnlockRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageDown;

/// Aggregates are plain fields; `played` is `completed + abandoned`.
#[derive(Default)]
pub struct FakeLedger {
  pub pending:    u32,
  pub completed:  u32,
  pub abandoned:  u32,
  pub month:      u32,
  pub year:       u32,
  /// Genre names of each played entry.
  pub genres:     Vec<Vec<String>>,
  pub unlocks:    RefCell<Vec<UnlockRecord>>,
  /// Every insert and delete behaves as if another writer got there first.
  pub lose_races: bool,
  /// Every call fails.
  pub broken:     bool,
}

impl FakeLedger {
  fn ok<T>(&self, value: T) -> Result<T, StorageDown> {
    if self.broken { Err(StorageDown) } else { Ok(value) }
  }

  fn genre_entries(&self) -> impl Iterator<Item = &[String]> {
    self.genres.iter().map(Vec::as_slice)
  }
}

impl Aggregates for FakeLedger {
  type Error = StorageDown;

  fn pending_count(&self) -> Result<u32, StorageDown> { self.ok(self.pending) }

  fn completed_count(&self) -> Result<u32, StorageDown> { self.ok(self.completed) }

  fn abandoned_count(&self) -> Result<u32, StorageDown> { self.ok(self.abandoned) }

  fn played_count(&self) -> Result<u32, StorageDown> {
    self.ok(self.completed + self.abandoned)
  }

  fn completed_this_month(&self) -> Result<u32, StorageDown> { self.ok(self.month) }

  fn completed_this_year(&self) -> Result<u32, StorageDown> { self.ok(self.year) }

  fn played_in_genre(&self, token: &str) -> Result<u32, StorageDown> {
    self.ok(aggregates::count_in_genre(self.genre_entries(), token))
  }

  fn distinct_genre_count(&self) -> Result<u32, StorageDown> {
    self.ok(aggregates::distinct_genres(self.genre_entries()))
  }

  fn top_genre_count(&self) -> Result<u32, StorageDown> {
    self.ok(aggregates::largest_genre_group(self.genre_entries()))
  }

  fn unlock_count(&self) -> Result<u32, StorageDown> {
    let n = self.unlocks.borrow().len();
    self.ok(u32::try_from(n).unwrap_or(u32::MAX))
  }

  fn unlock_count_excluding(&self, achievement_id: &str) -> Result<u32, StorageDown> {
    let n = self
      .unlocks
      .borrow()
      .iter()
      .filter(|r| r.achievement_id != achievement_id)
      .count();
    self.ok(u32::try_from(n).unwrap_or(u32::MAX))
  }
}

impl Ledger for FakeLedger {
  fn is_unlocked(&self, achievement_id: &str) -> Result<bool, StorageDown> {
    let found = self
      .unlocks
      .borrow()
      .iter()
      .any(|r| r.achievement_id == achievement_id);
    self.ok(found)
  }

  fn unlocked(&self) -> Result<Vec<UnlockRecord>, StorageDown> {
    self.ok(self.unlocks.borrow().clone())
  }

  fn insert_unlock(
    &self,
    achievement_id: &str,
    at: DateTime<Utc>,
  ) -> Result<bool, StorageDown> {
    if self.broken {
      return Err(StorageDown);
    }
    let mut unlocks = self.unlocks.borrow_mut();
    if unlocks.iter().any(|r| r.achievement_id == achievement_id) {
      return Ok(false);
    }
    unlocks.push(UnlockRecord {
      achievement_id: achievement_id.to_owned(),
      unlocked_at:    at,
    });
    Ok(!self.lose_races)
  }

  fn delete_unlock(&self, achievement_id: &str) -> Result<bool, StorageDown> {
    if self.broken {
      return Err(StorageDown);
    }
    let mut unlocks = self.unlocks.borrow_mut();
    let before = unlocks.len();
    unlocks.retain(|r| r.achievement_id != achievement_id);
    Ok(unlocks.len() != before && !self.lose_races)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog;

  fn genres(list: &[&[&str]]) -> Vec<Vec<String>> {
    list
      .iter()
      .map(|names| names.iter().map(|n| (*n).to_owned()).collect())
      .collect()
  }

  fn check(ledger: &FakeLedger, id: &str) -> bool {
    catalog::find(id).unwrap().check(ledger).unwrap()
  }

  #[test]
  fn genre_conditions_use_literal_tokens() {
    let ledger = FakeLedger {
      completed: 2,
      genres: genres(&[&["Role-Playing"], &["RPG", "Indie"]]),
      ..Default::default()
    };
    assert_eq!(ledger.played_in_genre("rpg").unwrap(), 1);
    assert!(check(&ledger, "rpg_uno"));
    assert!(check(&ledger, "indie_uno"));
    assert!(!check(&ledger, "rpg_cinco"));
  }

  #[test]
  fn compound_conditions() {
    let five_abandoned = FakeLedger { abandoned: 5, ..Default::default() };
    assert!(check(&five_abandoned, "ni_uno_terminado"));

    let five_pending = FakeLedger { pending: 5, ..Default::default() };
    assert!(check(&five_pending, "todo_pendiente"));

    let with_one_done = FakeLedger { pending: 5, completed: 1, abandoned: 5, ..Default::default() };
    assert!(!check(&with_one_done, "todo_pendiente"));
    assert!(!check(&with_one_done, "ni_uno_terminado"));
    assert!(check(&with_one_done, "mas_abandonos_que_completados"));
  }

  #[test]
  fn genre_variety_conditions() {
    let ledger = FakeLedger {
      genres: genres(&[
        &["Action", "Shooter"],
        &["Action"],
        &["Action", "Puzzle"],
        &["Action", "Racing"],
        &["Action", "Sports"],
      ]),
      ..Default::default()
    };
    assert!(check(&ledger, "monogenero"));
    assert!(check(&ledger, "todo_generos"));
    assert!(check(&ledger, "hack_cinco"));
    assert!(!check(&ledger, "hack_diez"));
  }

  #[test]
  fn manual_and_never_conditions_are_false() {
    let ledger = FakeLedger { completed: 100, pending: 30, ..Default::default() };
    assert!(!check(&ledger, catalog::ENTRY_ACHIEVEMENT));
    assert!(!check(&ledger, "nada_desbloqueado"));
  }
}
