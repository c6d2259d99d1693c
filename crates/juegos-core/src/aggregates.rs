//! Aggregate readers: the scalar counts every achievement condition is
//! computed from.
//!
//! A reader is scoped to one user. Implementations recompute each count from
//! the stored game history on every call; nothing is cached.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc};
use serde_json::Value;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only view of one user's game-history aggregates.
///
/// `Error` is the storage layer's own error type; the engine propagates it
/// untouched.
pub trait Aggregates {
  type Error;

  /// Entries in the pending list.
  fn pending_count(&self) -> Result<u32, Self::Error>;

  /// Played entries flagged as completed.
  fn completed_count(&self) -> Result<u32, Self::Error>;

  /// Played entries flagged as abandoned.
  fn abandoned_count(&self) -> Result<u32, Self::Error>;

  /// All played entries, completed or not.
  fn played_count(&self) -> Result<u32, Self::Error>;

  /// Completed entries recorded since the start of the current UTC month.
  fn completed_this_month(&self) -> Result<u32, Self::Error>;

  /// Completed entries recorded since the start of the current UTC year.
  fn completed_this_year(&self) -> Result<u32, Self::Error>;

  /// Played entries with at least one genre name containing `token`
  /// (case-insensitive, literal substring). See [`count_in_genre`].
  fn played_in_genre(&self, token: &str) -> Result<u32, Self::Error>;

  /// Distinct genre names across all played entries.
  fn distinct_genre_count(&self) -> Result<u32, Self::Error>;

  /// Size of the largest group of played entries sharing one genre name.
  fn top_genre_count(&self) -> Result<u32, Self::Error>;

  /// Unlock records held by the user.
  fn unlock_count(&self) -> Result<u32, Self::Error>;

  /// Unlock records held by the user, not counting `achievement_id`.
  fn unlock_count_excluding(&self, achievement_id: &str) -> Result<u32, Self::Error>;
}

// ─── Genre extraction ────────────────────────────────────────────────────────

/// Normalise a stored genre column to a flat list of genre names.
///
/// The column holds a JSON array whose items are either plain names
/// (`"Action"`) or catalog objects (`{"id": 4, "name": "Action"}`). Any other
/// item, numbers included, is skipped. A missing column, malformed JSON or a
/// non-array value all yield an empty list.
pub fn genre_names(raw: Option<&str>) -> Vec<String> {
  let Some(raw) = raw else { return Vec::new() };
  let items = match serde_json::from_str::<Value>(raw) {
    Ok(Value::Array(items)) => items,
    _ => return Vec::new(),
  };

  items
    .into_iter()
    .filter_map(|item| match item {
      Value::String(name) => Some(name),
      Value::Object(mut obj) => match obj.remove("name") {
        Some(Value::String(name)) => Some(name),
        _ => None,
      },
      _ => None,
    })
    .filter(|name| !name.is_empty())
    .collect()
}

/// Whether any of `names` contains `token`, ignoring case.
///
/// This is a literal substring test: `"rpg"` matches `"Action RPG"` but not
/// `"Role-Playing"`.
pub fn genre_matches(names: &[String], token: &str) -> bool {
  let token = token.to_lowercase();
  names.iter().any(|n| n.to_lowercase().contains(&token))
}

/// Count the entries whose genre list matches `token`.
pub fn count_in_genre<'a, I>(entries: I, token: &str) -> u32
where
  I: IntoIterator<Item = &'a [String]>,
{
  let n = entries
    .into_iter()
    .filter(|names| genre_matches(names, token))
    .count();
  saturate(n)
}

/// Count distinct genre names over all entries.
pub fn distinct_genres<'a, I>(entries: I) -> u32
where
  I: IntoIterator<Item = &'a [String]>,
{
  let set: HashSet<&str> = entries
    .into_iter()
    .flat_map(|names| names.iter().map(String::as_str))
    .collect();
  saturate(set.len())
}

/// Largest number of entries carrying the same genre name.
pub fn largest_genre_group<'a, I>(entries: I) -> u32
where
  I: IntoIterator<Item = &'a [String]>,
{
  let mut by_name: HashMap<&str, usize> = HashMap::new();
  for name in entries.into_iter().flatten() {
    *by_name.entry(name.as_str()).or_default() += 1;
  }
  saturate(by_name.into_values().max().unwrap_or(0))
}

fn saturate(n: usize) -> u32 { u32::try_from(n).unwrap_or(u32::MAX) }

// ─── Calendar windows ────────────────────────────────────────────────────────

/// Midnight UTC on the first day of `now`'s month.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
  let date = now.date_naive();
  let first = date - Days::new(u64::from(date.day0()));
  first.and_time(NaiveTime::MIN).and_utc()
}

/// Midnight UTC on the first of January of `now`'s year.
pub fn year_start(now: DateTime<Utc>) -> DateTime<Utc> {
  let date = now.date_naive();
  let first = date - Days::new(u64::from(date.ordinal0()));
  first.and_time(NaiveTime::MIN).and_utc()
}
