use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Person, Tense};

/// Starting ease factor for a freshly created review item.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Composite key identifying one review item: user + verb + tense + person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
  pub user_id: String,
  pub infinitive: String,
  pub tense: Tense,
  pub person: Person,
}

/// Scheduling state for one (user, verb, tense, person) combination.
///
/// The repository owns persistence; the scheduler only ever operates on a
/// copy and returns an updated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
  pub user_id: String,
  pub infinitive: String,
  pub tense: Tense,
  pub person: Person,
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub due_date: DateTime<Utc>,
  pub last_quality: u8,
}

impl ReviewItem {
  /// First-exposure record: due immediately, no history.
  pub fn new(
    user_id: impl Into<String>,
    infinitive: impl Into<String>,
    tense: Tense,
    person: Person,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      user_id: user_id.into(),
      infinitive: infinitive.into(),
      tense,
      person,
      ease_factor: DEFAULT_EASE_FACTOR,
      interval_days: 0,
      repetitions: 0,
      due_date: now,
      last_quality: 0,
    }
  }

  pub fn key(&self) -> ItemKey {
    ItemKey {
      user_id: self.user_id.clone(),
      infinitive: self.infinitive.clone(),
      tense: self.tense,
      person: self.person,
    }
  }

  pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
    self.due_date <= as_of
  }
}

/// Exercise difficulty tier recommended to the content provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl DifficultyTier {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }

  /// One tier up, capped at Hard.
  pub fn escalate(&self) -> Self {
    match self {
      Self::Easy => Self::Medium,
      Self::Medium | Self::Hard => Self::Hard,
    }
  }

  /// One tier down, floored at Easy.
  pub fn de_escalate(&self) -> Self {
    match self {
      Self::Hard => Self::Medium,
      Self::Medium | Self::Easy => Self::Easy,
    }
  }
}
