//! Rolling performance tracking and adaptive difficulty.
//!
//! The window is a bounded ring buffer of recent answer outcomes. The
//! controller reads its aggregates and recommends the next exercise's
//! difficulty tier and an error category to emphasize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::analysis::ErrorCategory;
use crate::config::TrainerConfig;
use crate::domain::DifficultyTier;

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
  pub is_correct: bool,
  pub category: Option<ErrorCategory>,
  pub at: DateTime<Utc>,
}

/// Bounded ring buffer of recent outcomes with derived aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceWindow {
  outcomes: VecDeque<Outcome>,
  capacity: usize,
}

impl PerformanceWindow {
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      outcomes: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Append an outcome, evicting the oldest entry at capacity.
  pub fn record(&mut self, is_correct: bool, category: Option<ErrorCategory>, at: DateTime<Utc>) {
    if self.outcomes.len() == self.capacity {
      self.outcomes.pop_front();
    }
    self.outcomes.push_back(Outcome {
      is_correct,
      category,
      at,
    });
  }

  pub fn len(&self) -> usize {
    self.outcomes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.outcomes.is_empty()
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn is_full(&self) -> bool {
    self.outcomes.len() == self.capacity
  }

  /// Correct answers over buffered answers; 0 for an empty window.
  pub fn rolling_accuracy(&self) -> f64 {
    if self.outcomes.is_empty() {
      return 0.0;
    }
    let correct = self.outcomes.iter().filter(|o| o.is_correct).count();
    correct as f64 / self.outcomes.len() as f64
  }

  /// Error-category frequencies normalized over the buffer length.
  pub fn category_histogram(&self) -> Vec<(ErrorCategory, f64)> {
    if self.outcomes.is_empty() {
      return Vec::new();
    }
    let mut counts: Vec<(ErrorCategory, usize)> = Vec::new();
    for outcome in &self.outcomes {
      if let Some(category) = outcome.category {
        match counts.iter_mut().find(|(c, _)| *c == category) {
          Some((_, n)) => *n += 1,
          None => counts.push((category, 1)),
        }
      }
    }
    let total = self.outcomes.len() as f64;
    counts
      .into_iter()
      .map(|(category, n)| (category, n as f64 / total))
      .collect()
  }

  /// The most frequent error category; ties go to the category seen most
  /// recently.
  pub fn dominant_category(&self) -> Option<ErrorCategory> {
    let histogram = self.category_histogram();
    let max_count = histogram
      .iter()
      .map(|(_, freq)| *freq)
      .fold(0.0_f64, f64::max);
    if max_count <= 0.0 {
      return None;
    }
    let leaders: Vec<ErrorCategory> = histogram
      .iter()
      .filter(|(_, freq)| (*freq - max_count).abs() < f64::EPSILON)
      .map(|(category, _)| *category)
      .collect();
    // Most recent occurrence breaks ties
    self
      .outcomes
      .iter()
      .rev()
      .filter_map(|o| o.category)
      .find(|category| leaders.contains(category))
  }

  pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
    self.outcomes.iter()
  }
}

/// What the content provider should be asked for next.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyRecommendation {
  pub tier: DifficultyTier,
  pub emphasis: Option<ErrorCategory>,
  /// Selection weight multiplier for exercises in the emphasized category.
  pub emphasis_weight: f64,
}

/// Deterministic tier policy over the performance window.
#[derive(Debug, Clone)]
pub struct DifficultyController {
  min_samples: usize,
  escalate_threshold: f64,
  deescalate_threshold: f64,
  emphasis_weight: f64,
}

impl DifficultyController {
  pub fn new(config: &TrainerConfig) -> Self {
    Self {
      min_samples: config.min_samples,
      escalate_threshold: config.escalate_threshold,
      deescalate_threshold: config.deescalate_threshold,
      emphasis_weight: config.emphasis_weight,
    }
  }

  /// Tier policy: hold below the minimum sample count, escalate at high
  /// accuracy, de-escalate at low accuracy. Emphasis is independent of the
  /// tier move.
  pub fn next_difficulty(
    &self,
    window: &PerformanceWindow,
    current: DifficultyTier,
  ) -> DifficultyRecommendation {
    let emphasis = window.dominant_category();

    let tier = if window.len() < self.min_samples {
      current
    } else {
      let accuracy = window.rolling_accuracy();
      if accuracy >= self.escalate_threshold {
        current.escalate()
      } else if accuracy <= self.deescalate_threshold {
        current.de_escalate()
      } else {
        current
      }
    };

    DifficultyRecommendation {
      tier,
      emphasis,
      emphasis_weight: self.emphasis_weight,
    }
  }
}
