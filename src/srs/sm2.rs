use chrono::{DateTime, Duration, Utc};

use crate::domain::ReviewItem;

pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Apply one SM-2 review to an item and return the updated copy.
///
/// Failures (quality < 3) reset the repetition count and interval but leave
/// the ease factor untouched. Successful reviews grow the interval from the
/// ease factor as it stood *before* this review, then adjust the ease:
/// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at 1.3.
///
/// Pure: no I/O, the caller persists the returned record.
pub fn apply_review(item: &ReviewItem, quality: u8, now: DateTime<Utc>) -> ReviewItem {
  let quality = quality.min(5);
  let q = quality as f64;

  let (new_interval, new_repetitions, new_ease_factor) = if quality < 3 {
    // Failed review: reset progress, keep the ease factor
    (1, 0, item.ease_factor)
  } else {
    let interval = match item.repetitions {
      0 => 1,
      1 => 6,
      _ => ((item.interval_days as f64) * item.ease_factor).round() as i64,
    };
    let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    (
      interval.max(1),
      item.repetitions + 1,
      (item.ease_factor + ease_delta).max(MIN_EASE_FACTOR),
    )
  };

  ReviewItem {
    ease_factor: new_ease_factor,
    interval_days: new_interval,
    repetitions: new_repetitions,
    due_date: now + Duration::days(new_interval),
    last_quality: quality,
    ..item.clone()
  }
}

/// Convenience wrapper over [`apply_review`] using the current time.
pub fn apply_review_now(item: &ReviewItem, quality: u8) -> ReviewItem {
  apply_review(item, quality, Utc::now())
}
