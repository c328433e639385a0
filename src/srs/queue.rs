use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::ReviewItem;

/// Items due as of the given instant, hardest-first among the equally due:
/// ascending due date, then ascending ease factor.
pub fn due_items(items: &[ReviewItem], as_of: DateTime<Utc>) -> Vec<&ReviewItem> {
  let mut due: Vec<&ReviewItem> = items.iter().filter(|item| item.is_due(as_of)).collect();
  due.sort_by(|a, b| {
    a.due_date.cmp(&b.due_date).then(
      a.ease_factor
        .partial_cmp(&b.ease_factor)
        .unwrap_or(Ordering::Equal),
    )
  });
  due
}

pub fn due_count(items: &[ReviewItem], as_of: DateTime<Utc>) -> usize {
  items.iter().filter(|item| item.is_due(as_of)).count()
}

/// Earliest upcoming due date among items that are not yet due.
pub fn next_due_at(items: &[ReviewItem], as_of: DateTime<Utc>) -> Option<DateTime<Utc>> {
  items
    .iter()
    .filter(|item| !item.is_due(as_of))
    .map(|item| item.due_date)
    .min()
}
