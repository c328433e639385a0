pub mod queue;
pub mod sm2;

pub use queue::{due_count, due_items, next_due_at};
pub use sm2::{apply_review, apply_review_now, MIN_EASE_FACTOR};
