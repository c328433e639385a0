pub mod review;
pub mod verb;

pub use review::{DifficultyTier, ItemKey, ReviewItem, DEFAULT_EASE_FACTOR};
pub use verb::{Person, StemChange, Tense, VerbClass, VerbForm};
