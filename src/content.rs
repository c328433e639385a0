//! Exercise content boundary contract.
//!
//! Sentence templates and item selection are authored elsewhere; the engine
//! only consumes (verb, tense, person, template) candidates. A candidate
//! whose infinitive the rule table cannot conjugate is discarded and
//! another one is requested.

use serde::{Deserialize, Serialize};

use crate::analysis::ErrorCategory;
use crate::domain::{DifficultyTier, Person, Tense};

/// One exercise the provider proposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCandidate {
  pub infinitive: String,
  pub tense: Tense,
  pub person: Person,
  /// Cloze sentence with the conjugation slot blanked out.
  pub sentence_template: String,
}

/// Supplier of exercise candidates, filtered by difficulty and optionally
/// weighted toward an error category.
pub trait ContentProvider {
  /// Next candidate for the requested difficulty. None means the provider
  /// has nothing left to offer.
  fn next_exercise_candidate(
    &mut self,
    difficulty: DifficultyTier,
    emphasis: Option<ErrorCategory>,
  ) -> Option<ExerciseCandidate>;

  /// Sentence template for reviewing a known item. Providers that cannot
  /// serve templates for arbitrary triples return None and the session
  /// falls back to a neutral prompt.
  fn template_for(&self, _infinitive: &str, _tense: Tense, _person: Person) -> Option<String> {
    None
  }
}
