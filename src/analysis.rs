//! Error classification for incorrect answers.
//!
//! A single ordered heuristic chain, first match wins. Each heuristic tests
//! one specific morphological substitution against forms reconstructed by
//! the conjugation engine, so the same classification logic serves every
//! caller.

use serde::{Deserialize, Serialize};

use crate::conjugation::engine::{normalize_answer, strip_accents};
use crate::conjugation::{ConjugationEngine, IndicativeTense, MatchType, ValidationResult};
use crate::domain::{Person, Tense, VerbForm};

/// What kind of mistake an incorrect answer looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
  PersonConfusion,
  TenseConfusion,
  MoodConfusion,
  StemChangeError,
  AccentError,
  IrregularFormError,
  Unknown,
}

impl ErrorCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::PersonConfusion => "person_confusion",
      Self::TenseConfusion => "tense_confusion",
      Self::MoodConfusion => "mood_confusion",
      Self::StemChangeError => "stem_change_error",
      Self::AccentError => "accent_error",
      Self::IrregularFormError => "irregular_form_error",
      Self::Unknown => "unknown",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "person_confusion" => Some(Self::PersonConfusion),
      "tense_confusion" => Some(Self::TenseConfusion),
      "mood_confusion" => Some(Self::MoodConfusion),
      "stem_change_error" => Some(Self::StemChangeError),
      "accent_error" => Some(Self::AccentError),
      "irregular_form_error" => Some(Self::IrregularFormError),
      "unknown" => Some(Self::Unknown),
      _ => None,
    }
  }
}

/// Classification of one incorrect answer, with a teaching hint.
///
/// Confidence is 0 exactly when the category is [`ErrorCategory::Unknown`];
/// the constructor enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorClassification {
  pub category: ErrorCategory,
  pub confidence: f64,
  pub hint: String,
}

impl ErrorClassification {
  pub fn new(category: ErrorCategory, confidence: f64, hint: impl Into<String>) -> Self {
    let confidence = if category == ErrorCategory::Unknown {
      0.0
    } else {
      confidence.clamp(f64::MIN_POSITIVE, 1.0)
    };
    Self {
      category,
      confidence,
      hint: hint.into(),
    }
  }

  fn unknown() -> Self {
    Self::new(
      ErrorCategory::Unknown,
      0.0,
      "Compare your answer against the expected form and watch person, tense, and stem.",
    )
  }
}

/// Classifies mismatches using the engine's morphological lookups.
pub struct ErrorAnalyzer<'a> {
  engine: &'a ConjugationEngine,
}

impl<'a> ErrorAnalyzer<'a> {
  pub fn new(engine: &'a ConjugationEngine) -> Self {
    Self { engine }
  }

  /// Classify an incorrect answer. Callers only invoke this when
  /// `validation.is_correct` is false.
  pub fn classify(
    &self,
    correct: &VerbForm,
    user_answer: &str,
    validation: &ValidationResult,
  ) -> ErrorClassification {
    let user = normalize_answer(user_answer);
    if user.is_empty() {
      return ErrorClassification::unknown();
    }
    let correct_norm = normalize_answer(&correct.surface_form);

    // 1. Person confusion: well-formed, wrong target person
    for person in Person::ALL {
      if person == correct.person {
        continue;
      }
      if let Ok(other) = self.engine.conjugate(&correct.infinitive, correct.tense, person) {
        let other_norm = normalize_answer(&other.surface_form);
        if other_norm == user && other_norm != correct_norm {
          return ErrorClassification::new(
            ErrorCategory::PersonConfusion,
            0.9,
            format!(
              "You conjugated '{}' for {} — this sentence needs {}.",
              correct.infinitive,
              person.display_name(),
              correct.person.display_name()
            ),
          );
        }
      }
    }

    // 2. Tense confusion: right person, wrong subjunctive tense
    for tense in Tense::ALL {
      if tense == correct.tense {
        continue;
      }
      if let Ok(other) = self.engine.conjugate(&correct.infinitive, tense, correct.person) {
        let other_norm = normalize_answer(&other.surface_form);
        if other_norm == user && other_norm != correct_norm {
          return ErrorClassification::new(
            ErrorCategory::TenseConfusion,
            0.85,
            format!(
              "That is the {} form — this sentence calls for the {}.",
              tense.display_name(),
              correct.tense.display_name()
            ),
          );
        }
      }
    }

    // 3. Mood confusion: the indicative equivalent first, then any other
    //    indicative tense at lower confidence
    let equivalent = IndicativeTense::equivalent_of(correct.tense);
    if let Some(classification) =
      self.match_indicative(correct, &user, &correct_norm, equivalent, 0.8)
    {
      return classification;
    }
    for tense in IndicativeTense::ALL {
      if tense == equivalent {
        continue;
      }
      if let Some(classification) = self.match_indicative(correct, &user, &correct_norm, tense, 0.7)
      {
        return classification;
      }
    }

    // 4. Stem-change error: unmodified stem with correct endings, in a cell
    //    where the change actually surfaces
    if let Some(change) = correct.stem_change {
      if let Some(flat) =
        self
          .engine
          .regularized(&correct.infinitive, correct.tense, correct.person, false)
      {
        let flat_norm = normalize_answer(&flat);
        if flat_norm != correct_norm && strip_accents(&flat_norm) == strip_accents(&user) {
          return ErrorClassification::new(
            ErrorCategory::StemChangeError,
            0.85,
            format!(
              "'{}' is a stem-changing verb ({}) — the stem changes in this form.",
              correct.infinitive,
              change.display_name()
            ),
          );
        }
      }
    }

    // 5. Irregular-form error: regular rule application to an irregular verb
    if correct.is_irregular {
      if let Some(regular) =
        self
          .engine
          .regularized(&correct.infinitive, correct.tense, correct.person, true)
      {
        let regular_norm = normalize_answer(&regular);
        if regular_norm != correct_norm && strip_accents(&regular_norm) == strip_accents(&user) {
          return ErrorClassification::new(
            ErrorCategory::IrregularFormError,
            0.8,
            format!(
              "'{}' is irregular in the {} — the regular pattern does not apply.",
              correct.infinitive,
              correct.tense.display_name()
            ),
          );
        }
      }
    }

    // 6. Accent error: already detected by validation, re-surfaced as a
    //    teaching category
    if validation.match_type == MatchType::AccentInsensitive {
      return ErrorClassification::new(
        ErrorCategory::AccentError,
        0.95,
        "Only the written accent is off — check where the stress falls.",
      );
    }

    ErrorClassification::unknown()
  }

  fn match_indicative(
    &self,
    correct: &VerbForm,
    user: &str,
    correct_norm: &str,
    tense: IndicativeTense,
    confidence: f64,
  ) -> Option<ErrorClassification> {
    let form = self
      .engine
      .indicative(&correct.infinitive, tense, correct.person)?;
    let form_norm = normalize_answer(&form);
    if form_norm == user && form_norm != correct_norm {
      return Some(ErrorClassification::new(
        ErrorCategory::MoodConfusion,
        confidence,
        format!(
          "That is the {} indicative — after a subjunctive trigger you need the {}.",
          tense.display_name(),
          correct.tense.display_name()
        ),
      ));
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::conjugation::RuleTable;
  use std::sync::Arc;

  fn engine() -> ConjugationEngine {
    ConjugationEngine::new(Arc::new(RuleTable::seeded().build().unwrap()))
  }

  fn classify(engine: &ConjugationEngine, inf: &str, tense: Tense, person: Person, answer: &str) -> ErrorClassification {
    let correct = engine.conjugate(inf, tense, person).unwrap();
    let validation = engine.validate(inf, tense, person, answer).unwrap();
    assert!(!validation.is_correct, "test answer should be incorrect");
    ErrorAnalyzer::new(engine).classify(&correct, answer, &validation)
  }

  #[test]
  fn test_person_confusion() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::PresentSubjunctive, Person::Yo, "hables");
    assert_eq!(c.category, ErrorCategory::PersonConfusion);
    assert!((c.confidence - 0.9).abs() < f64::EPSILON);
    assert!(c.hint.contains("tú"));
    assert!(c.hint.contains("yo"));
  }

  #[test]
  fn test_tense_confusion() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::PresentSubjunctive, Person::Yo, "hablara");
    assert_eq!(c.category, ErrorCategory::TenseConfusion);
    assert!((c.confidence - 0.85).abs() < f64::EPSILON);
    assert!(c.hint.contains("imperfect subjunctive (-ra)"));
  }

  #[test]
  fn test_person_beats_tense_in_precedence() {
    // A constructed paradigm where one surface satisfies both the
    // person-confusion and tense-confusion conditions
    let table = RuleTable::builder()
      .override_paradigm(
        "fintar",
        Tense::PresentSubjunctive,
        ["finte", "fintara", "finta", "fintemos", "fintéis", "finten"],
      )
      .override_paradigm(
        "fintar",
        Tense::ImperfectSubjunctiveRa,
        ["fintara", "fintaras", "fintara", "fintáramos", "fintarais", "fintaran"],
      )
      .build()
      .unwrap();
    let e = ConjugationEngine::new(Arc::new(table));

    // "fintara" is both tú in the present paradigm and yo in the -ra
    // paradigm; rule 1 must win
    let c = classify(&e, "fintar", Tense::PresentSubjunctive, Person::Yo, "fintara");
    assert_eq!(c.category, ErrorCategory::PersonConfusion);
  }

  #[test]
  fn test_mood_confusion_equivalent_tense() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::PresentSubjunctive, Person::Yo, "hablo");
    assert_eq!(c.category, ErrorCategory::MoodConfusion);
    assert!((c.confidence - 0.8).abs() < f64::EPSILON);
    assert!(c.hint.contains("present indicative"));
  }

  #[test]
  fn test_mood_confusion_other_tense() {
    let e = engine();
    // "hablé" is the preterite indicative, not the tense equivalent
    let c = classify(&e, "hablar", Tense::PresentSubjunctive, Person::Yo, "hablé");
    assert_eq!(c.category, ErrorCategory::MoodConfusion);
    assert!((c.confidence - 0.7).abs() < f64::EPSILON);
    assert!(c.hint.contains("preterite"));
  }

  #[test]
  fn test_mood_confusion_imperfect_equivalent() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::ImperfectSubjunctiveRa, Person::Yo, "hablaba");
    assert_eq!(c.category, ErrorCategory::MoodConfusion);
    assert!((c.confidence - 0.8).abs() < f64::EPSILON);
  }

  #[test]
  fn test_mood_confusion_irregular_present() {
    let e = engine();
    let c = classify(&e, "ser", Tense::PresentSubjunctive, Person::Yo, "soy");
    assert_eq!(c.category, ErrorCategory::MoodConfusion);
  }

  #[test]
  fn test_stem_change_error() {
    let e = engine();
    let c = classify(&e, "pensar", Tense::PresentSubjunctive, Person::Yo, "pense");
    assert_eq!(c.category, ErrorCategory::StemChangeError);
    assert!((c.confidence - 0.85).abs() < f64::EPSILON);
    assert!(c.hint.contains("e→ie"));
  }

  #[test]
  fn test_stem_change_error_not_in_unchanged_cells() {
    let e = engine();
    // pensar does not change in the imperfect, so a bare accent slip there
    // must classify as an accent error, not a stem-change error
    let c = classify(&e, "pensar", Tense::ImperfectSubjunctiveRa, Person::Nosotros, "pensaramos");
    assert_eq!(c.category, ErrorCategory::AccentError);
  }

  #[test]
  fn test_irregular_form_error() {
    let e = engine();
    let c = classify(&e, "saber", Tense::PresentSubjunctive, Person::Yo, "saba");
    assert_eq!(c.category, ErrorCategory::IrregularFormError);
    assert!((c.confidence - 0.8).abs() < f64::EPSILON);
    assert!(c.hint.contains("saber"));
  }

  #[test]
  fn test_irregular_form_error_compound() {
    let e = engine();
    let c = classify(
      &e,
      "hacer",
      Tense::PresentPerfectSubjunctive,
      Person::Yo,
      "haya hacido",
    );
    assert_eq!(c.category, ErrorCategory::IrregularFormError);
  }

  #[test]
  fn test_accent_error() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::ImperfectSubjunctiveRa, Person::Nosotros, "hablaramos");
    assert_eq!(c.category, ErrorCategory::AccentError);
    assert!((c.confidence - 0.95).abs() < f64::EPSILON);
  }

  #[test]
  fn test_unknown_classification() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::PresentSubjunctive, Person::Yo, "zanahoria");
    assert_eq!(c.category, ErrorCategory::Unknown);
    assert_eq!(c.confidence, 0.0);
  }

  #[test]
  fn test_unknown_on_empty_answer() {
    let e = engine();
    let c = classify(&e, "hablar", Tense::PresentSubjunctive, Person::Yo, "   ");
    assert_eq!(c.category, ErrorCategory::Unknown);
  }

  #[test]
  fn test_confidence_invariant() {
    let unknown = ErrorClassification::new(ErrorCategory::Unknown, 0.9, "hint");
    assert_eq!(unknown.confidence, 0.0);

    let classified = ErrorClassification::new(ErrorCategory::AccentError, 0.0, "hint");
    assert!(classified.confidence > 0.0);

    let clamped = ErrorClassification::new(ErrorCategory::PersonConfusion, 3.0, "hint");
    assert!((clamped.confidence - 1.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_category_roundtrip() {
    for category in [
      ErrorCategory::PersonConfusion,
      ErrorCategory::TenseConfusion,
      ErrorCategory::MoodConfusion,
      ErrorCategory::StemChangeError,
      ErrorCategory::AccentError,
      ErrorCategory::IrregularFormError,
      ErrorCategory::Unknown,
    ] {
      assert_eq!(ErrorCategory::from_str(category.as_str()), Some(category));
    }
  }
}
