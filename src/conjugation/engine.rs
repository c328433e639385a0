//! Conjugation and answer validation for the subjunctive paradigms.
//!
//! The engine applies the rule table: irregular overrides first, then verb
//! class, stem change, spelling-preserving stem adjustments, and finally the
//! regular endings. Validation normalizes both strings (NFC, lowercase,
//! whitespace) and treats accents as configurable. Accent stripping never
//! touches ñ, and an accent-stripped collision with a *different* real form
//! of the same verb stays a mismatch.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::domain::{Person, StemChange, Tense, VerbClass, VerbForm};

use super::table::{
  RuleTable, AUX_HABIA, AUX_HAYA, AUX_HE, AUX_HUBIERA, IMPERFECT_IND_AR, IMPERFECT_IND_ER_IR,
  IMPERFECT_RA_AR, IMPERFECT_RA_ER_IR, IMPERFECT_SE_AR, IMPERFECT_SE_ER_IR, PRESENT_IND_AR,
  PRESENT_IND_ER, PRESENT_IND_IR, PRESENT_SUBJ_AR, PRESENT_SUBJ_ER_IR, PRETERITE_AR,
  PRETERITE_ER_IR,
};

/// Conjugation was requested for an infinitive with no known class and no
/// irregular entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerbError {
  pub infinitive: String,
}

impl UnknownVerbError {
  pub fn new(infinitive: impl Into<String>) -> Self {
    Self {
      infinitive: infinitive.into(),
    }
  }
}

impl std::fmt::Display for UnknownVerbError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "unknown verb '{}': no -ar/-er/-ir class and no irregular entry",
      self.infinitive
    )
  }
}

impl std::error::Error for UnknownVerbError {}

/// How a user answer relates to the correct form after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
  Exact,
  AccentInsensitive,
  Mismatch,
}

impl MatchType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Exact => "exact",
      Self::AccentInsensitive => "accent_insensitive",
      Self::Mismatch => "mismatch",
    }
  }
}

/// Validation knobs. `accent_sensitive` disables accent-insensitive matching
/// entirely: accent mistakes become plain mismatches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
  pub accent_sensitive: bool,
}

/// Result of validating one answer. `is_correct` is true only for an exact
/// match; an accent-insensitive match still counts as an incorrect
/// submission for scheduling but is surfaced as its own teaching category.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
  pub is_correct: bool,
  pub normalized_user: String,
  pub normalized_correct: String,
  pub match_type: MatchType,
}

/// Indicative tenses available for mood-confusion lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicativeTense {
  Present,
  Preterite,
  Imperfect,
  PresentPerfect,
  Pluperfect,
}

impl IndicativeTense {
  pub const ALL: [IndicativeTense; 5] = [
    Self::Present,
    Self::Preterite,
    Self::Imperfect,
    Self::PresentPerfect,
    Self::Pluperfect,
  ];

  /// The indicative counterpart a learner most plausibly reached for.
  pub fn equivalent_of(tense: Tense) -> Self {
    match tense {
      Tense::PresentSubjunctive => Self::Present,
      Tense::ImperfectSubjunctiveRa | Tense::ImperfectSubjunctiveSe => Self::Imperfect,
      Tense::PresentPerfectSubjunctive => Self::PresentPerfect,
      Tense::PluperfectSubjunctive => Self::Pluperfect,
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Self::Present => "present",
      Self::Preterite => "preterite",
      Self::Imperfect => "imperfect",
      Self::PresentPerfect => "present perfect",
      Self::Pluperfect => "pluperfect",
    }
  }
}

/// Simple (non-compound) subjunctive tenses, for exhaustive ending lookup.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SimpleTense {
  Present,
  ImperfectRa,
  ImperfectSe,
}

impl SimpleTense {
  fn of(tense: Tense) -> Option<Self> {
    match tense {
      Tense::PresentSubjunctive => Some(Self::Present),
      Tense::ImperfectSubjunctiveRa => Some(Self::ImperfectRa),
      Tense::ImperfectSubjunctiveSe => Some(Self::ImperfectSe),
      Tense::PresentPerfectSubjunctive | Tense::PluperfectSubjunctive => None,
    }
  }
}

/// Rule-table-driven conjugator and validator. Cheap to clone; the table is
/// shared and read-only.
#[derive(Debug, Clone)]
pub struct ConjugationEngine {
  table: Arc<RuleTable>,
}

impl ConjugationEngine {
  pub fn new(table: Arc<RuleTable>) -> Self {
    Self { table }
  }

  pub fn table(&self) -> &RuleTable {
    &self.table
  }

  /// Produce the correct surface form for one paradigm cell.
  pub fn conjugate(
    &self,
    infinitive: &str,
    tense: Tense,
    person: Person,
  ) -> Result<VerbForm, UnknownVerbError> {
    let inf = normalize_answer(infinitive);
    if inf.is_empty() {
      return Err(UnknownVerbError::new(infinitive));
    }
    let stem_change = self.table.stem_change_of(&inf);

    // Irregular overrides take absolute precedence.
    if let Some(paradigm) = self.table.override_for(&inf, tense) {
      return Ok(VerbForm {
        infinitive: inf.clone(),
        tense,
        person,
        surface_form: paradigm[person.index()].clone(),
        is_irregular: true,
        stem_change,
      });
    }

    let (surface_form, is_irregular) = match SimpleTense::of(tense) {
      Some(simple) => (self.simple_surface(&inf, simple, person, true)?, false),
      None => {
        let aux = match tense {
          Tense::PluperfectSubjunctive => &AUX_HUBIERA,
          _ => &AUX_HAYA,
        };
        self.compound_surface(&inf, aux, person, true)?
      }
    };

    Ok(VerbForm {
      infinitive: inf,
      tense,
      person,
      surface_form,
      is_irregular,
      stem_change,
    })
  }

  /// Validate an answer with default options (accent-insensitive matching
  /// on).
  pub fn validate(
    &self,
    infinitive: &str,
    tense: Tense,
    person: Person,
    user_answer: &str,
  ) -> Result<ValidationResult, UnknownVerbError> {
    self.validate_with(infinitive, tense, person, user_answer, &ValidationOptions::default())
  }

  pub fn validate_with(
    &self,
    infinitive: &str,
    tense: Tense,
    person: Person,
    user_answer: &str,
    options: &ValidationOptions,
  ) -> Result<ValidationResult, UnknownVerbError> {
    let correct = self.conjugate(infinitive, tense, person)?;
    let normalized_user = normalize_answer(user_answer);
    let normalized_correct = normalize_answer(&correct.surface_form);

    let match_type = if normalized_user == normalized_correct {
      MatchType::Exact
    } else if !options.accent_sensitive
      && !normalized_user.is_empty()
      && strip_accents(&normalized_user) == strip_accents(&normalized_correct)
      && !self.is_distinct_known_form(&correct.infinitive, &normalized_user, &normalized_correct)
    {
      MatchType::AccentInsensitive
    } else {
      MatchType::Mismatch
    };

    Ok(ValidationResult {
      is_correct: match_type == MatchType::Exact,
      normalized_user,
      normalized_correct,
      match_type,
    })
  }

  /// Regular rule application, ignoring irregular overrides. With
  /// `with_stem_change` false the listed stem change is skipped as well.
  /// Used by the error analyzer to reconstruct what a learner who missed the
  /// irregularity would have written.
  pub(crate) fn regularized(
    &self,
    infinitive: &str,
    tense: Tense,
    person: Person,
    with_stem_change: bool,
  ) -> Option<String> {
    match SimpleTense::of(tense) {
      Some(simple) => self
        .simple_surface(infinitive, simple, person, with_stem_change)
        .ok(),
      None => {
        let aux = match tense {
          Tense::PluperfectSubjunctive => &AUX_HUBIERA,
          _ => &AUX_HAYA,
        };
        // Regularized compound: regular participle, no override
        let class = VerbClass::of(infinitive)?;
        let participle = regular_participle(&stem_of(infinitive), class);
        Some(format!("{} {}", aux[person.index()], participle))
      }
    }
  }

  /// Indicative lookup for mood-confusion diagnostics. Returns None when the
  /// verb cannot be conjugated regularly and no override is available.
  pub(crate) fn indicative(
    &self,
    infinitive: &str,
    tense: IndicativeTense,
    person: Person,
  ) -> Option<String> {
    let idx = person.index();
    match tense {
      IndicativeTense::Present => {
        if let Some(paradigm) = self.table.present_indicative_override(infinitive) {
          return Some(paradigm[idx].clone());
        }
        let class = VerbClass::of(infinitive)?;
        let mut stem = stem_of(infinitive);
        if let Some(change) = self.table.stem_change_of(infinitive) {
          // Present indicative boot: diphthong inside, plain stem outside
          if person.in_boot() {
            stem = replace_last_vowel(&stem, change.target_vowel(), change.boot_replacement());
          }
        }
        let endings = match class {
          VerbClass::Ar => &PRESENT_IND_AR,
          VerbClass::Er => &PRESENT_IND_ER,
          VerbClass::Ir => &PRESENT_IND_IR,
        };
        let ending = endings[idx];
        let stem = orthographic_adjust(stem, class, ending);
        Some(format!("{}{}", stem, ending))
      }
      IndicativeTense::Preterite => {
        let class = VerbClass::of(infinitive)?;
        let mut stem = stem_of(infinitive);
        if class == VerbClass::Ir {
          if let Some(change) = self.table.stem_change_of(infinitive) {
            // -ir verbs raise the stem vowel in the third persons
            if matches!(person, Person::ElEllaUd | Person::EllosUds) {
              if let Some(raised) = change.raised_replacement() {
                stem = replace_last_vowel(&stem, change.target_vowel(), raised);
              }
            }
          }
        }
        let endings = match class {
          VerbClass::Ar => &PRETERITE_AR,
          _ => &PRETERITE_ER_IR,
        };
        let ending = y_adjusted_ending(endings[idx], class, &stem);
        let stem = orthographic_adjust(stem, class, &ending);
        Some(format!("{}{}", stem, ending))
      }
      IndicativeTense::Imperfect => {
        if let Some(paradigm) = self.table.imperfect_indicative_override(infinitive) {
          return Some(paradigm[idx].clone());
        }
        let class = VerbClass::of(infinitive)?;
        let endings = match class {
          VerbClass::Ar => &IMPERFECT_IND_AR,
          _ => &IMPERFECT_IND_ER_IR,
        };
        Some(format!("{}{}", stem_of(infinitive), endings[idx]))
      }
      IndicativeTense::PresentPerfect => self
        .compound_surface(infinitive, &AUX_HE, person, true)
        .ok()
        .map(|(s, _)| s),
      IndicativeTense::Pluperfect => self
        .compound_surface(infinitive, &AUX_HABIA, person, true)
        .ok()
        .map(|(s, _)| s),
    }
  }

  fn simple_surface(
    &self,
    infinitive: &str,
    tense: SimpleTense,
    person: Person,
    with_stem_change: bool,
  ) -> Result<String, UnknownVerbError> {
    let class = VerbClass::of(infinitive).ok_or_else(|| UnknownVerbError::new(infinitive))?;
    let mut stem = stem_of(infinitive);

    if with_stem_change {
      if let Some(change) = self.table.stem_change_of(infinitive) {
        stem = apply_stem_change(&stem, change, class, tense, person);
      }
    }

    let endings: &[&str; 6] = match (tense, class) {
      (SimpleTense::Present, VerbClass::Ar) => &PRESENT_SUBJ_AR,
      (SimpleTense::Present, _) => &PRESENT_SUBJ_ER_IR,
      (SimpleTense::ImperfectRa, VerbClass::Ar) => &IMPERFECT_RA_AR,
      (SimpleTense::ImperfectRa, _) => &IMPERFECT_RA_ER_IR,
      (SimpleTense::ImperfectSe, VerbClass::Ar) => &IMPERFECT_SE_AR,
      (SimpleTense::ImperfectSe, _) => &IMPERFECT_SE_ER_IR,
    };

    let ending = y_adjusted_ending(endings[person.index()], class, &stem);
    let stem = orthographic_adjust(stem, class, &ending);
    Ok(format!("{}{}", stem, ending))
  }

  fn compound_surface(
    &self,
    infinitive: &str,
    aux: &[&str; 6],
    person: Person,
    with_participle_override: bool,
  ) -> Result<(String, bool), UnknownVerbError> {
    if with_participle_override {
      if let Some(participle) = self.table.participle_override(infinitive) {
        return Ok((format!("{} {}", aux[person.index()], participle), true));
      }
    }
    let class = VerbClass::of(infinitive).ok_or_else(|| UnknownVerbError::new(infinitive))?;
    let participle = regular_participle(&stem_of(infinitive), class);
    Ok((format!("{} {}", aux[person.index()], participle), false))
  }

  /// True when `candidate` is itself a real form of the verb other than the
  /// correct one; in that case an accent-stripped coincidence must not be
  /// graded as an accent slip.
  fn is_distinct_known_form(&self, infinitive: &str, candidate: &str, correct: &str) -> bool {
    for tense in Tense::ALL {
      for person in Person::ALL {
        if let Ok(form) = self.conjugate(infinitive, tense, person) {
          let normalized = normalize_answer(&form.surface_form);
          if normalized == candidate && normalized != correct {
            return true;
          }
        }
      }
    }
    for tense in IndicativeTense::ALL {
      for person in Person::ALL {
        if let Some(form) = self.indicative(infinitive, tense, person) {
          let normalized = normalize_answer(&form);
          if normalized == candidate && normalized != correct {
            return true;
          }
        }
      }
    }
    false
  }
}

// ============================================================================
// Morphology helpers
// ============================================================================

/// Infinitive minus its two-character class suffix.
fn stem_of(infinitive: &str) -> String {
  let chars: Vec<char> = infinitive.chars().collect();
  if chars.len() < 2 {
    return infinitive.to_string();
  }
  chars[..chars.len() - 2].iter().collect()
}

/// Apply a stem-change pattern for a simple subjunctive tense.
fn apply_stem_change(
  stem: &str,
  change: StemChange,
  class: VerbClass,
  tense: SimpleTense,
  person: Person,
) -> String {
  let replacement = match tense {
    SimpleTense::Present => {
      if person.in_boot() {
        Some(change.boot_replacement())
      } else if class == VerbClass::Ir {
        change.raised_replacement()
      } else {
        None
      }
    }
    // Imperfect subjunctive: only -ir verbs change, raised in every person
    SimpleTense::ImperfectRa | SimpleTense::ImperfectSe => {
      if class == VerbClass::Ir {
        change.raised_replacement()
      } else {
        None
      }
    }
  };

  match replacement {
    Some(rep) => replace_last_vowel(stem, change.target_vowel(), rep),
    None => stem.to_string(),
  }
}

fn replace_last_vowel(stem: &str, target: char, replacement: &str) -> String {
  match stem.char_indices().rev().find(|(_, c)| *c == target) {
    Some((idx, c)) => format!(
      "{}{}{}",
      &stem[..idx],
      replacement,
      &stem[idx + c.len_utf8()..]
    ),
    None => stem.to_string(),
  }
}

/// Spelling-preserving stem adjustments before front/back vowels:
/// -car/-gar/-zar before e → qu/gu/c; -guir/-ger/-cer before a or o →
/// g/j/z(zc).
fn orthographic_adjust(stem: String, class: VerbClass, ending: &str) -> String {
  let first = match ending.chars().next() {
    Some(c) => c,
    None => return stem,
  };
  match class {
    VerbClass::Ar if first == 'e' || first == 'é' => {
      if let Some(base) = stem.strip_suffix('c') {
        format!("{}qu", base)
      } else if let Some(base) = stem.strip_suffix('g') {
        format!("{}gu", base)
      } else if let Some(base) = stem.strip_suffix('z') {
        format!("{}c", base)
      } else {
        stem
      }
    }
    VerbClass::Er | VerbClass::Ir if first == 'a' || first == 'o' => {
      if let Some(base) = stem.strip_suffix("gu") {
        format!("{}g", base)
      } else if let Some(base) = stem.strip_suffix('g') {
        format!("{}j", base)
      } else if let Some(base) = stem.strip_suffix('c') {
        let softens_to_zc = base
          .chars()
          .last()
          .map(|c| "aeiou".contains(c))
          .unwrap_or(false);
        if softens_to_zc {
          format!("{}zc", base)
        } else {
          format!("{}z", base)
        }
      } else {
        stem
      }
    }
    _ => stem,
  }
}

/// Vowel-final -er/-ir stems turn an ending-initial i into y when a vowel
/// follows it (leer → leyera, oír → oyera). The silent u of gu/qu digraphs
/// does not count as a stem vowel (seguir → siguiera).
fn y_adjusted_ending(ending: &str, class: VerbClass, stem: &str) -> String {
  if class == VerbClass::Ar {
    return ending.to_string();
  }
  if stem.ends_with("gu") || stem.ends_with("qu") {
    return ending.to_string();
  }
  let stem_vowel_final = stem
    .chars()
    .last()
    .map(|c| "aeiouáéíóú".contains(c))
    .unwrap_or(false);
  if !stem_vowel_final {
    return ending.to_string();
  }
  if let Some(rest) = ending.strip_prefix('i') {
    let next_is_vowel = rest
      .chars()
      .next()
      .map(|c| "aeoáéó".contains(c))
      .unwrap_or(false);
    if next_is_vowel {
      return format!("y{}", rest);
    }
  }
  ending.to_string()
}

fn regular_participle(stem: &str, class: VerbClass) -> String {
  match class {
    VerbClass::Ar => format!("{}ado", stem),
    VerbClass::Er | VerbClass::Ir => {
      let strong_vowel_final = stem
        .chars()
        .last()
        .map(|c| "aeo".contains(c))
        .unwrap_or(false);
      if strong_vowel_final {
        format!("{}ído", stem)
      } else {
        format!("{}ido", stem)
      }
    }
  }
}

// ============================================================================
// Normalization
// ============================================================================

/// NFC-compose, lowercase, trim, and collapse internal whitespace.
pub(crate) fn normalize_answer(input: &str) -> String {
  input
    .nfc()
    .collect::<String>()
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Strip vowel diacritics. ñ is phonemically distinct and is never stripped.
pub(crate) fn strip_accents(input: &str) -> String {
  input
    .chars()
    .map(|c| match c {
      'á' => 'a',
      'é' => 'e',
      'í' => 'i',
      'ó' => 'o',
      'ú' => 'u',
      'ü' => 'u',
      other => other,
    })
    .collect()
}
