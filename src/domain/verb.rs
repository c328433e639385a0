use serde::{Deserialize, Serialize};

/// Subjunctive tenses covered by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
  PresentSubjunctive,
  ImperfectSubjunctiveRa,
  ImperfectSubjunctiveSe,
  PresentPerfectSubjunctive,
  PluperfectSubjunctive,
}

impl Tense {
  pub const ALL: [Tense; 5] = [
    Self::PresentSubjunctive,
    Self::ImperfectSubjunctiveRa,
    Self::ImperfectSubjunctiveSe,
    Self::PresentPerfectSubjunctive,
    Self::PluperfectSubjunctive,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::PresentSubjunctive => "present_subjunctive",
      Self::ImperfectSubjunctiveRa => "imperfect_subjunctive_ra",
      Self::ImperfectSubjunctiveSe => "imperfect_subjunctive_se",
      Self::PresentPerfectSubjunctive => "present_perfect_subjunctive",
      Self::PluperfectSubjunctive => "pluperfect_subjunctive",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "present_subjunctive" => Some(Self::PresentSubjunctive),
      "imperfect_subjunctive_ra" => Some(Self::ImperfectSubjunctiveRa),
      "imperfect_subjunctive_se" => Some(Self::ImperfectSubjunctiveSe),
      "present_perfect_subjunctive" => Some(Self::PresentPerfectSubjunctive),
      "pluperfect_subjunctive" => Some(Self::PluperfectSubjunctive),
      _ => None,
    }
  }

  /// Human-facing name used in diagnostic hints.
  pub fn display_name(&self) -> &'static str {
    match self {
      Self::PresentSubjunctive => "present subjunctive",
      Self::ImperfectSubjunctiveRa => "imperfect subjunctive (-ra)",
      Self::ImperfectSubjunctiveSe => "imperfect subjunctive (-se)",
      Self::PresentPerfectSubjunctive => "present perfect subjunctive",
      Self::PluperfectSubjunctive => "pluperfect subjunctive",
    }
  }

  /// True for the haber + participle tenses.
  pub fn is_compound(&self) -> bool {
    matches!(
      self,
      Self::PresentPerfectSubjunctive | Self::PluperfectSubjunctive
    )
  }
}

/// Grammatical person, in paradigm order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Person {
  Yo,
  Tu,
  ElEllaUd,
  Nosotros,
  Vosotros,
  EllosUds,
}

impl Person {
  pub const ALL: [Person; 6] = [
    Self::Yo,
    Self::Tu,
    Self::ElEllaUd,
    Self::Nosotros,
    Self::Vosotros,
    Self::EllosUds,
  ];

  /// Index into a 6-slot paradigm array.
  pub fn index(&self) -> usize {
    match self {
      Self::Yo => 0,
      Self::Tu => 1,
      Self::ElEllaUd => 2,
      Self::Nosotros => 3,
      Self::Vosotros => 4,
      Self::EllosUds => 5,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Yo => "yo",
      Self::Tu => "tu",
      Self::ElEllaUd => "el_ella_ud",
      Self::Nosotros => "nosotros",
      Self::Vosotros => "vosotros",
      Self::EllosUds => "ellos_uds",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "yo" => Some(Self::Yo),
      "tu" => Some(Self::Tu),
      "el_ella_ud" => Some(Self::ElEllaUd),
      "nosotros" => Some(Self::Nosotros),
      "vosotros" => Some(Self::Vosotros),
      "ellos_uds" => Some(Self::EllosUds),
      _ => None,
    }
  }

  pub fn display_name(&self) -> &'static str {
    match self {
      Self::Yo => "yo",
      Self::Tu => "tú",
      Self::ElEllaUd => "él/ella/usted",
      Self::Nosotros => "nosotros",
      Self::Vosotros => "vosotros",
      Self::EllosUds => "ellos/ustedes",
    }
  }

  /// Boot-pattern persons: everyone except nosotros/vosotros.
  pub fn in_boot(&self) -> bool {
    !matches!(self, Self::Nosotros | Self::Vosotros)
  }
}

/// Verb class derived from the infinitive suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbClass {
  Ar,
  Er,
  Ir,
}

impl VerbClass {
  /// Classify an infinitive by suffix. Accent-tolerant for -ír (oír, reír).
  pub fn of(infinitive: &str) -> Option<Self> {
    if infinitive.len() < 3 {
      return None;
    }
    if infinitive.ends_with("ar") {
      Some(Self::Ar)
    } else if infinitive.ends_with("er") {
      Some(Self::Er)
    } else if infinitive.ends_with("ir") || infinitive.ends_with("ír") {
      Some(Self::Ir)
    } else {
      None
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Ar => "ar",
      Self::Er => "er",
      Self::Ir => "ir",
    }
  }
}

/// Stem-change pattern tag for a verb (pensar e→ie, poder o→ue, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemChange {
  EToIe,
  OToUe,
  EToI,
  UToUe,
}

impl StemChange {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::EToIe => "e_to_ie",
      Self::OToUe => "o_to_ue",
      Self::EToI => "e_to_i",
      Self::UToUe => "u_to_ue",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "e_to_ie" => Some(Self::EToIe),
      "o_to_ue" => Some(Self::OToUe),
      "e_to_i" => Some(Self::EToI),
      "u_to_ue" => Some(Self::UToUe),
      _ => None,
    }
  }

  /// Vowel replaced in the stem.
  pub fn target_vowel(&self) -> char {
    match self {
      Self::EToIe | Self::EToI => 'e',
      Self::OToUe => 'o',
      Self::UToUe => 'u',
    }
  }

  /// Replacement inside the boot (diphthongized form).
  pub fn boot_replacement(&self) -> &'static str {
    match self {
      Self::EToIe => "ie",
      Self::OToUe | Self::UToUe => "ue",
      Self::EToI => "i",
    }
  }

  /// Raised replacement used by -ir verbs outside the boot and in the
  /// imperfect subjunctive. None for u→ue (no -ir verbs carry it).
  pub fn raised_replacement(&self) -> Option<&'static str> {
    match self {
      Self::EToIe | Self::EToI => Some("i"),
      Self::OToUe => Some("u"),
      Self::UToUe => None,
    }
  }

  /// Short description for hints, e.g. "e→ie".
  pub fn display_name(&self) -> &'static str {
    match self {
      Self::EToIe => "e→ie",
      Self::OToUe => "o→ue",
      Self::EToI => "e→i",
      Self::UToUe => "u→ue",
    }
  }
}

/// One conjugated cell of a verb's paradigm, as produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbForm {
  pub infinitive: String,
  pub tense: Tense,
  pub person: Person,
  pub surface_form: String,
  pub is_irregular: bool,
  pub stem_change: Option<StemChange>,
}
