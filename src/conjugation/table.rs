//! Conjugation rule data: regular endings, irregular paradigms, stem-change
//! tags, and the indicative data used for mood-confusion diagnostics.
//!
//! The table is assembled once through [`RuleTableBuilder`] (starting from
//! the built-in inventory, optionally extended by verb packs) and is
//! read-only afterwards. Irregular overrides are complete six-person
//! paradigms; a partial paradigm is a data-integrity error rejected at
//! build time.

use std::collections::HashMap;

use crate::domain::{StemChange, Tense};

// ============================================================================
// Regular subjunctive endings, in paradigm order (yo..ellos/ustedes)
// ============================================================================

pub(crate) const PRESENT_SUBJ_AR: [&str; 6] = ["e", "es", "e", "emos", "éis", "en"];
pub(crate) const PRESENT_SUBJ_ER_IR: [&str; 6] = ["a", "as", "a", "amos", "áis", "an"];

pub(crate) const IMPERFECT_RA_AR: [&str; 6] = ["ara", "aras", "ara", "áramos", "arais", "aran"];
pub(crate) const IMPERFECT_RA_ER_IR: [&str; 6] =
  ["iera", "ieras", "iera", "iéramos", "ierais", "ieran"];

pub(crate) const IMPERFECT_SE_AR: [&str; 6] = ["ase", "ases", "ase", "ásemos", "aseis", "asen"];
pub(crate) const IMPERFECT_SE_ER_IR: [&str; 6] =
  ["iese", "ieses", "iese", "iésemos", "ieseis", "iesen"];

// Haber auxiliary paradigms for the compound tenses
pub(crate) const AUX_HAYA: [&str; 6] = ["haya", "hayas", "haya", "hayamos", "hayáis", "hayan"];
pub(crate) const AUX_HUBIERA: [&str; 6] =
  ["hubiera", "hubieras", "hubiera", "hubiéramos", "hubierais", "hubieran"];

// ============================================================================
// Regular indicative endings (diagnostic lookups only)
// ============================================================================

pub(crate) const PRESENT_IND_AR: [&str; 6] = ["o", "as", "a", "amos", "áis", "an"];
pub(crate) const PRESENT_IND_ER: [&str; 6] = ["o", "es", "e", "emos", "éis", "en"];
pub(crate) const PRESENT_IND_IR: [&str; 6] = ["o", "es", "e", "imos", "ís", "en"];

pub(crate) const PRETERITE_AR: [&str; 6] = ["é", "aste", "ó", "amos", "asteis", "aron"];
pub(crate) const PRETERITE_ER_IR: [&str; 6] = ["í", "iste", "ió", "imos", "isteis", "ieron"];

pub(crate) const IMPERFECT_IND_AR: [&str; 6] =
  ["aba", "abas", "aba", "ábamos", "abais", "aban"];
pub(crate) const IMPERFECT_IND_ER_IR: [&str; 6] = ["ía", "ías", "ía", "íamos", "íais", "ían"];

pub(crate) const AUX_HE: [&str; 6] = ["he", "has", "ha", "hemos", "habéis", "han"];
pub(crate) const AUX_HABIA: [&str; 6] =
  ["había", "habías", "había", "habíamos", "habíais", "habían"];

// ============================================================================
// Errors
// ============================================================================

/// Rule-table integrity errors raised at build time.
#[derive(Debug)]
pub enum RuleTableError {
  /// An irregular override does not cover all six persons.
  PartialParadigm {
    infinitive: String,
    tense: Tense,
    found: usize,
  },
  /// An override targets a compound tense (those are always derived from the
  /// auxiliary paradigm plus the participle).
  CompoundOverride { infinitive: String, tense: Tense },
  /// A paradigm slot is empty.
  EmptyForm { infinitive: String, tense: Tense },
}

impl std::fmt::Display for RuleTableError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RuleTableError::PartialParadigm {
        infinitive,
        tense,
        found,
      } => write!(
        f,
        "partial paradigm for '{}' in {}: expected 6 forms, found {}",
        infinitive,
        tense.as_str(),
        found
      ),
      RuleTableError::CompoundOverride { infinitive, tense } => write!(
        f,
        "'{}' overrides the compound tense {}; compound forms are derived, not stored",
        infinitive,
        tense.as_str()
      ),
      RuleTableError::EmptyForm { infinitive, tense } => {
        write!(f, "empty form for '{}' in {}", infinitive, tense.as_str())
      }
    }
  }
}

impl std::error::Error for RuleTableError {}

// ============================================================================
// Table
// ============================================================================

/// Immutable conjugation rule data, frozen after [`RuleTableBuilder::build`].
#[derive(Debug, Clone)]
pub struct RuleTable {
  irregulars: HashMap<String, HashMap<Tense, [String; 6]>>,
  stem_changes: HashMap<String, StemChange>,
  participles: HashMap<String, String>,
  present_indicative: HashMap<String, [String; 6]>,
  imperfect_indicative: HashMap<String, [String; 6]>,
}

impl RuleTable {
  /// An empty builder, for tests and fully pack-driven tables.
  pub fn builder() -> RuleTableBuilder {
    RuleTableBuilder::default()
  }

  /// A builder pre-populated with the built-in verb inventory.
  pub fn seeded() -> RuleTableBuilder {
    seed(RuleTableBuilder::default())
  }

  pub(crate) fn override_for(&self, infinitive: &str, tense: Tense) -> Option<&[String; 6]> {
    self.irregulars.get(infinitive).and_then(|t| t.get(&tense))
  }

  /// True when the verb has an irregular paradigm for this tense.
  pub fn has_override(&self, infinitive: &str, tense: Tense) -> bool {
    self.override_for(infinitive, tense).is_some()
  }

  /// True when the verb carries any irregular paradigm or participle.
  pub fn is_irregular(&self, infinitive: &str) -> bool {
    self.irregulars.contains_key(infinitive) || self.participles.contains_key(infinitive)
  }

  pub fn stem_change_of(&self, infinitive: &str) -> Option<StemChange> {
    self.stem_changes.get(infinitive).copied()
  }

  pub(crate) fn participle_override(&self, infinitive: &str) -> Option<&str> {
    self.participles.get(infinitive).map(String::as_str)
  }

  pub(crate) fn present_indicative_override(&self, infinitive: &str) -> Option<&[String; 6]> {
    self.present_indicative.get(infinitive)
  }

  pub(crate) fn imperfect_indicative_override(&self, infinitive: &str) -> Option<&[String; 6]> {
    self.imperfect_indicative.get(infinitive)
  }

  /// Number of verbs with at least one irregular paradigm.
  pub fn irregular_count(&self) -> usize {
    self.irregulars.len()
  }

  /// Number of verbs tagged with a stem-change pattern.
  pub fn stem_change_count(&self) -> usize {
    self.stem_changes.len()
  }
}

/// Derive the -se imperfect form from its -ra counterpart
/// (fuera → fuese, hubiéramos → hubiésemos).
pub(crate) fn ra_to_se(form: &str) -> String {
  match form.rfind("ra") {
    Some(idx) => format!("{}se{}", &form[..idx], &form[idx + 2..]),
    None => form.to_string(),
  }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates rule data; [`build`](Self::build) validates and freezes it.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
  irregulars: HashMap<String, HashMap<Tense, Vec<String>>>,
  stem_changes: HashMap<String, StemChange>,
  participles: HashMap<String, String>,
  present_indicative: HashMap<String, Vec<String>>,
  imperfect_indicative: HashMap<String, Vec<String>>,
}

impl RuleTableBuilder {
  /// Register a complete irregular paradigm for one tense.
  pub fn override_paradigm(self, infinitive: &str, tense: Tense, forms: [&str; 6]) -> Self {
    self.override_paradigm_vec(infinitive, tense, forms.iter().map(|s| s.to_string()).collect())
  }

  /// Vec-based variant used by the verb-pack loader; length is validated at
  /// build time.
  pub fn override_paradigm_vec(mut self, infinitive: &str, tense: Tense, forms: Vec<String>) -> Self {
    self
      .irregulars
      .entry(infinitive.to_string())
      .or_default()
      .insert(tense, forms);
    self
  }

  pub fn stem_change(mut self, infinitive: &str, change: StemChange) -> Self {
    self.stem_changes.insert(infinitive.to_string(), change);
    self
  }

  pub fn participle(mut self, infinitive: &str, participle: &str) -> Self {
    self
      .participles
      .insert(infinitive.to_string(), participle.to_string());
    self
  }

  /// Present-indicative paradigm, consulted only by the mood-confusion
  /// diagnostic.
  pub fn present_indicative(self, infinitive: &str, forms: [&str; 6]) -> Self {
    self.present_indicative_vec(infinitive, forms.iter().map(|s| s.to_string()).collect())
  }

  pub fn present_indicative_vec(mut self, infinitive: &str, forms: Vec<String>) -> Self {
    self.present_indicative.insert(infinitive.to_string(), forms);
    self
  }

  fn imperfect_indicative(mut self, infinitive: &str, forms: [&str; 6]) -> Self {
    self.imperfect_indicative.insert(
      infinitive.to_string(),
      forms.iter().map(|s| s.to_string()).collect(),
    );
    self
  }

  /// Validate and freeze. Fills in missing -se paradigms from their -ra
  /// counterparts before validation.
  pub fn build(mut self) -> Result<RuleTable, RuleTableError> {
    // Derive -se overrides wherever only the -ra paradigm was supplied.
    let derived: Vec<(String, Vec<String>)> = self
      .irregulars
      .iter()
      .filter(|(_, tenses)| {
        tenses.contains_key(&Tense::ImperfectSubjunctiveRa)
          && !tenses.contains_key(&Tense::ImperfectSubjunctiveSe)
      })
      .map(|(inf, tenses)| {
        let se = tenses[&Tense::ImperfectSubjunctiveRa]
          .iter()
          .map(|f| ra_to_se(f))
          .collect();
        (inf.clone(), se)
      })
      .collect();
    for (inf, se) in derived {
      self
        .irregulars
        .entry(inf)
        .or_default()
        .insert(Tense::ImperfectSubjunctiveSe, se);
    }

    let mut irregulars = HashMap::new();
    for (inf, tenses) in self.irregulars {
      let mut frozen: HashMap<Tense, [String; 6]> = HashMap::new();
      for (tense, forms) in tenses {
        if tense.is_compound() {
          return Err(RuleTableError::CompoundOverride {
            infinitive: inf,
            tense,
          });
        }
        if forms.len() != 6 {
          return Err(RuleTableError::PartialParadigm {
            infinitive: inf,
            tense,
            found: forms.len(),
          });
        }
        if forms.iter().any(|f| f.trim().is_empty()) {
          return Err(RuleTableError::EmptyForm {
            infinitive: inf,
            tense,
          });
        }
        let array: [String; 6] = match forms.try_into() {
          Ok(a) => a,
          Err(v) => {
            return Err(RuleTableError::PartialParadigm {
              infinitive: inf,
              tense,
              found: v.len(),
            })
          }
        };
        frozen.insert(tense, array);
      }
      irregulars.insert(inf, frozen);
    }

    let mut present_indicative = HashMap::new();
    for (inf, forms) in self.present_indicative {
      if forms.len() != 6 {
        return Err(RuleTableError::PartialParadigm {
          infinitive: inf,
          tense: Tense::PresentSubjunctive,
          found: forms.len(),
        });
      }
      let array: [String; 6] = match forms.try_into() {
        Ok(a) => a,
        Err(v) => {
          return Err(RuleTableError::PartialParadigm {
            infinitive: inf,
            tense: Tense::PresentSubjunctive,
            found: v.len(),
          })
        }
      };
      present_indicative.insert(inf, array);
    }

    let mut imperfect_indicative = HashMap::new();
    for (inf, forms) in self.imperfect_indicative {
      let array: [String; 6] = match forms.try_into() {
        Ok(a) => a,
        Err(v) => {
          return Err(RuleTableError::PartialParadigm {
            infinitive: inf,
            tense: Tense::ImperfectSubjunctiveRa,
            found: v.len(),
          })
        }
      };
      imperfect_indicative.insert(inf, array);
    }

    let table = RuleTable {
      irregulars,
      stem_changes: self.stem_changes,
      participles: self.participles,
      present_indicative,
      imperfect_indicative,
    };
    tracing::debug!(
      "rule table frozen: {} irregular verbs, {} stem-changers",
      table.irregular_count(),
      table.stem_change_count()
    );
    Ok(table)
  }
}

// ============================================================================
// Built-in inventory
// ============================================================================

fn seed(b: RuleTableBuilder) -> RuleTableBuilder {
  use StemChange::*;
  use Tense::{ImperfectSubjunctiveRa as Ra, PresentSubjunctive as Pres};

  let b = b
    // Stem-changing verbs (boot pattern; -ir verbs also raise)
    .stem_change("pensar", EToIe)
    .stem_change("empezar", EToIe)
    .stem_change("entender", EToIe)
    .stem_change("perder", EToIe)
    .stem_change("querer", EToIe)
    .stem_change("sentir", EToIe)
    .stem_change("preferir", EToIe)
    .stem_change("poder", OToUe)
    .stem_change("volver", OToUe)
    .stem_change("contar", OToUe)
    .stem_change("encontrar", OToUe)
    .stem_change("recordar", OToUe)
    .stem_change("soñar", OToUe)
    .stem_change("dormir", OToUe)
    .stem_change("morir", OToUe)
    .stem_change("jugar", UToUe)
    .stem_change("pedir", EToI)
    .stem_change("servir", EToI)
    .stem_change("repetir", EToI)
    .stem_change("seguir", EToI)
    .stem_change("vestir", EToI);

  let b = b
    // Irregular past participles; ir also needs one because its bare
    // infinitive has no stem to build on
    .participle("ir", "ido")
    .participle("hacer", "hecho")
    .participle("decir", "dicho")
    .participle("escribir", "escrito")
    .participle("ver", "visto")
    .participle("poner", "puesto")
    .participle("volver", "vuelto")
    .participle("abrir", "abierto")
    .participle("romper", "roto")
    .participle("morir", "muerto")
    .participle("cubrir", "cubierto")
    .participle("resolver", "resuelto");

  let b = b
    // Fully irregular present subjunctive, irregular preterite stems
    .override_paradigm("ser", Pres, ["sea", "seas", "sea", "seamos", "seáis", "sean"])
    .override_paradigm("ser", Ra, ["fuera", "fueras", "fuera", "fuéramos", "fuerais", "fueran"])
    .override_paradigm("estar", Pres, ["esté", "estés", "esté", "estemos", "estéis", "estén"])
    .override_paradigm(
      "estar",
      Ra,
      ["estuviera", "estuvieras", "estuviera", "estuviéramos", "estuvierais", "estuvieran"],
    )
    .override_paradigm("ir", Pres, ["vaya", "vayas", "vaya", "vayamos", "vayáis", "vayan"])
    .override_paradigm("ir", Ra, ["fuera", "fueras", "fuera", "fuéramos", "fuerais", "fueran"])
    .override_paradigm("haber", Pres, ["haya", "hayas", "haya", "hayamos", "hayáis", "hayan"])
    .override_paradigm(
      "haber",
      Ra,
      ["hubiera", "hubieras", "hubiera", "hubiéramos", "hubierais", "hubieran"],
    )
    .override_paradigm("saber", Pres, ["sepa", "sepas", "sepa", "sepamos", "sepáis", "sepan"])
    .override_paradigm(
      "saber",
      Ra,
      ["supiera", "supieras", "supiera", "supiéramos", "supierais", "supieran"],
    )
    .override_paradigm("dar", Pres, ["dé", "des", "dé", "demos", "deis", "den"])
    .override_paradigm("dar", Ra, ["diera", "dieras", "diera", "diéramos", "dierais", "dieran"])
    .override_paradigm("ver", Pres, ["vea", "veas", "vea", "veamos", "veáis", "vean"]);

  let b = b
    // Irregular yo-stem verbs (g-stems and friends)
    .override_paradigm("tener", Pres, ["tenga", "tengas", "tenga", "tengamos", "tengáis", "tengan"])
    .override_paradigm(
      "tener",
      Ra,
      ["tuviera", "tuvieras", "tuviera", "tuviéramos", "tuvierais", "tuvieran"],
    )
    .override_paradigm("hacer", Pres, ["haga", "hagas", "haga", "hagamos", "hagáis", "hagan"])
    .override_paradigm(
      "hacer",
      Ra,
      ["hiciera", "hicieras", "hiciera", "hiciéramos", "hicierais", "hicieran"],
    )
    .override_paradigm("poner", Pres, ["ponga", "pongas", "ponga", "pongamos", "pongáis", "pongan"])
    .override_paradigm(
      "poner",
      Ra,
      ["pusiera", "pusieras", "pusiera", "pusiéramos", "pusierais", "pusieran"],
    )
    .override_paradigm("venir", Pres, ["venga", "vengas", "venga", "vengamos", "vengáis", "vengan"])
    .override_paradigm(
      "venir",
      Ra,
      ["viniera", "vinieras", "viniera", "viniéramos", "vinierais", "vinieran"],
    )
    .override_paradigm("decir", Pres, ["diga", "digas", "diga", "digamos", "digáis", "digan"])
    .override_paradigm(
      "decir",
      Ra,
      ["dijera", "dijeras", "dijera", "dijéramos", "dijerais", "dijeran"],
    )
    .override_paradigm("traer", Pres, ["traiga", "traigas", "traiga", "traigamos", "traigáis", "traigan"])
    .override_paradigm(
      "traer",
      Ra,
      ["trajera", "trajeras", "trajera", "trajéramos", "trajerais", "trajeran"],
    )
    .override_paradigm("salir", Pres, ["salga", "salgas", "salga", "salgamos", "salgáis", "salgan"])
    .override_paradigm("oír", Pres, ["oiga", "oigas", "oiga", "oigamos", "oigáis", "oigan"])
    // Stem-changers with an irregular preterite stem keep their regular
    // (stem-changed) present subjunctive
    .override_paradigm(
      "querer",
      Ra,
      ["quisiera", "quisieras", "quisiera", "quisiéramos", "quisierais", "quisieran"],
    )
    .override_paradigm(
      "poder",
      Ra,
      ["pudiera", "pudieras", "pudiera", "pudiéramos", "pudierais", "pudieran"],
    );

  // Present indicative of frequent verbs, for mood-confusion diagnostics
  let b = b
    .present_indicative("ser", ["soy", "eres", "es", "somos", "sois", "son"])
    .present_indicative("estar", ["estoy", "estás", "está", "estamos", "estáis", "están"])
    .present_indicative("ir", ["voy", "vas", "va", "vamos", "vais", "van"])
    .present_indicative("haber", ["he", "has", "ha", "hemos", "habéis", "han"])
    .present_indicative("tener", ["tengo", "tienes", "tiene", "tenemos", "tenéis", "tienen"])
    .present_indicative("hacer", ["hago", "haces", "hace", "hacemos", "hacéis", "hacen"])
    .present_indicative("saber", ["sé", "sabes", "sabe", "sabemos", "sabéis", "saben"])
    .present_indicative("dar", ["doy", "das", "da", "damos", "dais", "dan"])
    .present_indicative("ver", ["veo", "ves", "ve", "vemos", "veis", "ven"])
    .present_indicative("decir", ["digo", "dices", "dice", "decimos", "decís", "dicen"])
    .present_indicative("venir", ["vengo", "vienes", "viene", "venimos", "venís", "vienen"])
    .present_indicative("poner", ["pongo", "pones", "pone", "ponemos", "ponéis", "ponen"])
    .present_indicative("salir", ["salgo", "sales", "sale", "salimos", "salís", "salen"])
    .present_indicative("oír", ["oigo", "oyes", "oye", "oímos", "oís", "oyen"]);

  // Imperfect indicative irregulars (there are only three in the language)
  b.imperfect_indicative("ser", ["era", "eras", "era", "éramos", "erais", "eran"])
    .imperfect_indicative("ir", ["iba", "ibas", "iba", "íbamos", "ibais", "iban"])
    .imperfect_indicative("ver", ["veía", "veías", "veía", "veíamos", "veíais", "veían"])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_seeded_table_builds() {
    let table = RuleTable::seeded().build().unwrap();
    assert!(table.irregular_count() >= 15);
    assert!(table.stem_change_count() >= 20);
  }

  #[test]
  fn test_override_lookup() {
    let table = RuleTable::seeded().build().unwrap();
    let pres = table.override_for("ser", Tense::PresentSubjunctive).unwrap();
    assert_eq!(pres[0], "sea");
    assert_eq!(pres[5], "sean");
    assert!(table.has_override("ser", Tense::ImperfectSubjunctiveRa));
    assert!(!table.has_override("hablar", Tense::PresentSubjunctive));
  }

  #[test]
  fn test_se_paradigm_derived_from_ra() {
    let table = RuleTable::seeded().build().unwrap();
    let se = table
      .override_for("ser", Tense::ImperfectSubjunctiveSe)
      .unwrap();
    assert_eq!(se[0], "fuese");
    assert_eq!(se[3], "fuésemos");
    assert_eq!(se[4], "fueseis");
    assert_eq!(se[5], "fuesen");
  }

  #[test]
  fn test_ra_to_se_transform() {
    assert_eq!(ra_to_se("fuera"), "fuese");
    assert_eq!(ra_to_se("hubiéramos"), "hubiésemos");
    assert_eq!(ra_to_se("dijeran"), "dijesen");
    assert_eq!(ra_to_se("fuerais"), "fueseis");
  }

  #[test]
  fn test_salir_overrides_present_only() {
    let table = RuleTable::seeded().build().unwrap();
    assert!(table.has_override("salir", Tense::PresentSubjunctive));
    // Regular preterite stem: saliera comes from the rule path
    assert!(!table.has_override("salir", Tense::ImperfectSubjunctiveRa));
    assert!(!table.has_override("salir", Tense::ImperfectSubjunctiveSe));
  }

  #[test]
  fn test_partial_paradigm_rejected() {
    let err = RuleTable::builder()
      .override_paradigm_vec(
        "cantar",
        Tense::PresentSubjunctive,
        vec!["cante".into(), "cantes".into()],
      )
      .build()
      .unwrap_err();
    match err {
      RuleTableError::PartialParadigm {
        infinitive, found, ..
      } => {
        assert_eq!(infinitive, "cantar");
        assert_eq!(found, 2);
      }
      other => panic!("expected PartialParadigm, got {:?}", other),
    }
  }

  #[test]
  fn test_compound_override_rejected() {
    let err = RuleTable::builder()
      .override_paradigm(
        "cantar",
        Tense::PresentPerfectSubjunctive,
        ["a", "b", "c", "d", "e", "f"],
      )
      .build()
      .unwrap_err();
    assert!(matches!(err, RuleTableError::CompoundOverride { .. }));
  }

  #[test]
  fn test_empty_form_rejected() {
    let err = RuleTable::builder()
      .override_paradigm(
        "cantar",
        Tense::PresentSubjunctive,
        ["cante", "", "cante", "cantemos", "cantéis", "canten"],
      )
      .build()
      .unwrap_err();
    assert!(matches!(err, RuleTableError::EmptyForm { .. }));
  }

  #[test]
  fn test_stem_change_lookup() {
    let table = RuleTable::seeded().build().unwrap();
    assert_eq!(table.stem_change_of("pensar"), Some(StemChange::EToIe));
    assert_eq!(table.stem_change_of("dormir"), Some(StemChange::OToUe));
    assert_eq!(table.stem_change_of("pedir"), Some(StemChange::EToI));
    assert_eq!(table.stem_change_of("jugar"), Some(StemChange::UToUe));
    assert_eq!(table.stem_change_of("hablar"), None);
  }

  #[test]
  fn test_participle_lookup() {
    let table = RuleTable::seeded().build().unwrap();
    assert_eq!(table.participle_override("hacer"), Some("hecho"));
    assert_eq!(table.participle_override("hablar"), None);
  }

  #[test]
  fn test_is_irregular() {
    let table = RuleTable::seeded().build().unwrap();
    assert!(table.is_irregular("ser"));
    assert!(table.is_irregular("escribir")); // participle only
    assert!(!table.is_irregular("hablar"));
    assert!(!table.is_irregular("pensar")); // stem change is not irregularity
  }
}
