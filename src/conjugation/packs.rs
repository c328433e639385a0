//! Verb pack loading - reads verb definitions from pack JSON files.
//!
//! Packs extend the built-in rule table with additional stem-changers,
//! irregular paradigms, and participles. A pack is a single JSON file:
//!
//! ```json
//! {
//!   "verbs": [
//!     {
//!       "infinitive": "caber",
//!       "paradigms": {
//!         "present_subjunctive": ["quepa", "quepas", "quepa",
//!                                  "quepamos", "quepáis", "quepan"],
//!         "imperfect_subjunctive_ra": ["cupiera", "cupieras", "cupiera",
//!                                       "cupiéramos", "cupierais", "cupieran"]
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! The -se paradigm is derived from the -ra paradigm when absent, exactly as
//! for built-in verbs.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::{StemChange, Tense};

use super::table::{RuleTableBuilder, RuleTableError};

/// One verb's worth of rule data from a pack file.
#[derive(Debug, Clone, Deserialize)]
pub struct VerbDefinition {
    pub infinitive: String,
    #[serde(default)]
    pub stem_change: Option<StemChange>,
    #[serde(default)]
    pub participle: Option<String>,
    /// Tense name (snake_case, as in [`Tense::as_str`]) to six forms.
    #[serde(default)]
    pub paradigms: BTreeMap<String, Vec<String>>,
    /// Optional present-indicative paradigm for mood-confusion diagnostics.
    #[serde(default)]
    pub present_indicative: Option<Vec<String>>,
}

/// Container for a pack's verbs.json file.
#[derive(Debug, Deserialize)]
pub struct VerbPackData {
    pub verbs: Vec<VerbDefinition>,
}

/// Errors loading a verb pack.
#[derive(Debug)]
pub enum VerbPackError {
    FileNotFound(String),
    IoError(String, String),
    ParseError(String, String),
    /// A paradigm key does not name a subjunctive tense.
    UnknownTense { infinitive: String, tense: String },
    /// Table-level integrity failure (partial paradigm etc).
    Table(RuleTableError),
}

impl std::fmt::Display for VerbPackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerbPackError::FileNotFound(path) => write!(f, "verb pack not found: {}", path),
            VerbPackError::IoError(path, e) => write!(f, "IO error reading {}: {}", path, e),
            VerbPackError::ParseError(path, e) => write!(f, "parse error in {}: {}", path, e),
            VerbPackError::UnknownTense { infinitive, tense } => {
                write!(f, "unknown tense '{}' for verb '{}'", tense, infinitive)
            }
            VerbPackError::Table(e) => write!(f, "invalid verb pack data: {}", e),
        }
    }
}

impl std::error::Error for VerbPackError {}

impl From<RuleTableError> for VerbPackError {
    fn from(e: RuleTableError) -> Self {
        VerbPackError::Table(e)
    }
}

/// Load verb definitions from a pack file.
pub fn load_verb_pack(path: &Path) -> Result<Vec<VerbDefinition>, VerbPackError> {
    if !path.exists() {
        return Err(VerbPackError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| VerbPackError::IoError(path.display().to_string(), e.to_string()))?;

    let data: VerbPackData = serde_json::from_str(&content)
        .map_err(|e| VerbPackError::ParseError(path.display().to_string(), e.to_string()))?;

    tracing::debug!("loaded {} verbs from pack {}", data.verbs.len(), path.display());
    Ok(data.verbs)
}

/// Fold verb definitions into a rule table builder.
///
/// Unknown tense keys are rejected here; paradigm completeness is validated
/// by [`RuleTableBuilder::build`].
pub fn apply_verb_pack(
    mut builder: RuleTableBuilder,
    verbs: &[VerbDefinition],
) -> Result<RuleTableBuilder, VerbPackError> {
    for verb in verbs {
        if let Some(change) = verb.stem_change {
            builder = builder.stem_change(&verb.infinitive, change);
        }
        if let Some(ref participle) = verb.participle {
            builder = builder.participle(&verb.infinitive, participle);
        }
        for (tense_name, forms) in &verb.paradigms {
            let tense = Tense::from_str(tense_name).ok_or_else(|| VerbPackError::UnknownTense {
                infinitive: verb.infinitive.clone(),
                tense: tense_name.clone(),
            })?;
            builder = builder.override_paradigm_vec(&verb.infinitive, tense, forms.clone());
        }
        if let Some(ref forms) = verb.present_indicative {
            builder = builder.present_indicative_vec(&verb.infinitive, forms.clone());
        }
    }
    Ok(builder)
}
