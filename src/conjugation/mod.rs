pub mod engine;
pub mod packs;
pub mod table;

pub use engine::{
  ConjugationEngine, IndicativeTense, MatchType, UnknownVerbError, ValidationOptions,
  ValidationResult,
};
pub use packs::{apply_verb_pack, load_verb_pack, VerbPackError};
pub use table::{RuleTable, RuleTableBuilder, RuleTableError};
