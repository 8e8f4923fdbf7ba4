mod config;
mod engine;
mod error;
mod references;
mod types;
mod upgrades;

pub use config::ExtractorConfig;
pub use engine::{Engine, learn_type_from_styles};
pub use error::{CoreError, CoreErrorCode};
pub use references::{
    OriginCounts, References, consumables_containing, equippables_containing, find_references,
    guess_origin, item_mods_granting, tables_containing,
};
pub use types::{
    AbilityOrigin, AbilityRecord, AbilityRecordCollection, ActivationType, AmbiguousRelation,
    BatchExtraction, EffectBlock, Extraction, ExtractionFailure, LearnType, RelationKind,
    RestorationType,
};
pub use upgrades::{UpgradeChain, resolve_upgrades};
