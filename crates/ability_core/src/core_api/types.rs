use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CoreError;
use crate::game_data::IconRect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AbilityOrigin {
    #[default]
    None,
    Class,
    Character,
    Creature,
    Equipment,
    Consumable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearnType {
    #[default]
    None,
    Automatic,
    Optional,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActivationType {
    #[default]
    None,
    Active,
    Modal,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestorationType {
    #[default]
    None,
    Encounter,
    Rest,
}

impl AbilityOrigin {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Class => "Class",
            Self::Character => "Character",
            Self::Creature => "Creature",
            Self::Equipment => "Equipment",
            Self::Consumable => "Consumable",
        }
    }
}

impl LearnType {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Automatic => "Automatic",
            Self::Optional => "Optional",
            Self::Mixed => "Mixed",
        }
    }
}

impl ActivationType {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Active => "Active",
            Self::Modal => "Modal",
            Self::Passive => "Passive",
        }
    }
}

impl RestorationType {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Encounter => "Encounter",
            Self::Rest => "Rest",
        }
    }
}

/// Effects for one target group. `effects` is wiki-ready text,
/// `effects_unformatted` the raw rich text it was made from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectBlock {
    pub target: String,
    pub effects: String,
    pub effects_unformatted: String,
}

/// Normalized description of one ability, ready to serialize or render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AbilityRecord {
    pub guid: Uuid,
    pub internalname: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_based_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_rect: Option<IconRect>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal_group: Option<String>,
    pub ability_origin: AbilityOrigin,

    pub learn_type: LearnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learn_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learn_level_mc: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upgrades_to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrades_from: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub counters: Vec<String>,
    // Keyword debug names. Not parallel with `keywords`/`counters`, which skip
    // keywords without an adjective.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyword_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub counter_ids: Vec<String>,

    pub activation: ActivationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_cost: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<i32>,
    pub restoration: RestorationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combat_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast_time: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_time: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_of_effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linger: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_impact: Option<String>,

    pub effect_blocks: Vec<EffectBlock>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_items: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat_block_raw: Option<String>,
    pub stat_block_pairs_all: IndexMap<String, String>,
    pub stat_block_pairs_unused: IndexMap<String, String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub game_data_referencing_this_ability: Vec<String>,
}

/// Batch output document: `{ "data": [ ... ] }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbilityRecordCollection {
    pub data: Vec<AbilityRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationKind {
    UpgradesFrom,
    GrantingItemMod,
    EquipmentUpgradesFrom,
}

/// Several candidates where one was expected. The affected field is left
/// unset rather than picking one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousRelation {
    pub ability: String,
    pub relation: RelationKind,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub record: AbilityRecord,
    pub ambiguities: Vec<AmbiguousRelation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    pub id: Uuid,
    pub error: CoreError,
}

/// Outcome of a batch run. Failed ids are listed, never fatal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchExtraction {
    pub extractions: Vec<Extraction>,
    pub failures: Vec<ExtractionFailure>,
}

impl BatchExtraction {
    pub fn records(&self) -> impl Iterator<Item = &AbilityRecord> {
        self.extractions.iter().map(|extraction| &extraction.record)
    }

    pub fn into_collection(self) -> AbilityRecordCollection {
        AbilityRecordCollection {
            data: self
                .extractions
                .into_iter()
                .map(|extraction| extraction.record)
                .collect(),
        }
    }
}
