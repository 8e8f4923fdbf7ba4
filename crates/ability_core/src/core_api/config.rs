use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const WEAPON_PROFICIENCY_KEYWORD: Uuid = Uuid::from_u128(0xbb68a03d_507e_4799_9a4e_abe7377d1e56);
const TALENT_TABLE: Uuid = Uuid::from_u128(0x25f42f57_6bfb_4c30_bdfa_857a95fd5fd5);
const NO_CLASS: Uuid = Uuid::from_u128(0x1fe85e8d_d541_44dd_9dbc_fb056810e10e);
const MODAL_RECOVERY_TIME: f32 = 3.0;

#[rustfmt::skip]
const CLASS_IDS: &[(&str, u128)] = &[
    ("Barbarian", 0x825817d4_1fb0_4e5c_bf84_473743ad98de),
    ("Chanter",   0xb4a0f1d1_b8f7_47e7_b899_99e478004a37),
    ("Cipher",    0xccdc9675_e2a7_46fa_83e9_7a5368b56265),
    ("Druid",     0x568f1c26_1398_4e67_8b81_0f6a60e6cdde),
    ("Fighter",   0x6e6750b6_61d7_4b61_9713_55957e0f0591),
    ("Monk",      0xf0036bfb_53d5_4d0c_b11a_b780d788a108),
    ("Paladin",   0xf64b5a21_2dd1_41ae_8562_60ce099b25aa),
    ("Priest",    0xf7cb46af_a719_41c0_9a53_107eefdbce2b),
    ("Ranger",    0x1718929c_1faf_4292_b82c_7e2a7c20b3ab),
    ("Rogue",     0x8efd7667_8bc9_4020_b7f6_5a91b9d04e48),
    ("Wizard",    0xacfd1303_4699_4939_91eb_6ac46d4af0bd),
];

#[rustfmt::skip]
const ABILITY_TYPE_BY_CLASS: &[(&str, &str)] = &[
    ("Chanter",   "Invocation"),
    ("Cipher",    "Spell"),
    ("Druid",     "Spell"),
    ("Priest",    "Spell"),
    ("Wizard",    "Spell"),
    ("Barbarian", "Ability"),
    ("Fighter",   "Ability"),
    ("Monk",      "Ability"),
    ("Paladin",   "Ability"),
    ("Rogue",     "Ability"),
];

/// Game-specific identifiers and constants the extractor relies on.
///
/// `Default` carries the Deadfire values; every field can be overridden on
/// its own when loading from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Keyword marking weapon proficiency abilities.
    pub weapon_proficiency_keyword: Uuid,
    /// Class progression table that lists talents.
    pub talent_table: Uuid,
    /// Class id used for abilities that belong to no class.
    pub no_class: Uuid,
    /// Class debug name -> ability type label.
    pub ability_type_by_class: IndexMap<String, String>,
    /// Class debug name -> class id.
    pub class_ids: IndexMap<String, Uuid>,
    /// Recovery time given to modal abilities whose stat block has none.
    pub modal_recovery_time: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            weapon_proficiency_keyword: WEAPON_PROFICIENCY_KEYWORD,
            talent_table: TALENT_TABLE,
            no_class: NO_CLASS,
            ability_type_by_class: ABILITY_TYPE_BY_CLASS
                .iter()
                .map(|(class, label)| (class.to_string(), label.to_string()))
                .collect(),
            class_ids: CLASS_IDS
                .iter()
                .map(|(class, id)| (class.to_string(), Uuid::from_u128(*id)))
                .collect(),
            modal_recovery_time: MODAL_RECOVERY_TIME,
        }
    }
}

impl ExtractorConfig {
    pub fn class_id(&self, class_name: &str) -> Option<Uuid> {
        self.class_ids.get(class_name).copied()
    }

    /// Symbolic name of a class id, if it is one of the known classes.
    pub fn class_name(&self, class_id: Uuid) -> Option<&str> {
        self.class_ids
            .iter()
            .find(|(_, id)| **id == class_id)
            .map(|(name, _)| name.as_str())
    }

    pub fn ability_type_for_class(&self, class_name: &str) -> Option<&str> {
        self.ability_type_by_class.get(class_name).map(String::as_str)
    }

    /// True when `class_id` is absent, nil, or the "no class" marker.
    pub fn is_classless(&self, class_id: Option<Uuid>) -> bool {
        match class_id {
            None => true,
            Some(id) => id.is_nil() || id == self.no_class,
        }
    }
}
