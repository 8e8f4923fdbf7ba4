//! In-memory view of the game-data dump the extractor reads from.
//!
//! The dump is produced by an external exporter and is treated as read-only.
//! Every collection keeps the exporter's enumeration order, and containment
//! queries report their matches in that order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IconRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Sprite reference for objects that carry an icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteIcon {
    pub sprite_name: String,
    pub rect: IconRect,
}

/// One target group of the inspect window's effect breakdown. `effects` is the
/// raw rich-text string, markup included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub target: String,
    pub effects: String,
}

/// What the in-game inspect window shows for an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspectable {
    pub name: String,
    pub flavor_text: String,
    #[serde(default)]
    pub stat_block: String,
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CooldownType {
    #[default]
    None,
    PerEncounter,
    PerRest,
    ClassAccruedResource,
    ClassPowerPool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDetails {
    pub ability_level: i32,
    #[serde(default)]
    pub ability_class_id: Option<Uuid>,
    #[serde(default)]
    pub upgraded_from_id: Option<Uuid>,
    #[serde(default)]
    pub keyword_ids: Vec<Uuid>,
    #[serde(default)]
    pub modal_group_id: Option<Uuid>,
    #[serde(default)]
    pub is_passive: bool,
    #[serde(default)]
    pub is_modal: bool,
    #[serde(default)]
    pub is_combat_only: bool,
    #[serde(default)]
    pub usage_type: CooldownType,
    #[serde(default)]
    pub usage_value: i32,
    #[serde(default)]
    pub tactical_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseDetails {
    pub level: i32,
    #[serde(default)]
    pub status_effect_keyword_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UnlockableKind {
    GenericAbility(AbilityDetails),
    Phrase(PhraseDetails),
    Other,
}

/// A progression unlockable: an ability, a chanter phrase, or something else
/// the progression tables can hand out.
///
/// The optional fields are capabilities. Their presence is decided by the
/// exporter once and never re-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDataObject {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub icon: Option<SpriteIcon>,
    #[serde(default)]
    pub inspectable: Option<Inspectable>,
    pub kind: UnlockableKind,
}

impl GameDataObject {
    pub fn ability_details(&self) -> Option<&AbilityDetails> {
        match &self.kind {
            UnlockableKind::GenericAbility(details) => Some(details),
            _ => None,
        }
    }

    pub fn phrase_details(&self) -> Option<&PhraseDetails> {
        match &self.kind {
            UnlockableKind::Phrase(details) => Some(details),
            _ => None,
        }
    }

    pub fn is_generic_ability(&self) -> bool {
        self.ability_details().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionTableKind {
    Class,
    Character,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockStyle {
    AutoGrant,
    Unlock,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockableAbility {
    #[serde(default)]
    pub add_ability_id: Option<Uuid>,
    #[serde(default)]
    pub remove_ability_id: Option<Uuid>,
    pub unlock_style: UnlockStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTable {
    pub id: Uuid,
    pub debug_name: String,
    pub kind: ProgressionTableKind,
    #[serde(default)]
    pub ability_unlocks: Vec<UnlockableAbility>,
}

impl ProgressionTable {
    pub fn has_ability(&self, ability: Uuid) -> bool {
        self.find_ability(ability).is_some()
    }

    /// First unlock entry that adds `ability`.
    pub fn find_ability(&self, ability: Uuid) -> Option<&UnlockableAbility> {
        self.ability_unlocks
            .iter()
            .find(|unlock| unlock.add_ability_id == Some(ability))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestiaryEntry {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub ability_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMod {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub abilities_on_equip: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub item_mods_to_add: Vec<Uuid>,
    #[serde(default)]
    pub item_mods_to_remove: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equippable {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub item_mod_ids: Vec<Uuid>,
    #[serde(default)]
    pub applicable_recipe_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub ability_id: Option<Uuid>,
    #[serde(default)]
    pub pickpocket_ability_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub adjective: Option<String>,
    #[serde(default)]
    pub opposing_keyword_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub id: Uuid,
    pub debug_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub accrued_resource_name: Option<String>,
    #[serde(default)]
    pub power_pool_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalGroup {
    pub id: Uuid,
    pub display_name: String,
}

/// Character level at which each power level is reached, indexed by
/// `power_level - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProgression {
    pub power_level_character_levels: Vec<i32>,
    pub multiclass_power_level_character_levels: Vec<i32>,
}

impl CharacterProgression {
    pub fn power_level_reached_at(&self, power_level: i32, multiclass: bool) -> Option<i32> {
        let levels = if multiclass {
            &self.multiclass_power_level_character_levels
        } else {
            &self.power_level_character_levels
        };
        let index = usize::try_from(power_level.checked_sub(1)?).ok()?;
        levels.get(index).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    pub unlockables: Vec<GameDataObject>,
    pub progression_tables: Vec<ProgressionTable>,
    pub bestiary_entries: Vec<BestiaryEntry>,
    pub item_mods: Vec<ItemMod>,
    pub recipes: Vec<Recipe>,
    pub equippables: Vec<Equippable>,
    pub consumables: Vec<Consumable>,
    pub keywords: Vec<Keyword>,
    pub classes: Vec<CharacterClass>,
    pub modal_groups: Vec<ModalGroup>,
    pub character_progression: CharacterProgression,
}

impl GameData {
    pub fn unlockable(&self, id: Uuid) -> Option<&GameDataObject> {
        self.unlockables.iter().find(|object| object.id == id)
    }

    pub fn class(&self, id: Uuid) -> Option<&CharacterClass> {
        self.classes.iter().find(|class| class.id == id)
    }

    pub fn keyword(&self, id: Uuid) -> Option<&Keyword> {
        self.keywords.iter().find(|keyword| keyword.id == id)
    }

    pub fn modal_group(&self, id: Uuid) -> Option<&ModalGroup> {
        self.modal_groups.iter().find(|group| group.id == id)
    }

    pub fn item_mod(&self, id: Uuid) -> Option<&ItemMod> {
        self.item_mods.iter().find(|item_mod| item_mod.id == id)
    }

    pub fn recipe(&self, id: Uuid) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn progression_table(&self, id: Uuid) -> Option<&ProgressionTable> {
        self.progression_tables.iter().find(|table| table.id == id)
    }
}
