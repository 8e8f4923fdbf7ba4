use tracing::debug;
use uuid::Uuid;

use super::types::AbilityOrigin;
use crate::game_data::{
    BestiaryEntry, Consumable, Equippable, GameData, GameDataObject, ItemMod, ProgressionTable,
    ProgressionTableKind,
};

/// Everything in the game data that grants or contains one ability, grouped
/// by container kind. Each list keeps the game data's enumeration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct References<'a> {
    pub class_tables: Vec<&'a ProgressionTable>,
    pub character_tables: Vec<&'a ProgressionTable>,
    pub bestiary_entries: Vec<&'a BestiaryEntry>,
    pub equippables: Vec<&'a Equippable>,
    pub consumables: Vec<&'a Consumable>,
    pub origin: AbilityOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OriginCounts {
    pub class: usize,
    pub character: usize,
    pub creature: usize,
    pub equipment: usize,
    pub consumable: usize,
}

impl References<'_> {
    pub fn counts(&self) -> OriginCounts {
        OriginCounts {
            class: self.class_tables.len(),
            character: self.character_tables.len(),
            creature: self.bestiary_entries.len(),
            equipment: self.equippables.len(),
            consumable: self.consumables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts() == OriginCounts::default()
    }

    /// Debug names of every container, class tables first.
    pub fn debug_names(&self) -> Vec<String> {
        let tables = self
            .class_tables
            .iter()
            .chain(&self.character_tables)
            .map(|table| table.debug_name.clone());
        let entries = self.bestiary_entries.iter().map(|entry| entry.debug_name.clone());
        let equippables = self.equippables.iter().map(|item| item.debug_name.clone());
        let consumables = self.consumables.iter().map(|item| item.debug_name.clone());

        tables
            .chain(entries)
            .chain(equippables)
            .chain(consumables)
            .collect()
    }

    /// Display names of the equippables, then the consumables, that carry the
    /// ability.
    pub fn related_item_names(&self) -> Vec<String> {
        let equippables = self
            .equippables
            .iter()
            .map(|item| item_name(item.display_name.as_deref(), &item.debug_name));
        let consumables = self
            .consumables
            .iter()
            .map(|item| item_name(item.display_name.as_deref(), &item.debug_name));

        equippables.chain(consumables).collect()
    }
}

fn item_name(display_name: Option<&str>, debug_name: &str) -> String {
    display_name.unwrap_or(debug_name).to_string()
}

/// Picks one origin from containment counts.
///
/// Any class table wins outright. Otherwise the kind with the most matches
/// wins, ties going to the earlier of Character, Creature, Equipment,
/// Consumable. No matches at all is a four-way tie, so `Character`.
pub fn guess_origin(counts: OriginCounts) -> AbilityOrigin {
    if counts.class > 0 {
        return AbilityOrigin::Class;
    }

    let candidates = [
        (AbilityOrigin::Creature, counts.creature),
        (AbilityOrigin::Equipment, counts.equipment),
        (AbilityOrigin::Consumable, counts.consumable),
    ];

    let mut best = (AbilityOrigin::Character, counts.character);
    for (origin, count) in candidates {
        if count > best.1 {
            best = (origin, count);
        }
    }
    best.0
}

/// Cross-references `ability` against every container collection in `data`.
pub fn find_references<'a>(data: &'a GameData, ability: &GameDataObject) -> References<'a> {
    let class_tables = tables_containing(data, ability.id, ProgressionTableKind::Class);
    let character_tables = tables_containing(data, ability.id, ProgressionTableKind::Character);

    let bestiary_entries: Vec<&BestiaryEntry> = data
        .bestiary_entries
        .iter()
        .filter(|entry| entry.ability_ids.contains(&ability.id))
        .collect();

    // Only generic abilities can sit on item mods and consumables.
    let (equippables, consumables) = if ability.is_generic_ability() {
        (
            equippables_containing(data, ability.id),
            consumables_containing(data, ability.id),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    let mut references = References {
        class_tables,
        character_tables,
        bestiary_entries,
        equippables,
        consumables,
        origin: AbilityOrigin::None,
    };
    references.origin = guess_origin(references.counts());

    debug!(
        ability = %ability.debug_name,
        origin = ?references.origin,
        counts = ?references.counts(),
        "resolved ability references"
    );

    references
}

/// Progression tables of `kind` with an unlock entry that adds `ability`.
pub fn tables_containing(
    data: &GameData,
    ability: Uuid,
    kind: ProgressionTableKind,
) -> Vec<&ProgressionTable> {
    data.progression_tables
        .iter()
        .filter(|table| table.kind == kind && table.has_ability(ability))
        .collect()
}

/// Item mods that grant `ability` on equip.
pub fn item_mods_granting(data: &GameData, ability: Uuid) -> Vec<&ItemMod> {
    data.item_mods
        .iter()
        .filter(|item_mod| item_mod.abilities_on_equip.contains(&ability))
        .collect()
}

/// Equippables that carry, or could be enchanted with, a mod granting
/// `ability`.
pub fn equippables_containing(data: &GameData, ability: Uuid) -> Vec<&Equippable> {
    let mod_ids: Vec<Uuid> = item_mods_granting(data, ability)
        .into_iter()
        .map(|item_mod| item_mod.id)
        .collect();
    if mod_ids.is_empty() {
        return Vec::new();
    }

    data.equippables
        .iter()
        .filter(|equippable| {
            mod_ids
                .iter()
                .any(|mod_id| equippable_can_carry(data, equippable, *mod_id))
        })
        .collect()
}

fn equippable_can_carry(data: &GameData, equippable: &Equippable, mod_id: Uuid) -> bool {
    if equippable.item_mod_ids.contains(&mod_id) {
        return true;
    }

    equippable
        .applicable_recipe_ids
        .iter()
        .filter_map(|recipe_id| data.recipe(*recipe_id))
        .any(|recipe| recipe.item_mods_to_add.contains(&mod_id))
}

pub fn consumables_containing(data: &GameData, ability: Uuid) -> Vec<&Consumable> {
    data.consumables
        .iter()
        .filter(|consumable| {
            consumable.ability_id == Some(ability) || consumable.pickpocket_ability_id == Some(ability)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{OriginCounts, guess_origin};
    use crate::core_api::AbilityOrigin;

    #[test]
    fn highest_count_wins_without_class_tables() {
        let counts = OriginCounts {
            class: 0,
            character: 2,
            creature: 5,
            equipment: 1,
            consumable: 0,
        };
        assert_eq!(guess_origin(counts), AbilityOrigin::Creature);
    }

    #[test]
    fn class_tables_override_other_counts() {
        let counts = OriginCounts {
            class: 1,
            character: 9,
            creature: 9,
            equipment: 9,
            consumable: 9,
        };
        assert_eq!(guess_origin(counts), AbilityOrigin::Class);
    }

    #[test]
    fn ties_go_to_the_earlier_kind() {
        let counts = OriginCounts {
            equipment: 3,
            consumable: 3,
            ..OriginCounts::default()
        };
        assert_eq!(guess_origin(counts), AbilityOrigin::Equipment);

        let counts = OriginCounts {
            character: 1,
            consumable: 1,
            ..OriginCounts::default()
        };
        assert_eq!(guess_origin(counts), AbilityOrigin::Character);
    }

    #[test]
    fn no_matches_ties_to_character() {
        assert_eq!(guess_origin(OriginCounts::default()), AbilityOrigin::Character);
    }
}
