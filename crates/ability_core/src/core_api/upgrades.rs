use tracing::warn;
use uuid::Uuid;

use super::references::item_mods_granting;
use super::types::{AbilityOrigin, AmbiguousRelation, RelationKind};
use crate::game_data::{GameData, GameDataObject};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpgradeChain {
    /// Set only when exactly one distinct name was found.
    pub upgrades_from: Option<String>,
    pub upgrades_to: Vec<String>,
    pub ambiguities: Vec<AmbiguousRelation>,
}

/// Resolves which abilities `ability` upgrades from and into.
///
/// Direct `upgraded_from` links (both directions) and progression-table
/// swaps are merged and deduplicated by id before names are looked up. For
/// equipment abilities the enchantment recipes are consulted as well, and
/// their results take precedence.
pub fn resolve_upgrades(
    data: &GameData,
    ability: &GameDataObject,
    origin: AbilityOrigin,
) -> UpgradeChain {
    let mut chain = UpgradeChain::default();
    let Some(details) = ability.ability_details() else {
        return chain;
    };

    let mut from_ids = Vec::new();
    if let Some(id) = details.upgraded_from_id {
        push_unique(&mut from_ids, id);
    }

    let mut to_ids = Vec::new();
    for other in &data.unlockables {
        if other
            .ability_details()
            .is_some_and(|other| other.upgraded_from_id == Some(ability.id))
        {
            push_unique(&mut to_ids, other.id);
        }
    }

    for unlock in data
        .progression_tables
        .iter()
        .flat_map(|table| &table.ability_unlocks)
    {
        if unlock.add_ability_id == Some(ability.id)
            && let Some(removed) = unlock.remove_ability_id
        {
            push_unique(&mut from_ids, removed);
        }
        if unlock.remove_ability_id == Some(ability.id)
            && let Some(added) = unlock.add_ability_id
        {
            push_unique(&mut to_ids, added);
        }
    }

    let from_names = names_of(data, &from_ids);
    match from_names.len() {
        0 => {}
        1 => chain.upgrades_from = from_names.into_iter().next(),
        _ => chain.ambiguities.push(ambiguous(
            ability,
            RelationKind::UpgradesFrom,
            from_names,
        )),
    }
    chain.upgrades_to = names_of(data, &to_ids);

    if origin == AbilityOrigin::Equipment {
        resolve_equipment_upgrades(data, ability, &mut chain);
    }

    chain
}

fn resolve_equipment_upgrades(data: &GameData, ability: &GameDataObject, chain: &mut UpgradeChain) {
    let granting = item_mods_granting(data, ability.id);
    let Some(item_mod) = granting.first() else {
        return;
    };
    if granting.len() > 1 {
        let candidates = granting.iter().map(|m| m.debug_name.clone()).collect();
        chain.ambiguities.push(ambiguous(
            ability,
            RelationKind::GrantingItemMod,
            candidates,
        ));
    }

    // Recipes adding this mod while removing another one upgrade from the
    // removed mod's abilities.
    let mut removed_mods = Vec::new();
    let mut added_mods = Vec::new();
    for recipe in &data.recipes {
        if recipe.item_mods_to_add.contains(&item_mod.id) {
            for id in &recipe.item_mods_to_remove {
                push_unique(&mut removed_mods, *id);
            }
        }
        if recipe.item_mods_to_remove.contains(&item_mod.id) {
            for id in &recipe.item_mods_to_add {
                push_unique(&mut added_mods, *id);
            }
        }
    }

    let from_abilities = abilities_on_mods(data, &removed_mods);
    match from_abilities.len() {
        0 => {}
        1 => {
            if let Some(name) = names_of(data, &from_abilities).into_iter().next() {
                chain.upgrades_from = Some(name);
            }
        }
        _ => {
            let candidates = names_of(data, &from_abilities);
            chain.ambiguities.push(ambiguous(
                ability,
                RelationKind::EquipmentUpgradesFrom,
                candidates,
            ));
        }
    }

    let to_abilities = abilities_on_mods(data, &added_mods);
    if !to_abilities.is_empty() {
        chain.upgrades_to = names_of(data, &to_abilities);
    }
}

fn abilities_on_mods(data: &GameData, mod_ids: &[Uuid]) -> Vec<Uuid> {
    let mut abilities = Vec::new();
    for item_mod in mod_ids.iter().filter_map(|id| data.item_mod(*id)) {
        for ability in &item_mod.abilities_on_equip {
            push_unique(&mut abilities, *ability);
        }
    }
    abilities
}

/// Distinct display names of `ids`, in order. Ids without a display name are
/// logged and skipped.
fn names_of(data: &GameData, ids: &[Uuid]) -> Vec<String> {
    let mut names = Vec::new();
    for id in ids.iter().copied().filter(|id| !id.is_nil()) {
        match data.unlockable(id).and_then(display_name) {
            Some(name) => push_unique(&mut names, name),
            None => warn!(%id, "upgrade candidate has no display name"),
        }
    }
    names
}

pub(crate) fn display_name(object: &GameDataObject) -> Option<String> {
    object
        .display_name
        .clone()
        .or_else(|| object.inspectable.as_ref().map(|inspectable| inspectable.name.clone()))
}

fn ambiguous(
    ability: &GameDataObject,
    relation: RelationKind,
    candidates: Vec<String>,
) -> AmbiguousRelation {
    warn!(
        ability = %ability.debug_name,
        ?relation,
        ?candidates,
        "ambiguous relation left unresolved"
    );
    AmbiguousRelation {
        ability: ability.debug_name.clone(),
        relation,
        candidates,
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}
