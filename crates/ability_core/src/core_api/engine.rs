use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::ExtractorConfig;
use super::error::{CoreError, CoreErrorCode};
use super::references::{References, find_references, tables_containing};
use super::types::{
    AbilityRecord, ActivationType, BatchExtraction, EffectBlock, Extraction, ExtractionFailure,
    LearnType, RestorationType,
};
use super::upgrades::resolve_upgrades;
use crate::game_data::{
    AbilityDetails, CooldownType, GameData, GameDataObject, Inspectable, Keyword,
    ProgressionTableKind, UnlockStyle, UnlockableKind,
};
use crate::markup::{format_effects, strip_html};
use crate::stat_block::{lookup_value, parse_pairs, parse_seconds, split_noise, unused_pairs};

const ICON_SUFFIX: &str = "_icon.png";
const PHRASE_ABILITY_TYPE: &str = "Phrase";
const PHRASE_CLASS: &str = "Chanter";
const PROFICIENCY_ABILITY_TYPE: &str = "Proficiency";
const TALENT_ABILITY_TYPE: &str = "Talent";

/// Builds ability records from a loaded game-data dump.
///
/// The game data is read-only for the lifetime of the engine; every
/// extraction is independent of the others.
#[derive(Debug, Clone)]
pub struct Engine {
    data: GameData,
    config: ExtractorConfig,
}

impl Engine {
    pub fn new(data: GameData, config: ExtractorConfig) -> Self {
        Self { data, config }
    }

    pub fn with_default_config(data: GameData) -> Self {
        Self::new(data, ExtractorConfig::default())
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn references(&self, id: Uuid) -> Result<References<'_>, CoreError> {
        let object = self.unlockable(id)?;
        Ok(find_references(&self.data, object))
    }

    /// Builds the record for one unlockable.
    pub fn extract(&self, id: Uuid) -> Result<Extraction, CoreError> {
        let object = self.unlockable(id)?;
        let Some(inspectable) = object.inspectable.as_ref() else {
            return Err(CoreError::new(
                CoreErrorCode::NotExtractable,
                format!("{} has no inspectable name or description", object.debug_name),
            ));
        };
        if matches!(object.kind, UnlockableKind::Other) {
            return Err(CoreError::new(
                CoreErrorCode::NotExtractable,
                format!("{} is neither an ability nor a phrase", object.debug_name),
            ));
        }

        let mut record = AbilityRecord {
            guid: object.id,
            internalname: object.debug_name.clone(),
            ..AbilityRecord::default()
        };
        if let Some(icon) = object.icon.as_ref() {
            record.icon = Some(format!("{}{ICON_SUFFIX}", icon.sprite_name));
            record.icon_rect = Some(icon.rect);
        } else {
            debug!(ability = %object.debug_name, "no icon sprite");
        }

        apply_inspectable(&mut record, inspectable);

        let references = find_references(&self.data, object);
        record.ability_origin = references.origin;
        record.game_data_referencing_this_ability = references.debug_names();
        record.related_items = references.related_item_names();

        record.learn_type = self.learn_type(object);
        let level = match &object.kind {
            UnlockableKind::GenericAbility(details) => Some(details.ability_level),
            UnlockableKind::Phrase(phrase) => Some(phrase.level),
            UnlockableKind::Other => None,
        };
        record.ability_level = level;
        if record.learn_type != LearnType::None
            && let Some(level) = level
        {
            let progression = &self.data.character_progression;
            record.learn_level = progression.power_level_reached_at(level, false);
            record.learn_level_mc = progression.power_level_reached_at(level, true);
        }

        self.apply_keywords(&mut record, object);

        let mut ambiguities = Vec::new();
        match &object.kind {
            UnlockableKind::GenericAbility(details) => {
                self.apply_ability_details(&mut record, details);

                let chain = resolve_upgrades(&self.data, object, record.ability_origin);
                record.upgrades_from = chain.upgrades_from;
                record.upgrades_to = chain.upgrades_to;
                ambiguities = chain.ambiguities;
            }
            UnlockableKind::Phrase(_) => {
                record.ability_type = Some(PHRASE_ABILITY_TYPE.to_string());
                record.ability_class = Some(PHRASE_CLASS.to_string());
                record.activation = ActivationType::Passive;
            }
            UnlockableKind::Other => {}
        }

        info!(
            ability = %record.internalname,
            origin = ?record.ability_origin,
            learn_type = ?record.learn_type,
            "extracted ability"
        );

        Ok(Extraction {
            record,
            ambiguities,
        })
    }

    /// Extracts every id in order. Failures are logged and collected; they
    /// never stop the batch.
    pub fn extract_batch<I>(&self, ids: I) -> BatchExtraction
    where
        I: IntoIterator<Item = Uuid>,
    {
        let mut batch = BatchExtraction::default();
        for id in ids {
            match self.extract(id) {
                Ok(extraction) => batch.extractions.push(extraction),
                Err(error) => {
                    warn!(%id, %error, "skipping ability");
                    batch.failures.push(ExtractionFailure { id, error });
                }
            }
        }
        info!(
            extracted = batch.extractions.len(),
            failed = batch.failures.len(),
            "batch extraction finished"
        );
        batch
    }

    /// How the ability is learned, from the unlock entries that add it.
    ///
    /// Class tables always count. Character tables count only for generic
    /// abilities that belong to no class.
    pub fn learn_type(&self, object: &GameDataObject) -> LearnType {
        let include_character_tables = object
            .ability_details()
            .is_some_and(|details| self.config.is_classless(details.ability_class_id));

        let mut styles: Vec<UnlockStyle> =
            tables_containing(&self.data, object.id, ProgressionTableKind::Class)
                .into_iter()
                .filter_map(|table| table.find_ability(object.id))
                .map(|unlock| unlock.unlock_style)
                .collect();
        if include_character_tables {
            styles.extend(
                tables_containing(&self.data, object.id, ProgressionTableKind::Character)
                    .into_iter()
                    .filter_map(|table| table.find_ability(object.id))
                    .map(|unlock| unlock.unlock_style),
            );
        }

        learn_type_from_styles(&styles)
    }

    fn unlockable(&self, id: Uuid) -> Result<&GameDataObject, CoreError> {
        self.data.unlockable(id).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::UnknownAbility,
                format!("no unlockable with id {id}"),
            )
        })
    }

    fn apply_keywords(&self, record: &mut AbilityRecord, object: &GameDataObject) {
        let keyword_ids: &[Uuid] = match &object.kind {
            UnlockableKind::GenericAbility(details) => &details.keyword_ids,
            UnlockableKind::Phrase(phrase) => &phrase.status_effect_keyword_ids,
            UnlockableKind::Other => &[],
        };
        let keywords: Vec<&Keyword> = keyword_ids
            .iter()
            .filter_map(|id| self.data.keyword(*id))
            .collect();

        let mut counter_ids: Vec<Uuid> = Vec::new();
        for id in keywords
            .iter()
            .copied()
            .flat_map(|keyword| keyword.opposing_keyword_ids.iter())
        {
            if !counter_ids.contains(id) {
                counter_ids.push(*id);
            }
        }
        let counters: Vec<&Keyword> = counter_ids
            .iter()
            .filter_map(|id| self.data.keyword(*id))
            .collect();

        record.keywords = adjectives(&keywords);
        record.keyword_ids = keywords.iter().map(|k| k.debug_name.clone()).collect();
        record.counters = adjectives(&counters);
        record.counter_ids = counters.iter().map(|k| k.debug_name.clone()).collect();
    }

    fn apply_ability_details(&self, record: &mut AbilityRecord, details: &AbilityDetails) {
        record.turn_based_description = details
            .tactical_description
            .clone()
            .filter(|text| !text.is_empty());

        let class_id = details
            .ability_class_id
            .filter(|id| !self.config.is_classless(Some(*id)));
        let class = class_id.and_then(|id| self.data.class(id));
        if let Some(class) = class {
            record.ability_class = Some(
                class
                    .display_name
                    .clone()
                    .unwrap_or_else(|| class.debug_name.clone()),
            );
        }

        record.activation = if details.is_passive {
            ActivationType::Passive
        } else if details.is_modal {
            if record.recovery_time.is_none() {
                record.recovery_time = Some(self.config.modal_recovery_time);
            }
            ActivationType::Modal
        } else {
            ActivationType::Active
        };
        record.combat_only = Some(details.is_combat_only);

        let class_name = class
            .map(|class| class.debug_name.as_str())
            .or_else(|| class_id.and_then(|id| self.config.class_name(id)));
        record.ability_type = class_name
            .and_then(|name| self.config.ability_type_for_class(name))
            .map(str::to_string)
            .or_else(|| self.fallback_ability_type(record.guid, details));

        record.modal_group = details
            .modal_group_id
            .and_then(|id| self.data.modal_group(id))
            .map(|group| group.display_name.clone());

        match details.usage_type {
            CooldownType::ClassAccruedResource => {
                record.source = class.and_then(|class| class.accrued_resource_name.clone());
                record.source_cost = Some(details.usage_value);
            }
            CooldownType::ClassPowerPool => {
                record.source = class.and_then(|class| class.power_pool_name.clone());
                record.source_cost = Some(details.usage_value);
            }
            usage_type => {
                record.uses = Some(details.usage_value);
                record.restoration = match usage_type {
                    CooldownType::PerEncounter => RestorationType::Encounter,
                    CooldownType::PerRest => RestorationType::Rest,
                    _ => RestorationType::None,
                };
            }
        }
    }

    fn fallback_ability_type(&self, id: Uuid, details: &AbilityDetails) -> Option<String> {
        if details
            .keyword_ids
            .contains(&self.config.weapon_proficiency_keyword)
        {
            return Some(PROFICIENCY_ABILITY_TYPE.to_string());
        }

        let is_talent = self
            .data
            .progression_table(self.config.talent_table)
            .is_some_and(|table| table.has_ability(id));
        is_talent.then(|| TALENT_ABILITY_TYPE.to_string())
    }
}

/// Collapses unlock styles into a learn type: one shared style maps
/// directly, differing styles are `Mixed`, no entries is `None`.
pub fn learn_type_from_styles(styles: &[UnlockStyle]) -> LearnType {
    let Some((first, rest)) = styles.split_first() else {
        return LearnType::None;
    };
    if rest.iter().any(|style| style != first) {
        return LearnType::Mixed;
    }
    match first {
        UnlockStyle::AutoGrant => LearnType::Automatic,
        UnlockStyle::Unlock => LearnType::Optional,
        UnlockStyle::Other => LearnType::None,
    }
}

fn apply_inspectable(record: &mut AbilityRecord, inspectable: &Inspectable) {
    record.name = inspectable.name.clone();
    record.description = strip_html(&inspectable.flavor_text).trim().to_string();

    let raw = strip_html(&inspectable.stat_block);

    record.cast_time = lookup_value(&raw, "Cast Time").and_then(|v| parse_seconds(&v));
    record.recovery_time = lookup_value(&raw, "Recovery Time").and_then(|v| parse_seconds(&v));
    record.range = lookup_value(&raw, "Range");
    record.area_of_effect = lookup_value(&raw, "Area of Effect");
    record.duration = lookup_value(&raw, "Duration")
        .or_else(|| lookup_value(&raw, "AoE Duration"))
        .and_then(|v| parse_seconds(&v));
    record.linger = lookup_value(&raw, "Linger").and_then(|v| parse_seconds(&v));
    if let Some(noise) = lookup_value(&raw, "Noise") {
        let (noise_use, noise_impact) = split_noise(&noise);
        record.noise_use = Some(noise_use);
        record.noise_impact = Some(noise_impact);
    }

    record.stat_block_pairs_all = parse_pairs(&raw);
    record.stat_block_pairs_unused = unused_pairs(&record.stat_block_pairs_all);
    record.stat_block_raw = Some(raw).filter(|raw| !raw.is_empty());

    record.effect_blocks = inspectable
        .effects
        .iter()
        .map(|entry| EffectBlock {
            target: entry.target.clone(),
            effects: format_effects(&entry.effects),
            effects_unformatted: entry.effects.clone(),
        })
        .collect();
}

fn adjectives(keywords: &[&Keyword]) -> Vec<String> {
    keywords
        .iter()
        .filter_map(|keyword| keyword.adjective.clone())
        .filter(|adjective| !adjective.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::learn_type_from_styles;
    use crate::core_api::LearnType;
    use crate::game_data::UnlockStyle;

    #[test]
    fn learn_type_follows_unlock_styles() {
        assert_eq!(
            learn_type_from_styles(&[UnlockStyle::AutoGrant, UnlockStyle::AutoGrant]),
            LearnType::Automatic
        );
        assert_eq!(
            learn_type_from_styles(&[UnlockStyle::Unlock]),
            LearnType::Optional
        );
        assert_eq!(
            learn_type_from_styles(&[UnlockStyle::Unlock, UnlockStyle::AutoGrant]),
            LearnType::Mixed
        );
        assert_eq!(learn_type_from_styles(&[]), LearnType::None);
    }
}
