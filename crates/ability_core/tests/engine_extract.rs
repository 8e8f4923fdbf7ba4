use std::fs;
use std::path::PathBuf;

use ability_core::core_api::{
    AbilityOrigin, ActivationType, CoreErrorCode, Engine, ExtractorConfig, LearnType,
    RelationKind, RestorationType,
};
use ability_core::game_data::GameData;
use uuid::Uuid;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn load_engine() -> Engine {
    let path = workspace_root().join("tests/fixtures/game_data.json");
    let json = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {:?}: {}", path, e));
    let data: GameData =
        serde_json::from_str(&json).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", path, e));
    Engine::with_default_config(data)
}

fn ability_id(n: u128) -> Uuid {
    Uuid::from_u128(0x20000000_0000_0000_0000_000000000000 | n)
}

#[test]
fn extracts_spell_with_stat_block_fields() {
    let engine = load_engine();

    let extraction = engine.extract(ability_id(1)).expect("fireball should extract");
    let record = &extraction.record;

    assert_eq!(record.guid, ability_id(1));
    assert_eq!(record.internalname, "Fireball");
    assert_eq!(record.name, "Fireball");
    assert_eq!(record.description, "A roaring ball of fire.");
    assert_eq!(record.icon.as_deref(), Some("fireball_icon.png"));
    assert_eq!(record.icon_rect.map(|rect| rect.width), Some(52.0));

    assert_eq!(record.cast_time, Some(1.5));
    assert_eq!(record.recovery_time, Some(3.0));
    assert_eq!(record.range.as_deref(), Some("10m"));
    assert_eq!(record.area_of_effect.as_deref(), Some("2.5m"));
    assert_eq!(record.duration, Some(10.0));
    assert_eq!(record.linger, None);
    assert_eq!(record.noise_use.as_deref(), Some("Quiet"));
    assert_eq!(record.noise_impact.as_deref(), Some("Loud"));

    assert_eq!(record.stat_block_pairs_all.len(), 8);
    let unused: Vec<(&str, &str)> = record
        .stat_block_pairs_unused
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(unused, vec![("Interrupt", "0.5 sec")]);
}

#[test]
fn extracts_class_learning_and_usage() {
    let engine = load_engine();

    let record = engine.extract(ability_id(1)).expect("fireball").record;

    assert_eq!(record.ability_class.as_deref(), Some("Wizard"));
    assert_eq!(record.ability_type.as_deref(), Some("Spell"));
    assert_eq!(record.ability_level, Some(2));
    assert_eq!(record.ability_origin, AbilityOrigin::Class);
    assert_eq!(record.learn_type, LearnType::Optional);
    assert_eq!(record.learn_level, Some(3));
    assert_eq!(record.learn_level_mc, Some(4));
    assert_eq!(record.activation, ActivationType::Active);
    assert_eq!(record.combat_only, Some(false));
    assert_eq!(record.uses, Some(1));
    assert_eq!(record.restoration, RestorationType::Rest);
    assert_eq!(record.source, None);
    assert_eq!(
        record.turn_based_description.as_deref(),
        Some("Explodes at the start of the next round.")
    );

    assert_eq!(record.keywords, vec!["Fire"]);
    assert_eq!(record.keyword_ids, vec!["Fire"]);
    assert_eq!(record.counters, vec!["Freeze"]);
    assert_eq!(record.counter_ids, vec!["Freeze"]);

    assert_eq!(record.upgrades_from.as_deref(), Some("Spark"));
    assert_eq!(record.upgrades_to, vec!["Inferno", "Greater Fireball"]);
    assert_eq!(record.game_data_referencing_this_ability, vec!["PT_Wizard"]);
}

#[test]
fn effect_blocks_keep_raw_and_formatted_text() {
    let engine = load_engine();

    let record = engine.extract(ability_id(1)).expect("fireball").record;

    assert_eq!(record.effect_blocks.len(), 1);
    let block = &record.effect_blocks[0];
    assert_eq!(block.target, "Foes, AoE");
    assert_eq!(block.effects, "20-25 {{burn}} Damage {{!}} Dazed");
    assert!(block.effects_unformatted.contains("neutralvalue://Burn"));
}

#[test]
fn modal_ability_gets_default_recovery() {
    let engine = load_engine();

    let record = engine.extract(ability_id(5)).expect("stance").record;

    assert_eq!(record.activation, ActivationType::Modal);
    assert_eq!(record.cast_time, Some(0.0));
    assert_eq!(record.recovery_time, Some(3.0));
    assert_eq!(record.modal_group.as_deref(), Some("Stances"));
    assert_eq!(record.combat_only, Some(true));
    assert_eq!(record.ability_class, None);
    assert_eq!(record.ability_type, None);
    assert_eq!(record.ability_origin, AbilityOrigin::Character);
    assert_eq!(record.learn_type, LearnType::Automatic);
    assert_eq!(record.learn_level, Some(1));
    assert_eq!(record.effect_blocks.len(), 2);
    assert_eq!(
        record.stat_block_pairs_unused.get("Special").map(String::as_str),
        Some("+10 Deflection\r\nwhile active")
    );
}

#[test]
fn modal_recovery_comes_from_config() {
    let engine = load_engine();
    let config = ExtractorConfig {
        modal_recovery_time: 6.0,
        ..ExtractorConfig::default()
    };
    let engine = Engine::new(engine.data().clone(), config);

    let record = engine.extract(ability_id(5)).expect("stance").record;

    assert_eq!(record.recovery_time, Some(6.0));
}

#[test]
fn classless_abilities_fall_back_to_keyword_and_talent_types() {
    let engine = load_engine();

    let proficiency = engine.extract(ability_id(6)).expect("proficiency").record;
    assert_eq!(proficiency.ability_type.as_deref(), Some("Proficiency"));
    assert_eq!(proficiency.activation, ActivationType::Passive);
    assert_eq!(proficiency.learn_type, LearnType::Mixed);
    assert_eq!(proficiency.ability_origin, AbilityOrigin::Character);

    let talent = engine.extract(ability_id(7)).expect("talent").record;
    assert_eq!(talent.ability_type.as_deref(), Some("Talent"));
    assert_eq!(talent.ability_origin, AbilityOrigin::Class);
    assert_eq!(talent.learn_type, LearnType::Optional);
}

#[test]
fn class_resource_abilities_report_source_and_cost() {
    let engine = load_engine();

    let record = engine.extract(ability_id(15)).expect("mind blades").record;

    assert_eq!(record.source.as_deref(), Some("Focus"));
    assert_eq!(record.source_cost, Some(2));
    assert_eq!(record.uses, None);
    assert_eq!(record.restoration, RestorationType::None);
    assert_eq!(record.ability_type.as_deref(), Some("Spell"));
    assert_eq!(record.learn_type, LearnType::Automatic);
    assert_eq!(record.learn_level, Some(5));
    assert_eq!(record.learn_level_mc, Some(7));
}

#[test]
fn phrases_are_passive_chanter_abilities() {
    let engine = load_engine();

    let record = engine.extract(ability_id(12)).expect("phrase").record;

    assert_eq!(record.ability_type.as_deref(), Some("Phrase"));
    assert_eq!(record.ability_class.as_deref(), Some("Chanter"));
    assert_eq!(record.activation, ActivationType::Passive);
    assert_eq!(record.ability_level, Some(2));
    assert_eq!(record.linger, Some(3.0));
    assert_eq!(record.keywords, vec!["Fire"]);
    assert_eq!(record.counters, vec!["Freeze"]);
    assert_eq!(record.combat_only, None);
    assert_eq!(record.learn_type, LearnType::Optional);
}

#[test]
fn equipment_ability_lists_items_and_enchantment_upgrade() {
    let engine = load_engine();

    let record = engine.extract(ability_id(8)).expect("flame strike").record;

    assert_eq!(record.ability_origin, AbilityOrigin::Equipment);
    assert_eq!(record.related_items, vec!["Sword of Flame", "Blank Sword"]);
    assert_eq!(record.upgrades_to, vec!["Greater Flame Strike"]);
    assert_eq!(record.learn_type, LearnType::None);
    assert_eq!(record.learn_level, None);
    assert_eq!(record.restoration, RestorationType::Encounter);
}

#[test]
fn ambiguous_upgrade_source_is_reported_with_the_extraction() {
    let engine = load_engine();

    let extraction = engine.extract(ability_id(4)).expect("inferno");

    assert_eq!(extraction.record.upgrades_from, None);
    assert_eq!(extraction.ambiguities.len(), 1);
    assert_eq!(extraction.ambiguities[0].relation, RelationKind::UpgradesFrom);
}

#[test]
fn missing_capabilities_are_not_extractable() {
    let engine = load_engine();

    let no_inspectable = engine
        .extract(ability_id(13))
        .expect_err("hidden trigger has no inspectable");
    assert_eq!(no_inspectable.code, CoreErrorCode::NotExtractable);

    let not_an_ability = engine
        .extract(ability_id(14))
        .expect_err("other unlockables are not abilities");
    assert_eq!(not_an_ability.code, CoreErrorCode::NotExtractable);

    let unknown = engine
        .extract(ability_id(0x99))
        .expect_err("unknown ids fail");
    assert_eq!(unknown.code, CoreErrorCode::UnknownAbility);
}

#[test]
fn batch_extraction_skips_failures_and_keeps_order() {
    let engine = load_engine();
    let ids = [
        ability_id(1),
        ability_id(13),
        ability_id(0x99),
        ability_id(12),
        ability_id(14),
        ability_id(11),
    ];

    let batch = engine.extract_batch(ids);

    let names: Vec<&str> = batch.records().map(|r| r.internalname.as_str()).collect();
    assert_eq!(names, vec!["Fireball", "Dragon_Thrashed", "Wolf_Bite"]);

    let failed: Vec<Uuid> = batch.failures.iter().map(|f| f.id).collect();
    assert_eq!(failed, vec![ability_id(13), ability_id(0x99), ability_id(14)]);

    let collection = batch.into_collection();
    assert_eq!(collection.data.len(), 3);
    assert_eq!(collection.data[2].ability_origin, AbilityOrigin::Creature);
}

#[test]
fn records_serialize_with_camel_case_keys_and_omit_absent_fields() {
    let engine = load_engine();
    let record = engine.extract(ability_id(11)).expect("bite").record;

    let value = serde_json::to_value(&record).expect("record should serialize");
    let object = value.as_object().expect("record is an object");

    assert_eq!(object["guid"], "20000000-0000-0000-0000-00000000000b");
    assert_eq!(object["internalname"], "Wolf_Bite");
    assert_eq!(object["abilityOrigin"], "Creature");
    assert_eq!(object["learnType"], "None");
    assert!(object.contains_key("statBlockPairsAll"));
    assert!(object.contains_key("gameDataReferencingThisAbility"));
    assert!(!object.contains_key("castTime"));
    assert!(!object.contains_key("upgradesFrom"));
    assert!(!object.contains_key("learnLevel"));
}

#[test]
fn stat_block_pair_order_survives_a_json_round_trip() {
    let engine = load_engine();
    let record = engine.extract(ability_id(1)).expect("fireball").record;

    let json = serde_json::to_string(&record).expect("serialize");
    let back: ability_core::core_api::AbilityRecord =
        serde_json::from_str(&json).expect("deserialize");

    let keys: Vec<&String> = back.stat_block_pairs_all.keys().collect();
    let original: Vec<&String> = record.stat_block_pairs_all.keys().collect();
    assert_eq!(keys, original);
    assert_eq!(back, record);
}

#[test]
fn ambiguous_enchantment_chain_leaves_upgrade_source_unset() {
    let engine = load_engine();

    let extraction = engine.extract(ability_id(18)).expect("tempest strike");

    assert_eq!(extraction.record.ability_origin, AbilityOrigin::Equipment);
    assert_eq!(extraction.record.related_items, vec!["Tempest Blade"]);
    assert_eq!(extraction.record.upgrades_from, None);
    let relations: Vec<RelationKind> = extraction.ambiguities.iter().map(|a| a.relation).collect();
    assert!(relations.contains(&RelationKind::GrantingItemMod));
    assert!(relations.contains(&RelationKind::EquipmentUpgradesFrom));
}
