use ability_core::core_api::{
    AbilityOrigin, AbilityRecord, AbilityRecordCollection, ActivationType, LearnType,
    RestorationType,
};
use ability_core::link_text::{EFFECT_VOCABULARY, annotate_all};
use regex::Regex;
use tracing::debug;

const FIELD_WIDTH: usize = 15;
const LINE_BREAK: &str = "\r\n";
const INFOBOX_OPEN: &str = "{{Infobox ability poe2";
const INFOBOX_CLOSE: &str = "}}";
const MULTI_VALUE_ANCHOR: &str = "rel_quests";
const LIST_SEPARATOR: &str = ";";
const KEYWORD_SEPARATOR: &str = ", ";
const TURN_BASED_HEADING: &str = "'''Turn-based mode description:'''\n";

const PAGE_INTRO: &str = concat!(
    "\r\n",
    "'''{{Pagename nd}}''' is an [[Pillars of Eternity II: Deadfire abilities|ability]] in {{poe2}}.\r\n",
    "\r\n",
    "==Description==\r\n",
    "{{Description|{{#var:description}}}}\r\n",
);
const PAGE_EFFECTS: &str = concat!("\r\n", "==Effects==\r\n", "{{#var:effects_formatted}}");

/// Infobox fields in template order.
#[rustfmt::skip]
pub const INFOBOX_FIELDS: &[&str] = &[
    "name", "icon", "description", "added_in",
    "class", "subclass", "race", "subrace",
    "activation", "activation_req", "combat_only",
    "ability_type", "ability_level", "ability_origin", "modal_group",
    "learn_type", "learn_level", "learn_level_mc",
    "upgrades_from", "upgrades_to",
    "keywords", "counters",
    "source", "source_cost", "uses", "restoration",
    "cast_time", "recovery_time", "range", "area_of_effect",
    "duration", "linger", "noise_use", "noise_impact",
    "target", "effects",
    "rel_quests", "rel_abilities", "rel_items", "rel_characters",
    "internalname", "guid",
];

#[rustfmt::skip]
const DLC_PREFIXES: &[(&str, &str)] = &[
    ("LAX01", "lax1"),
    ("LAX02", "lax2"),
    ("LAX03", "lax3"),
];
const BASE_GAME: &str = "poe2";

fn field_line(field: &str, value: &str) -> String {
    format!("| {field:<FIELD_WIDTH$}= {value}{LINE_BREAK}")
}

/// The empty infobox: one `| field = ` line per entry of [`INFOBOX_FIELDS`].
pub fn infobox_template() -> String {
    let mut template = String::from(INFOBOX_OPEN);
    template.push_str(LINE_BREAK);
    for field in INFOBOX_FIELDS {
        template.push_str(&field_line(field, ""));
    }
    template.push_str(INFOBOX_CLOSE);
    template
}

/// Writes `value` into the existing `field` line. Blank values and unknown
/// fields leave the infobox untouched.
pub fn append_infobox_field(infobox: &str, field: &str, value: &str) -> String {
    if value.trim().is_empty() {
        return infobox.to_string();
    }

    let pattern = format!(r"(?i)(\|\s{}\s*=\s*)\r\n", regex::escape(field));
    let Ok(re) = Regex::new(&pattern) else {
        return infobox.to_string();
    };
    let Some(slot) = re.captures(infobox).and_then(|caps| caps.get(1)) else {
        debug!(field, "infobox has no such field");
        return infobox.to_string();
    };

    let mut filled = String::with_capacity(infobox.len() + value.len());
    filled.push_str(&infobox[..slot.end()]);
    filled.push_str(value);
    filled.push_str(&infobox[slot.end()..]);
    filled
}

/// Inserts a new `field` line next to the `anchor` line, above it when
/// `above` is set. Without an anchor, or when it is missing, the line goes
/// right before the closing braces.
pub fn add_new_infobox_field(
    infobox: &str,
    field: &str,
    value: &str,
    anchor: Option<&str>,
    above: bool,
) -> String {
    let mut index = infobox.len().saturating_sub(INFOBOX_CLOSE.len());

    if let Some(anchor) = anchor {
        let pattern = format!(r"(?i)(\|\s{}\s*=.*)\n", regex::escape(anchor));
        match Regex::new(&pattern).ok().and_then(|re| re.find(infobox)) {
            Some(line) => index = if above { line.start() } else { line.end() },
            None => debug!(anchor, "anchor field missing, appending at the end"),
        }
    }

    let mut extended = infobox.to_string();
    extended.insert_str(index, &field_line(field, value));
    extended
}

/// DLC template name from the internal-name prefix.
pub fn determine_dlc(internal_name: &str) -> &'static str {
    let Some((prefix, _)) = internal_name.split_once('_') else {
        return BASE_GAME;
    };
    DLC_PREFIXES
        .iter()
        .find(|(known, _)| *known == prefix)
        .map_or(BASE_GAME, |(_, dlc)| *dlc)
}

pub fn add_links_to_effects(effects: &str) -> String {
    annotate_all(effects, EFFECT_VOCABULARY)
}

fn format_seconds(value: Option<f32>) -> String {
    value.map(|seconds| format!("{seconds:.1}")).unwrap_or_default()
}

// "2.5m" -> "2.5"; non-numeric values keep their unit.
fn trim_meters(area: &str) -> &str {
    let trimmed = area.trim_end_matches('m');
    if trimmed.trim().parse::<f32>().is_ok() {
        trimmed
    } else {
        area
    }
}

/// Fills the infobox template from `record`.
pub fn render_infobox(record: &AbilityRecord) -> String {
    let mut infobox = infobox_template();
    let mut set = |field: &str, value: &str| {
        infobox = append_infobox_field(&infobox, field, value);
    };

    set("name", &record.name);
    set("icon", record.icon.as_deref().unwrap_or_default());
    set("description", &record.description);
    if !record.internalname.is_empty() {
        set("added_in", determine_dlc(&record.internalname));
    }
    set("class", record.ability_class.as_deref().unwrap_or_default());
    if record.activation != ActivationType::None {
        set("activation", record.activation.label());
    }
    if let Some(combat_only) = record.combat_only {
        set("combat_only", if combat_only { "yes" } else { "no" });
    }
    set("ability_type", record.ability_type.as_deref().unwrap_or_default());
    set("ability_level", &optional_number(record.ability_level));
    if record.ability_origin != AbilityOrigin::None {
        set("ability_origin", record.ability_origin.label());
    }
    set("modal_group", record.modal_group.as_deref().unwrap_or_default());
    if record.learn_type != LearnType::None {
        set("learn_type", record.learn_type.label());
    }
    set("learn_level", &optional_number(record.learn_level));
    set("learn_level_mc", &optional_number(record.learn_level_mc));
    set("upgrades_from", record.upgrades_from.as_deref().unwrap_or_default());
    set("upgrades_to", &record.upgrades_to.join(LIST_SEPARATOR));
    set("keywords", &record.keywords.join(KEYWORD_SEPARATOR));
    set("counters", &record.counters.join(KEYWORD_SEPARATOR));
    set("source", record.source.as_deref().unwrap_or_default());
    set("source_cost", &optional_number(record.source_cost));
    if let Some(uses) = record.uses.filter(|uses| *uses > 0) {
        set("uses", &uses.to_string());
    }
    if record.restoration != RestorationType::None {
        set("restoration", record.restoration.label());
    }
    set("cast_time", &format_seconds(record.cast_time));
    set("recovery_time", &format_seconds(record.recovery_time));
    set("range", record.range.as_deref().unwrap_or_default());
    set(
        "area_of_effect",
        record.area_of_effect.as_deref().map(trim_meters).unwrap_or_default(),
    );
    set("duration", &format_seconds(record.duration));
    set("linger", &format_seconds(record.linger));
    set("noise_use", record.noise_use.as_deref().unwrap_or_default());
    set("noise_impact", record.noise_impact.as_deref().unwrap_or_default());

    if let [block] = record.effect_blocks.as_slice() {
        set("target", &block.target);
        set("effects", &add_links_to_effects(&block.effects));
    }

    set("rel_items", &record.related_items.join(LIST_SEPARATOR));
    set("internalname", &record.internalname);
    if !record.guid.is_nil() {
        set("guid", &record.guid.to_string());
    }

    if record.effect_blocks.len() > 1 {
        for (index, block) in record.effect_blocks.iter().enumerate() {
            let slot = index + 1;
            infobox = add_above_anchor(&infobox, &format!("target_{slot}"), &block.target);
            infobox = add_above_anchor(
                &infobox,
                &format!("effects_{slot}"),
                &add_links_to_effects(&block.effects),
            );
        }
    }

    for (index, (label, value)) in record.stat_block_pairs_unused.iter().enumerate() {
        let slot = index + 1;
        infobox = add_above_anchor(&infobox, &format!("label_{slot}"), label);
        infobox = add_above_anchor(&infobox, &format!("data_{slot}"), value);
    }

    infobox
}

fn add_above_anchor(infobox: &str, field: &str, value: &str) -> String {
    add_new_infobox_field(infobox, field, value, Some(MULTI_VALUE_ANCHOR), true)
}

fn optional_number(value: Option<i32>) -> String {
    value.map(|number| number.to_string()).unwrap_or_default()
}

/// Full wiki page: infobox, intro, description, optional turn-based text and
/// the effects section.
pub fn render_page(record: &AbilityRecord) -> String {
    let turn_based = record
        .turn_based_description
        .as_deref()
        .filter(|text| !text.is_empty())
        .map(|text| format!("{TURN_BASED_HEADING}{text}"))
        .unwrap_or_default();

    let mut page = render_infobox(record);
    page.push_str(PAGE_INTRO);
    page.push_str(&turn_based);
    page.push_str(PAGE_EFFECTS);
    page
}

pub fn render_record_json(record: &AbilityRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

pub fn render_collection_json(collection: &AbilityRecordCollection) -> serde_json::Result<String> {
    serde_json::to_string_pretty(collection)
}
