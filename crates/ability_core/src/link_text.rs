//! Whole-word wiki link annotation.
//!
//! Terms are linked one at a time in caller order. There is no conflict
//! resolution between terms: when one term contains another ("Critical Hit"
//! and "Hit"), the longer one has to come first or it never matches.

const LINK_OPEN: &str = "[[";
const LINK_CLOSE: &str = "]]";
const STATUS_EFFECTS_PAGE: &str = "Status effects (Deadfire)#";

/// One vocabulary entry for [`annotate_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTerm {
    pub term: &'static str,
    pub case_variations: bool,
    pub page_override: Option<&'static str>,
}

impl LinkTerm {
    const fn plain(term: &'static str) -> Self {
        Self { term, case_variations: false, page_override: None }
    }

    const fn cased(term: &'static str) -> Self {
        Self { term, case_variations: true, page_override: None }
    }

    const fn status(term: &'static str) -> Self {
        Self { term, case_variations: false, page_override: Some(STATUS_EFFECTS_PAGE) }
    }
}

// Ordered most-specific first.
#[rustfmt::skip]
pub const EFFECT_VOCABULARY: &[LinkTerm] = &[
    // Afflictions and inspirations
    LinkTerm::cased("Body Affliction"),        LinkTerm::cased("Body Afflictions"),
    LinkTerm::cased("Body Inspiration"),       LinkTerm::cased("Body Inspirations"),
    LinkTerm::cased("Mind Affliction"),        LinkTerm::cased("Mind Afflictions"),
    LinkTerm::cased("Mind Inspiration"),       LinkTerm::cased("Mind Inspirations"),
    LinkTerm::cased("Constitution Affliction"), LinkTerm::cased("Constitution Afflictions"),
    LinkTerm::cased("Constitution Inspiration"), LinkTerm::cased("Constitution Inspirations"),
    LinkTerm::cased("Dexterity Affliction"),   LinkTerm::cased("Dexterity Afflictions"),
    LinkTerm::cased("Dexterity Inspiration"),  LinkTerm::cased("Dexterity Inspirations"),
    LinkTerm::cased("Might Affliction"),       LinkTerm::cased("Might Afflictions"),
    LinkTerm::cased("Might Inspiration"),      LinkTerm::cased("Might Inspirations"),
    LinkTerm::cased("Intellect Affliction"),   LinkTerm::cased("Intellect Afflictions"),
    LinkTerm::cased("Intellect Inspiration"),  LinkTerm::cased("Intellect Inspirations"),
    LinkTerm::cased("Perception Affliction"),  LinkTerm::cased("Perception Afflictions"),
    LinkTerm::cased("Perception Inspiration"), LinkTerm::cased("Perception Inspirations"),
    LinkTerm::cased("Resolve Affliction"),     LinkTerm::cased("Resolve Afflictions"),
    LinkTerm::cased("Resolve Inspiration"),    LinkTerm::cased("Resolve Inspirations"),

    // Damage types
    LinkTerm::plain("Slash Damage"),   LinkTerm::plain("Slash"),
    LinkTerm::plain("Pierce Damage"),  LinkTerm::plain("Pierce"),
    LinkTerm::plain("Crush Damage"),   LinkTerm::plain("Crush"),
    LinkTerm::plain("Shock Damage"),   LinkTerm::plain("Shock"),
    LinkTerm::plain("Burn Damage"),    LinkTerm::plain("Burn"),
    LinkTerm::plain("Freeze Damage"),  LinkTerm::plain("Freeze"),
    LinkTerm::plain("Corrode Damage"), LinkTerm::plain("Corrode"),
    LinkTerm::plain("Raw Damage"),     LinkTerm::plain("Raw"),

    // Combat terms
    LinkTerm::plain("Recovery Time"),
    LinkTerm::plain("Armor Rating"),
    LinkTerm::plain("Critical Hits"),
    LinkTerm::plain("Critical Hit"),
    LinkTerm::plain("Accuracy"),
    LinkTerm::plain("Health"),
    LinkTerm::plain("Resistance"),
    LinkTerm::plain("Weakness"),
    LinkTerm::plain("Concentration"),
    LinkTerm::plain("Interrupt"),
    LinkTerm::plain("Recovery"),
    LinkTerm::plain("Penetration"),
    LinkTerm::plain("Stride"),
    LinkTerm::plain("Poison"),
    LinkTerm::plain("Focus"),
    LinkTerm::plain("Guile"),
    LinkTerm::plain("Flanked"),
    LinkTerm::plain("Engaged"),

    // Status effects
    LinkTerm::status("Sickened"),   LinkTerm::status("Weakened"),   LinkTerm::status("Enfeebled"),
    LinkTerm::status("Hobbled"),    LinkTerm::status("Immobilized"), LinkTerm::status("Paralyzed"),
    LinkTerm::status("Petrified"),  LinkTerm::status("Staggered"),  LinkTerm::status("Dazed"),
    LinkTerm::status("Stunned"),    LinkTerm::status("Confused"),   LinkTerm::status("Charmed"),
    LinkTerm::status("Dominated"),  LinkTerm::status("Distracted"), LinkTerm::status("Disoriented"),
    LinkTerm::status("Blinded"),    LinkTerm::status("Shaken"),     LinkTerm::status("Frightened"),
    LinkTerm::status("Terrified"),  LinkTerm::status("Fit"),        LinkTerm::status("Hardy"),
    LinkTerm::status("Robust"),     LinkTerm::status("Quick"),      LinkTerm::status("Nimble"),
    LinkTerm::status("Swift"),      LinkTerm::status("Strong"),     LinkTerm::status("Tenacious"),
    LinkTerm::status("Energized"),  LinkTerm::status("Smart"),      LinkTerm::status("Acute"),
    LinkTerm::status("Brilliant"),  LinkTerm::status("Insightful"), LinkTerm::status("Aware"),
    LinkTerm::status("Intuitive"),  LinkTerm::status("Steadfast"),  LinkTerm::status("Resolute"),
    LinkTerm::status("Courageous"),

    // Defenses
    LinkTerm::plain("Defenses"),
    LinkTerm::plain("Deflection"),
    LinkTerm::plain("Fortitude"),
    LinkTerm::plain("Reflex"),
    LinkTerm::plain("Will"),

    // Attributes
    LinkTerm::plain("Might"),
    LinkTerm::plain("Constitution"),
    LinkTerm::plain("Dexterity"),
    LinkTerm::plain("Perception"),
    LinkTerm::plain("Intellect"),
    LinkTerm::plain("Resolve"),

    // Skills
    LinkTerm::plain("Alchemy"),    LinkTerm::plain("Arcana"),     LinkTerm::plain("Athletics"),
    LinkTerm::plain("Explosives"), LinkTerm::plain("Mechanics"),  LinkTerm::plain("Sleight of Hand"),
    LinkTerm::plain("Stealth"),    LinkTerm::plain("Bluff"),      LinkTerm::plain("Diplomacy"),
    LinkTerm::plain("History"),    LinkTerm::plain("Insight"),    LinkTerm::plain("Intimidate"),
    LinkTerm::plain("Metaphysics"), LinkTerm::plain("Religion"),  LinkTerm::plain("Streetwise"),
    LinkTerm::plain("Survival"),

    // Attack results
    LinkTerm::plain("Misses"),
    LinkTerm::plain("Miss"),
    LinkTerm::plain("Grazes"),
    LinkTerm::plain("Graze"),
    LinkTerm::plain("Hits"),
    LinkTerm::plain("Hit"),
    LinkTerm::plain("Crits"),
    LinkTerm::plain("Crit"),
];

/// Wraps every whole-word occurrence of `term` in `[[...]]` link markup.
///
/// With `case_variations` the all-lowercase form and the capitalized form
/// (first letter kept, rest lowercased) are linked in separate passes before
/// the term itself. With a `page_override` the link target becomes
/// `<page_override><term>` and the term is kept as the label; the override
/// applies to the exact-term pass only, the case variants link plainly.
pub fn annotate(
    text: &str,
    term: &str,
    case_variations: bool,
    page_override: Option<&str>,
) -> String {
    if text.is_empty() || term.is_empty() {
        return text.to_string();
    }

    if !case_variations {
        return link_occurrences(text, term, page_override);
    }

    let lowercase = term.to_lowercase();
    let mut chars = term.chars();
    let capitalized = match chars.next() {
        Some(first) => format!("{first}{}", chars.as_str().to_lowercase()),
        None => String::new(),
    };

    let text = link_occurrences(text, &lowercase, None);
    let text = link_occurrences(&text, &capitalized, None);
    link_occurrences(&text, term, page_override)
}

/// Runs every entry of `vocabulary` over `text` in order.
pub fn annotate_all(text: &str, vocabulary: &[LinkTerm]) -> String {
    vocabulary.iter().fold(text.to_string(), |text, entry| {
        annotate(&text, entry.term, entry.case_variations, entry.page_override)
    })
}

fn link_markup(term: &str, page_override: Option<&str>) -> String {
    match page_override {
        Some(page) => format!("{LINK_OPEN}{page}{term}|{term}{LINK_CLOSE}"),
        None => format!("{LINK_OPEN}{term}{LINK_CLOSE}"),
    }
}

fn link_occurrences(text: &str, term: &str, page_override: Option<&str>) -> String {
    if term.is_empty() {
        return text.to_string();
    }

    let starts: Vec<usize> = text
        .match_indices(term)
        .map(|(start, _)| start)
        .filter(|&start| is_linkable(text, start, start + term.len()))
        .collect();
    if starts.is_empty() {
        return text.to_string();
    }

    let replacement = link_markup(term, page_override);
    let delta = replacement.len() - term.len();
    let mut linked = text.to_string();
    let mut shift = 0;
    for start in starts {
        let start = start + shift;
        linked.replace_range(start..start + term.len(), &replacement);
        shift += delta;
    }
    linked
}

fn is_linkable(text: &str, start: usize, end: usize) -> bool {
    let before = &text[..start];
    let after = &text[end..];

    let touches_word = before.chars().next_back().is_some_and(char::is_alphanumeric)
        || after.chars().next().is_some_and(char::is_alphanumeric);
    if touches_word {
        return false;
    }

    if before.ends_with(LINK_OPEN) || after.starts_with(LINK_CLOSE) {
        return false;
    }

    !inside_open_link(before)
}

// Covers matches buried in a longer link, e.g. "Might" in "[[Might Affliction]]".
fn inside_open_link(before: &str) -> bool {
    before
        .rfind(LINK_OPEN)
        .is_some_and(|open| !before[open..].contains(LINK_CLOSE))
}

#[cfg(test)]
mod tests {
    use super::{EFFECT_VOCABULARY, LinkTerm, annotate, annotate_all};

    #[test]
    fn whole_words_only() {
        assert_eq!(annotate("Something", "Some", false, None), "Something");
        assert_eq!(annotate("Some thing", "Some", false, None), "[[Some]] thing");
        assert_eq!(annotate("handsome", "some", false, None), "handsome");
        assert_eq!(annotate("Some2", "Some", false, None), "Some2");
    }

    #[test]
    fn every_occurrence_is_shifted_correctly() {
        assert_eq!(annotate("Hit and Hit", "Hit", false, None), "[[Hit]] and [[Hit]]");
        assert_eq!(
            annotate("Hit, Hit; Hit.", "Hit", false, None),
            "[[Hit]], [[Hit]]; [[Hit]]."
        );
    }

    #[test]
    fn already_linked_text_is_left_alone() {
        let once = annotate("On Hit: Hit the target", "Hit", false, None);
        assert_eq!(once, "On [[Hit]]: [[Hit]] the target");
        assert_eq!(annotate(&once, "Hit", false, None), once);
    }

    #[test]
    fn page_override_builds_piped_link() {
        let linked = annotate("Target is Dazed", "Dazed", false, Some("Status effects (Deadfire)#"));
        assert_eq!(linked, "Target is [[Status effects (Deadfire)#Dazed|Dazed]]");
        assert_eq!(
            annotate(&linked, "Dazed", false, Some("Status effects (Deadfire)#")),
            linked
        );
    }

    #[test]
    fn case_variations_link_each_form() {
        let linked = annotate(
            "Inflicts might affliction, then Might affliction, then Might Affliction",
            "Might Affliction",
            true,
            None,
        );
        assert_eq!(
            linked,
            "Inflicts [[might affliction]], then [[Might affliction]], then [[Might Affliction]]"
        );
    }

    #[test]
    fn page_override_skips_case_variants() {
        let linked = annotate(
            "might affliction, Might affliction, Might Affliction",
            "Might Affliction",
            true,
            Some("Afflictions#"),
        );
        assert_eq!(
            linked,
            "[[might affliction]], [[Might affliction]], [[Afflictions#Might Affliction|Might Affliction]]"
        );
    }

    #[test]
    fn empty_inputs_are_no_ops() {
        assert_eq!(annotate("", "Hit", false, None), "");
        assert_eq!(annotate("Hit", "", false, None), "Hit");
    }

    #[test]
    fn term_order_decides_overlapping_terms() {
        let specific_first = [LinkTerm::plain("Critical Hit"), LinkTerm::plain("Hit")];
        let general_first = [LinkTerm::plain("Hit"), LinkTerm::plain("Critical Hit")];

        assert_eq!(
            annotate_all("Critical Hit or Hit", &specific_first),
            "[[Critical Hit]] or [[Hit]]"
        );
        assert_eq!(
            annotate_all("Critical Hit or Hit", &general_first),
            "Critical [[Hit]] or [[Hit]]"
        );
    }

    #[test]
    fn nested_terms_are_not_relinked() {
        let linked = annotate_all("Might Affliction and Might", EFFECT_VOCABULARY);
        assert_eq!(linked, "[[Might Affliction]] and [[Might]]");
    }

    #[test]
    fn vocabulary_links_common_effect_text() {
        let linked = annotate_all(
            "+10 Accuracy, 20 Slash Damage and Dazed on Critical Hit",
            EFFECT_VOCABULARY,
        );
        assert_eq!(
            linked,
            "+10 [[Accuracy]], 20 [[Slash Damage]] and [[Status effects (Deadfire)#Dazed|Dazed]] on [[Critical Hit]]"
        );
    }
}
