//! Stat block parsing.
//!
//! A stat block is the label/value dump shown in the inspect window, one stat
//! per line (`Label: value`) with CRLF line breaks. Values may wrap onto
//! following lines that carry no label.

use indexmap::IndexMap;
use regex::Regex;

pub type StatBlockPairs = IndexMap<String, String>;

const LINE_BREAK: &str = "\r\n";
const PAIR_DELIMITER: &str = ": ";
const SECONDS_SUFFIX: &str = " sec";
const INSTANT: &str = "Instant";
const NOISE_USE_SUFFIX: &str = " (Use)";
const NOISE_IMPACT_SUFFIX: &str = " (Impact)";

/// Labels that end up in typed record fields and are left out of the
/// leftover pairs.
pub const CONSUMED_KEYS: &[&str] = &[
    "Keywords",
    "Counters",
    "Cost",
    "Cast Time",
    "Recovery Time",
    "Range",
    "Aura Range",
    "Area of Effect",
    "Duration",
    "AoE Duration",
    "Linger",
    "Noise",
    "Uses",
];

/// Splits a stat block into ordered label/value pairs.
///
/// A line holding `": "` starts a pair; a line without it continues the
/// previous value. Empty lines are dropped. A repeated label keeps its first
/// position but takes the last value.
pub fn parse_pairs(raw: &str) -> StatBlockPairs {
    let mut pairs = StatBlockPairs::new();
    let mut key = String::new();

    for line in raw.split(LINE_BREAK).filter(|line| !line.is_empty()) {
        if let Some((label, value)) = line.split_once(PAIR_DELIMITER) {
            key = label.to_string();
            pairs.insert(key.clone(), value.to_string());
        } else if !key.is_empty()
            && let Some(value) = pairs.get_mut(&key)
        {
            value.push_str(LINE_BREAK);
            value.push_str(line);
        }
    }

    pairs
}

/// Looks `key` up directly in the raw text, case-insensitively, returning the
/// rest of the first matching line. Independent of [`parse_pairs`], so it also
/// finds labels that occur inside longer ones (`Range` in `Aura Range`).
pub fn lookup_value(raw: &str, key: &str) -> Option<String> {
    let pattern = format!(r"(?i){}:\s([^\n\r]*)", regex::escape(&key.to_lowercase()));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(raw)?.get(1)?.as_str();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

/// Parses a time value such as `2.5 sec` or `Instant`.
pub fn parse_seconds(value: &str) -> Option<f32> {
    let value = value.trim();
    if value == INSTANT {
        return Some(0.0);
    }
    let number = match value.find(SECONDS_SUFFIX) {
        Some(index) => &value[..index],
        None => value,
    };
    number.trim().parse().ok()
}

/// Splits `Quiet (Use) / Loud (Impact)` into its use and impact parts. Without
/// a `/` both parts are the whole value.
pub fn split_noise(value: &str) -> (String, String) {
    match value.split_once('/') {
        Some((use_part, impact_part)) => {
            let use_part = use_part.trim_end();
            let use_part = use_part.strip_suffix(NOISE_USE_SUFFIX).unwrap_or(use_part);
            let impact_part = impact_part.trim_start();
            let impact_part = impact_part
                .strip_suffix(NOISE_IMPACT_SUFFIX)
                .unwrap_or(impact_part);
            (use_part.to_string(), impact_part.to_string())
        }
        None => (value.to_string(), value.to_string()),
    }
}

/// Pairs left after removing [`CONSUMED_KEYS`], in their original order.
pub fn unused_pairs(pairs: &StatBlockPairs) -> StatBlockPairs {
    pairs
        .iter()
        .filter(|(key, _)| !CONSUMED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{lookup_value, parse_pairs, parse_seconds, split_noise, unused_pairs};

    const SAMPLE: &str = "Keywords: Fire\r\nCast Time: Instant\r\nRecovery Time: 3.0 sec\r\n\r\nRange: 10m\r\nDuration: 15.0 sec\r\nSpecial: Deals extra damage\r\nagainst Vessels\r\nNoise: Quiet (Use) / Loud (Impact)\r\n";

    #[test]
    fn parse_pairs_keeps_order_and_joins_continuations() {
        let pairs = parse_pairs(SAMPLE);
        let keys: Vec<&str> = pairs.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "Keywords",
                "Cast Time",
                "Recovery Time",
                "Range",
                "Duration",
                "Special",
                "Noise"
            ]
        );
        assert_eq!(
            pairs.get("Special").map(String::as_str),
            Some("Deals extra damage\r\nagainst Vessels")
        );
    }

    #[test]
    fn parse_pairs_round_trips_single_line_values() {
        let pairs = parse_pairs("Key: Value\r\nOther: Thing");
        assert_eq!(pairs.get("Key").map(String::as_str), Some("Value"));
        assert_eq!(pairs.get("Other").map(String::as_str), Some("Thing"));
    }

    #[test]
    fn parse_pairs_drops_leading_continuation_and_handles_empty_input() {
        assert!(parse_pairs("").is_empty());

        let pairs = parse_pairs("orphan line\r\nKey: Value");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.get("Key").map(String::as_str), Some("Value"));
    }

    #[test]
    fn parse_pairs_last_write_wins() {
        let pairs = parse_pairs("Key: one\r\nOther: two\r\nKey: three");
        assert_eq!(pairs.get("Key").map(String::as_str), Some("three"));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn lookup_value_is_case_insensitive() {
        assert_eq!(lookup_value(SAMPLE, "cast time").as_deref(), Some("Instant"));
        assert_eq!(lookup_value(SAMPLE, "Range").as_deref(), Some("10m"));
        assert_eq!(lookup_value(SAMPLE, "Linger"), None);
    }

    #[test]
    fn lookup_value_reads_only_the_first_line() {
        assert_eq!(
            lookup_value(SAMPLE, "Special").as_deref(),
            Some("Deals extra damage")
        );
    }

    #[test]
    fn parse_seconds_handles_units_and_instant() {
        assert_eq!(parse_seconds("Instant"), Some(0.0));
        assert_eq!(parse_seconds("15.0 sec"), Some(15.0));
        assert_eq!(parse_seconds("2.5"), Some(2.5));
        assert_eq!(parse_seconds("Special"), None);
    }

    #[test]
    fn split_noise_handles_both_forms() {
        assert_eq!(
            split_noise("Quiet (Use) / Loud (Impact)"),
            ("Quiet".to_string(), "Loud".to_string())
        );
        assert_eq!(
            split_noise("Silent"),
            ("Silent".to_string(), "Silent".to_string())
        );
    }

    #[test]
    fn unused_pairs_skips_consumed_labels() {
        let unused = unused_pairs(&parse_pairs(SAMPLE));
        let keys: Vec<&str> = unused.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Special"]);
    }
}
