//! Rich-text cleanup for inspect-window strings.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("html tag pattern is valid"));

static DAMAGE_TYPE_ICON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<link[:=]"neutralvalue://(.*?)"><sprite[:=]"Inline" name[:=]"cs_.*?" tint[:=]1></link>"#,
    )
    .expect("damage type icon pattern is valid")
});

const PIPE_TEMPLATE: &str = "{{!}}";

/// Removes every `<...>` tag, keeping the text between tags.
pub fn strip_html(text: &str) -> String {
    HTML_TAG_RE.replace_all(text, "").into_owned()
}

/// Turns a raw effect string into wiki text.
///
/// Damage-type icons become `{{<type>}}` templates (the first one preceded by a
/// space), literal pipes become `{{!}}` so they survive template arguments, and
/// the remaining tags are stripped.
pub fn format_effects(raw: &str) -> String {
    let mut icon_index = 0;
    let with_templates = DAMAGE_TYPE_ICON_RE.replace_all(raw, |caps: &Captures<'_>| {
        let prefix = if icon_index == 0 { " " } else { "" };
        icon_index += 1;
        format!("{prefix}{{{{{}}}}}", caps[1].to_lowercase())
    });

    strip_html(&with_templates.replace('|', PIPE_TEMPLATE))
}
