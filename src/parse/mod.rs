use regex::Regex;
use std::sync::OnceLock;

use crate::prompt::TAG_COUNT;

fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}[.)]\s+").expect("static regex"))
}

/// Trim, drop a leading `1.`/`1)` ordinal and wrapping quotes.
fn clean(item: &str) -> String {
    let item = item.trim();
    let item = ordinal_re().replace(item, "");
    let item = item.trim();
    let unquoted = item
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(item);
    unquoted.trim().to_string()
}

fn keep(item: &str) -> bool {
    !item.is_empty() && !item.starts_with(['#', '*', '-'])
}

/// One candidate per line, at most `max`.
pub fn parse_candidates(raw: &str, max: usize) -> Vec<String> {
    raw.lines()
        .map(clean)
        .filter(|s| keep(s))
        .take(max)
        .collect()
}

/// Comma-separated tags (newlines also separate), at most seven.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(clean)
        .filter(|s| keep(s))
        .take(TAG_COUNT)
        .collect()
}
