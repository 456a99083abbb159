use serde_json::{Map, Value};

use super::CURRENT_SCHEMA_VERSION;

type Step = fn(&mut Map<String, Value>);

/// `(from, to, step)`; applied in sequence until the current version is reached.
const MIGRATIONS: &[(&str, &str, Step)] = &[("1", "2", v1_to_v2)];

/// Upgrade `data` in place from `from` to the current version.
/// Returns false when the table has no path from `from`.
pub fn run(from: &str, data: &mut Map<String, Value>) -> bool {
    let mut version = from.to_string();
    while version != CURRENT_SCHEMA_VERSION {
        let Some((_, to, step)) = MIGRATIONS.iter().find(|(f, _, _)| *f == version) else {
            return false;
        };
        step(data);
        tracing::debug!(from = %version, to = %to, "migrated form data");
        version = (*to).to_string();
    }
    true
}

// v1 stored the keyword as `keyword` and tags as an array.
fn v1_to_v2(data: &mut Map<String, Value>) {
    if let Some(keyword) = data.remove("keyword") {
        data.entry("focusKeyword").or_insert(keyword);
    }
    if let Some(Value::Array(items)) = data.get("tags") {
        let joined = items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        data.insert("tags".into(), Value::String(joined));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_version_has_no_path() {
        let mut data = Map::new();
        assert!(!run("0.9", &mut data));
    }

    #[test]
    fn v1_keeps_existing_focus_keyword() {
        let Value::Object(mut data) = json!({ "keyword": "old", "focusKeyword": "new" }) else {
            unreachable!()
        };
        assert!(run("1", &mut data));
        assert_eq!(data["focusKeyword"], "new");
        assert!(data.get("keyword").is_none());
    }
}
