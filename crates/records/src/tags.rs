//! Tag list normalization.
//!
//! Services, languages and eligibility were stored as arrays, delimited
//! strings, or arrays serialized into a string. All of them become a list of
//! trimmed, non-empty entries in stored order.

use serde_json::Value;

const DELIMITERS: [char; 3] = [',', ';', '\n'];

/// Normalize a stored tag field into a list of strings.
///
/// A string that looks like a JSON array but fails to parse yields no tags
/// rather than one tag made of punctuation.
///
/// # Example
/// ```
/// use clinicfinder_records::normalize_tags;
/// use serde_json::json;
///
/// assert_eq!(normalize_tags(&json!("Dental; Vision")), vec!["Dental", "Vision"]);
/// assert_eq!(normalize_tags(&json!("[\"Dental\", \"Vision\"]")), vec!["Dental", "Vision"]);
/// assert!(normalize_tags(&json!(null)).is_empty());
/// ```
pub fn normalize_tags(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(tag_entry).collect(),
        Value::String(text) => tags_from_str(text),
        _ => Vec::new(),
    }
}

fn tag_entry(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn tags_from_str(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.starts_with('[') {
        return match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items.iter().filter_map(tag_entry).collect(),
            Ok(_) | Err(_) => {
                tracing::debug!(raw = text, "unparseable tag array");
                Vec::new()
            }
        };
    }

    text.split(DELIMITERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
