//! Tolerant accessors over loosely-typed JSON and keyword matching
//!
//! Request and course documents come from forms and LLM output, so every
//! accessor here returns `None` on a type mismatch instead of failing.

use serde_json::Value;

/// Flatten a JSON document into one lowercase text view.
///
/// Object keys, strings and numbers are emitted one per line, depth first,
/// so substring search behaves like searching the serialized document
/// without depending on escaping or key order.
pub fn flatten_text(value: &Value) -> String {
    let mut out = String::new();
    push_flat(value, &mut out);
    out.to_lowercase()
}

fn push_flat(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push_str(s);
            out.push('\n');
        }
        Value::Number(n) => {
            out.push_str(&n.to_string());
            out.push('\n');
        }
        Value::Array(items) => {
            for item in items {
                push_flat(item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                out.push_str(key);
                out.push('\n');
                push_flat(item, out);
            }
        }
        Value::Bool(_) | Value::Null => {}
    }
}

/// Case-insensitive "any synonym matches" detector over a fixed tag table
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    entries: Vec<(&'static str, Vec<String>)>,
}

impl KeywordMatcher {
    /// Build from `(tag, synonyms)` pairs; table order is detection order
    pub fn new(table: &[(&'static str, &[&'static str])]) -> Self {
        let entries = table
            .iter()
            .map(|(tag, synonyms)| {
                (*tag, synonyms.iter().map(|s| s.to_lowercase()).collect())
            })
            .collect();
        Self { entries }
    }

    /// Tags with at least one synonym contained in `haystack`
    ///
    /// `haystack` must already be lowercase (see `flatten_text`).
    pub fn detect(&self, haystack: &str) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, synonyms)| synonyms.iter().any(|s| haystack.contains(s.as_str())))
            .map(|(tag, _)| *tag)
            .collect()
    }
}

/// True if any keyword occurs in `text` (case-insensitive)
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// True if every keyword occurs in `text` (case-insensitive)
pub fn contains_all(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().all(|k| lower.contains(&k.to_lowercase()))
}

/// Loose truthiness: null, false, 0, "", [] and {} are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Non-negative whole number from an integer, integral float or numeric string
pub fn as_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return u32::try_from(u).ok();
            }
            let f = n.as_f64()?;
            if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
                Some(f as u32)
            } else {
                None
            }
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Non-blank string
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// List of strings from either a JSON array or a single string.
///
/// Numbers inside arrays are stringified, other entries are skipped.
/// Returns `None` for other types and for lists with no usable entries.
pub fn as_text_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => return None,
    };

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Short description of a JSON value's type for warnings
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// True if arrays/objects nest more than `limit` levels deep
///
/// Recursion stops at `limit`, so this is safe on hostile input.
pub fn nesting_exceeds(value: &Value, limit: usize) -> bool {
    match value {
        Value::Array(items) => limit == 0 || items.iter().any(|v| nesting_exceeds(v, limit - 1)),
        Value::Object(map) => limit == 0 || map.values().any(|v| nesting_exceeds(v, limit - 1)),
        _ => false,
    }
}
