//! Dot-path access into JSON trees
//!
//! Paths are dot-separated key lists such as `patient.address.city`. Arrays met
//! along the way are indexed by a numeric segment (`items.0.id`); any other
//! segment is applied to every element of the array.

use serde_json::{Map, Value};

/// Resolves a dot path
///
/// Returns `None` for a missing key, a scalar in the middle of the path, or an
/// array broadcast that resolved nothing. A key that exists with a `null` value
/// resolves to `Some(Value::Null)`.
pub fn get_path(root: &Value, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    get_segments(root, &segments)
}

fn get_segments(current: &Value, segments: &[&str]) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(current.clone());
    };

    match current {
        Value::Object(map) => map.get(*head).and_then(|child| get_segments(child, rest)),
        Value::Array(items) => match head.parse::<usize>() {
            Ok(index) => items.get(index).and_then(|item| get_segments(item, rest)),
            Err(_) => {
                let collected: Vec<Value> = items
                    .iter()
                    .filter_map(|item| get_segments(item, segments))
                    .collect();
                if collected.is_empty() {
                    None
                } else {
                    Some(Value::Array(collected))
                }
            }
        },
        _ => None,
    }
}

/// Writes `value` at a dot path
///
/// Missing intermediate keys are created as empty objects. Arrays in the middle
/// of the path receive the write on every element unless the segment is a
/// numeric index. Scalars in the middle of the path stop the write.
pub fn set_path(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    set_segments(root, &segments, value);
}

fn set_segments(current: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match current {
        Value::Object(map) => {
            if rest.is_empty() {
                map.insert((*head).to_string(), value);
            } else {
                let child = map
                    .entry((*head).to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                set_segments(child, rest, value);
            }
        }
        Value::Array(items) => match head.parse::<usize>() {
            Ok(index) => match items.get_mut(index) {
                Some(item) if rest.is_empty() => *item = value,
                Some(item) => set_segments(item, rest, value),
                None => tracing::debug!(index, "Array index out of range, skipping write"),
            },
            Err(_) => {
                for item in items.iter_mut() {
                    set_segments(item, segments, value.clone());
                }
            }
        },
        _ => tracing::debug!(segment = %head, "Cannot descend into scalar, skipping write"),
    }
}

/// Text form of a value when joining derived fields
///
/// Strings are taken verbatim, `null` becomes empty, arrays join their elements
/// with `,` and objects serialize to compact JSON.
pub fn join_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(join_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let doc = json!({"a": {"b": {"c": 5}}});
        assert_eq!(get_path(&doc, "a.b.c"), Some(json!(5)));
        assert_eq!(get_path(&doc, "a.b"), Some(json!({"c": 5})));
        assert_eq!(get_path(&doc, "a.x"), None);
        assert_eq!(get_path(&doc, "a.b.c.d"), None);
    }

    #[test]
    fn test_get_null_resolves() {
        let doc = json!({"a": null});
        assert_eq!(get_path(&doc, "a"), Some(Value::Null));
    }

    #[test]
    fn test_get_array_index_and_broadcast() {
        let doc = json!({"items": [{"id": 1}, {"id": 2}, {"other": 3}]});
        assert_eq!(get_path(&doc, "items.1.id"), Some(json!(2)));
        assert_eq!(get_path(&doc, "items.id"), Some(json!([1, 2])));
        assert_eq!(get_path(&doc, "items.missing"), None);
        assert_eq!(get_path(&doc, "items.9"), None);
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut doc = json!({});
        set_path(&mut doc, "a.b.c", json!("x"));
        assert_eq!(doc, json!({"a": {"b": {"c": "x"}}}));
    }

    #[test]
    fn test_set_overwrites_existing() {
        let mut doc = json!({"a": {"b": 1, "keep": true}});
        set_path(&mut doc, "a.b", json!(2));
        assert_eq!(doc, json!({"a": {"b": 2, "keep": true}}));
    }

    #[test]
    fn test_set_broadcasts_over_arrays() {
        let mut doc = json!({"rows": [{"v": 1}, {"v": 2}]});
        set_path(&mut doc, "rows.tag", json!("t"));
        assert_eq!(doc, json!({"rows": [{"v": 1, "tag": "t"}, {"v": 2, "tag": "t"}]}));

        set_path(&mut doc, "rows.0.v", json!(10));
        assert_eq!(doc["rows"][0]["v"], json!(10));
        assert_eq!(doc["rows"][1]["v"], json!(2));
    }

    #[test]
    fn test_set_skips_scalar_mid_path() {
        let mut doc = json!({"a": 5});
        set_path(&mut doc, "a.b", json!(1));
        assert_eq!(doc, json!({"a": 5}));
    }

    #[test]
    fn test_join_text() {
        assert_eq!(join_text(&json!("s")), "s");
        assert_eq!(join_text(&json!(null)), "");
        assert_eq!(join_text(&json!(1.5)), "1.5");
        assert_eq!(join_text(&json!([1, "a", null])), "1,a,");
        assert_eq!(join_text(&json!({"k": 1})), r#"{"k":1}"#);
    }
}
