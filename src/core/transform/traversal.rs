//! Source-field and derived-field application over JSON trees
//!
//! XML documents run [`visit_and_replace`] and [`derived_value`] over their
//! ordered node tree, see [`super::xml`].

use indexmap::IndexMap;
use serde_json::Value;

use super::path::{get_path, join_text, set_path};
use crate::domain::{DerivedField, Result};
use crate::pseudonymization::Pseudonymizer;

/// Walks the tree and replaces every value whose key satisfies `predicate`
///
/// `null` values are left in place. A replaced value is not descended into.
/// Returns the number of replacements made.
pub fn visit_and_replace<P, F>(value: &mut Value, predicate: &P, transform: &mut F) -> Result<usize>
where
    P: Fn(&str, &Value) -> bool,
    F: FnMut(&Value) -> Result<Value>,
{
    let mut replaced = 0;
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if !child.is_null() && predicate(key.as_str(), &*child) {
                    *child = transform(&*child)?;
                    replaced += 1;
                } else {
                    replaced += visit_and_replace(child, predicate, transform)?;
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                replaced += visit_and_replace(item, predicate, transform)?;
            }
        }
        _ => {}
    }
    Ok(replaced)
}

/// Pseudonymizes every value stored under one of the `sources` keys
///
/// Each source name is a separate pass over the whole tree, in list order.
pub fn apply_source_fields(
    doc: &mut Value,
    sources: &[String],
    pseudonymizer: &Pseudonymizer,
) -> Result<usize> {
    let mut total = 0;
    for name in sources {
        let count = visit_and_replace(
            doc,
            &|key: &str, _: &Value| key == name.as_str(),
            &mut |v: &Value| pseudonymizer.pseudonymize_value(v),
        )?;
        tracing::trace!(field = %name, count, "Applied source field");
        total += count;
    }
    Ok(total)
}

/// Computes derived fields in definition order
///
/// Each target receives the resolved source values joined by the separator,
/// or `null` when none of the sources resolve.
pub fn apply_derived_fields(doc: &mut Value, derived: &IndexMap<String, DerivedField>) {
    for (target, field) in derived {
        let value = derived_value(field, |path| get_path(doc, path));
        set_path(doc, target, value);
    }
}

/// Joins the resolvable sources of one derived field
///
/// `resolve` looks up a dot path; paths it cannot resolve are dropped.
pub fn derived_value<G>(field: &DerivedField, mut resolve: G) -> Value
where
    G: FnMut(&str) -> Option<Value>,
{
    let parts: Vec<String> = field
        .sources
        .iter()
        .filter_map(|path| resolve(path))
        .map(|v| join_text(&v))
        .collect();

    if parts.is_empty() {
        Value::Null
    } else {
        Value::String(parts.join(&field.separator))
    }
}
