//! Per-type pseudonymization config
//!
//! Stored as `uploads/<session>/<type>/<type>-config.json`:
//!
//! ```json
//! {
//!   "sources": ["ipField", "mailField"],
//!   "derived": {
//!     "mergedField": { "sources": ["nested.a", "nested.b"], "separator": "-" }
//!   }
//! }
//! ```
//!
//! `derived` keeps insertion order, which is also the evaluation order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A field computed by joining the values found at several dot paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedField {
    pub sources: Vec<String>,
    pub separator: String,
}

impl DerivedField {
    pub fn new<I, S>(sources: I, separator: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            separator: separator.into(),
        }
    }
}

/// Source fields and derived fields for one config type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDefinition {
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub derived: IndexMap<String, DerivedField>,
}

impl ConfigDefinition {
    /// Adds sources not yet present, keeping first-insertion order
    ///
    /// Returns the number of sources added.
    pub fn union_sources<'a, I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut added = 0;
        for candidate in candidates {
            if !self.sources.iter().any(|s| s == candidate) {
                self.sources.push(candidate.clone());
                added += 1;
            }
        }
        added
    }

    /// Adds derived entries whose target is not yet defined
    ///
    /// Returns the number of entries added.
    pub fn union_derived(&mut self, other: &IndexMap<String, DerivedField>) -> usize {
        let mut added = 0;
        for (target, field) in other {
            if !self.derived.contains_key(target) {
                self.derived.insert(target.clone(), field.clone());
                added += 1;
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_sources_dedups_and_keeps_order() {
        let mut config = ConfigDefinition {
            sources: vec!["b".to_string()],
            ..Default::default()
        };
        let incoming = vec!["a".to_string(), "b".to_string(), "a".to_string(), "c".to_string()];
        assert_eq!(config.union_sources(&incoming), 2);
        assert_eq!(config.sources, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_union_derived_keeps_existing_target() {
        let mut config = ConfigDefinition::default();
        config
            .derived
            .insert("full".to_string(), DerivedField::new(["first"], " "));

        let mut incoming = IndexMap::new();
        incoming.insert("full".to_string(), DerivedField::new(["other"], "-"));
        incoming.insert("pair".to_string(), DerivedField::new(["x", "y"], ":"));

        assert_eq!(config.union_derived(&incoming), 1);
        assert_eq!(config.derived["full"].sources, vec!["first"]);
        assert_eq!(
            config.derived.keys().collect::<Vec<_>>(),
            vec!["full", "pair"]
        );
    }

    #[test]
    fn test_missing_keys_default() {
        let config: ConfigDefinition = serde_json::from_str("{}").unwrap();
        assert!(config.sources.is_empty());
        assert!(config.derived.is_empty());
    }
}
