//! Structured document transformation
//!
//! - [`path`]: dot-path get/set over JSON trees
//! - [`traversal`]: source-field pseudonymization and derived-field computation
//! - [`xml`]: ordered XML trees walked by the same visitor

pub mod path;
pub mod traversal;
pub mod xml;

use serde_json::Value;

use crate::domain::{ConfigDefinition, Result};
use crate::pseudonymization::Pseudonymizer;

pub use path::{get_path, join_text, set_path};
pub use traversal::{apply_derived_fields, apply_source_fields, visit_and_replace};
pub use xml::{XmlDeclaration, XmlDocument};

/// Applies a per-type config to a parsed document
///
/// Source fields are pseudonymized first, then derived fields are computed
/// from the already pseudonymized tree. Returns the number of replaced values.
pub fn apply_config(
    doc: &mut Value,
    config: &ConfigDefinition,
    pseudonymizer: &Pseudonymizer,
) -> Result<usize> {
    let replaced = apply_source_fields(doc, &config.sources, pseudonymizer)?;
    apply_derived_fields(doc, &config.derived);
    Ok(replaced)
}

/// Applies a per-type config to a parsed XML document
///
/// Same order as [`apply_config`]: sources first, then derived fields.
pub fn apply_xml_config(
    doc: &mut XmlDocument,
    config: &ConfigDefinition,
    pseudonymizer: &Pseudonymizer,
) -> Result<usize> {
    let replaced = doc.apply_source_fields(&config.sources, pseudonymizer)?;
    doc.apply_derived_fields(&config.derived);
    Ok(replaced)
}
