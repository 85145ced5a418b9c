//! Reference and mapping extraction from schema documents
//!
//! Finds the edges of the schema graph (document `$ref`, property
//! references, `items.$ref`) and the mapping sets attached to nodes.

use serde_json::Value;

use crate::mapping::MappingSet;
use crate::vocab::{MAPPINGS_KEY, REF_KEY, SCHEMA_EXTENSION};

/// How a reference sits inside a property definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefPosition {
    /// `{"$ref": "x.json"}` directly on the property
    Direct,
    /// Inside a wrapper: `oneOf`, `anyOf`, `items`, ...
    Nested,
}

/// A reference to another schema file found in a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRef {
    pub target: String,
    pub position: RefPosition,
}

/// File part of a `$ref`, if it points at another schema file.
///
/// Local pointers (`#/definitions/x`) and absolute web references are not
/// schema files of the directory; `file.json#/x` names `file.json`.
/// Schema files sit side by side in one version directory, so a reference
/// with a path separator or a `..` component never names one.
pub fn file_target(reference: &str) -> Option<&str> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return None;
    }
    let document = reference.split('#').next().unwrap_or_default();
    if document.is_empty() {
        return None;
    }
    if document.contains(['/', '\\']) || document == ".." || document == "." {
        tracing::warn!(reference = %reference, "reference leaves the schema directory, skipped");
        return None;
    }
    Some(document)
}

/// Document-level `$ref` (the whole file delegates to another)
pub fn document_ref(document: &Value) -> Option<&str> {
    document.get(REF_KEY).and_then(|r| r.as_str())
}

/// `items.$ref` of an array-shaped document
pub fn items_ref(document: &Value) -> Option<&str> {
    document
        .get("items")
        .and_then(|items| items.get(REF_KEY))
        .and_then(|r| r.as_str())
}

/// Every reference inside a property definition, in document order
pub fn property_refs(property: &Value) -> Vec<SchemaRef> {
    let mut refs = Vec::new();
    collect_refs(property, RefPosition::Direct, &mut refs);
    refs
}

fn collect_refs(value: &Value, position: RefPosition, refs: &mut Vec<SchemaRef>) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(target)) = obj.get(REF_KEY) {
                refs.push(SchemaRef {
                    target: target.clone(),
                    position,
                });
            }
            for (key, v) in obj {
                if key != REF_KEY {
                    collect_refs(v, RefPosition::Nested, refs);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_refs(item, RefPosition::Nested, refs);
            }
        }
        _ => {}
    }
}

/// Whether a node declares `x-mappings` at all (even as `null`)
pub fn has_mappings(node: &Value) -> bool {
    node.get(MAPPINGS_KEY).is_some()
}

/// The node's mapping set, if it declares one that is an object
pub fn extract_mappings(node: &Value, origin: &str) -> Option<MappingSet> {
    let raw = node.get(MAPPINGS_KEY)?;
    if raw.is_null() {
        return None;
    }
    let set = MappingSet::from_value(raw);
    if set.is_none() {
        tracing::warn!(origin = %origin, "x-mappings is not an object, ignored");
    }
    set
}

/// Display name of a schema file: the file name without `.json`
pub fn display_name(filename: &str) -> String {
    filename
        .strip_suffix(SCHEMA_EXTENSION)
        .unwrap_or(filename)
        .to_string()
}
