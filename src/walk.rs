//! Schema graph traversal
//!
//! Visits the schema files of one directory in documentation order and
//! produces a flat list of rows, each with its nesting depth and the
//! mapping set found at that node.
//!
//! Order of a file visit:
//!
//! 1. the file itself (skipped entirely if already visited)
//! 2. the file behind a document-level `$ref`, one level deeper
//! 3. each property in definition order, followed by the files it references
//! 4. the file behind `items.$ref`, at the same level
//!
//! Files never reached from the root are walked afterwards from depth 0,
//! and rows of reusable value types are dropped at the very end.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};

use crate::collect::{
    display_name, document_ref, extract_mappings, file_target, has_mappings, items_ref,
    property_refs, RefPosition,
};
use crate::context::Context;
use crate::error::MappingError;
use crate::loader::{SchemaCache, SchemaSource};
use crate::mapping::MappingSet;
use crate::vocab::{
    order_columns, DIRECT_REF_OFFSET, DOCUMENT_REF_OFFSET, INTERNAL_TYPES, ITEMS_REF_OFFSET,
    NESTED_REF_OFFSET, PROPERTY_ROW_OFFSET, REF_KEY, ROOT_LABEL, ROOT_SCHEMA,
};

/// Options for a walk
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// File the traversal starts from; its `@context` is the run's context
    pub root: String,
    /// Display name of the root row instead of the file name
    pub root_label: Option<String>,
    /// Append files not reachable from the root
    pub include_orphans: bool,
    /// Files whose rows are dropped after traversal
    pub internal_types: BTreeSet<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            root: ROOT_SCHEMA.to_string(),
            root_label: None,
            include_orphans: true,
            internal_types: BTreeSet::new(),
        }
    }
}

impl WalkOptions {
    /// Settings of the QUADRIGA documentation
    pub fn quadriga() -> Self {
        Self {
            root_label: Some(ROOT_LABEL.to_string()),
            internal_types: INTERNAL_TYPES.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Start from another root file
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }
}

/// One line of the documentation order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraversalRow {
    /// File name without extension, or the property name for property rows
    pub name: String,
    /// `None` when the node has no mapping set
    pub mappings: Option<MappingSet>,
    pub depth: usize,
    /// Schema file the row comes from
    pub source: String,
}

/// Statistics of a walk
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WalkStats {
    /// Distinct files visited, including filtered ones
    pub files_visited: usize,
    /// Files walked as new roots after the main traversal
    pub orphans: usize,
    /// Rows dropped because they belong to internal value types
    pub filtered_rows: usize,
}

/// Result of a walk
#[derive(Debug)]
pub struct SchemaWalk {
    pub rows: Vec<TraversalRow>,
    /// Every vocabulary named by a mapping set anywhere in the walk
    pub vocabularies: BTreeSet<String>,
    /// Prefix table of the root file
    pub context: Context,
    pub stats: WalkStats,
}

impl SchemaWalk {
    /// Vocabulary columns a renderer needs, preferred ones first
    pub fn columns(&self) -> Vec<String> {
        order_columns(self.vocabularies.iter().map(String::as_str))
    }
}

/// Walk a schema directory from `options.root`
pub fn walk(source: &dyn SchemaSource, options: &WalkOptions) -> Result<SchemaWalk, MappingError> {
    let mut walker = Walker {
        cache: SchemaCache::new(source),
        options,
        visited: HashSet::new(),
        rows: Vec::new(),
        vocabularies: BTreeSet::new(),
    };

    let root = walker.cache.get(&options.root)?;
    let context = Context::from_document(&root);
    if context.is_empty() {
        tracing::warn!(root = %source.describe(&options.root), "no @context found in root schema");
    }

    walker.walk_file(&options.root, 0)?;

    let mut stats = WalkStats::default();
    if options.include_orphans {
        for filename in source.list()? {
            if walker.visited.contains(&filename) {
                continue;
            }
            tracing::debug!(file = %filename, "appending file not reachable from root");
            stats.orphans += 1;
            walker.walk_file(&filename, 0)?;
        }
    }

    let mut rows = walker.rows;
    let before = rows.len();
    rows.retain(|row| !options.internal_types.contains(&row.source));
    stats.filtered_rows = before - rows.len();
    stats.files_visited = walker.visited.len();

    Ok(SchemaWalk {
        rows,
        vocabularies: walker.vocabularies,
        context,
        stats,
    })
}

struct Walker<'a> {
    cache: SchemaCache<'a>,
    options: &'a WalkOptions,
    visited: HashSet<String>,
    rows: Vec<TraversalRow>,
    vocabularies: BTreeSet<String>,
}

impl Walker<'_> {
    fn walk_file(&mut self, filename: &str, depth: usize) -> Result<(), MappingError> {
        // First visit wins: it fixes where a shared schema appears in reading order
        if !self.visited.insert(filename.to_string()) {
            return Ok(());
        }

        let document = self.cache.get(filename)?;
        let origin = self.cache.source().describe(filename);
        tracing::debug!(file = %filename, depth, "walking schema");

        let name = match &self.options.root_label {
            Some(label) if filename == self.options.root => label.clone(),
            _ => display_name(filename),
        };
        let mappings = extract_mappings(&document, &origin);
        self.push_row(name, mappings, depth, filename);

        if let Some(target) = document_ref(&document).and_then(file_target) {
            self.walk_file(target, depth + DOCUMENT_REF_OFFSET)?;
        }

        match document.get("properties") {
            Some(Value::Object(properties)) => {
                for (property_name, property) in properties {
                    self.walk_property(filename, &origin, property_name, property, depth)?;
                }
            }
            Some(_) => {
                tracing::warn!(origin = %origin, "properties is not an object, skipped");
            }
            None => {}
        }

        if let Some(target) = items_ref(&document).and_then(file_target) {
            self.walk_file(target, depth + ITEMS_REF_OFFSET)?;
        }

        Ok(())
    }

    fn walk_property(
        &mut self,
        filename: &str,
        origin: &str,
        property_name: &str,
        property: &Value,
        depth: usize,
    ) -> Result<(), MappingError> {
        if !property.is_object() {
            return Ok(());
        }

        let row_depth = depth + PROPERTY_ROW_OFFSET;
        if has_mappings(property) {
            let location = format!("{}#/properties/{}", origin, property_name);
            let mappings = extract_mappings(property, &location);
            self.push_row(property_name.to_string(), mappings, row_depth, filename);
        } else if property.get(REF_KEY).is_none() {
            // Internal element: shown without mappings so the gap stays visible
            self.push_row(property_name.to_string(), None, row_depth, filename);
        }

        for reference in property_refs(property) {
            let Some(target) = file_target(&reference.target) else {
                continue;
            };
            if self.visited.contains(target) {
                continue;
            }
            let offset = match reference.position {
                RefPosition::Direct => DIRECT_REF_OFFSET,
                RefPosition::Nested => NESTED_REF_OFFSET,
            };
            self.walk_file(target, depth + offset)?;
        }

        Ok(())
    }

    fn push_row(
        &mut self,
        name: String,
        mappings: Option<MappingSet>,
        depth: usize,
        filename: &str,
    ) {
        if let Some(set) = &mappings {
            self.vocabularies
                .extend(set.vocabularies().map(String::from));
        }
        self.rows.push(TraversalRow {
            name,
            mappings,
            depth,
            source: filename.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemorySource;
    use serde_json::json;

    fn outline(result: &SchemaWalk) -> Vec<(String, usize, String)> {
        result
            .rows
            .iter()
            .map(|r| (r.name.clone(), r.depth, r.source.clone()))
            .collect()
    }

    fn row(name: &str, depth: usize, source: &str) -> (String, usize, String) {
        (name.to_string(), depth, source.to_string())
    }

    fn mapping(target: &str) -> Value {
        json!({"relation": "skos:exactMatch", "target": target})
    }

    /// A small schema family shaped like the QUADRIGA one
    fn quadriga_like() -> MemorySource {
        MemorySource::new()
            .with_json(
                "schema.json",
                json!({
                    "@context": {
                        "dc": "http://purl.org/dc/elements/1.1/",
                        "schema": "https://schema.org/"
                    },
                    "x-mappings": {"schema": mapping("schema:LearningResource"), "dc": null},
                    "properties": {
                        "title": {"type": "string", "x-mappings": {"dc": mapping("dc:title")}},
                        "id": {"type": "string"},
                        "authors": {"type": "array", "items": {"$ref": "author.json"}},
                        "contributors": {"type": "array", "items": {"$ref": "person.json"}},
                        "version": {"$ref": "semver.json"},
                        "description": {"$ref": "multilingual-text.json"}
                    }
                }),
            )
            .with_json(
                "author.json",
                json!({"$ref": "person.json", "x-mappings": {"schema": mapping("schema:author")}}),
            )
            .with_json(
                "person.json",
                json!({"properties": {"name": {"x-mappings": {"schema": mapping("schema:name")}}}}),
            )
            .with_json(
                "semver.json",
                json!({"type": "string", "x-mappings": {"hermes": mapping("hermes:version")}}),
            )
            .with_json(
                "multilingual-text.json",
                json!({"type": "object", "properties": {"de": {"type": "string"}}}),
            )
            .with_json(
                "book.json",
                json!({"type": "array", "items": {"$ref": "chapter.json"}}),
            )
            .with_json(
                "chapter.json",
                json!({"properties": {"heading": {"type": "string", "x-mappings": null}}}),
            )
    }

    #[test]
    fn test_document_ref_is_one_level_deeper() {
        let source = MemorySource::new()
            .with_json("a.json", json!({"$ref": "b.json"}))
            .with_json("b.json", json!({"type": "object"}));
        let result = walk(&source, &WalkOptions::default().with_root("a.json")).unwrap();

        assert_eq!(outline(&result), vec![row("a", 0, "a.json"), row("b", 1, "b.json")]);
        assert!(result.rows.iter().all(|r| r.mappings.is_none()));
    }

    #[test]
    fn test_quadriga_order() {
        let result = walk(&quadriga_like(), &WalkOptions::quadriga()).unwrap();

        assert_eq!(
            outline(&result),
            vec![
                row("case-study", 0, "schema.json"),
                row("title", 1, "schema.json"),
                row("id", 1, "schema.json"),
                row("authors", 1, "schema.json"),
                row("author", 2, "author.json"),
                row("person", 3, "person.json"),
                row("name", 4, "person.json"),
                row("contributors", 1, "schema.json"),
                row("book", 0, "book.json"),
                row("chapter", 0, "chapter.json"),
                row("heading", 1, "chapter.json"),
            ]
        );
        assert_eq!(
            result.stats,
            WalkStats {
                files_visited: 7,
                orphans: 1,
                filtered_rows: 3,
            }
        );
    }

    #[test]
    fn test_internal_and_mapped_rows() {
        let result = walk(&quadriga_like(), &WalkOptions::quadriga()).unwrap();
        let find = |name: &str| result.rows.iter().find(|r| r.name == name).unwrap();

        assert!(find("title").mappings.is_some());
        assert!(find("id").mappings.is_none());
        // declared as null: a row, but no mapping set
        assert!(find("heading").mappings.is_none());
        // property with a direct $ref and no mappings has no row of its own
        assert!(result.rows.iter().all(|r| r.name != "version"));
    }

    #[test]
    fn test_filtered_types_still_feed_vocabularies() {
        let result = walk(&quadriga_like(), &WalkOptions::quadriga()).unwrap();

        assert!(result.rows.iter().all(|r| r.source != "semver.json"));
        assert!(result.vocabularies.contains("hermes"));
        assert_eq!(result.columns(), vec!["dc", "schema", "hermes"]);
    }

    #[test]
    fn test_default_options_keep_everything() {
        let result = walk(&quadriga_like(), &WalkOptions::default()).unwrap();

        assert_eq!(result.rows[0].name, "schema");
        assert!(result.rows.contains(&TraversalRow {
            name: "semver".to_string(),
            mappings: MappingSet::from_value(&json!({"hermes": mapping("hermes:version")})),
            depth: 1,
            source: "semver.json".to_string(),
        }));
        assert_eq!(result.stats.filtered_rows, 0);
    }

    #[test]
    fn test_without_orphans() {
        let options = WalkOptions {
            include_orphans: false,
            ..WalkOptions::quadriga()
        };
        let result = walk(&quadriga_like(), &options).unwrap();

        assert!(result.rows.iter().all(|r| r.source != "book.json"));
        assert_eq!(result.stats.orphans, 0);
    }

    #[test]
    fn test_cycles_terminate() {
        let source = MemorySource::new()
            .with_json("a.json", json!({"$ref": "b.json"}))
            .with_json("b.json", json!({"properties": {"back": {"$ref": "a.json"}}}))
            .with_json("self.json", json!({"$ref": "self.json"}));

        let result = walk(&source, &WalkOptions::default().with_root("a.json")).unwrap();
        assert_eq!(
            outline(&result),
            vec![row("a", 0, "a.json"), row("b", 1, "b.json"), row("self", 0, "self.json")]
        );
    }

    #[test]
    fn test_shared_schema_first_visit_wins() {
        let source = MemorySource::new()
            .with_json(
                "schema.json",
                json!({
                    "properties": {
                        "contact": {"oneOf": [{"$ref": "person.json"}, {"type": "null"}]},
                        "owner": {"$ref": "person.json"}
                    }
                }),
            )
            .with_json("person.json", json!({}));

        let result = walk(&source, &WalkOptions::default()).unwrap();
        assert_eq!(
            outline(&result),
            vec![
                row("schema", 0, "schema.json"),
                row("contact", 1, "schema.json"),
                row("person", 2, "person.json"),
            ]
        );
    }

    #[test]
    fn test_direct_and_nested_refs_of_one_property() {
        let source = MemorySource::new()
            .with_json(
                "schema.json",
                json!({
                    "properties": {
                        "creator": {
                            "$ref": "agent.json",
                            "anyOf": [{"$ref": "group.json"}]
                        }
                    }
                }),
            )
            .with_json("agent.json", json!({}))
            .with_json("group.json", json!({}));

        let result = walk(&source, &WalkOptions::default()).unwrap();
        assert_eq!(
            outline(&result),
            vec![
                row("schema", 0, "schema.json"),
                row("agent", 1, "agent.json"),
                row("group", 2, "group.json"),
            ]
        );
    }

    #[test]
    fn test_local_pointers_are_not_loaded() {
        let source = MemorySource::new().with_json(
            "schema.json",
            json!({
                "properties": {
                    "license": {"$ref": "#/definitions/license"},
                    "homepage": {"$ref": "https://example.org/url.json"}
                }
            }),
        );

        let result = walk(&source, &WalkOptions::default()).unwrap();
        assert_eq!(outline(&result), vec![row("schema", 0, "schema.json")]);
    }

    #[test]
    fn test_mapped_property_with_direct_ref() {
        let source = MemorySource::new()
            .with_json(
                "schema.json",
                json!({
                    "properties": {
                        "publisher": {
                            "$ref": "org.json",
                            "x-mappings": {"dc": mapping("dc:publisher")}
                        }
                    }
                }),
            )
            .with_json("org.json", json!({}));

        let result = walk(&source, &WalkOptions::default()).unwrap();
        assert_eq!(
            outline(&result),
            vec![
                row("schema", 0, "schema.json"),
                row("publisher", 1, "schema.json"),
                row("org", 1, "org.json"),
            ]
        );

        let publisher = &result.rows[1];
        assert_eq!(
            publisher.mappings.as_ref().map(|m| m.vocabularies().collect::<Vec<_>>()),
            Some(vec!["dc"])
        );
        assert!(result.rows[2].mappings.is_none());
    }

    #[test]
    fn test_references_outside_directory_are_not_loaded() {
        let source = MemorySource::new().with_json(
            "schema.json",
            json!({
                "$ref": "../v0.9.0/schema.json",
                "properties": {"owner": {"$ref": "sub/person.json"}}
            }),
        );

        let result = walk(&source, &WalkOptions::default()).unwrap();
        assert_eq!(outline(&result), vec![row("schema", 0, "schema.json")]);
    }

    #[test]
    fn test_walk_is_deterministic() {
        let source = quadriga_like();
        let first = walk(&source, &WalkOptions::quadriga()).unwrap();
        let second = walk(&source, &WalkOptions::quadriga()).unwrap();
        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn test_each_file_walked_once() {
        let result = walk(&quadriga_like(), &WalkOptions::default()).unwrap();
        for filename in quadriga_like().list().unwrap() {
            let owning = result
                .rows
                .iter()
                .filter(|r| r.source == filename && r.name == display_name(&filename))
                .count();
            assert_eq!(owning, 1, "{}", filename);
        }
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let source = MemorySource::new().with_json("schema.json", json!({"$ref": "gone.json"}));
        let result = walk(&source, &WalkOptions::default());
        assert!(matches!(result, Err(MappingError::LoadError { .. })));
    }

    #[test]
    fn test_context_from_root() {
        let result = walk(&quadriga_like(), &WalkOptions::quadriga()).unwrap();
        assert_eq!(result.context.resolve("dc:title"), "http://purl.org/dc/elements/1.1/title");
    }
}
