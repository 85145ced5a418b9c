//! Validation of mapping sets against the x-mappings meta-schema
//!
//! Meta-schema in force:
//!
//! - a mapping set is an object holding exactly the required vocabularies,
//!   plus an optional `$comment`
//! - each vocabulary holds `null`, one entry or a non-empty list of entries
//! - an entry holds exactly `relation` and `target`
//! - `relation` is one of the five SKOS mapping relations
//! - `target` is an absolute URI or `prefix:term`, with the prefix declared in
//!   the root `@context` and a term made of letters only
//!
//! Every violation is reported; validation never stops at the first one.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::context::{is_absolute_uri, Context};
use crate::error::MappingError;
use crate::loader::{SchemaCache, SchemaSource};
use crate::mapping::Relation;
use crate::vocab::{COMMENT_KEY, MAPPINGS_KEY, REQUIRED_VOCABULARIES};

static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid term pattern"));

const ENTRY_PROPERTIES: [&str; 2] = ["relation", "target"];

/// Checks mapping sets for one set of required vocabularies
#[derive(Debug, Clone)]
pub struct MappingValidator {
    pub required_vocabularies: Vec<String>,
}

impl Default for MappingValidator {
    fn default() -> Self {
        Self::new(REQUIRED_VOCABULARIES)
    }
}

impl MappingValidator {
    pub fn new<I, S>(required_vocabularies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_vocabularies: required_vocabularies.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate one mapping set. An empty result means it is valid.
    pub fn validate(&self, mapping_set: &Value, valid_namespaces: &BTreeSet<String>) -> Vec<String> {
        let mut errors = Vec::new();

        let Some(map) = mapping_set.as_object() else {
            errors.push(format!(
                "x-mappings must be an object, got {}",
                type_name(mapping_set)
            ));
            return errors;
        };

        for vocab in &self.required_vocabularies {
            if !map.contains_key(vocab) {
                errors.push(format!("Missing required vocabulary: {}", vocab));
            }
        }

        let mut unexpected: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|k| *k != COMMENT_KEY && !self.required_vocabularies.iter().any(|v| v == k))
            .collect();
        if !unexpected.is_empty() {
            unexpected.sort_unstable();
            errors.push(format!("Unexpected vocabularies: {}", unexpected.join(", ")));
        }

        for vocab in &self.required_vocabularies {
            match map.get(vocab) {
                None => {}
                Some(Value::Array(entries)) => {
                    if entries.is_empty() {
                        errors.push(format!("{}: array must have at least 1 item", vocab));
                    }
                    for (idx, entry) in entries.iter().enumerate() {
                        let label = format!("{}[{}]", vocab, idx);
                        errors.extend(validate_entry(entry, &label, valid_namespaces));
                    }
                }
                Some(entry) => errors.extend(validate_entry(entry, vocab, valid_namespaces)),
            }
        }

        errors
    }
}

/// Validate a mapping set with the QUADRIGA required vocabularies
pub fn validate(mapping_set: &Value, valid_namespaces: &BTreeSet<String>) -> Vec<String> {
    MappingValidator::default().validate(mapping_set, valid_namespaces)
}

/// Validate a single mapping entry; `label` locates it in messages (`dc`, `schema[1]`)
pub fn validate_entry(entry: &Value, label: &str, valid_namespaces: &BTreeSet<String>) -> Vec<String> {
    let mut errors = Vec::new();

    let obj = match entry {
        Value::Null => return errors,
        Value::Object(obj) => obj,
        other => {
            errors.push(format!(
                "{}: must be null or an object, got {}",
                label,
                type_name(other)
            ));
            return errors;
        }
    };

    if !obj.contains_key("relation") {
        errors.push(format!("{}: missing required property 'relation'", label));
    }
    if !obj.contains_key("target") {
        errors.push(format!("{}: missing required property 'target'", label));
    }

    let mut extra: Vec<&str> = obj
        .keys()
        .map(String::as_str)
        .filter(|k| !ENTRY_PROPERTIES.contains(k))
        .collect();
    if !extra.is_empty() {
        extra.sort_unstable();
        errors.push(format!("{}: unexpected properties: {}", label, extra.join(", ")));
    }

    match obj.get("relation") {
        None => {}
        Some(Value::String(relation)) => {
            if Relation::from_curie(relation).is_none() {
                let allowed: Vec<&str> = Relation::ALL.iter().map(|r| r.as_curie()).collect();
                errors.push(format!(
                    "{}.relation: invalid value '{}', must be one of {}",
                    label,
                    relation,
                    allowed.join(", ")
                ));
            }
        }
        Some(_) => errors.push(format!("{}.relation: must be a string", label)),
    }

    match obj.get("target") {
        None => {}
        Some(Value::String(target)) => {
            if let Some(error) = check_target(target, label, valid_namespaces) {
                errors.push(error);
            }
        }
        Some(_) => errors.push(format!("{}.target: must be a string", label)),
    }

    errors
}

fn check_target(target: &str, label: &str, valid_namespaces: &BTreeSet<String>) -> Option<String> {
    if is_absolute_uri(target) {
        return None;
    }

    let Some((namespace, term)) = target.split_once(':') else {
        return Some(format!(
            "{}.target: '{}' must be either a namespace:term format (e.g. 'dc:title') \
             or a full URI (e.g. 'https://...')",
            label, target
        ));
    };

    if term.is_empty() {
        Some(format!(
            "{}.target: '{}' is missing the term part after ':'",
            label, target
        ))
    } else if !valid_namespaces.contains(namespace) {
        let known: Vec<&str> = valid_namespaces.iter().map(String::as_str).collect();
        Some(format!(
            "{}.target: namespace '{}' in '{}' is not defined in @context. Valid namespaces: {}",
            label,
            namespace,
            target,
            known.join(", ")
        ))
    } else if !TERM_PATTERN.is_match(term) {
        Some(format!(
            "{}.target: term '{}' in '{}' must contain only letters",
            label, term, target
        ))
    } else {
        None
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validation findings of one schema file
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: String,
    pub errors: Vec<String>,
}

/// Outcome of validating one or more schema directories
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationSummary {
    pub files_checked: usize,
    pub files_with_mappings: usize,
    pub files_valid: usize,
    pub total_errors: usize,
    /// Files with at least one error, in listing order
    pub reports: Vec<FileReport>,
}

impl ValidationSummary {
    pub fn files_with_errors(&self) -> usize {
        self.files_with_mappings - self.files_valid
    }

    pub fn is_valid(&self) -> bool {
        self.total_errors == 0
    }

    pub fn merge(&mut self, other: ValidationSummary) {
        self.files_checked += other.files_checked;
        self.files_with_mappings += other.files_with_mappings;
        self.files_valid += other.files_valid;
        self.total_errors += other.total_errors;
        self.reports.extend(other.reports);
    }
}

/// Namespaces declared in the root schema's `@context`; empty if there is no root
pub fn load_namespaces(
    cache: &mut SchemaCache<'_>,
    root: &str,
) -> Result<BTreeSet<String>, MappingError> {
    if !cache.source().list()?.iter().any(|f| f == root) {
        return Ok(BTreeSet::new());
    }
    let document = cache.get(root)?;
    Ok(Context::from_document(&document).namespaces())
}

/// Validate the document-level mapping set of every schema file of a source
pub fn validate_directory(
    source: &dyn SchemaSource,
    root: &str,
    validator: &MappingValidator,
) -> Result<ValidationSummary, MappingError> {
    let mut cache = SchemaCache::new(source);
    let namespaces = load_namespaces(&mut cache, root)?;
    if namespaces.is_empty() {
        tracing::warn!(
            root = %source.describe(root),
            "no @context found, every prefixed target will be reported"
        );
    }

    let mut summary = ValidationSummary::default();
    for filename in source.list()? {
        summary.files_checked += 1;
        let document = cache.get(&filename)?;
        let Some(mapping_set) = document.get(MAPPINGS_KEY) else {
            continue;
        };

        summary.files_with_mappings += 1;
        let errors = validator.validate(mapping_set, &namespaces);
        if errors.is_empty() {
            summary.files_valid += 1;
        } else {
            summary.total_errors += errors.len();
            summary.reports.push(FileReport {
                path: source.describe(&filename),
                errors,
            });
        }
    }

    Ok(summary)
}
