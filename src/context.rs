//! Namespace context of a schema family
//!
//! The root schema carries an `@context` object mapping prefixes to base
//! URIs. The walker uses it to turn `prefix:term` targets into links and
//! the validator uses its keys as the set of known namespaces.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

use crate::vocab::CONTEXT_KEY;

/// Prefix table loaded from a root schema document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    /// Prefix -> base URI. `None` for entries whose value is not a string
    /// (term definitions): the prefix is known but cannot be expanded.
    prefixes: BTreeMap<String, Option<String>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the `@context` object of a root document.
    ///
    /// A missing or non-object `@context` yields an empty context.
    pub fn from_document(document: &Value) -> Self {
        let mut context = Context::new();
        let Some(Value::Object(map)) = document.get(CONTEXT_KEY) else {
            return context;
        };

        for (prefix, value) in map {
            match value.as_str() {
                Some(base) => {
                    if Url::parse(base).is_err() {
                        tracing::warn!(prefix = %prefix, base = %base, "context base is not an absolute URL");
                    }
                    context.add_prefix(prefix, base);
                }
                None => {
                    context.prefixes.insert(prefix.clone(), None);
                }
            }
        }
        context
    }

    pub fn add_prefix(&mut self, prefix: &str, base: &str) {
        self.prefixes
            .insert(prefix.to_string(), Some(base.to_string()));
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains_key(prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// All declared prefixes, expandable or not
    pub fn namespaces(&self) -> BTreeSet<String> {
        self.prefixes.keys().cloned().collect()
    }

    /// Base URI of a prefix, if it has a non-empty one
    pub fn base(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .get(prefix)
            .and_then(|b| b.as_deref())
            .filter(|b| !b.is_empty())
    }

    /// See [`resolve`]
    pub fn resolve(&self, reference: &str) -> String {
        resolve(reference, self)
    }
}

/// Whether a reference already is an absolute web URI
pub fn is_absolute_uri(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Expand a reference to a full URI.
///
/// Absolute URIs are returned unchanged and `prefix:term` references are
/// expanded through the context. Anything that cannot be expanded yields an
/// empty string; callers render it as plain text.
pub fn resolve(reference: &str, context: &Context) -> String {
    if reference.is_empty() {
        return String::new();
    }
    if is_absolute_uri(reference) {
        return reference.to_string();
    }
    match reference.split_once(':') {
        Some((prefix, local)) => context
            .base(prefix)
            .map(|base| format!("{}{}", base, local))
            .unwrap_or_default(),
        None => String::new(),
    }
}
