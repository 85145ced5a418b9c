//! Mapping sets (`x-mappings`) and their entries
//!
//! A mapping set relates a schema element to terms of external
//! vocabularies. Each vocabulary key holds `null` (explicitly not mapped),
//! one entry object or a list of entry objects.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::{resolve, Context};
use crate::vocab::COMMENT_KEY;

/// SKOS mapping relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Relation {
    #[serde(rename = "skos:exactMatch")]
    ExactMatch,
    #[serde(rename = "skos:closeMatch")]
    CloseMatch,
    #[serde(rename = "skos:broadMatch")]
    BroadMatch,
    #[serde(rename = "skos:narrowMatch")]
    NarrowMatch,
    #[serde(rename = "skos:relatedMatch")]
    RelatedMatch,
}

impl Relation {
    pub const ALL: [Relation; 5] = [
        Relation::ExactMatch,
        Relation::CloseMatch,
        Relation::BroadMatch,
        Relation::NarrowMatch,
        Relation::RelatedMatch,
    ];

    pub fn from_curie(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_curie() == value)
    }

    pub fn as_curie(&self) -> &'static str {
        match self {
            Relation::ExactMatch => "skos:exactMatch",
            Relation::CloseMatch => "skos:closeMatch",
            Relation::BroadMatch => "skos:broadMatch",
            Relation::NarrowMatch => "skos:narrowMatch",
            Relation::RelatedMatch => "skos:relatedMatch",
        }
    }

    /// Name without the `skos:` prefix, e.g. `exactMatch`
    pub fn local_name(&self) -> &'static str {
        &self.as_curie()["skos:".len()..]
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_curie())
    }
}

/// One mapping of an element to a vocabulary term, read leniently.
///
/// Conformance is the validator's business; here missing or mistyped
/// fields simply come out as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingEntry {
    pub relation: Option<String>,
    pub target: Option<String>,
    pub comment: Option<String>,
}

impl MappingEntry {
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(|v| v.as_str()).map(String::from);
        Self {
            relation: text("relation"),
            target: text("target"),
            comment: text(COMMENT_KEY),
        }
    }

    /// The relation, if it is one of the five known ones
    pub fn known_relation(&self) -> Option<Relation> {
        self.relation.as_deref().and_then(Relation::from_curie)
    }

    /// Target expanded to a full URI, empty when it cannot be resolved
    pub fn resolved_target(&self, context: &Context) -> String {
        self.target
            .as_deref()
            .map(|t| resolve(t, context))
            .unwrap_or_default()
    }
}

/// What a mapping set says about one vocabulary
#[derive(Debug, Clone, PartialEq)]
pub enum MappingCell {
    /// Vocabulary absent or explicitly `null`
    NotApplicable,
    /// One or more mapping entries, in declaration order
    Entries(Vec<MappingEntry>),
}

/// The `x-mappings` object of a schema or property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MappingSet(Map<String, Value>);

impl MappingSet {
    /// Wrap a raw `x-mappings` value; anything but an object is not a mapping set
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|map| Self(map.clone()))
    }

    /// Vocabulary keys in declaration order (reserved `$` keys excluded)
    pub fn vocabularies(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str).filter(|k| !k.starts_with('$'))
    }

    /// General `$comment` documenting the whole mapping set
    pub fn comment(&self) -> Option<&str> {
        self.0.get(COMMENT_KEY).and_then(|c| c.as_str())
    }

    pub fn cell(&self, vocabulary: &str) -> MappingCell {
        match self.0.get(vocabulary) {
            None | Some(Value::Null) => MappingCell::NotApplicable,
            Some(Value::Array(items)) => {
                MappingCell::Entries(items.iter().map(MappingEntry::from_value).collect())
            }
            Some(other) => MappingCell::Entries(vec![MappingEntry::from_value(other)]),
        }
    }
}
