//! Vocabulary definitions for QUADRIGA x-mappings
//!
//! Keys, file names and ordering rules shared by the walker, the
//! validator and the mapping matrix.

/// Schema keyword holding a mapping set
pub const MAPPINGS_KEY: &str = "x-mappings";

/// Reserved documentation key inside mapping sets and mapping entries
pub const COMMENT_KEY: &str = "$comment";

/// Root document key holding the prefix table
pub const CONTEXT_KEY: &str = "@context";

/// JSON Schema reference keyword
pub const REF_KEY: &str = "$ref";

/// Root schema file of a version directory
pub const ROOT_SCHEMA: &str = "schema.json";

/// Display name used for the root schema in the QUADRIGA documentation
pub const ROOT_LABEL: &str = "case-study";

/// Extension of schema files
pub const SCHEMA_EXTENSION: &str = ".json";

/// Vocabularies every document-level mapping set must mention
pub const REQUIRED_VOCABULARIES: [&str; 6] = ["dc", "dcat", "dcterms", "lrmi", "modalia", "schema"];

/// Preferred column order; vocabularies not listed here follow alphabetically
pub const COLUMN_ORDER: [&str; 7] = ["dc", "dcterms", "schema", "modalia", "hermes", "lrmi", "dcat"];

/// Reusable value-type schemas that only constrain value ranges
pub const INTERNAL_TYPES: [&str; 2] = ["multilingual-text.json", "semver.json"];

/// Depth offset of a file referenced by a document-level `$ref`
pub const DOCUMENT_REF_OFFSET: usize = 1;

/// Depth offset of a property row relative to its schema file
pub const PROPERTY_ROW_OFFSET: usize = 1;

/// Depth offset of a file that is the direct `$ref` value of a property
pub const DIRECT_REF_OFFSET: usize = 1;

/// Depth offset of a file referenced inside a combinator or array wrapper of a property
pub const NESTED_REF_OFFSET: usize = 2;

/// Depth offset of the file behind `items.$ref` of an array-shaped schema
pub const ITEMS_REF_OFFSET: usize = 0;

/// Order vocabulary names for display: preferred ones first, the rest alphabetically
pub fn order_columns<'a>(vocabularies: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut present: Vec<&str> = vocabularies.into_iter().collect();
    present.sort_unstable();
    present.dedup();

    let mut ordered: Vec<String> = COLUMN_ORDER
        .iter()
        .filter(|c| present.contains(*c))
        .map(|c| c.to_string())
        .collect();
    ordered.extend(
        present
            .into_iter()
            .filter(|v| !COLUMN_ORDER.contains(v))
            .map(String::from),
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_columns_preferred_then_alphabetical() {
        let columns = order_columns(["zzz", "dcat", "dc", "abc", "schema"]);
        assert_eq!(columns, vec!["dc", "schema", "dcat", "abc", "zzz"]);
    }

    #[test]
    fn test_order_columns_deduplicates() {
        assert_eq!(order_columns(["dc", "dc"]), vec!["dc"]);
        assert!(order_columns([]).is_empty());
    }
}
