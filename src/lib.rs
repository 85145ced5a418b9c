//! QUADRIGA x-mappings Library
//!
//! Tools for documenting and checking the cross-vocabulary mappings
//! (`x-mappings`) declared in the QUADRIGA family of JSON Schema files.
//!
//! # Overview
//!
//! Each schema file, and each of its properties, may carry a mapping set
//! relating the element to terms of external vocabularies (Dublin Core,
//! schema.org, LRMI, ...) through SKOS mapping relations. This library:
//!
//! 1. Walks the schema files of a version directory in documentation order,
//!    following document `$ref`s, property references and `items.$ref`
//! 2. Emits a flat list of depth-annotated rows with the mappings found at
//!    each node
//! 3. Resolves `prefix:term` targets through the root schema's `@context`
//! 4. Validates mapping sets against the x-mappings meta-schema, reporting
//!    every violation of a file together
//!
//! # Usage
//!
//! ## Build the mapping matrix of a version directory
//!
//! ```ignore
//! use quadriga_mappings::{walk, DirectorySource, MappingMatrix, WalkOptions};
//!
//! let source = DirectorySource::new("v1.0.0")?;
//! let result = walk(&source, &WalkOptions::quadriga())?;
//! let matrix = MappingMatrix::build(&result);
//!
//! println!("{}", matrix.to_json_string(true)?);
//! ```
//!
//! ## Validate the mappings of a version directory
//!
//! ```ignore
//! use quadriga_mappings::{validate_directory, DirectorySource, MappingValidator, ROOT_SCHEMA};
//!
//! let source = DirectorySource::new("v1.0.0")?;
//! let summary = validate_directory(&source, ROOT_SCHEMA, &MappingValidator::default())?;
//! for report in &summary.reports {
//!     println!("{}: {:?}", report.path, report.errors);
//! }
//! ```

pub mod collect;
pub mod context;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod matrix;
pub mod validate;
pub mod vocab;
pub mod walk;

// Re-export main types for convenience
pub use crate::context::{resolve, Context};
pub use crate::error::MappingError;
pub use crate::loader::{
    discover_version_dirs, parse_document, DirectorySource, MemorySource, SchemaCache,
    SchemaSource,
};
pub use crate::mapping::{MappingCell, MappingEntry, MappingSet, Relation};
pub use crate::matrix::{MappingMatrix, MatrixCell, MatrixEntry, MatrixRow};
pub use crate::validate::{
    validate, validate_directory, FileReport, MappingValidator, ValidationSummary,
};
pub use crate::vocab::{COLUMN_ORDER, REQUIRED_VOCABULARIES, ROOT_LABEL, ROOT_SCHEMA};
pub use crate::walk::{walk, SchemaWalk, TraversalRow, WalkOptions, WalkStats};
