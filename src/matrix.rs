//! Mapping matrix document
//!
//! Turns a [`SchemaWalk`] into the table a documentation renderer needs:
//! ordered vocabulary columns and one record per traversal row, with
//! targets already resolved through the root context.

use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

use crate::context::Context;
use crate::error::MappingError;
use crate::mapping::{MappingCell, MappingEntry, MappingSet};
use crate::walk::{SchemaWalk, TraversalRow};

/// One mapping inside a cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixEntry {
    /// Relation as written, e.g. `skos:exactMatch`
    pub relation: Option<String>,
    /// Relation without prefix, e.g. `exactMatch`; `None` for unknown relations
    pub relation_name: Option<&'static str>,
    pub target: Option<String>,
    /// Resolved target, present only when it forms a valid URL
    pub link: Option<String>,
    pub comment: Option<String>,
}

impl MatrixEntry {
    fn from_entry(entry: MappingEntry, context: &Context) -> Self {
        let resolved = entry.resolved_target(context);
        let link = (!resolved.is_empty() && Url::parse(&resolved).is_ok()).then_some(resolved);
        Self {
            relation_name: entry.known_relation().map(|r| r.local_name()),
            relation: entry.relation,
            target: entry.target,
            link,
            comment: entry.comment,
        }
    }
}

/// Content of one vocabulary column of a row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatrixCell {
    NotApplicable,
    Mapped { entries: Vec<MatrixEntry> },
}

/// One row of the matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    pub name: String,
    pub depth: usize,
    pub source: String,
    /// General `$comment` of the row's mapping set
    pub comment: Option<String>,
    /// `None` for elements without any mapping set
    pub cells: Option<IndexMap<String, MatrixCell>>,
}

/// The whole matrix, ready for serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

impl MappingMatrix {
    pub fn build(walk: &SchemaWalk) -> Self {
        let columns = walk.columns();
        let rows = walk
            .rows
            .iter()
            .map(|row| build_row(row, &columns, &walk.context))
            .collect();
        Self { columns, rows }
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, MappingError> {
        if pretty {
            Ok(serde_json::to_string_pretty(self)?)
        } else {
            Ok(serde_json::to_string(self)?)
        }
    }
}

fn build_row(row: &TraversalRow, columns: &[String], context: &Context) -> MatrixRow {
    MatrixRow {
        name: row.name.clone(),
        depth: row.depth,
        source: row.source.clone(),
        comment: row
            .mappings
            .as_ref()
            .and_then(|m| m.comment())
            .map(String::from),
        cells: row
            .mappings
            .as_ref()
            .map(|set| build_cells(set, columns, context)),
    }
}

fn build_cells(
    set: &MappingSet,
    columns: &[String],
    context: &Context,
) -> IndexMap<String, MatrixCell> {
    columns
        .iter()
        .map(|column| {
            let cell = match set.cell(column) {
                MappingCell::NotApplicable => MatrixCell::NotApplicable,
                MappingCell::Entries(entries) => MatrixCell::Mapped {
                    entries: entries
                        .into_iter()
                        .map(|e| MatrixEntry::from_entry(e, context))
                        .collect(),
                },
            };
            (column.clone(), cell)
        })
        .collect()
}
