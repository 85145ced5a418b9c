//! Schema sources and the per-run document cache

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::MappingError;
use crate::vocab::SCHEMA_EXTENSION;

/// Where schema files come from
pub trait SchemaSource {
    /// Human-readable location of a file, used in error messages and reports
    fn describe(&self, filename: &str) -> String;

    /// Raw contents of a schema file
    fn read(&self, filename: &str) -> Result<String, MappingError>;

    /// All schema file names of the source, sorted
    fn list(&self) -> Result<Vec<String>, MappingError>;
}

/// Schema files in one directory of the filesystem (e.g. `v1.0.0/`)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, MappingError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(MappingError::InvalidPath(dir));
        }
        Ok(Self { dir })
    }
}

impl SchemaSource for DirectorySource {
    fn describe(&self, filename: &str) -> String {
        self.dir.join(filename).display().to_string()
    }

    fn read(&self, filename: &str) -> Result<String, MappingError> {
        let path = self.dir.join(filename);
        fs::read_to_string(&path).map_err(|e| MappingError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn list(&self) -> Result<Vec<String>, MappingError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| MappingError::LoadError {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(SCHEMA_EXTENSION) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Schema files held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file from its raw text
    pub fn insert(&mut self, filename: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(filename.into(), contents.into());
    }

    /// Add a file from a JSON value
    pub fn with_json(mut self, filename: &str, document: Value) -> Self {
        self.insert(filename, document.to_string());
        self
    }
}

impl SchemaSource for MemorySource {
    fn describe(&self, filename: &str) -> String {
        filename.to_string()
    }

    fn read(&self, filename: &str) -> Result<String, MappingError> {
        self.files
            .get(filename)
            .cloned()
            .ok_or_else(|| MappingError::LoadError {
                path: filename.to_string(),
                reason: "No such schema file".to_string(),
            })
    }

    fn list(&self) -> Result<Vec<String>, MappingError> {
        Ok(self.files.keys().cloned().collect())
    }
}

/// Parse a schema document, reporting the offending location on failure
pub fn parse_document(content: &str, origin: &str) -> Result<Value, MappingError> {
    serde_json::from_str(content).map_err(|e| MappingError::ParseError {
        path: origin.to_string(),
        reason: e.to_string(),
    })
}

/// Documents of one run, keyed by file name. Each file is read and parsed
/// at most once and never changes afterwards.
pub struct SchemaCache<'a> {
    source: &'a dyn SchemaSource,
    documents: HashMap<String, Rc<Value>>,
}

impl<'a> SchemaCache<'a> {
    pub fn new(source: &'a dyn SchemaSource) -> Self {
        Self {
            source,
            documents: HashMap::new(),
        }
    }

    pub fn source(&self) -> &'a dyn SchemaSource {
        self.source
    }

    pub fn get(&mut self, filename: &str) -> Result<Rc<Value>, MappingError> {
        if let Some(document) = self.documents.get(filename) {
            return Ok(Rc::clone(document));
        }

        let content = self.source.read(filename)?;
        let document = Rc::new(parse_document(&content, &self.source.describe(filename))?);
        self.documents
            .insert(filename.to_string(), Rc::clone(&document));
        Ok(document)
    }

    /// Number of distinct files loaded so far
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Subdirectories of `base` holding one schema version each (`v1.0.0`, ...), sorted
pub fn discover_version_dirs(base: &Path) -> Result<Vec<PathBuf>, MappingError> {
    if !base.is_dir() {
        return Err(MappingError::InvalidPath(base.to_path_buf()));
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(base)?.flatten() {
        let is_version = entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('v'))
            .unwrap_or(false);
        if is_version && entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
