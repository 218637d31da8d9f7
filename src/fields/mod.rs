//! Field definitions.
//!
//! # Data Flow
//! ```text
//! fields location (directory with index.json, or a .json file)
//!     → FieldSet::load (parse definitions)
//!     → global set merged with the route's set (route wins)
//!     → wizard submit handler validates posted values
//! ```

pub mod validators;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use validators::Validator;

/// File read from a fields directory.
pub const INDEX_FILE: &str = "index.json";

/// Errors raised while loading field definitions.
#[derive(Debug, Error)]
pub enum FieldsError {
    #[error("Cannot read fields at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid field definitions in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// How a single field is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldDefinition {
    pub validate: Vec<Validator>,

    /// Accepted values. Empty means any value.
    pub options: Vec<String>,
}

/// Find the fields location for `path`.
///
/// A directory or file at `path` is used as is; otherwise `<path>.json`.
pub fn locate(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    let with_extension = path.with_extension("json");
    with_extension.is_file().then_some(with_extension)
}

/// Named field definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: HashMap<String, FieldDefinition>,
}

impl FieldSet {
    /// Load definitions from a located fields path.
    ///
    /// A directory without an index file holds no definitions.
    pub fn load(location: &Path) -> Result<Self, FieldsError> {
        let file = if location.is_dir() {
            let index = location.join(INDEX_FILE);
            if !index.is_file() {
                tracing::debug!(path = %location.display(), "No field index, using empty definitions");
                return Ok(Self::default());
            }
            index
        } else {
            location.to_path_buf()
        };

        let content = fs::read_to_string(&file).map_err(|source| FieldsError::Io {
            path: file.clone(),
            source,
        })?;
        let fields: HashMap<String, FieldDefinition> =
            serde_json::from_str(&content).map_err(|source| FieldsError::Parse {
                path: file.clone(),
                source,
            })?;

        tracing::debug!(path = %file.display(), count = fields.len(), "Loaded field definitions");
        Ok(Self { fields })
    }

    /// Load and merge several locations; later ones override earlier ones.
    pub fn load_all(locations: &[PathBuf]) -> Result<Self, FieldsError> {
        let mut set = Self::default();
        for location in locations {
            set.extend(Self::load(location)?);
        }
        Ok(set)
    }

    pub fn extend(&mut self, other: FieldSet) {
        self.fields.extend(other.fields);
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: FieldDefinition) {
        self.fields.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate the named fields in `values`.
    ///
    /// Returns field name to the name of the first failing check. Fields
    /// without a definition accept anything.
    pub fn validate(&self, names: &[String], values: &HashMap<String, String>) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        for name in names {
            let Some(definition) = self.fields.get(name) else {
                continue;
            };
            let value = values.get(name).map(String::as_str).unwrap_or("");

            if let Some(failed) = definition.validate.iter().find(|v| !v.check(value)) {
                errors.insert(name.clone(), failed.name().to_string());
                continue;
            }
            let value = value.trim();
            if !value.is_empty()
                && !definition.options.is_empty()
                && !definition.options.iter().any(|o| o == value)
            {
                errors.insert(name.clone(), "options".to_string());
            }
        }
        errors
    }
}
