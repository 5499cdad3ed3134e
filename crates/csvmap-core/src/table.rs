//! Row and table types for source and mapped data

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// Name of the derived identifier column on every output row
pub const ID_COLUMN: &str = "id";

/// Separator used when joining field values into the row identifier
pub const ID_SEPARATOR: &str = "-";

/// A decoded CSV file: header names plus rows in file order
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// Header names, in file order
    pub headers: Vec<String>,
    /// Row data
    pub rows: Vec<SourceRow>,
    /// Source file path (or a name for in-memory input)
    pub source_path: PathBuf,
}

impl SourceTable {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether a header exists
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// One input record keyed by source column name
///
/// A key that is not present is a missing value, which is distinct from an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    values: IndexMap<String, String>,
}

impl SourceRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    /// Look up a column; `None` when the column is absent
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = SourceRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// One mapped record
///
/// Fields keep the order in which the engine wrote them. A field whose value
/// is `None` was mapped from a source column that did not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    /// Target column -> value
    pub fields: IndexMap<String, Option<String>>,
    /// Field values joined with `-`
    pub id: String,
}

impl OutputRow {
    /// Build a row and derive its identifier from the field values
    pub fn new(fields: IndexMap<String, Option<String>>) -> Self {
        let id = fields
            .values()
            .map(|v| v.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(ID_SEPARATOR);
        Self { fields, id }
    }

    /// Exported columns: field keys followed by `id`
    ///
    /// A target column literally named `id` is overwritten in place by the
    /// identifier instead of producing a second column.
    pub fn columns(&self) -> Vec<&str> {
        self.record().keys().copied().collect()
    }

    /// Value of an exported column; `None` for missing or unknown columns
    pub fn get(&self, column: &str) -> Option<&str> {
        if column == ID_COLUMN {
            return Some(self.id.as_str());
        }
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    /// Flat view of the row as exported
    pub fn record(&self) -> IndexMap<&str, Option<&str>> {
        let mut record: IndexMap<&str, Option<&str>> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
            .collect();
        record.insert(ID_COLUMN, Some(self.id.as_str()));
        record
    }
}

impl Serialize for OutputRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}
