//! Mapping file: target schema plus editable mapping rules
//!
//! The mapping file is plain JSON so it can be written by hand or saved from
//! an editing session:
//!
//! ```json
//! {
//!   "schema": ["full_name", "department"],
//!   "rules": [
//!     { "target_column": "full_name", "source_columns": "fname,lname", "action": "combine" },
//!     { "target_column": "department", "source_columns": "dept1,dept2", "action": "separate" }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::mapping::{split_source_columns, Action, MappingRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A rule as edited by a user: source columns kept as the raw comma list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Target column name
    #[serde(default)]
    pub target_column: String,
    /// Comma-separated source column names
    #[serde(default)]
    pub source_columns: String,
    #[serde(default)]
    pub action: Action,
}

impl RuleEntry {
    /// Create a new rule entry
    pub fn new(
        target_column: impl Into<String>,
        source_columns: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            target_column: target_column.into(),
            source_columns: source_columns.into(),
            action,
        }
    }

    /// Default rule for a target column: no source columns, normal action
    pub fn for_target(target_column: impl Into<String>) -> Self {
        Self::new(target_column, "", Action::Normal)
    }

    /// Parse `target:columns:action`; the action defaults to normal
    pub fn parse_spec(spec: &str) -> Result<Self> {
        let mut parts = spec.splitn(3, ':');
        let target = parts.next().unwrap_or_default().trim();
        let columns = parts.next().unwrap_or_default();
        let action = match parts.next() {
            Some(a) => a.parse()?,
            None => Action::Normal,
        };
        Ok(Self::new(target, columns, action))
    }

    /// Resolve into an engine rule
    pub fn to_rule(&self) -> MappingRule {
        MappingRule {
            target_column: self.target_column.clone(),
            source_columns: split_source_columns(&self.source_columns),
            action: self.action,
        }
    }
}

/// Target schema and mapping rules
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Ordered target column names
    #[serde(default)]
    pub schema: Vec<String>,
    /// Mapping rules, usually one per target column
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl MappingConfig {
    /// Create a config with one default rule per target column
    pub fn new(schema: Vec<String>) -> Self {
        let rules = schema.iter().map(RuleEntry::for_target).collect();
        Self { schema, rules }
    }

    /// Create a config from a comma-separated schema, trimming each name
    pub fn from_schema_str(schema: &str) -> Self {
        Self::new(parse_schema(schema))
    }

    /// Drop all rules and recreate the defaults for the current schema
    pub fn reset_rules(&mut self) {
        self.rules = self.schema.iter().map(RuleEntry::for_target).collect();
    }

    /// Resolve all entries into engine rules
    pub fn rules(&self) -> Vec<MappingRule> {
        self.rules.iter().map(RuleEntry::to_rule).collect()
    }

    /// Target columns that no rule writes to
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.schema
            .iter()
            .filter(|c| !self.rules.iter().any(|r| &r.target_column == *c))
            .map(String::as_str)
            .collect()
    }

    /// Rule targets that are not part of the schema
    pub fn unknown_targets(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.target_column.as_str())
            .filter(|t| !self.schema.iter().any(|c| c == *t))
            .collect()
    }

    /// Parse a mapping file from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(Error::Json)
    }

    /// Load a mapping file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Save the mapping file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Split a comma-separated schema into trimmed target column names
pub fn parse_schema(schema: &str) -> Vec<String> {
    schema.split(',').map(|c| c.trim().to_string()).collect()
}
