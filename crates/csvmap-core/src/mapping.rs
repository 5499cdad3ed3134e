//! Mapping rules linking target columns to source columns

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a rule turns its source columns into a target value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Copy the first listed source column
    #[default]
    Normal,
    /// Join all listed source columns with a space
    Combine,
    /// Fan the row out, one output row per listed source column
    Separate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Normal => "normal",
            Action::Combine => "combine",
            Action::Separate => "separate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Action::Normal, Action::Combine, Action::Separate]
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// A resolved rule as consumed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    /// Output field written by this rule
    pub target_column: String,
    /// Source columns read by this rule, in listed order
    pub source_columns: Vec<String>,
    pub action: Action,
}

impl MappingRule {
    /// Create a rule from a raw comma-separated column list
    pub fn new(target_column: impl Into<String>, source_columns: &str, action: Action) -> Self {
        Self {
            target_column: target_column.into(),
            source_columns: split_source_columns(source_columns),
            action,
        }
    }
}

/// Split a comma-separated column list, trimming each entry
///
/// An empty string yields a single empty column reference.
pub fn split_source_columns(raw: &str) -> Vec<String> {
    raw.split(',').map(|c| c.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_entries() {
        assert_eq!(split_source_columns("first, last ,mid"), vec!["first", "last", "mid"]);
    }

    #[test]
    fn test_split_empty_yields_single_empty() {
        assert_eq!(split_source_columns(""), vec![""]);
        assert_eq!(split_source_columns("  "), vec![""]);
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        assert_eq!(split_source_columns("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("normal".parse::<Action>().unwrap(), Action::Normal);
        assert_eq!("Combine".parse::<Action>().unwrap(), Action::Combine);
        assert_eq!(" SEPARATE ".parse::<Action>().unwrap(), Action::Separate);
        assert!(matches!(
            "split".parse::<Action>(),
            Err(Error::UnknownAction(name)) if name == "split"
        ));
    }

    #[test]
    fn test_action_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Separate).unwrap(), "\"separate\"");
        let action: Action = serde_json::from_str("\"combine\"").unwrap();
        assert_eq!(action, Action::Combine);
        assert!(serde_json::from_str::<Action>("\"explode\"").is_err());
    }

    #[test]
    fn test_rule_new_parses_columns() {
        let rule = MappingRule::new("full_name", "fname, lname", Action::Combine);
        assert_eq!(rule.source_columns, vec!["fname", "lname"]);
    }
}
