//! Editing session: loaded CSV, mapping config and the last computed preview
//!
//! A session follows the interactive workflow of a mapping tool: load a file,
//! describe the target schema, edit rules, preview, export. Loading data or
//! changing the schema resets the rules to one default rule per target column.

use crate::config::{parse_schema, MappingConfig, RuleEntry};
use crate::engine::transform;
use crate::error::{Error, Result};
use crate::export::encode_csv;
use crate::mapping::Action;
use crate::parser::{parse_csv, parse_csv_str};
use crate::table::{OutputRow, SourceTable};
use std::path::Path;

/// A single change to a mapping rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEdit {
    Target(String),
    Columns(String),
    Action(Action),
}

/// Caller-owned mapping state
#[derive(Debug, Clone, Default)]
pub struct Session {
    table: Option<SourceTable>,
    config: MappingConfig,
    preview: Vec<OutputRow>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a decoded table and reset the rules to the schema defaults
    pub fn load_table(&mut self, table: SourceTable) {
        tracing::info!(
            source = %table.source_path.display(),
            rows = table.row_count(),
            "loaded source table"
        );
        self.table = Some(table);
        self.config.reset_rules();
        self.preview.clear();
    }

    /// Decode CSV text and load it
    pub fn load_csv_str(&mut self, content: &str, source_name: &str) -> Result<()> {
        let table = parse_csv_str(content, source_name)?;
        self.load_table(table);
        Ok(())
    }

    /// Decode a CSV file and load it
    pub fn load_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let table = parse_csv(path)?;
        self.load_table(table);
        Ok(())
    }

    /// Replace the schema from comma-separated text and reset the rules
    pub fn set_schema(&mut self, schema: &str) {
        self.config.schema = parse_schema(schema);
        self.config.reset_rules();
    }

    /// Replace the whole mapping config, keeping it as given
    pub fn set_config(&mut self, config: MappingConfig) {
        self.config = config;
    }

    /// Append an empty normal rule
    pub fn add_rule(&mut self) {
        self.config.rules.push(RuleEntry::default());
    }

    /// Remove a rule; the last remaining rule cannot be removed
    pub fn remove_rule(&mut self, index: usize) -> Result<RuleEntry> {
        self.check_index(index)?;
        if self.config.rules.len() == 1 {
            return Err(Error::LastRule);
        }
        Ok(self.config.rules.remove(index))
    }

    /// Change one field of a rule
    pub fn update_rule(&mut self, index: usize, edit: RuleEdit) -> Result<()> {
        self.check_index(index)?;
        let rule = &mut self.config.rules[index];
        match edit {
            RuleEdit::Target(target) => rule.target_column = target,
            RuleEdit::Columns(columns) => rule.source_columns = columns,
            RuleEdit::Action(action) => rule.action = action,
        }
        Ok(())
    }

    /// Recompute the preview from the loaded rows and current rules
    pub fn run_preview(&mut self) -> Result<&[OutputRow]> {
        let table = self.table.as_ref().ok_or(Error::NoData)?;
        self.preview = transform(&table.rows, &self.config.rules());
        Ok(&self.preview)
    }

    /// Encode the last preview as CSV
    pub fn export_csv(&self) -> Result<String> {
        encode_csv(&self.preview)
    }

    /// Source headers of the loaded table
    pub fn headers(&self) -> &[String] {
        self.table.as_ref().map(|t| t.headers.as_slice()).unwrap_or(&[])
    }

    /// Columns shown in an on-screen preview: the target schema
    pub fn preview_columns(&self) -> &[String] {
        &self.config.schema
    }

    pub fn table(&self) -> Option<&SourceTable> {
        self.table.as_ref()
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    pub fn preview(&self) -> &[OutputRow] {
        &self.preview
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.config.rules.len();
        if index >= len {
            return Err(Error::RuleIndex { index, len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: &str = "fname,lname,dept1,dept2\nAnn,Lee,Eng,QA\nBob,Ray,Ops,HR\n";

    fn loaded() -> Session {
        let mut session = Session::new();
        session.load_csv_str(PEOPLE, "people.csv").unwrap();
        session.set_schema("full_name, department");
        session
    }

    #[test]
    fn test_load_exposes_headers() {
        let session = loaded();
        assert_eq!(session.headers(), ["fname", "lname", "dept1", "dept2"]);
        assert_eq!(session.table().unwrap().row_count(), 2);
    }

    #[test]
    fn test_set_schema_resets_rules() {
        let session = loaded();
        assert_eq!(session.preview_columns(), ["full_name", "department"]);
        assert_eq!(session.config().rules.len(), 2);
        assert_eq!(session.config().rules[1], RuleEntry::for_target("department"));
    }

    #[test]
    fn test_load_resets_rules_and_preview() {
        let mut session = loaded();
        session.update_rule(0, RuleEdit::Columns("fname".into())).unwrap();
        session.run_preview().unwrap();
        assert!(!session.preview().is_empty());

        session.load_csv_str(PEOPLE, "again.csv").unwrap();
        assert!(session.preview().is_empty());
        assert_eq!(session.config().rules[0].source_columns, "");
    }

    #[test]
    fn test_preview_requires_data() {
        let mut session = Session::new();
        assert!(matches!(session.run_preview(), Err(Error::NoData)));
    }

    #[test]
    fn test_full_workflow() {
        let mut session = loaded();
        session.update_rule(0, RuleEdit::Columns("fname,lname".into())).unwrap();
        session.update_rule(0, RuleEdit::Action(Action::Combine)).unwrap();
        session.update_rule(1, RuleEdit::Columns("dept1, dept2".into())).unwrap();
        session.update_rule(1, RuleEdit::Action(Action::Separate)).unwrap();

        let preview = session.run_preview().unwrap();
        let ids: Vec<&str> = preview.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Eng-Ann Lee", "QA-Ann Lee", "Ops-Bob Ray", "HR-Bob Ray"]);

        let csv = session.export_csv().unwrap();
        assert!(csv.starts_with("department,full_name,id\n"));
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn test_add_and_remove_rules() {
        let mut session = loaded();
        session.add_rule();
        assert_eq!(session.config().rules.len(), 3);
        assert_eq!(session.config().rules[2], RuleEntry::new("", "", Action::Normal));

        let removed = session.remove_rule(0).unwrap();
        assert_eq!(removed.target_column, "full_name");
        session.remove_rule(0).unwrap();
        assert!(matches!(session.remove_rule(0), Err(Error::LastRule)));
    }

    #[test]
    fn test_rule_index_out_of_range() {
        let mut session = loaded();
        assert!(matches!(
            session.update_rule(5, RuleEdit::Target("x".into())),
            Err(Error::RuleIndex { index: 5, len: 2 })
        ));
        assert!(matches!(
            session.remove_rule(2),
            Err(Error::RuleIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_set_config_keeps_rules() {
        let mut config = MappingConfig::from_schema_str("first");
        config.rules[0] = RuleEntry::new("first", "fname", Action::Normal);

        let mut session = Session::new();
        session.load_csv_str(PEOPLE, "people.csv").unwrap();
        session.set_config(config.clone());
        assert_eq!(session.config(), &config);

        let preview = session.run_preview().unwrap();
        assert_eq!(preview[1].get("first"), Some("Bob"));
    }
}
