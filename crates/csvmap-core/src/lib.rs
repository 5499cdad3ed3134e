//! csvmap-core: Core library for mapping CSV columns onto a target schema
//!
//! This library provides functionality to:
//! - Parse CSV files into header-keyed source rows
//! - Describe a target schema and per-column mapping rules (normal, combine, separate)
//! - Transform source rows into output rows, fanning rows out for separate rules
//! - Export the mapped rows as CSV or JSON

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod mapping;
pub mod parser;
pub mod session;
pub mod table;

pub use config::{MappingConfig, RuleEntry};
pub use engine::{map_row, transform};
pub use error::{Error, Result};
pub use export::{encode_csv, encode_json, write_csv, DEFAULT_EXPORT_NAME};
pub use mapping::{Action, MappingRule};
pub use parser::{parse_csv, parse_csv_str};
pub use session::{RuleEdit, Session};
pub use table::{OutputRow, SourceRow, SourceTable};
