//! CSV and JSON encoders for mapped rows

use crate::error::{Error, Result};
use crate::table::OutputRow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name used when no output path is given
pub const DEFAULT_EXPORT_NAME: &str = "preview_data.csv";

/// Encode rows as CSV text with a header row
///
/// The header is taken from the first row's columns, so every row is written
/// against that column list. Missing values are written as empty cells.
pub fn encode_csv(rows: &[OutputRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_rows(&mut buf, rows, Path::new("<memory>"))?;
    Ok(String::from_utf8(buf)?)
}

/// Write rows as CSV to a file, returning the number of data rows written
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[OutputRow]) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows, path)?;
    writer.flush()?;
    Ok(rows.len())
}

/// Encode rows as a pretty-printed JSON array of flat objects
pub fn encode_json(rows: &[OutputRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

fn write_rows<W: Write>(out: W, rows: &[OutputRow], path: &Path) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let csv_err = |e: csv::Error| Error::Csv {
        path: PathBuf::from(path),
        source: e,
    };

    let header = first.columns();
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&header).map_err(csv_err)?;

    for row in rows {
        writer
            .write_record(header.iter().map(|c| row.get(c).unwrap_or("")))
            .map_err(csv_err)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::transform;
    use crate::mapping::{Action, MappingRule};
    use crate::parser::parse_csv_str;

    fn sample_rows() -> Vec<OutputRow> {
        let table = parse_csv_str(
            "fname,lname,dept1,dept2\nAnn,Lee,Eng,QA\n",
            "people.csv",
        )
        .unwrap();
        let rules = vec![
            MappingRule::new("full_name", "fname,lname", Action::Combine),
            MappingRule::new("department", "dept1,dept2", Action::Separate),
        ];
        transform(&table.rows, &rules)
    }

    #[test]
    fn test_encode_csv_includes_id_column() {
        let csv = encode_csv(&sample_rows()).unwrap();
        assert_eq!(
            csv,
            "department,full_name,id\nEng,Ann Lee,Eng-Ann Lee\nQA,Ann Lee,QA-Ann Lee\n"
        );
    }

    #[test]
    fn test_encode_csv_empty() {
        assert_eq!(encode_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_encode_csv_missing_and_quoting() {
        let table = parse_csv_str("a,b\n\"x, y\",\n", "t.csv").unwrap();
        let rules = vec![
            MappingRule::new("first", "a", Action::Normal),
            MappingRule::new("gone", "nope", Action::Normal),
        ];
        let csv = encode_csv(&transform(&table.rows, &rules)).unwrap();
        assert_eq!(csv, "first,gone,id\n\"x, y\",,\"x, y-\"\n");
    }

    #[test]
    fn test_encode_json_keeps_missing_as_null() {
        let table = parse_csv_str("a\n1\n", "t.csv").unwrap();
        let rules = vec![
            MappingRule::new("x", "a", Action::Normal),
            MappingRule::new("y", "b", Action::Normal),
        ];
        let json = encode_json(&transform(&table.rows, &rules)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["x"], "1");
        assert!(value[0]["y"].is_null());
        assert_eq!(value[0]["id"], "1-");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);

        let written = write_csv(&path, &sample_rows()).unwrap();
        assert_eq!(written, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("department,full_name,id\n"));
        assert_eq!(content.lines().count(), 3);
    }
}
