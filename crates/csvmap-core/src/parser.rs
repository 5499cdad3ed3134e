//! CSV decoder producing header-keyed source rows

use crate::error::{Error, Result};
use crate::table::{SourceRow, SourceTable};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Parse a CSV file into a SourceTable
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<SourceTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_table(BufReader::new(file), path.to_path_buf())
}

/// Parse CSV from a string (uploaded content, tests)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<SourceTable> {
    read_table(content.as_bytes(), PathBuf::from(source_name))
}

fn read_table<R: Read>(reader: R, path: PathBuf) -> Result<SourceTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(Error::EmptyInput { path });
    }

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() > headers.len() {
            tracing::warn!(
                row = row_idx + 1,
                path = %path.display(),
                "row has more cells than columns, truncating"
            );
        }

        // Short rows leave their trailing columns missing
        let row: SourceRow = headers.iter().zip(record.iter()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(Error::EmptyInput { path });
    }

    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "parsed CSV"
    );

    Ok(SourceTable {
        headers,
        rows,
        source_path: path,
    })
}
