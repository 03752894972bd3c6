//! Reading delimited text into [`RawRecord`]s.
//!
//! The first line is the header. Every cell is trimmed and typed with
//! [`RawValue::infer`], blank lines are skipped, and rows shorter than the
//! header simply lack the trailing keys. Cells past the last header column are
//! dropped.
//!
//! An empty cell is left out of its record, so the column reads as absent for
//! that row rather than as a present null.

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::{
    errors::Error,
    models::raw_record::{RawRecord, RawValue},
};

/// Reads comma-separated records from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut records: Vec<RawRecord> = Vec::new();

    for result in reader.records() {
        let row = result?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        records.push(
            headers
                .iter()
                .zip(row.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(header, cell)| (header, RawValue::infer(cell)))
                .collect(),
        );
    }

    debug!(columns = headers.len(), rows = records.len(), "read delimited records");
    Ok(records)
}

/// Reads comma-separated records from a file.
pub fn read_records_path(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, Error> {
    let file = File::open(path.as_ref())?;
    read_records(file)
}
