//! Reading a predictor's tab-delimited output file.
//!
//! The whole file is loaded up front: the first line becomes the header, every
//! later line becomes one tab-split record, and the TALE IDs are collected in
//! first-seen order. Both downstream passes (key-space building and
//! aggregation) iterate the same in-memory record list.

use std::fs::File;
use std::io::{BufRead, BufReader};

use log::info;

use crate::error::{TableResult, TablemakerError};
use crate::schema::SchemaDescriptor;

/// One predictor output file, fully loaded.
#[derive(Debug)]
pub struct PredictionFile {
    /// Tab-split header line
    pub header: Vec<String>,
    /// Tab-split data lines, one per record, in file order
    pub records: Vec<Vec<String>>,
    /// Unique TALE IDs in first-seen order; fixes the output column order
    pub tal_ids: Vec<String>,
}

/// 1-based file line of a record, accounting for the header line.
pub fn record_line(record_index: usize) -> usize {
    record_index + 2
}

/// Read a prediction file from disk.
pub fn read_predictions(path: &str, schema: &SchemaDescriptor) -> TableResult<PredictionFile> {
    info!("Reading {}'s output file {}", schema.predictor.name(), path);
    let file = File::open(path).map_err(|e| {
        TablemakerError::Io(std::io::Error::other(format!(
            "Error opening prediction file {}: {}",
            path, e
        )))
    })?;
    read_predictions_from_reader(BufReader::new(file), schema)
}

/// Read a prediction file from any buffered reader.
///
/// Every record must tab-split into at least the schema's minimum column
/// count, so later passes can index schema columns without bounds checks.
pub fn read_predictions_from_reader<R: BufRead>(
    reader: R,
    schema: &SchemaDescriptor,
) -> TableResult<PredictionFile> {
    let mut header: Vec<String> = Vec::new();
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut tal_ids: Vec<String> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let fields: Vec<String> = line
            .trim_end()
            .split('\t')
            .map(|f| f.to_string())
            .collect();

        if i == 0 {
            header = fields;
            continue;
        }

        if fields.len() < schema.min_columns() {
            return Err(TablemakerError::MalformedLine {
                line: i + 1,
                msg: format!(
                    "expected at least {} tab-separated columns for {}, got {}",
                    schema.min_columns(),
                    schema.predictor.name(),
                    fields.len()
                ),
            });
        }

        let tal_id = schema.tal_id(&fields);
        if !tal_ids.iter().any(|known| known == tal_id) {
            tal_ids.push(tal_id.to_string());
        }

        records.push(fields);
    }

    Ok(PredictionFile {
        header,
        records,
        tal_ids,
    })
}
