//! Pre-scan pass reserving one default row per binding site and per gene.
//!
//! The key space is built from every strand-matching record, regardless of the
//! inclusion filter the aggregation pass applies later. A record the filter
//! drops therefore still holds a default row, and the first insertion of each
//! key fixes the final output row order.

use std::fmt;

use indexmap::IndexMap;

use crate::error::TableResult;
use crate::input::{PredictionFile, record_line};
use crate::schema::{SchemaDescriptor, TargetStrand};
use crate::utils::gene::gene_symbol;

/// Pivoted value table: binding-site row key -> one value slot per TALE ID.
pub type ValueTable = IndexMap<String, Vec<String>>;

/// Per-gene table: gene symbol -> one position list per TALE ID.
pub type GeneTable = IndexMap<String, Vec<Vec<SitePosition>>>;

/// One entry in a per-gene position list.
///
/// A single-strand run stores bare start coordinates, ordered numerically; a
/// both-strand run stores "start/strand" strings, ordered lexicographically.
/// A run never mixes the two variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SitePosition {
    Start(i64),
    StartStrand(String),
}

impl fmt::Display for SitePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitePosition::Start(start) => write!(f, "{}", start),
            SitePosition::StartStrand(entry) => f.write_str(entry),
        }
    }
}

/// Composite binding-site key for one record.
///
/// The strand symbol is folded into the key only when both strands are
/// reported, so a site predicted on either strand gets its own row.
pub fn row_key(seq_id: &str, adjusted_start: i64, strand: &str, target: TargetStrand) -> String {
    match target {
        TargetStrand::Symbol(_) => format!("{}.{}", seq_id, adjusted_start),
        TargetStrand::Both => format!("{}.{}.{}", seq_id, adjusted_start, strand),
    }
}

/// Build the empty value table and gene table for a run.
///
/// Rows default to "0" per TALE slot, gene cells to empty position lists.
/// Re-inserting an existing key is a no-op, so records mapping to the same
/// binding site collapse into one row.
pub fn build_key_space(
    input: &PredictionFile,
    schema: &SchemaDescriptor,
    target: TargetStrand,
    prom_length: i64,
) -> TableResult<(ValueTable, GeneTable)> {
    let mut table: ValueTable = IndexMap::new();
    let mut gene_table: GeneTable = IndexMap::new();

    let zero_row = vec!["0".to_string(); input.tal_ids.len()];
    let empty_row: Vec<Vec<SitePosition>> = vec![Vec::new(); input.tal_ids.len()];

    for (idx, fields) in input.records.iter().enumerate() {
        let seq_id = schema.seq_id(fields);
        let strand = &fields[schema.strand_col];
        let start = schema.adjusted_start(fields, prom_length, record_line(idx))?;

        if !target.matches(strand) {
            continue;
        }

        let key = row_key(seq_id, start, strand, target);
        table.entry(key).or_insert_with(|| zero_row.clone());
        gene_table
            .entry(gene_symbol(seq_id))
            .or_insert_with(|| empty_row.clone());
    }

    Ok((table, gene_table))
}
