//! Per-TALE FASTA export of collected binding-site sequences.

use std::fs::File;
use std::io::{BufWriter, Write};

use log::debug;

use crate::aggregate::SequenceCollection;
use crate::error::TableResult;
use crate::schema::Predictor;

/// Write one FASTA file per TALE ID at `<prefix>_<id>.fa`.
///
/// Files are written even for TALEs with no collected sequences, so every ID
/// in the run has a (possibly empty) export.
pub fn write_sequences(
    prefix: &str,
    predictor: Predictor,
    tal_ids: &[String],
    sequences: &SequenceCollection,
) -> TableResult<()> {
    for (tal_id, pairs) in tal_ids.iter().zip(sequences) {
        let path = format!("{}_{}.fa", prefix, tal_id);
        debug!("Writing {} sequences to {}", pairs.len(), path);
        let mut out = BufWriter::new(File::create(&path)?);
        write_fasta(&mut out, predictor, tal_id, pairs)?;
        out.flush()?;
    }
    Ok(())
}

/// Render the 2-line FASTA records for one TALE.
pub fn write_fasta<W: Write>(
    out: &mut W,
    predictor: Predictor,
    tal_id: &str,
    pairs: &[(String, String)],
) -> TableResult<()> {
    for (row_key, sequence) in pairs {
        writeln!(out, ">{}_{}_{}", predictor.name(), tal_id, row_key)?;
        writeln!(out, "{}", sequence)?;
    }
    Ok(())
}
