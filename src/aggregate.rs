//! Aggregation pass: fill the pivoted table, the per-gene position lists, and
//! the per-TALE sequence collection.
//!
//! Runs over the same record list as the key-space builder, but applies the
//! per-tool inclusion filter first; excluded records keep the default rows
//! reserved during the pre-scan.

use log::info;

use crate::error::{TableResult, TablemakerError};
use crate::input::{PredictionFile, record_line};
use crate::keyspace::{GeneTable, SitePosition, ValueTable, row_key};
use crate::schema::{Predictor, SchemaDescriptor, TargetStrand};
use crate::utils::gene::gene_symbol;

/// (row key, binding-site sequence) pairs collected per TALE ID slot, in
/// aggregation order. Feeds the FASTA exporter.
pub type SequenceCollection = Vec<Vec<(String, String)>>;

/// Fill the tables built by the key-space pass and collect sequences.
///
/// `selected_column` is resolved against the input header before the scan;
/// requesting a column the header does not carry aborts the run.
pub fn fill_tables(
    input: &PredictionFile,
    table: &mut ValueTable,
    gene_table: &mut GeneTable,
    selected_column: &str,
    schema: &SchemaDescriptor,
    target: TargetStrand,
    prom_length: i64,
) -> TableResult<SequenceCollection> {
    info!("Handling data...");

    let column_no = input
        .header
        .iter()
        .position(|name| name == selected_column)
        .ok_or_else(|| TablemakerError::UnknownColumn(selected_column.to_string()))?;

    let mut sequences: SequenceCollection = vec![Vec::new(); input.tal_ids.len()];

    for (idx, fields) in input.records.iter().enumerate() {
        let line = record_line(idx);

        if !schema.includes(fields) {
            continue;
        }

        let tal_id = schema.tal_id(fields);
        let slot = input
            .tal_ids
            .iter()
            .position(|known| known == tal_id)
            .ok_or_else(|| TablemakerError::UnknownPrimaryId(tal_id.to_string()))?;

        let seq_id = schema.seq_id(fields);
        let strand = &fields[schema.strand_col];
        let start = schema.adjusted_start(fields, prom_length, line)?;

        let raw_value = fields.get(column_no).ok_or_else(|| {
            TablemakerError::MalformedLine {
                line,
                msg: format!(
                    "record has no column {} ('{}')",
                    column_no, selected_column
                ),
            }
        })?;
        let value = render_value(raw_value, selected_column, schema, line)?;

        if !target.matches(strand) {
            continue;
        }

        let key = row_key(seq_id, start, strand, target);
        table[&key][slot] = value;

        let entry = match target {
            TargetStrand::Symbol(_) => SitePosition::Start(start),
            TargetStrand::Both => SitePosition::StartStrand(format!("{}/{}", start, strand)),
        };
        let positions = &mut gene_table[&gene_symbol(seq_id)][slot];
        positions.push(entry);
        positions.sort();
        positions.dedup();

        let sequence = effective_sequence(&fields[schema.seq_col], schema, line)?;
        sequences[slot].push((key, sequence));
    }

    Ok(sequences)
}

/// Render one extracted cell value. TALgetter scores are rounded to three
/// decimals; everything else is copied verbatim.
fn render_value(
    raw: &str,
    selected_column: &str,
    schema: &SchemaDescriptor,
    line: usize,
) -> TableResult<String> {
    if schema.predictor == Predictor::Talgetter && selected_column == "Score" {
        let score: f64 = raw.parse().map_err(|_| TablemakerError::MalformedLine {
            line,
            msg: format!("score '{}' is not a number", raw),
        })?;
        return Ok(format!("{:.3}", score));
    }
    Ok(raw.to_string())
}

/// The sequence stored for FASTA export.
///
/// TALENT writes the core motif and its upstream flank as "motif;flank"; the
/// effective binding-site sequence is the last flank base followed by the
/// motif. The other tools store the sequence field verbatim.
fn effective_sequence(
    raw: &str,
    schema: &SchemaDescriptor,
    line: usize,
) -> TableResult<String> {
    if schema.predictor != Predictor::Talent {
        return Ok(raw.to_string());
    }

    let mut segments = raw.split(';');
    let motif = segments.next().unwrap_or("");
    let flank_base = segments
        .next()
        .and_then(|flank| flank.chars().last())
        .ok_or_else(|| TablemakerError::MalformedLine {
            line,
            msg: format!("sequence field '{}' is not in TALENT's motif;flank form", raw),
        })?;

    Ok(format!("{}{}", flank_base, motif))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::read_predictions_from_reader;
    use crate::keyspace::build_key_space;
    use crate::schema::StrandSelection;
    use std::io::Cursor;

    const TALGETTER_DATA: &str = "\
TAL-ID\tSeq-ID\tStart\tEnd\tSequence\tScore\ty\tStrand\n\
TAL1\tgeneX.g1\t224\t243\tTACGT\t11.91827\tb\t+\n\
TAL2\tgeneX.g1\t224\t243\tGCCGT\t8.5\tb\t+\n\
TAL1\tgeneX.g1\t300\t319\tTCCGT\t7.25\tb\t+\n";

    fn talgetter_run(
        column: &str,
        selection: StrandSelection,
    ) -> (ValueTable, GeneTable, SequenceCollection, Vec<String>) {
        let schema = Predictor::Talgetter.descriptor();
        let input =
            read_predictions_from_reader(Cursor::new(TALGETTER_DATA), schema).unwrap();
        let target = schema.resolve_strand(selection);
        let (mut table, mut gene_table) =
            build_key_space(&input, schema, target, 0).unwrap();
        let sequences = fill_tables(
            &input,
            &mut table,
            &mut gene_table,
            column,
            schema,
            target,
            0,
        )
        .unwrap();
        (table, gene_table, sequences, input.tal_ids)
    }

    #[test]
    fn test_end_to_end_score_pivot() {
        let (table, _, _, tal_ids) = talgetter_run("Score", StrandSelection::Pos);

        assert_eq!(tal_ids, vec!["TAL1", "TAL2"]);
        // TAL1 passes the filter with a rounded score; TAL2's record fails
        // the leading-T filter, leaving the reserved default.
        assert_eq!(
            table.get("geneX.g1.224").unwrap(),
            &vec!["11.918".to_string(), "0".to_string()]
        );
        assert_eq!(
            table.get("geneX.g1.300").unwrap(),
            &vec!["7.250".to_string(), "0".to_string()]
        );
    }

    #[test]
    fn test_non_score_column_verbatim() {
        let (table, _, _, _) = talgetter_run("End", StrandSelection::Pos);
        assert_eq!(
            table.get("geneX.g1.224").unwrap(),
            &vec!["243".to_string(), "0".to_string()]
        );
    }

    #[test]
    fn test_gene_positions_deduplicated_sorted() {
        let (_, gene_table, _, _) = talgetter_run("Score", StrandSelection::Pos);

        let cells = gene_table.get("geneX").unwrap();
        assert_eq!(
            cells[0],
            vec![SitePosition::Start(224), SitePosition::Start(300)]
        );
        // TAL2 contributed nothing
        assert!(cells[1].is_empty());
    }

    #[test]
    fn test_duplicate_position_is_singleton() {
        let data = "\
TAL-ID\tSeq-ID\tStart\tEnd\tSequence\tScore\ty\tStrand\n\
TAL1\tgeneX.g1\t224\t243\tTACGT\t1.0\tb\t+\n\
TAL1\tgeneX.g1\t224\t243\tTACGT\t1.0\tb\t+\n";
        let schema = Predictor::Talgetter.descriptor();
        let input = read_predictions_from_reader(Cursor::new(data), schema).unwrap();
        let target = schema.resolve_strand(StrandSelection::Pos);
        let (mut table, mut gene_table) =
            build_key_space(&input, schema, target, 0).unwrap();
        fill_tables(
            &input,
            &mut table,
            &mut gene_table,
            "Score",
            schema,
            target,
            0,
        )
        .unwrap();

        assert_eq!(
            gene_table.get("geneX").unwrap()[0],
            vec![SitePosition::Start(224)]
        );
    }

    #[test]
    fn test_unknown_column_aborts() {
        let schema = Predictor::Talgetter.descriptor();
        let input =
            read_predictions_from_reader(Cursor::new(TALGETTER_DATA), schema).unwrap();
        let target = schema.resolve_strand(StrandSelection::Pos);
        let (mut table, mut gene_table) =
            build_key_space(&input, schema, target, 0).unwrap();

        let err = fill_tables(
            &input,
            &mut table,
            &mut gene_table,
            "Ratio",
            schema,
            target,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, TablemakerError::UnknownColumn(_)));
    }

    #[test]
    fn test_sequences_collected_per_slot() {
        let (_, _, sequences, _) = talgetter_run("Score", StrandSelection::Pos);

        assert_eq!(
            sequences[0],
            vec![
                ("geneX.g1.224".to_string(), "TACGT".to_string()),
                ("geneX.g1.300".to_string(), "TCCGT".to_string()),
            ]
        );
        assert!(sequences[1].is_empty());
    }

    const TALENT_DATA: &str = "\
TAL-ID\tSeq-ID\tx\tScore\tStart\tx\tx\tStrand\tx\tx\tSequence\n\
TAL1\tgeneX.g1\tx\t3.2\t226\tx\tx\t+\tx\tx\tCCTT;ACGTA\n\
TAL1\tgeneX.g1\tx\t3.2\t226\tx\tx\t+\tx\tx\tCCTT;ACGTA\n\
TAL1\tgeneY.c2\tx\t1.1\t150\tx\tx\t-\tx\tx\tGGAA;TTTC\n";

    #[test]
    fn test_talent_both_strands_round_trip() {
        let schema = Predictor::Talent.descriptor();
        let input = read_predictions_from_reader(Cursor::new(TALENT_DATA), schema).unwrap();
        let (mut table, mut gene_table) =
            build_key_space(&input, schema, TargetStrand::Both, 0).unwrap();
        let sequences = fill_tables(
            &input,
            &mut table,
            &mut gene_table,
            "Score",
            schema,
            TargetStrand::Both,
            0,
        )
        .unwrap();

        // start 226 - 2 offset = 224; duplicate records collapse to one key
        let keys: Vec<&String> = table.keys().collect();
        assert_eq!(keys, vec!["geneX.g1.224.+", "geneY.c2.148.-"]);

        // idempotent insertion: the duplicated record appears once
        assert_eq!(
            gene_table.get("geneX").unwrap()[0],
            vec![SitePosition::StartStrand("224/+".to_string())]
        );

        // TALENT re-encodes the sequence: last flank base + motif
        assert_eq!(
            sequences[0][0],
            ("geneX.g1.224.+".to_string(), "ACCTT".to_string())
        );
        assert_eq!(sequences[0][2].1, "CGGAA");
    }

    #[test]
    fn test_talent_bad_sequence_encoding() {
        let data = "\
TAL-ID\tSeq-ID\tx\tScore\tStart\tx\tx\tStrand\tx\tx\tSequence\n\
TAL1\tgeneX.g1\tx\t3.2\t226\tx\tx\t+\tx\tx\tCCTTACGTA\n";
        let schema = Predictor::Talent.descriptor();
        let input = read_predictions_from_reader(Cursor::new(data), schema).unwrap();
        let target = schema.resolve_strand(StrandSelection::Pos);
        let (mut table, mut gene_table) =
            build_key_space(&input, schema, target, 0).unwrap();

        let err = fill_tables(
            &input,
            &mut table,
            &mut gene_table,
            "Score",
            schema,
            target,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, TablemakerError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_data_column_out_of_range_is_malformed() {
        // Header carries an extra trailing column the record lacks.
        let data = "\
TAL-ID\tSeq-ID\tStart\tEnd\tSequence\tScore\ty\tStrand\tExtra\n\
TAL1\tgeneX.g1\t224\t243\tTACGT\t1.0\tb\t+\n";
        let schema = Predictor::Talgetter.descriptor();
        let input = read_predictions_from_reader(Cursor::new(data), schema).unwrap();
        let target = schema.resolve_strand(StrandSelection::Pos);
        let (mut table, mut gene_table) =
            build_key_space(&input, schema, target, 0).unwrap();

        let err = fill_tables(
            &input,
            &mut table,
            &mut gene_table,
            "Extra",
            schema,
            target,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, TablemakerError::MalformedLine { line: 2, .. }));
    }
}
