//! End-to-end run orchestration: read, build the key space, fill, export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::aggregate::fill_tables;
use crate::input::read_predictions;
use crate::keyspace::build_key_space;
use crate::output::{write_gene_table, write_sequences, write_table};
use crate::schema::{SchemaDescriptor, StrandSelection};

/// Subdirectory (next to the output tables) holding the FASTA exports.
const SEQUENCE_DIR: &str = "EBE_sequences";

/// All knobs of one tablemaker run.
#[derive(Debug)]
pub struct RunOptions {
    /// Path to the predictor's output file
    pub input: String,
    /// Exact name of the column to pivot into the table
    pub column: String,
    /// Output path; derived from the input path when absent
    pub output: Option<String>,
    pub strand: StrandSelection,
    /// Promoter length subtracted from every start coordinate
    pub prom_length: i64,
}

impl RunOptions {
    /// Primary table path: explicit `-o`, or `<input>_tablemaker_<column>`.
    pub fn output_path(&self) -> String {
        match &self.output {
            Some(path) => path.clone(),
            None => format!("{}_tablemaker_{}", self.input, self.column),
        }
    }
}

/// Run the whole pipeline for one prediction file.
///
/// Writes the pivoted table at the output path, the gene position table at
/// `<output>_EBEs`, and per-TALE FASTA files under `EBE_sequences/`.
pub fn run(schema: &'static SchemaDescriptor, options: &RunOptions) -> Result<()> {
    let output_file = options.output_path();
    let target = schema.resolve_strand(options.strand);

    let input = read_predictions(&options.input, schema)?;

    let (mut table, mut gene_table) =
        build_key_space(&input, schema, target, options.prom_length)?;
    let sequences = fill_tables(
        &input,
        &mut table,
        &mut gene_table,
        &options.column,
        schema,
        target,
        options.prom_length,
    )?;

    let out_path = Path::new(&output_file);
    let out_dir = out_path.parent().unwrap_or(Path::new(""));
    if !out_dir.as_os_str().is_empty() {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    }
    let seq_dir = out_dir.join(SEQUENCE_DIR);
    fs::create_dir_all(&seq_dir)
        .with_context(|| format!("creating sequence directory {}", seq_dir.display()))?;

    info!("Saving results to {}", output_file);
    let mut out = BufWriter::new(
        File::create(&output_file)
            .with_context(|| format!("creating {}", output_file))?,
    );
    write_table(&mut out, &table, &input.tal_ids)?;
    out.flush()?;

    let gene_output = format!("{}_EBEs", output_file);
    info!("Saving results to {}", gene_output);
    let mut out = BufWriter::new(
        File::create(&gene_output)
            .with_context(|| format!("creating {}", gene_output))?,
    );
    write_gene_table(&mut out, &gene_table, &input.tal_ids)?;
    out.flush()?;

    let basename = out_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_file.clone());
    let seq_prefix = seq_dir
        .join(format!("{}_EBEs", basename))
        .to_string_lossy()
        .into_owned();
    write_sequences(&seq_prefix, schema.predictor, &input.tal_ids, &sequences)?;

    info!("done!");
    Ok(())
}
