//! Per-predictor column layouts for the supported EBE prediction tools.
//!
//! TALVEZ, TALgetter, and TALENT all write tab-delimited prediction files,
//! but each puts the strand, start coordinate, sequence ID, and binding-site
//! sequence in different columns. A `SchemaDescriptor` pins down one tool's
//! layout; the three descriptors are baked in and never change at runtime.

use crate::error::{TableResult, TablemakerError};

/// The EBE prediction tool that produced an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predictor {
    Talvez,
    Talgetter,
    Talent,
}

impl Predictor {
    /// Resolve a tool name as given on the command line.
    pub fn from_name(name: &str) -> TableResult<Self> {
        match name {
            "TALVEZ" => Ok(Predictor::Talvez),
            "TALgetter" => Ok(Predictor::Talgetter),
            "TALENT" => Ok(Predictor::Talent),
            _ => Err(TablemakerError::UnsupportedTool(name.to_string())),
        }
    }

    /// The tool name as spelled in its own documentation (and in FASTA
    /// headers written by the exporter).
    pub fn name(&self) -> &'static str {
        match self {
            Predictor::Talvez => "TALVEZ",
            Predictor::Talgetter => "TALgetter",
            Predictor::Talent => "TALENT",
        }
    }

    /// The fixed column layout for this tool's output format.
    pub fn descriptor(&self) -> &'static SchemaDescriptor {
        match self {
            Predictor::Talvez => &TALVEZ,
            Predictor::Talgetter => &TALGETTER,
            Predictor::Talent => &TALENT,
        }
    }
}

/// Strand selection as requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandSelection {
    Pos,
    Neg,
    Both,
}

/// Strand filter resolved against one tool's strand symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStrand {
    /// Only records whose strand field equals this symbol
    Symbol(&'static str),
    /// Records on either strand, with the strand folded into the row key
    Both,
}

impl TargetStrand {
    /// Whether a record with the given strand field belongs to this run.
    pub fn matches(&self, strand: &str) -> bool {
        match self {
            TargetStrand::Symbol(symbol) => *symbol == strand,
            TargetStrand::Both => true,
        }
    }
}

/// Fixed column layout of one prediction tool's tab-delimited output.
///
/// All column indices are 0-based.
#[derive(Debug)]
pub struct SchemaDescriptor {
    pub predictor: Predictor,
    /// Column holding the strand symbol
    pub strand_col: usize,
    /// Column holding the predicted start coordinate
    pub start_col: usize,
    /// Fixed shift applied to every start coordinate
    pub start_offset: i64,
    /// (positive, negative) strand symbols as written by the tool
    pub strand_symbols: (&'static str, &'static str),
    /// Column holding the sequence ID
    pub id_col: usize,
    /// Column holding the predicted binding-site sequence
    pub seq_col: usize,
}

const TALVEZ: SchemaDescriptor = SchemaDescriptor {
    predictor: Predictor::Talvez,
    strand_col: 4,
    start_col: 6,
    start_offset: 0,
    strand_symbols: ("+strand", "-strand"),
    id_col: 2,
    seq_col: 8,
};

const TALGETTER: SchemaDescriptor = SchemaDescriptor {
    predictor: Predictor::Talgetter,
    strand_col: 7,
    start_col: 2,
    start_offset: 0,
    strand_symbols: ("+", "-"),
    id_col: 1,
    seq_col: 4,
};

// TALENT reports starts two bases downstream of the other tools.
const TALENT: SchemaDescriptor = SchemaDescriptor {
    predictor: Predictor::Talent,
    strand_col: 7,
    start_col: 4,
    start_offset: -2,
    strand_symbols: ("+", "-"),
    id_col: 1,
    seq_col: 10,
};

impl SchemaDescriptor {
    /// Minimum number of tab-separated fields a record must have for every
    /// schema column to be addressable.
    pub fn min_columns(&self) -> usize {
        self.strand_col
            .max(self.start_col)
            .max(self.id_col)
            .max(self.seq_col)
            + 1
    }

    /// Map a strand choice to this tool's strand symbols.
    pub fn resolve_strand(&self, selection: StrandSelection) -> TargetStrand {
        match selection {
            StrandSelection::Pos => TargetStrand::Symbol(self.strand_symbols.0),
            StrandSelection::Neg => TargetStrand::Symbol(self.strand_symbols.1),
            StrandSelection::Both => TargetStrand::Both,
        }
    }

    /// TALE ID of a record (always column 0; TALVEZ prefixes it with a
    /// FASTA-style '>' marker).
    pub fn tal_id<'a>(&self, fields: &'a [String]) -> &'a str {
        self.strip_marker(&fields[0])
    }

    /// Sequence ID of a record.
    pub fn seq_id<'a>(&self, fields: &'a [String]) -> &'a str {
        self.strip_marker(&fields[self.id_col])
    }

    fn strip_marker<'a>(&self, field: &'a str) -> &'a str {
        match self.predictor {
            Predictor::Talvez => field.strip_prefix('>').unwrap_or(field),
            _ => field,
        }
    }

    /// Start coordinate shifted by the schema offset and the promoter length.
    ///
    /// `line` is the 1-based input line, used for error reporting.
    pub fn adjusted_start(
        &self,
        fields: &[String],
        prom_length: i64,
        line: usize,
    ) -> TableResult<i64> {
        let raw = &fields[self.start_col];
        let start: i64 = raw.parse().map_err(|_| TablemakerError::MalformedLine {
            line,
            msg: format!("start coordinate '{}' is not an integer", raw),
        })?;
        Ok(start + self.start_offset - prom_length)
    }

    /// Per-tool inclusion filter for the aggregation pass.
    ///
    /// TALVEZ and TALgetter keep only records whose binding-site sequence
    /// starts with a thymine; TALENT output is kept as-is.
    pub fn includes(&self, fields: &[String]) -> bool {
        match self.predictor {
            Predictor::Talvez | Predictor::Talgetter => fields[self.seq_col]
                .chars()
                .next()
                .map(|c| c.eq_ignore_ascii_case(&'T'))
                .unwrap_or(false),
            Predictor::Talent => true,
        }
    }
}
