use clap::{Parser, ValueEnum};
use log::error;

use ebetab::pipeline::{RunOptions, run};
use ebetab::schema::{Predictor, StrandSelection};

#[derive(Parser)]
#[command(name = "ebetab")]
#[command(version)]
#[command(
    about = "Reformat EBE predictor output into gene-by-TALE tables",
    long_about = "Reformats tab-delimited output from TALVEZ, TALgetter, or TALENT into a unified \
                  gene-by-TALE value matrix, a per-gene list of EBE positions, and per-TALE FASTA \
                  exports of the predicted binding sites."
)]
struct Cli {
    /// Path to the EBE predictor's output file that will be reformatted.
    #[arg(short = 'e', long = "ebe", required = true)]
    ebe: String,
    /// Name of the EBE prediction tool that generated the data supplied in --ebe.
    /// Options: TALVEZ, TALgetter, TALENT.
    #[arg(short, long, required = true)]
    predictor: String,
    /// Exact name of the column in the prediction tool's output file that shall be used.
    #[arg(short, long, required = true)]
    column: String,
    /// Complete path and filename for the output table.
    /// Defaults to `<input>_tablemaker_<column>` next to the input file.
    #[arg(short, long)]
    output: Option<String>,
    /// Report EBEs on the positive strand, the negative strand, or both.
    /// Only applicable if the predictor outputs predictions for both strands.
    #[arg(short, long, default_value = "pos")]
    strand: Strand,
    /// Promoter length subtracted from every predicted start coordinate.
    #[arg(short = 'r', long = "promotor", default_value_t = 0)]
    prom_length: i64,
    /// Log verbosity level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strand {
    Pos,
    Neg,
    Both,
}

impl Strand {
    fn to_selection(self) -> StrandSelection {
        match self {
            Strand::Pos => StrandSelection::Pos,
            Strand::Neg => StrandSelection::Neg,
            Strand::Both => StrandSelection::Both,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.to_level_filter())
        .format_module_path(false)
        .init();

    let predictor = match Predictor::from_name(&cli.predictor) {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let options = RunOptions {
        input: cli.ebe,
        column: cli.column,
        output: cli.output,
        strand: cli.strand.to_selection(),
        prom_length: cli.prom_length,
    };

    if let Err(e) = run(predictor.descriptor(), &options) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
