//! Concatenates aligned FASTA files sample by sample.
//!
//! ```shell
//! concat_fastas gene1.fa gene2.fa.gz -s hg38,mm10 -o supermatrix.fa
//! ```
//!
//! Records whose identifiers carry a split suffix (e.g., `hg38_1`, `hg38_2`)
//! are merged into their sample before concatenation.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use mafkit::fasta;
use mafkit::fasta::Composition;
use mafkit::fasta::concat::Builder;
use mafkit::fasta::concat::DEFAULT_SPLIT_DELIMITER;
use mafkit::file;
use mafkit::file::AtomicOutput;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// Concatenates aligned FASTA files.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The FASTA files to concatenate, in order (plain text or gzipped).
    #[arg(required = true)]
    fastas: Vec<PathBuf>,

    /// The samples to write, in order, separated by commas.
    #[arg(short, long, value_delimiter = ',', required = true)]
    samples: Vec<String>,

    /// The output FASTA file (`-` or `/dev/stdout` for the standard output).
    #[arg(short, long)]
    output: PathBuf,

    /// Keep samples that contain only gaps instead of failing.
    #[arg(long, default_value_t = false)]
    keep_gaps_only: bool,

    /// The delimiter between a sample name and a split suffix.
    #[arg(long, default_value_t = DEFAULT_SPLIT_DELIMITER)]
    split_delimiter: char,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    let mut concatenator = Builder::default()
        .samples(args.samples.iter().cloned())
        .delimiter(args.split_delimiter)
        .keep_gaps_only(args.keep_gaps_only)
        .try_build()?;

    for path in args.fastas.iter() {
        let mut reader = file::open(path)
            .map(fasta::Reader::new)
            .with_context(|| format!("opening FASTA file: {}", path.display()))?;

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("reading FASTA file: {}", path.display()))?;

        info!("{}: {} record(s)", path.display(), records.len());
        concatenator.push(&path.display().to_string(), records)?;
    }

    let records = concatenator.finish()?;

    let output = AtomicOutput::create(&args.output)
        .with_context(|| format!("creating output file: {}", args.output.display()))?;
    let mut writer = fasta::Writer::new(output);

    for record in records.iter() {
        info!(
            "{}: {}",
            fasta::name(record),
            Composition::of(record.sequence().as_ref())
        );
        writer
            .write_record(record)
            .context("writing FASTA record")?;
    }

    writer
        .into_inner()
        .commit()
        .with_context(|| format!("writing output file: {}", args.output.display()))?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(std::io::stderr)
            .init(),
    };

    run(&args)
}
