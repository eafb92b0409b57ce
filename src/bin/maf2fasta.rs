//! Flattens the alignment blocks of a MAF file into one FASTA record per
//! sample.
//!
//! ```shell
//! maf2fasta -m alignment.maf.gz -f out.fa -s hg38,mm10,canFam3
//! ```

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use mafkit::convert::maf_to_fasta;
use mafkit::fasta;
use mafkit::file;
use mafkit::file::AtomicOutput;
use tracing::debug;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// Converts a MAF file to an aligned FASTA file.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The MAF file (plain text or gzipped, `-` for the standard input).
    #[arg(short, long)]
    maf: PathBuf,

    /// The output FASTA file (`-` or `/dev/stdout` for the standard output).
    #[arg(short, long)]
    fasta: PathBuf,

    /// The samples to write, in order, separated by commas.
    #[arg(short, long, value_delimiter = ',', required = true)]
    samples: Vec<String>,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    let mut reader = file::open(&args.maf)
        .map(mafkit::Reader::new)
        .with_context(|| format!("opening MAF file: {}", args.maf.display()))?;

    let records = maf_to_fasta(reader.blocks(), args.samples.as_slice())
        .with_context(|| format!("converting {}", args.maf.display()))?;

    let output = AtomicOutput::create(&args.fasta)
        .with_context(|| format!("creating output file: {}", args.fasta.display()))?;
    let mut writer = fasta::Writer::new(output);

    for record in records.iter() {
        debug!(
            "{}: {} column(s)",
            fasta::name(record),
            record.sequence().len()
        );
        writer
            .write_record(record)
            .context("writing FASTA record")?;
    }

    writer
        .into_inner()
        .commit()
        .with_context(|| format!("writing output file: {}", args.fasta.display()))?;

    info!("wrote {} sequence(s)", records.len());

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
