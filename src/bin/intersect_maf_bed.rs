//! Slices the alignment blocks of a MAF file down to the regions in a BED
//! file.
//!
//! ```shell
//! intersect_maf_bed -m alignment.maf.gz -b regions.bed -r hg38 -o out.maf
//! ```
//!
//! The first row of every block must belong to the reference sample given
//! with `-r`. For each block, the regions overlapping the reference row are
//! mapped onto the alignment columns and the block is sliced to those columns.
//! Blocks that no region touches are written unchanged unless
//! `--drop-unmatched` is given.

use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use mafkit::bed;
use mafkit::file;
use mafkit::file::AtomicOutput;
use mafkit::intersect::Builder;
use mafkit::intersect::Unmatched;
use mafkit::intersect::builder::DEFAULT_MIN_OVERLAP;
use mafkit::writer::Writer;
use omics::coordinate::position::Number;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

/// Intersects a MAF file with the regions in a BED file.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The MAF file (plain text or gzipped, `-` for the standard input).
    #[arg(short, long)]
    maf: PathBuf,

    /// The BED file of regions (plain text or gzipped).
    #[arg(short, long)]
    bed: PathBuf,

    /// The reference sample (e.g., `hg38`). It must be the first row of every
    /// block.
    #[arg(short, long)]
    reference: String,

    /// The minimum number of reference bases in an output block.
    #[arg(short = 'l', long, default_value_t = DEFAULT_MIN_OVERLAP)]
    min_overlap: Number,

    /// The output MAF file (`-` or `/dev/stdout` for the standard output).
    #[arg(short, long)]
    output: PathBuf,

    /// Leave out blocks that no region touches instead of copying them.
    #[arg(long, default_value_t = false)]
    drop_unmatched: bool,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    let unmatched = match args.drop_unmatched {
        true => Unmatched::Drop,
        false => Unmatched::PassThrough,
    };

    let regions = file::open(&args.bed)
        .map(bed::Reader::new)
        .with_context(|| format!("opening BED file: {}", args.bed.display()))?;

    let intersector = Builder::default()
        .reference(args.reference.clone())?
        .min_overlap(args.min_overlap)
        .unmatched(unmatched)
        .try_build_from(regions)
        .with_context(|| format!("reading regions from {}", args.bed.display()))?;

    info!(
        "read {} merged region(s) across {} sequence(s)",
        intersector.regions().len(),
        intersector.regions().sequences().len()
    );

    let mut reader = file::open(&args.maf)
        .map(mafkit::Reader::new)
        .with_context(|| format!("opening MAF file: {}", args.maf.display()))?;

    let output = AtomicOutput::create(&args.output)
        .with_context(|| format!("creating output file: {}", args.output.display()))?;
    let mut writer = Writer::new(output);

    let stats = intersector
        .run(&mut reader, &mut writer)
        .with_context(|| format!("intersecting {}", args.maf.display()))?;

    writer
        .into_inner()
        .commit()
        .with_context(|| format!("writing output file: {}", args.output.display()))?;

    info!("{stats}");

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
