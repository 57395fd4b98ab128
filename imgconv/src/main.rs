use imgconv::{collect_images, convert_all, report_line, ConvertJob, OutputFormat, Summary};
use libindexed::{NormalizeOptions, TrimAnchor};
use std::path::PathBuf;
use tracing::{info, warn, Level};

use anyhow::{bail, Context, Result};
use clap::Parser;

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

/// Converts images between formats, shrinking 16-color 8 bit images to 4 bits per pixel
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Image files or directories (searched recursively)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// The output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// The output directory, defaults to the directory of each image
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Delete each source image after converting it (only without --output-dir)
    #[arg(long)]
    remove_source: bool,

    /// Replace existing output files
    #[arg(long)]
    overwrite: bool,

    /// Keep 16-color 8 bit images at 8 bits per pixel
    #[arg(long)]
    no_reduce: bool,

    /// Crop the uniform border of 16-color images
    #[arg(long)]
    trim: bool,

    /// Corner holding the border color
    #[arg(long, default_value_t = TrimAnchor::TopLeft)]
    anchor: TrimAnchor,

    /// Number of images converted in parallel, defaults to the number of CPUs
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    if let Some(dir) = &cli.output_dir {
        if !dir.is_dir() {
            bail!("Output directory {} does not exist", dir.display());
        }
        if cli.remove_source {
            warn!("--remove-source is ignored when writing to an output directory");
        }
    }
    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("configure worker threads")?;
    }

    let job = ConvertJob::builder()
        .format(cli.format)
        .maybe_output_dir(cli.output_dir)
        .remove_source(cli.remove_source)
        .overwrite(cli.overwrite)
        .normalize(
            NormalizeOptions::builder()
                .reduce_bit_depth(!cli.no_reduce)
                .trim(cli.trim)
                .trim_anchor(cli.anchor)
                .build(),
        )
        .build();

    let sources = collect_images(&cli.inputs);
    info!("Found {} images", sources.len());
    if sources.is_empty() {
        bail!("No images found");
    }

    let results = convert_all(&sources, &job);
    for (source, outcome) in &results {
        println!("{}", report_line(source, outcome, job.format));
    }
    let summary = Summary::of(&results);
    println!("{summary}");
    if summary.failed > 0 {
        bail!("{} images failed to convert", summary.failed);
    }
    Ok(())
}
