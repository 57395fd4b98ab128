use std::{
    fmt::Display,
    fs,
    io::{BufWriter, ErrorKind, IntoInnerError},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use bon::Builder;
use libindexed::{normalize, NormalizeOptions};
use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::{
    codec::{decode_file, encode, OutputFormat},
    files::output_path,
};

/// Settings shared by every image of a batch
#[derive(Builder, Debug, Clone)]
pub struct ConvertJob {
    /// Container to write
    pub format: OutputFormat,
    /// Directory to write to, next to the source when [`None`]
    pub output_dir: Option<PathBuf>,
    /// Delete the source once written, only when writing next to it under a different name
    #[builder(default)]
    pub remove_source: bool,
    /// Replace existing output files instead of skipping the image
    #[builder(default)]
    pub overwrite: bool,
    /// Normalization applied to each image
    #[builder(default)]
    pub normalize: NormalizeOptions,
}

/// What happened to one image
#[derive(Debug)]
pub enum Outcome {
    /// The image was written
    Processed {
        /// written file
        output: PathBuf,
    },
    /// Nothing was written because the output file already exists
    Skipped {
        /// the file that was left alone
        existing: PathBuf,
    },
    /// The image could not be converted
    Failed {
        /// cause of the failure
        error: anyhow::Error,
    },
}

/// Converts a single image
///
/// The output is first written to a uniquely named temporary file next to the final path and only
/// renamed into place once encoding succeeded, so a failure never leaves a partial file behind.
/// Without `overwrite`, an output that appears while the image is being encoded is kept and the
/// image is skipped.
///
/// # Errors
///
/// This function errors if the image cannot be decoded, normalized, encoded or written
#[instrument(skip(job))]
pub fn convert_file(source: &Path, job: &ConvertJob) -> Result<Outcome> {
    let output = output_path(source, job.output_dir.as_deref(), job.format)?;
    if output.exists() && !job.overwrite {
        info!("{} already exists", output.display());
        return Ok(Outcome::Skipped { existing: output });
    }

    let decoded = decode_file(source)?;
    let normalized = normalize(decoded, &job.normalize)
        .with_context(|| format!("normalize {}", source.display()))?;
    debug!(
        "Normalized: reduced: {}, trim: {:?}",
        normalized.reduced, normalized.trim
    );
    let written = write_atomically(&output, job.overwrite, |w| {
        encode(normalized.source, job.format, w)
    })?;
    if !written {
        info!("{} was written by another image", output.display());
        return Ok(Outcome::Skipped { existing: output });
    }
    info!("Wrote {}", output.display());

    if job.remove_source && job.output_dir.is_none() && output != source {
        fs::remove_file(source).with_context(|| format!("remove {}", source.display()))?;
        info!("Removed {}", source.display());
    }
    Ok(Outcome::Processed { output })
}

/// Converts every image on the current rayon pool
///
/// Errors are captured per image, so one failing image never stops the others. Results come back
/// in the order of `sources`.
#[must_use]
pub fn convert_all(sources: &[PathBuf], job: &ConvertJob) -> Vec<(PathBuf, Outcome)> {
    sources
        .par_iter()
        .map(|source| {
            let outcome = convert_file(source, job).unwrap_or_else(|error| {
                warn!("Failed to convert {}: {error:#}", source.display());
                Outcome::Failed { error }
            });
            (source.clone(), outcome)
        })
        .collect()
}

/// One line per image: `name => FORMAT`, `name => skipped.` or `name => failed: cause`
#[must_use]
pub fn report_line(source: &Path, outcome: &Outcome, format: OutputFormat) -> String {
    let name = source
        .file_name()
        .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned());
    match outcome {
        Outcome::Processed { .. } => format!("{name} => {format}"),
        Outcome::Skipped { .. } => format!("{name} => skipped."),
        Outcome::Failed { error } => format!("{name} => failed: {error:#}"),
    }
}

/// Number of images per outcome
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// written images
    pub processed: usize,
    /// images left alone
    pub skipped: usize,
    /// images that failed
    pub failed: usize,
}

impl Summary {
    /// Tallies a batch
    #[must_use]
    pub fn of(results: &[(PathBuf, Outcome)]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, (_, outcome)| {
                match outcome {
                    Outcome::Processed { .. } => summary.processed += 1,
                    Outcome::Skipped { .. } => summary.skipped += 1,
                    Outcome::Failed { .. } => summary.failed += 1,
                }
                summary
            })
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed, self.skipped, self.failed
        )
    }
}

// false when `overwrite` is unset and `path` exists by the time the file is complete
fn write_atomically(
    path: &Path,
    overwrite: bool,
    write: impl FnOnce(&mut BufWriter<NamedTempFile>) -> Result<()>,
) -> Result<bool> {
    let Some(dir) = path.parent() else {
        bail!("Invalid output file {}", path.display());
    };
    let partial = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    debug!("Writing to {}", partial.path().display());
    let mut w = BufWriter::new(partial);
    write(&mut w)?;
    let partial = w
        .into_inner()
        .map_err(IntoInnerError::into_error)
        .context("flush output")?;

    let persisted = if overwrite {
        partial.persist(path)
    } else {
        partial.persist_noclobber(path)
    };
    match persisted {
        Ok(_) => Ok(true),
        Err(e) if !overwrite && e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e).with_context(|| format!("rename output to {}", path.display())),
    }
}
