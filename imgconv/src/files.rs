use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use image::ImageFormat;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::codec::OutputFormat;

/// Expands files and directories into the list of image files they contain
///
/// Directories are walked recursively and their entries sorted by name. Only files with a known
/// image extension are kept; entries that cannot be read are logged and skipped.
#[must_use]
pub fn collect_images(entries: &[PathBuf]) -> Vec<PathBuf> {
    let mut images = Vec::new();
    for entry in entries {
        for item in WalkDir::new(entry).follow_links(true).sort_by_file_name() {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !item.file_type().is_file() {
                continue;
            }
            if ImageFormat::from_path(item.path()).is_ok() {
                trace!("Found {}", item.path().display());
                images.push(item.into_path());
            } else {
                debug!("Not an image: {}", item.path().display());
            }
        }
    }
    images
}

/// Computes `<dir>/<source stem>.<format extension>`
///
/// `dir` defaults to the directory of the source file.
///
/// # Errors
///
/// This function errors if the source has no parent directory or no usable file name
pub fn output_path(source: &Path, dir: Option<&Path>, format: OutputFormat) -> Result<PathBuf> {
    let Some(dir) = dir.or_else(|| source.parent()) else {
        bail!("Invalid source file {}", source.display());
    };
    let Some(Some(filename)) = source.file_stem().map(|os| os.to_str()) else {
        bail!("Invalid source file {}", source.display());
    };
    let mut output = PathBuf::new();
    output.push(dir);
    output.push(format!("{}.{}", filename, format.extension()));
    Ok(output)
}
