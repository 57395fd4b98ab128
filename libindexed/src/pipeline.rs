use bon::Builder;
use tracing::{debug, info, instrument, warn};

use crate::{
    image::{
        buffer::PixelBuffer,
        reduce::reduce_to_4bpp,
        source::PixelSource,
        trim::{trim, BoundingBox, Trim, TrimAnchor},
        usage::is_reducible,
    },
    Error,
};

/// Per-image normalization settings
#[derive(Builder, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Repack eligible 8 bit images into 4 bits per pixel
    #[builder(default = true)]
    pub reduce_bit_depth: bool,
    /// Crop the uniform border around reduced images
    #[builder(default)]
    pub trim: bool,
    /// Corner holding the border color
    #[builder(default)]
    pub trim_anchor: TrimAnchor,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// What happened to a trim request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimOutcome {
    /// Trimming was not asked for
    NotRequested,
    /// The image was cropped to the box
    Cropped(BoundingBox),
    /// There was no border to remove
    FullImage,
    /// The image was not reduced to 4 bits per pixel, so it could not be trimmed
    Skipped {
        /// depth of the image that was kept
        bits_per_pixel: u8,
    },
}

/// A normalized image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Pixels to encode
    pub source: PixelSource,
    /// `true` if the image was repacked into 4 bits per pixel
    pub reduced: bool,
    /// Outcome of the trim step
    pub trim: TrimOutcome,
}

/// Runs the normalization steps over a decoded image
///
/// 1. images that are not 8 bit paletted with at most 16 used colors are kept as they are
/// 2. eligible images are repacked into 4 bits per pixel when reduction or trimming is enabled
/// 3. reduced images are cropped to their content when trimming is enabled
///
/// # Errors
///
/// This function errors if the buffer is malformed; a trim that cannot run is reported through
/// [`TrimOutcome::Skipped`] instead
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height(), bpp = buffer.bits_per_pixel()))]
pub fn normalize(buffer: PixelBuffer, options: &NormalizeOptions) -> Result<Normalized, Error> {
    let wants_reduction = options.reduce_bit_depth || options.trim;
    if !wants_reduction || !is_reducible(&buffer)? {
        let trim = if options.trim {
            warn!(
                "Trim skipped: {}",
                Error::UnsupportedDepth(buffer.bits_per_pixel())
            );
            TrimOutcome::Skipped {
                bits_per_pixel: buffer.bits_per_pixel(),
            }
        } else {
            TrimOutcome::NotRequested
        };
        debug!("Keeping the decoded image");
        return Ok(Normalized {
            source: PixelSource::Whole(buffer),
            reduced: false,
            trim,
        });
    }

    let reduced = reduce_to_4bpp(&buffer)?;
    drop(buffer);
    info!("Reduced image to 4 bits per pixel");

    if !options.trim {
        return Ok(Normalized {
            source: PixelSource::Whole(reduced),
            reduced: true,
            trim: TrimOutcome::NotRequested,
        });
    }

    let (source, trim) = match trim(&reduced, options.trim_anchor)? {
        Trim::Crop(bounds) => {
            info!(
                "Trimmed to {}x{} at ({}, {})",
                bounds.width(),
                bounds.height(),
                bounds.left,
                bounds.top
            );
            (
                PixelSource::crop(reduced, bounds)?,
                TrimOutcome::Cropped(bounds),
            )
        }
        Trim::FullImage => {
            debug!("Nothing to trim");
            (PixelSource::Whole(reduced), TrimOutcome::FullImage)
        }
    };
    Ok(Normalized {
        source,
        reduced: true,
        trim,
    })
}
