use itertools::Itertools;
use tracing::{debug, instrument};

use super::{buffer::PixelBuffer, Depth};
use crate::Error;

/// Largest number of used colors a buffer may have and still be repacked into 4 bits per pixel
pub const REDUCIBLE_COLORS: usize = 16;

/// The set of palette indexes referenced by the pixels of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteUsage {
    seen: [bool; 256],
    depth: Depth,
}

impl PaletteUsage {
    /// Scans every pixel of `buffer` once, in row-major order
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the buffer is not indexed
    pub fn scan(buffer: &PixelBuffer) -> Result<Self, Error> {
        let depth = buffer.depth()?;
        let mut seen = [false; 256];
        for (y, x) in (0..buffer.height()).cartesian_product(0..buffer.width()) {
            seen[usize::from(buffer.get_index(x, y)?)] = true;
        }
        Ok(Self { seen, depth })
    }

    /// Number of distinct indexes in use
    #[must_use]
    pub fn count(&self) -> usize {
        self.seen[..self.depth.colors()]
            .iter()
            .filter(|&&used| used)
            .count()
    }

    /// Returns `true` if some pixel uses `index`
    #[must_use]
    pub const fn contains(&self, index: u8) -> bool {
        self.seen[index as usize]
    }

    /// Iterates over the used indexes in ascending order
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=self.depth.max_index()).filter(move |&i| self.contains(i))
    }
}

/// Counts the distinct palette indexes referenced by `buffer`
///
/// # Errors
///
/// Returns [`Error::UnsupportedDepth`] if the buffer is not indexed
pub fn count_used_colors(buffer: &PixelBuffer) -> Result<usize, Error> {
    PaletteUsage::scan(buffer).map(|usage| usage.count())
}

/// Returns `true` if `buffer` is an 8 bit paletted image using at most
/// [`REDUCIBLE_COLORS`] colors
///
/// Buffers of any other depth, or without palette, are never scanned.
///
/// # Errors
///
/// This function only errors if the scan itself fails
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn is_reducible(buffer: &PixelBuffer) -> Result<bool, Error> {
    if !buffer.has_palette() || buffer.bits_per_pixel() != 8 {
        debug!(
            "not reducible: {} bpp, palette: {}",
            buffer.bits_per_pixel(),
            buffer.has_palette()
        );
        return Ok(false);
    }
    let used = count_used_colors(buffer)?;
    debug!("{used} colors in use");
    Ok(used <= REDUCIBLE_COLORS)
}
