use std::ops::Range;

use strum::{Display, EnumString};
use tracing::{debug, instrument};

use super::{buffer::PixelBuffer, Depth};
use crate::Error;

#[derive(Default, Debug, Eq, PartialEq, Copy, Clone, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
/// The corner whose pixel defines the background color to trim away
pub enum TrimAnchor {
    /// Pixel (0, 0)
    #[default]
    TopLeft,
    /// Pixel (width - 1, height - 1)
    BottomRight,
}

/// Inclusive pixel rectangle inside a buffer
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub struct BoundingBox {
    /// First column
    pub left: usize,
    /// First row
    pub top: usize,
    /// Last column
    pub right: usize,
    /// Last row
    pub bottom: usize,
}

impl BoundingBox {
    /// Number of columns covered by the box
    #[must_use]
    pub const fn width(&self) -> usize {
        self.right.saturating_sub(self.left) + 1
    }

    /// Number of rows covered by the box
    #[must_use]
    pub const fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top) + 1
    }
}

/// Result of a border scan
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Trim {
    /// Nothing to crop: either every pixel is background, or no border row or column is
    FullImage,
    /// The region left once the background border is removed
    Crop(BoundingBox),
}

/// Finds the smallest box holding every pixel that differs from the anchor's color
///
/// The four edges are found by four independent scans over the whole buffer, each one
/// stopping at the first row (or column) holding a non-background pixel.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDepth`] unless the buffer is 4 bits per pixel
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn trim(buffer: &PixelBuffer, anchor: TrimAnchor) -> Result<Trim, Error> {
    if buffer.depth()? != Depth::Four {
        return Err(Error::UnsupportedDepth(buffer.bits_per_pixel()));
    }
    let (width, height) = (buffer.width(), buffer.height());
    let background = match anchor {
        TrimAnchor::TopLeft => buffer.get_index(0, 0)?,
        TrimAnchor::BottomRight => buffer.get_index(width - 1, height - 1)?,
    };
    debug!("Background index: {background}");
    let differs = |x: usize, y: usize| buffer.get_index(x, y).map(|i| i != background);

    let top = first_mismatch(0..height, 0..width, |y, x| differs(x, y))?;
    let bottom = first_mismatch((0..height).rev(), 0..width, |y, x| differs(x, y))?;
    let left = first_mismatch(0..width, 0..height, differs)?;
    let right = first_mismatch((0..width).rev(), 0..height, differs)?;

    let (Some(top), Some(bottom), Some(left), Some(right)) = (top, bottom, left, right) else {
        debug!("Every pixel is background");
        return Ok(Trim::FullImage);
    };
    let bounds = BoundingBox {
        left,
        top,
        right,
        bottom,
    };
    if bounds.width() == width && bounds.height() == height {
        return Ok(Trim::FullImage);
    }
    debug!("Trimmed bounds: {bounds:?}");
    Ok(Trim::Crop(bounds))
}

// first `outer` position whose `inner` line holds a non-background pixel
fn first_mismatch(
    outer: impl Iterator<Item = usize>,
    inner: Range<usize>,
    differs: impl Fn(usize, usize) -> Result<bool, Error>,
) -> Result<Option<usize>, Error> {
    for o in outer {
        for i in inner.clone() {
            if differs(o, i)? {
                return Ok(Some(o));
            }
        }
    }
    Ok(None)
}
