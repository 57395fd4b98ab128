use itertools::Itertools;

use super::{buffer::PixelBuffer, trim::BoundingBox, Rgb};
use crate::Error;

/// Final pixels of a normalized image, ready to hand to an encoder
///
/// A cropped source is a logical view: it keeps the full buffer and only offsets reads, the
/// pixel data is copied only when [`PixelSource::to_buffer`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelSource {
    /// The whole buffer
    Whole(PixelBuffer),
    /// A rectangle of the buffer
    Cropped {
        /// Uncropped pixels
        buffer: PixelBuffer,
        /// Visible region
        bounds: BoundingBox,
    },
}

impl PixelSource {
    /// Creates a view of `bounds` inside `buffer`
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the box is inverted or reaches past the buffer
    pub fn crop(buffer: PixelBuffer, bounds: BoundingBox) -> Result<Self, Error> {
        if bounds.left > bounds.right
            || bounds.top > bounds.bottom
            || bounds.right >= buffer.width()
            || bounds.bottom >= buffer.height()
        {
            return Err(Error::OutOfRange {
                x: bounds.right,
                y: bounds.bottom,
                width: buffer.width(),
                height: buffer.height(),
            });
        }
        Ok(Self::Cropped { buffer, bounds })
    }

    /// The underlying, uncropped buffer
    #[must_use]
    pub const fn buffer(&self) -> &PixelBuffer {
        match self {
            Self::Whole(buffer) | Self::Cropped { buffer, .. } => buffer,
        }
    }

    /// The visible region, if the source is cropped
    #[must_use]
    pub const fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Self::Whole(_) => None,
            Self::Cropped { bounds, .. } => Some(*bounds),
        }
    }

    /// Visible width
    #[must_use]
    pub const fn width(&self) -> usize {
        match self {
            Self::Whole(buffer) => buffer.width(),
            Self::Cropped { bounds, .. } => bounds.width(),
        }
    }

    /// Visible height
    #[must_use]
    pub const fn height(&self) -> usize {
        match self {
            Self::Whole(buffer) => buffer.height(),
            Self::Cropped { bounds, .. } => bounds.height(),
        }
    }

    /// Bits per pixel of the underlying buffer
    #[must_use]
    pub const fn bits_per_pixel(&self) -> u8 {
        self.buffer().bits_per_pixel()
    }

    /// Palette of the underlying buffer
    #[must_use]
    pub fn palette(&self) -> Option<&[Rgb]> {
        self.buffer().palette()
    }

    /// Reads a pixel index using view coordinates
    ///
    /// # Errors
    ///
    /// See [`PixelBuffer::get_index`]; the range check uses the visible size
    pub fn get_index(&self, x: usize, y: usize) -> Result<u8, Error> {
        match self {
            Self::Whole(buffer) => buffer.get_index(x, y),
            Self::Cropped { buffer, bounds } => {
                if x >= bounds.width() || y >= bounds.height() {
                    return Err(Error::OutOfRange {
                        x,
                        y,
                        width: bounds.width(),
                        height: bounds.height(),
                    });
                }
                buffer.get_index(bounds.left + x, bounds.top + y)
            }
        }
    }

    /// Copies the visible pixels into a tightly packed buffer of the same depth and palette
    ///
    /// # Errors
    ///
    /// Cropped sources can only be materialized from indexed buffers
    pub fn to_buffer(&self) -> Result<PixelBuffer, Error> {
        match self {
            Self::Whole(buffer) => Ok(buffer.clone()),
            Self::Cropped { buffer, .. } => {
                let palette = buffer.palette().map(<[Rgb]>::to_vec);
                let mut out =
                    PixelBuffer::blank(self.width(), self.height(), buffer.depth()?, palette)?;
                for (y, x) in (0..self.height()).cartesian_product(0..self.width()) {
                    out.set_index(x, y, self.get_index(x, y)?)?;
                }
                Ok(out)
            }
        }
    }

    /// Same as [`PixelSource::to_buffer`], without copying whole sources
    ///
    /// # Errors
    ///
    /// See [`PixelSource::to_buffer`]
    pub fn into_buffer(self) -> Result<PixelBuffer, Error> {
        match self {
            Self::Whole(buffer) => Ok(buffer),
            cropped @ Self::Cropped { .. } => cropped.to_buffer(),
        }
    }
}
