use bon::bon;
use itertools::Itertools;

use super::{row_bytes, Depth, Rgb};
use crate::Error;

/// Decoded raster image, with packed pixel rows and an optional palette
///
/// The buffer owns its pixel data. Indexed depths (see [`Depth`]) can be read and written one
/// pixel at a time through [`PixelBuffer::get_index`] and [`PixelBuffer::set_index`]; any other
/// depth (direct color) is only carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bits_per_pixel: u8,
    /// Bytes per row, padding included
    stride: usize,
    data: Vec<u8>,
    palette: Option<Vec<Rgb>>,
}

#[bon]
impl PixelBuffer {
    /// Creates a new [`PixelBuffer`]
    ///
    /// When no stride is given the rows are expected to be tightly packed.
    ///
    /// # Errors
    ///
    /// This function errors if:
    /// - width or height is zero
    /// - the stride is too small to hold a row
    /// - `data` is not exactly `stride * height` bytes long
    /// - a stored pixel index has no palette entry
    #[builder]
    pub fn new(
        width: usize,
        height: usize,
        bits_per_pixel: u8,
        stride: Option<usize>,
        data: Vec<u8>,
        palette: Option<Vec<Rgb>>,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimension);
        }
        let minimum = row_bytes(width, bits_per_pixel);
        let stride = stride.unwrap_or(minimum);
        if stride < minimum {
            return Err(Error::StrideTooSmall { stride, minimum });
        }
        let expected = stride.saturating_mul(height);
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        let buffer = Self {
            width,
            height,
            bits_per_pixel,
            stride,
            data,
            palette,
        };
        buffer.check_palette()?;
        Ok(buffer)
    }
}

impl PixelBuffer {
    /// Creates a tightly packed indexed buffer with every pixel set to index 0
    ///
    /// # Errors
    ///
    /// This function errors if width or height is zero
    pub fn blank(
        width: usize,
        height: usize,
        depth: Depth,
        palette: Option<Vec<Rgb>>,
    ) -> Result<Self, Error> {
        Self::builder()
            .width(width)
            .height(height)
            .bits_per_pixel(depth.into())
            .data(vec![0; depth.row_bytes(width).saturating_mul(height)])
            .maybe_palette(palette)
            .build()
    }

    /// Returns the width of the image
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the height of the image
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of bits used by one pixel
    #[must_use]
    pub const fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    /// Returns the number of bytes per row, padding included
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the raw pixel bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the palette, if the image has one
    #[must_use]
    pub fn palette(&self) -> Option<&[Rgb]> {
        self.palette.as_deref()
    }

    /// Returns `true` if the image carries a palette
    #[must_use]
    pub const fn has_palette(&self) -> bool {
        self.palette.is_some()
    }

    /// Returns the indexed depth of the buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for direct color buffers
    pub fn depth(&self) -> Result<Depth, Error> {
        Depth::try_from(self.bits_per_pixel)
    }

    /// Returns the bytes of row `y`, without padding
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y < self.height {
            let start = y * self.stride;
            Some(&self.data[start..start + row_bytes(self.width, self.bits_per_pixel)])
        } else {
            None
        }
    }

    /// Reads the color index of the pixel at (`x`, `y`)
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedDepth`] if the buffer is not indexed
    /// - [`Error::OutOfRange`] if the coordinate is outside the buffer
    pub fn get_index(&self, x: usize, y: usize) -> Result<u8, Error> {
        let depth = self.depth()?;
        let (offset, shift) = self.locate(depth, x, y)?;
        Ok((self.data[offset] >> shift) & depth.max_index())
    }

    /// Writes the color index of the pixel at (`x`, `y`)
    ///
    /// Pixels sharing the same byte are left untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedDepth`] if the buffer is not indexed
    /// - [`Error::OutOfRange`] if the coordinate is outside the buffer
    /// - [`Error::IndexTooLarge`] if `value` does not fit in the depth
    pub fn set_index(&mut self, x: usize, y: usize, value: u8) -> Result<(), Error> {
        let depth = self.depth()?;
        if value > depth.max_index() {
            return Err(Error::IndexTooLarge {
                value,
                bits_per_pixel: self.bits_per_pixel,
            });
        }
        let (offset, shift) = self.locate(depth, x, y)?;
        let mask = depth.max_index() << shift;
        self.data[offset] = (self.data[offset] & !mask) | (value << shift);
        Ok(())
    }

    // byte offset and right shift of a pixel
    fn locate(&self, depth: Depth, x: usize, y: usize) -> Result<(usize, u8), Error> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let bits = usize::from(u8::from(depth));
        let bit = x * bits;
        #[allow(clippy::cast_possible_truncation)]
        let shift = (8 - bits - bit % 8) as u8;
        Ok((y * self.stride + bit / 8, shift))
    }

    fn check_palette(&self) -> Result<(), Error> {
        let (Some(palette), Ok(depth)) = (self.palette.as_deref(), self.depth()) else {
            return Ok(());
        };
        if palette.len() >= depth.colors() {
            return Ok(());
        }
        for (y, x) in (0..self.height).cartesian_product(0..self.width) {
            let index = self.get_index(x, y)?;
            if usize::from(index) >= palette.len() {
                return Err(Error::PaletteIndex {
                    index,
                    palette_len: palette.len(),
                });
            }
        }
        Ok(())
    }
}
