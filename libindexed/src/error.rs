use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// Possible `libindexed` errors
pub enum Error {
    /// Error returned when a pixel coordinate lies outside the buffer
    #[error("pixel ({x}, {y}) is outside of the {width}x{height} buffer")]
    OutOfRange {
        /// requested column
        x: usize,
        /// requested row
        y: usize,
        /// buffer width
        width: usize,
        /// buffer height
        height: usize,
    },
    /// Error returned when an operation does not support the bit depth of the buffer
    #[error("unsupported bit depth: {0} bits per pixel")]
    UnsupportedDepth(u8),
    /// Error returned if the width or the height of a buffer is zero
    #[error("buffer width and height must be greater than zero")]
    ZeroDimension,
    /// Error returned if the stride cannot hold a full row of pixels
    #[error("stride of {stride} bytes is smaller than a row of pixels ({minimum} bytes)")]
    StrideTooSmall {
        /// provided stride
        stride: usize,
        /// bytes needed to hold one row
        minimum: usize,
    },
    /// Error returned if the pixel data length is not `stride * height`
    #[error("pixel data holds {actual} bytes, expected {expected}")]
    DataLength {
        /// `stride * height`
        expected: usize,
        /// length of the provided data
        actual: usize,
    },
    /// Error returned when writing a value that does not fit in the bit depth
    #[error("index {value} does not fit in {bits_per_pixel} bits per pixel")]
    IndexTooLarge {
        /// value that was written
        value: u8,
        /// bit depth of the buffer
        bits_per_pixel: u8,
    },
    /// Error returned if a stored pixel references a color past the end of the palette
    #[error("pixel index {index} is not covered by a palette of {palette_len} colors")]
    PaletteIndex {
        /// offending pixel index
        index: u8,
        /// number of palette entries
        palette_len: usize,
    },
}
