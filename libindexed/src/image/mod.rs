#![allow(clippy::module_name_repetitions)]

pub(crate) mod buffer;
pub(crate) mod reduce;
pub(crate) mod source;
pub(crate) mod trim;
pub(crate) mod usage;

use crate::error::Error;
use std::fmt::Display;

/// A single palette entry (red, green, blue)
pub type Rgb = (u8, u8, u8);

#[derive(Debug, Eq, PartialEq, PartialOrd, Ord, Copy, Clone, Hash)]
/// Indexed pixel depth
///
/// Pixels narrower than a byte are packed most significant bits first, so for
/// [`Depth::Four`] the pixel at an even column lives in the high nibble.
pub enum Depth {
    /// 1 bit per pixel, 8 pixels per byte
    One,
    /// 2 bits per pixel, 4 pixels per byte
    Two,
    /// 4 bits per pixel, 2 pixels per byte
    Four,
    /// 8 bits per pixel, 1 pixel per byte
    Eight,
}

impl Depth {
    /// Largest index a pixel of this depth can hold
    #[must_use]
    pub const fn max_index(self) -> u8 {
        match self {
            Self::One => 0x01,
            Self::Two => 0x03,
            Self::Four => 0x0F,
            Self::Eight => 0xFF,
        }
    }

    /// Number of distinct indexes a pixel of this depth can hold
    #[must_use]
    pub const fn colors(self) -> usize {
        self.max_index() as usize + 1
    }

    /// Number of bytes needed to hold `width` pixels
    #[must_use]
    pub const fn row_bytes(self, width: usize) -> usize {
        row_bytes(width, self.bits())
    }

    const fn bits(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

pub(crate) const fn row_bytes(width: usize, bits_per_pixel: u8) -> usize {
    width.saturating_mul(bits_per_pixel as usize).div_ceil(8)
}

impl From<Depth> for u8 {
    fn from(value: Depth) -> Self {
        value.bits()
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

impl TryFrom<u8> for Depth {
    type Error = Error;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(Error::UnsupportedDepth(other)),
        }
    }
}
