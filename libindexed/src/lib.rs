//! # libindexed
//!
//!
//! This library normalizes indexed (paletted) bitmaps captured from legacy 16-color display
//! hardware before they are written to a modern container format.
//!
//! Screenshots and sprites from those machines are often saved as 8 bits per pixel images even
//! though they never use more than 16 palette entries. This crate detects such images, repacks
//! them into 4 bits per pixel, and can crop away the uniform border that usually surrounds them.
//! Decoding and encoding image files is left to other crates: the input is an already decoded
//! [`PixelBuffer`] and the output is a [`PixelSource`] ready to hand to an encoder.
//!
//! ### Pixel layout
//!
//! A [`PixelBuffer`] stores rows of packed pixels, `stride` bytes apart. Indexed depths narrower
//! than a byte ([`Depth`]) are packed most significant bits first: at 4 bits per pixel the pixel
//! at an even column uses the high nibble and the pixel at the next column the low nibble.
//! Pixels are only ever accessed through the bounds-checked [`PixelBuffer::get_index`] and
//! [`PixelBuffer::set_index`].
//!
//! ### Usage
//!
//! ```rust
//! use libindexed::{normalize, NormalizeOptions, PixelBuffer, TrimAnchor, TrimOutcome};
//!
//! fn main() -> anyhow::Result<()> {
//!     // 4x4 image, border of color 0 around a 2x2 block of color 5
//!     #[rustfmt::skip]
//!     let pixels = vec![
//!         0, 0, 0, 0,
//!         0, 5, 5, 0,
//!         0, 5, 5, 0,
//!         0, 0, 0, 0,
//!     ];
//!     let palette = (0..=255).map(|i| (i, i, i)).collect();
//!     let buffer = PixelBuffer::builder()
//!         .width(4)
//!         .height(4)
//!         .bits_per_pixel(8)
//!         .data(pixels)
//!         .palette(palette)
//!         .build()?;
//!
//!     let options = NormalizeOptions::builder()
//!         .trim(true)
//!         .trim_anchor(TrimAnchor::TopLeft)
//!         .build();
//!     let normalized = normalize(buffer, &options)?;
//!
//!     assert!(normalized.reduced);
//!     assert!(matches!(normalized.trim, TrimOutcome::Cropped(_)));
//!     let cropped = normalized.source.to_buffer()?;
//!     assert_eq!((cropped.width(), cropped.height()), (2, 2));
//!     assert_eq!(cropped.bits_per_pixel(), 4);
//!     assert_eq!(cropped.palette().map(<[_]>::len), Some(16));
//!     Ok(())
//! }
//! ```
//!
//! ### Limitations
//!
//! - Trimming only works on 4 bits per pixel buffers, i.e. on images that were reduced.
//! - Reduction keeps palette slots 0 to 15 as they are instead of remapping the indexes actually
//!   in use. See [`reduce_to_4bpp`].
//!

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod error;
/// Module containing the pixel buffer and the per-step operations
pub mod image;
mod pipeline;

pub use error::Error;
pub use image::buffer::PixelBuffer;
pub use image::reduce::reduce_to_4bpp;
pub use image::source::PixelSource;
pub use image::trim::{trim, BoundingBox, Trim, TrimAnchor};
pub use image::usage::{count_used_colors, is_reducible, PaletteUsage, REDUCIBLE_COLORS};
pub use image::{Depth, Rgb};
pub use pipeline::{normalize, NormalizeOptions, Normalized, TrimOutcome};
