use tracing::{debug, instrument, warn};

use super::{buffer::PixelBuffer, Depth, Rgb};
use crate::Error;

const REDUCED_PALETTE_LEN: usize = 16;

/// Repacks an 8 bit indexed buffer into a new 4 bit indexed buffer
///
/// The reduced palette is made of the first 16 entries of the source palette, taken as they
/// are (padded with black when the source palette is shorter). Used indexes are never
/// remapped, so the source is expected to only use indexes below 16: check
/// [`crate::is_reducible`] first.
///
/// # Known limitation
///
/// An image can use 16 colors or fewer and still reference indexes above 15. Those pixels keep
/// only their low nibble and come out with the wrong color; a warning is logged when it happens.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDepth`] if the source is not 8 bits per pixel
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn reduce_to_4bpp(buffer: &PixelBuffer) -> Result<PixelBuffer, Error> {
    if buffer.bits_per_pixel() != 8 {
        return Err(Error::UnsupportedDepth(buffer.bits_per_pixel()));
    }
    let (width, height) = (buffer.width(), buffer.height());
    let stride = Depth::Four.row_bytes(width);
    let mut data = Vec::with_capacity(stride * height);
    let mut truncated = 0usize;
    for row in (0..height).filter_map(|y| buffer.row(y)) {
        for pair in row.chunks(2) {
            let high = pair[0];
            let low = pair.get(1).copied().unwrap_or(0);
            truncated += usize::from(high > 0x0F) + usize::from(low > 0x0F);
            data.push(((high & 0x0F) << 4) | (low & 0x0F));
        }
    }
    if truncated > 0 {
        warn!("{truncated} pixels reference indexes above 15 and lost their high bits");
    }
    debug!("Repacked {width}x{height} pixels into {} bytes", data.len());

    PixelBuffer::builder()
        .width(width)
        .height(height)
        .bits_per_pixel(Depth::Four.into())
        .stride(stride)
        .data(data)
        .maybe_palette(buffer.palette().map(reduced_palette))
        .build()
}

fn reduced_palette(palette: &[Rgb]) -> Vec<Rgb> {
    palette
        .iter()
        .copied()
        .chain(std::iter::repeat((0, 0, 0)))
        .take(REDUCED_PALETTE_LEN)
        .collect()
}
