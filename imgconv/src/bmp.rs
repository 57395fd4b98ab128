use anyhow::{ensure, Context, Result};
use libindexed::{PixelBuffer, Rgb};
use tracing::debug;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: usize = 40;
const BI_RGB: u32 = 0;

/// Decodes an uncompressed 1, 4 or 8 bits per pixel bitmap keeping its indexes and color table
///
/// Returns [`None`] for direct color bitmaps, compressed pixel arrays and OS/2 headers, which are
/// left to `image`.
pub fn decode_indexed(bytes: &[u8]) -> Result<Option<PixelBuffer>> {
    ensure!(bytes.starts_with(b"BM"), "missing BMP signature");
    let pixel_offset = usize::try_from(read_u32(bytes, 10)?)?;
    let header_size = usize::try_from(read_u32(bytes, FILE_HEADER_SIZE)?)?;
    if header_size < INFO_HEADER_SIZE {
        debug!("Core bitmap header of {header_size} bytes");
        return Ok(None);
    }

    let width = read_i32(bytes, 18)?;
    let height = read_i32(bytes, 22)?;
    let bit_count = read_u16(bytes, 28)?;
    let compression = read_u32(bytes, 30)?;
    if !matches!(bit_count, 1 | 4 | 8) || compression != BI_RGB {
        debug!("Bitmap at {bit_count} bpp with compression {compression}");
        return Ok(None);
    }
    ensure!(width > 0 && height != 0, "invalid bitmap size {width}x{height}");
    let width = usize::try_from(width)?;
    let rows = usize::try_from(height.unsigned_abs())?;

    let max_colors = 1_usize << bit_count;
    let colors = match usize::try_from(read_u32(bytes, 46)?)? {
        0 => max_colors,
        used => used.min(max_colors),
    };
    let table_start = FILE_HEADER_SIZE + header_size;
    let palette: Vec<Rgb> = bytes
        .get(table_start..table_start + colors * 4)
        .context("color table is truncated")?
        .chunks_exact(4)
        .map(|bgrx| (bgrx[2], bgrx[1], bgrx[0]))
        .collect();

    // rows are padded to 4 bytes
    let stride = (width * usize::from(bit_count)).div_ceil(32) * 4;
    let pixels = stride
        .checked_mul(rows)
        .and_then(|len| bytes.get(pixel_offset..)?.get(..len))
        .context("pixel array is truncated")?;
    // positive heights are stored bottom-up
    let data = if height > 0 {
        pixels.chunks_exact(stride).rev().flatten().copied().collect()
    } else {
        pixels.to_vec()
    };
    debug!(
        "Decoded indexed BMP: {width}x{rows} at {bit_count} bpp, {} palette entries",
        palette.len()
    );

    let buffer = PixelBuffer::builder()
        .width(width)
        .height(rows)
        .bits_per_pixel(u8::try_from(bit_count)?)
        .stride(stride)
        .data(data)
        .palette(palette)
        .build()?;
    Ok(Some(buffer))
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N]> {
    bytes
        .get(offset..offset + N)
        .and_then(|b| b.try_into().ok())
        .with_context(|| format!("BMP header is truncated at byte {offset}"))
}

fn read_u16(bytes: &[u8], offset: usize) -> Result<u16> {
    field(bytes, offset).map(u16::from_le_bytes)
}

fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    field(bytes, offset).map(u32::from_le_bytes)
}

fn read_i32(bytes: &[u8], offset: usize) -> Result<i32> {
    field(bytes, offset).map(i32::from_le_bytes)
}
