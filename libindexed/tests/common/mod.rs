#![allow(dead_code)]
use libindexed::{Depth, PixelBuffer, Rgb};

/// 256 distinct colors, so palette slots can be told apart after reduction
pub fn distinct_palette() -> Vec<Rgb> {
    (0..=255u8).map(|i| (i, 255 - i, i / 2)).collect()
}

/// 8 bit paletted buffer from row-major indexes
pub fn indexed8(width: usize, height: usize, pixels: &[u8]) -> PixelBuffer {
    PixelBuffer::builder()
        .width(width)
        .height(height)
        .bits_per_pixel(8)
        .data(pixels.to_vec())
        .palette(distinct_palette())
        .build()
        .expect("valid 8 bit buffer")
}

/// 4 bit paletted buffer from row-major indexes (one index per element)
pub fn indexed4(width: usize, height: usize, pixels: &[u8]) -> PixelBuffer {
    assert_eq!(width * height, pixels.len());
    let palette = distinct_palette().into_iter().take(16).collect();
    let mut buffer =
        PixelBuffer::blank(width, height, Depth::Four, Some(palette)).expect("valid 4 bit buffer");
    for (i, &p) in pixels.iter().enumerate() {
        buffer
            .set_index(i % width, i / width, p)
            .expect("index in range");
    }
    buffer
}

/// Every index of a buffer, row-major
pub fn indexes(buffer: &PixelBuffer) -> Vec<u8> {
    (0..buffer.height())
        .flat_map(|y| (0..buffer.width()).map(move |x| (x, y)))
        .map(|(x, y)| buffer.get_index(x, y).expect("pixel in range"))
        .collect()
}
