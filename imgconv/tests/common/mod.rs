#![allow(dead_code)]
use std::{fs::File, io::BufWriter, path::Path};

/// 5x4 image: border of index 2 around a 2x2 block of indexes 9 and 1
#[rustfmt::skip]
pub const FRAMED: [u8; 20] = [
    2, 2, 2, 2, 2,
    2, 2, 9, 1, 2,
    2, 2, 1, 9, 2,
    2, 2, 2, 2, 2,
];

pub fn palette(len: usize) -> Vec<u8> {
    (0..len)
        .flat_map(|i| {
            let i = u8::try_from(i).unwrap();
            [i, 255 - i, i / 2]
        })
        .collect()
}

/// Writes an 8 bit indexed PNG
pub fn write_indexed_png(path: &Path, width: u32, height: u32, pixels: &[u8], palette_len: usize) {
    let file = BufWriter::new(File::create(path).unwrap());
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette(palette_len));
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(pixels).unwrap();
    writer.finish().unwrap();
}

/// Writes an 8 bit indexed bottom-up BMP
pub fn write_indexed_bmp(path: &Path, width: u32, height: u32, pixels: &[u8], palette_len: usize) {
    let colors: Vec<[u8; 3]> = palette(palette_len)
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let mut file = BufWriter::new(File::create(path).unwrap());
    image::codecs::bmp::BmpEncoder::new(&mut file)
        .encode_with_palette(
            pixels,
            width,
            height,
            image::ExtendedColorType::L8,
            Some(&colors),
        )
        .unwrap();
}

/// Writes a single frame GIF using a global palette
pub fn write_indexed_gif(path: &Path, width: u16, height: u16, pixels: &[u8], palette_len: usize) {
    let file = BufWriter::new(File::create(path).unwrap());
    let mut encoder = gif::Encoder::new(file, width, height, &palette(palette_len)).unwrap();
    let frame = gif::Frame {
        width,
        height,
        buffer: pixels.to_vec().into(),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame).unwrap();
}

/// First frame of a GIF as indexes, with the palette that applies to it
pub fn read_gif(path: &Path) -> (u16, u16, Vec<u8>, Vec<u8>) {
    let mut decoder = gif::DecodeOptions::new()
        .read_info(File::open(path).unwrap())
        .unwrap();
    let frame = decoder.read_next_frame().unwrap().unwrap();
    let (width, height, pixels) = (frame.width, frame.height, frame.buffer.to_vec());
    let palette = decoder.palette().unwrap().to_vec();
    (width, height, pixels, palette)
}

/// Reads a PNG without expanding its palette
pub struct RawPng {
    pub width: u32,
    pub height: u32,
    pub color_type: png::ColorType,
    pub bit_depth: png::BitDepth,
    pub palette: Option<Vec<u8>>,
    pub data: Vec<u8>,
}

pub fn read_png(path: &Path) -> RawPng {
    let mut decoder = png::Decoder::new(File::open(path).unwrap());
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().unwrap();
    let palette = reader.info().palette.as_ref().map(|p| p.to_vec());
    let mut data = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut data).unwrap();
    data.truncate(frame.buffer_size());
    RawPng {
        width: frame.width,
        height: frame.height,
        color_type: frame.color_type,
        bit_depth: frame.bit_depth,
        palette,
        data,
    }
}
