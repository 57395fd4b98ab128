use std::{
    borrow::Cow,
    fs::{self, File},
    io::{BufReader, Seek, Write},
    path::Path,
};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use image::{
    codecs::bmp::BmpEncoder, DynamicImage, ExtendedColorType, GrayAlphaImage, GrayImage,
    ImageFormat, RgbImage, RgbaImage,
};
use libindexed::{Depth, PixelBuffer, PixelSource, Rgb};
use tracing::{debug, instrument, trace};

use crate::bmp;

/// Container formats images can be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum OutputFormat {
    /// Windows bitmap, indexed images are written at 8 bits per pixel
    Bmp,
    /// Portable Network Graphics, keeps indexed images at their own depth
    Png,
    /// Graphics Interchange Format, indexed images are written at 8 bits per pixel
    Gif,
    /// JPEG, always written as 8 bit RGB
    Jpeg,
    /// Tagged Image File Format
    Tiff,
}

impl OutputFormat {
    /// File extension of the format, without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Bmp => "bmp",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpeg => "jpg",
            Self::Tiff => "tif",
        }
    }

    const fn image_format(self) -> ImageFormat {
        match self {
            Self::Bmp => ImageFormat::Bmp,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Decodes an image file into a [`PixelBuffer`]
///
/// Indexed PNG, BMP and GIF files keep their indexes and palette. Everything else is decoded by
/// `image` into 8 bit gray (8 bpp), gray and alpha (16 bpp), RGB (24 bpp) or RGBA (32 bpp).
///
/// # Errors
///
/// This function errors if the file cannot be read or decoded
#[instrument]
pub fn decode_file(path: &Path) -> Result<PixelBuffer> {
    let indexed = match ImageFormat::from_path(path).ok() {
        Some(ImageFormat::Png) => decode_indexed_png(path)?,
        Some(ImageFormat::Bmp) => {
            let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
            bmp::decode_indexed(&bytes).with_context(|| format!("decode {}", path.display()))?
        }
        Some(ImageFormat::Gif) => decode_indexed_gif(path)?,
        _ => None,
    };
    if let Some(buffer) = indexed {
        return Ok(buffer);
    }
    let img = image::open(path).with_context(|| format!("decode {}", path.display()))?;
    debug!("Decoded {:?} image", img.color());
    direct_color(img)
}

fn decode_indexed_png(path: &Path) -> Result<Option<PixelBuffer>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().context("read PNG header")?;

    let info = reader.info();
    if info.color_type != png::ColorType::Indexed {
        return Ok(None);
    }
    let palette: Vec<Rgb> = info
        .palette
        .as_deref()
        .context("indexed PNG without palette")?
        .chunks_exact(3)
        .map(|c| (c[0], c[1], c[2]))
        .collect();

    let mut data = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut data).context("read PNG pixels")?;
    data.truncate(frame.buffer_size());
    debug!(
        "Decoded indexed PNG: {}x{} at {} bpp, {} palette entries",
        frame.width,
        frame.height,
        frame.bit_depth as u8,
        palette.len()
    );

    let buffer = PixelBuffer::builder()
        .width(usize::try_from(frame.width)?)
        .height(usize::try_from(frame.height)?)
        .bits_per_pixel(frame.bit_depth as u8)
        .stride(frame.line_size)
        .data(data)
        .palette(palette)
        .build()?;
    Ok(Some(buffer))
}

fn decode_indexed_gif(path: &Path) -> Result<Option<PixelBuffer>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut decoder = gif::DecodeOptions::new()
        .read_info(BufReader::new(file))
        .context("read GIF header")?;
    let (width, height) = (decoder.width(), decoder.height());
    let Some(frame) = decoder.read_next_frame().context("read GIF frame")? else {
        bail!("GIF without frames");
    };
    if (frame.left, frame.top, frame.width, frame.height) != (0, 0, width, height)
        || frame.transparent.is_some()
    {
        debug!("First GIF frame is partial or transparent");
        return Ok(None);
    }
    let data = frame.buffer.to_vec();
    let palette: Vec<Rgb> = decoder
        .palette()
        .context("GIF without palette")?
        .chunks_exact(3)
        .map(|c| (c[0], c[1], c[2]))
        .collect();
    debug!(
        "Decoded indexed GIF: {width}x{height}, {} palette entries",
        palette.len()
    );

    let buffer = PixelBuffer::builder()
        .width(usize::from(width))
        .height(usize::from(height))
        .bits_per_pixel(8)
        .data(data)
        .palette(palette)
        .build()?;
    Ok(Some(buffer))
}

fn direct_color(img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (usize::try_from(img.width())?, usize::try_from(img.height())?);
    let (bits_per_pixel, data) = match img {
        DynamicImage::ImageLuma8(i) => (8, i.into_raw()),
        DynamicImage::ImageLumaA8(i) => (16, i.into_raw()),
        DynamicImage::ImageRgb8(i) => (24, i.into_raw()),
        DynamicImage::ImageRgba8(i) => (32, i.into_raw()),
        other if other.color().has_alpha() => (32, other.to_rgba8().into_raw()),
        other => (24, other.to_rgb8().into_raw()),
    };
    Ok(PixelBuffer::builder()
        .width(width)
        .height(height)
        .bits_per_pixel(bits_per_pixel)
        .data(data)
        .build()?)
}

/// Encodes the pixels of `source` into `writer`
///
/// Paletted sources stay paletted when written as PNG (at their own bit depth), BMP or GIF (at 8
/// bits per pixel). Every other combination goes through `image` as direct color.
///
/// # Errors
///
/// This function errors if the pixels cannot be encoded or written
#[instrument(skip(source, writer), fields(width = source.width(), height = source.height()))]
pub fn encode<W: Write + Seek>(
    source: PixelSource,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let buffer = source.into_buffer()?;
    if let (Some(palette), Ok(depth)) = (buffer.palette(), buffer.depth()) {
        match format {
            OutputFormat::Png => return write_indexed_png(&buffer, depth, palette, writer),
            OutputFormat::Bmp => return write_indexed_bmp(&buffer, palette, writer),
            OutputFormat::Gif => return write_indexed_gif(&buffer, palette, writer),
            OutputFormat::Jpeg | OutputFormat::Tiff => {}
        }
    }
    let img = match (format, to_dynamic(&buffer)?) {
        (OutputFormat::Jpeg, img) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (OutputFormat::Gif, img) => DynamicImage::ImageRgba8(img.to_rgba8()),
        (OutputFormat::Png, img) => img,
        (_, img) if img.color().has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        (_, img) => DynamicImage::ImageRgb8(img.to_rgb8()),
    };
    trace!("Writing {:?} image as {format}", img.color());
    img.write_to(writer, format.image_format())
        .with_context(|| format!("encode {format}"))
}

fn write_indexed_png<W: Write>(
    buffer: &PixelBuffer,
    depth: Depth,
    palette: &[Rgb],
    writer: W,
) -> Result<()> {
    let mut encoder = png::Encoder::new(
        writer,
        u32::try_from(buffer.width())?,
        u32::try_from(buffer.height())?,
    );
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::from_u8(depth.into()).context("PNG bit depth")?);
    encoder.set_palette(
        palette
            .iter()
            .take(depth.colors())
            .flat_map(|&(r, g, b)| [r, g, b])
            .collect::<Vec<_>>(),
    );
    let mut writer = encoder.write_header().context("write PNG header")?;
    writer
        .write_image_data(&tight_rows(buffer))
        .context("write PNG pixels")?;
    writer.finish().context("finish PNG")?;
    debug!("Wrote {depth} bpp indexed PNG");
    Ok(())
}

fn write_indexed_bmp<W: Write>(buffer: &PixelBuffer, palette: &[Rgb], mut writer: W) -> Result<()> {
    let palette: Vec<[u8; 3]> = palette.iter().take(256).map(|&(r, g, b)| [r, g, b]).collect();
    BmpEncoder::new(&mut writer)
        .encode_with_palette(
            &index_per_byte(buffer)?,
            u32::try_from(buffer.width())?,
            u32::try_from(buffer.height())?,
            ExtendedColorType::L8,
            Some(&palette),
        )
        .context("encode BMP")?;
    debug!("Wrote 8 bpp indexed BMP with {} colors", palette.len());
    Ok(())
}

fn write_indexed_gif<W: Write>(buffer: &PixelBuffer, palette: &[Rgb], writer: W) -> Result<()> {
    let (width, height) = (
        u16::try_from(buffer.width()).context("image too wide for GIF")?,
        u16::try_from(buffer.height()).context("image too tall for GIF")?,
    );
    let palette: Vec<u8> = palette
        .iter()
        .take(256)
        .flat_map(|&(r, g, b)| [r, g, b])
        .collect();
    let mut encoder =
        gif::Encoder::new(writer, width, height, &palette).context("write GIF header")?;
    let frame = gif::Frame {
        width,
        height,
        buffer: Cow::Owned(index_per_byte(buffer)?),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame).context("write GIF frame")?;
    encoder.into_inner().context("finish GIF")?;
    debug!("Wrote indexed GIF with {} colors", palette.len() / 3);
    Ok(())
}

// one palette index per byte, whatever the packing of the buffer
fn index_per_byte(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut indexes = Vec::with_capacity(buffer.width() * buffer.height());
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            indexes.push(buffer.get_index(x, y)?);
        }
    }
    Ok(indexes)
}

fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let (width, height) = (
        u32::try_from(buffer.width())?,
        u32::try_from(buffer.height())?,
    );
    let img = match (buffer.palette(), buffer.bits_per_pixel()) {
        (Some(palette), _) => {
            let mut rgb = Vec::with_capacity(buffer.width() * buffer.height() * 3);
            for y in 0..buffer.height() {
                for x in 0..buffer.width() {
                    let (r, g, b) = palette[usize::from(buffer.get_index(x, y)?)];
                    rgb.extend([r, g, b]);
                }
            }
            RgbImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb8)
        }
        (None, 8) => {
            GrayImage::from_raw(width, height, tight_rows(buffer)).map(DynamicImage::ImageLuma8)
        }
        (None, 16) => GrayAlphaImage::from_raw(width, height, tight_rows(buffer))
            .map(DynamicImage::ImageLumaA8),
        (None, 24) => {
            RgbImage::from_raw(width, height, tight_rows(buffer)).map(DynamicImage::ImageRgb8)
        }
        (None, 32) => {
            RgbaImage::from_raw(width, height, tight_rows(buffer)).map(DynamicImage::ImageRgba8)
        }
        (None, bpp) => bail!("cannot encode {bpp} bpp images without palette"),
    };
    img.context("pixel data does not match the image size")
}

// rows without stride padding
fn tight_rows(buffer: &PixelBuffer) -> Vec<u8> {
    (0..buffer.height())
        .filter_map(|y| buffer.row(y))
        .flatten()
        .copied()
        .collect()
}
