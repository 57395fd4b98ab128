use libindexed::{
    count_used_colors, is_reducible, reduce_to_4bpp, Error, PaletteUsage, PixelBuffer,
};

mod common;
use common::{distinct_palette, indexed4, indexed8, indexes};

#[test]
fn counts_each_used_index_once() -> anyhow::Result<()> {
    let buffer = indexed8(4, 2, &[0, 3, 7, 9, 9, 7, 3, 0]);
    assert_eq!(count_used_colors(&buffer)?, 4);

    let usage = PaletteUsage::scan(&buffer)?;
    assert_eq!(usage.indices().collect::<Vec<_>>(), vec![0, 3, 7, 9]);
    assert!(usage.contains(7));
    assert!(!usage.contains(8));
    Ok(())
}

#[test]
fn counts_4_bit_buffers() -> anyhow::Result<()> {
    let buffer = indexed4(3, 1, &[15, 0, 15]);
    assert_eq!(count_used_colors(&buffer)?, 2);
    Ok(())
}

#[test]
fn reduces_four_colors_with_the_first_sixteen_palette_slots() -> anyhow::Result<()> {
    let pixels = [0, 3, 7, 9, 9, 7, 3, 0];
    let buffer = indexed8(4, 2, &pixels);
    assert!(is_reducible(&buffer)?);

    let reduced = reduce_to_4bpp(&buffer)?;
    assert_eq!(reduced.bits_per_pixel(), 4);
    assert_eq!(reduced.stride(), 2);
    assert_eq!(reduced.palette(), Some(&distinct_palette()[..16]));
    assert_eq!(indexes(&reduced), pixels);
    assert_eq!(reduced.data(), &[0x03, 0x79, 0x97, 0x30]);
    Ok(())
}

#[test]
fn reduction_preserves_every_pixel_for_odd_widths() -> anyhow::Result<()> {
    for width in 1..=7 {
        let height = 3;
        let pixels: Vec<u8> = (0..width * height)
            .map(|i| u8::try_from((i * 5) % 16).unwrap())
            .collect();
        let buffer = indexed8(width, height, &pixels);
        assert!(is_reducible(&buffer)?);

        let reduced = reduce_to_4bpp(&buffer)?;
        assert_eq!(reduced.stride(), width.div_ceil(2));
        assert_eq!(indexes(&reduced), indexes(&buffer), "width {width}");
    }
    Ok(())
}

#[test]
fn padded_source_rows_are_repacked_tightly() -> anyhow::Result<()> {
    let buffer = PixelBuffer::builder()
        .width(3)
        .height(2)
        .bits_per_pixel(8)
        .stride(4)
        .data(vec![1, 2, 3, 0, 4, 5, 6, 0])
        .palette(distinct_palette())
        .build()?;
    let reduced = reduce_to_4bpp(&buffer)?;
    assert_eq!(reduced.data(), &[0x12, 0x30, 0x45, 0x60]);
    Ok(())
}

#[test]
fn more_than_sixteen_colors_is_not_reducible() -> anyhow::Result<()> {
    let pixels: Vec<u8> = (0..17).collect();
    let buffer = indexed8(17, 1, &pixels);
    assert_eq!(count_used_colors(&buffer)?, 17);
    assert!(!is_reducible(&buffer)?);
    Ok(())
}

#[test]
fn only_8_bit_paletted_images_are_reducible() -> anyhow::Result<()> {
    let gray = PixelBuffer::builder()
        .width(2)
        .height(1)
        .bits_per_pixel(8)
        .data(vec![0, 1])
        .build()?;
    assert!(!is_reducible(&gray)?);
    assert!(!is_reducible(&indexed4(2, 1, &[0, 1]))?);

    let rgb = PixelBuffer::builder()
        .width(1)
        .height(1)
        .bits_per_pixel(24)
        .data(vec![1, 2, 3])
        .build()?;
    assert!(!is_reducible(&rgb)?);
    assert_eq!(count_used_colors(&rgb), Err(Error::UnsupportedDepth(24)));
    Ok(())
}

#[test]
fn short_palettes_are_padded_with_black() -> anyhow::Result<()> {
    let buffer = PixelBuffer::builder()
        .width(2)
        .height(1)
        .bits_per_pixel(8)
        .data(vec![0, 1])
        .palette(vec![(10, 20, 30), (40, 50, 60)])
        .build()?;
    let reduced = reduce_to_4bpp(&buffer)?;
    let palette = reduced.palette().unwrap();
    assert_eq!(palette.len(), 16);
    assert_eq!(palette[..2], [(10, 20, 30), (40, 50, 60)]);
    assert!(palette[2..].iter().all(|&c| c == (0, 0, 0)));
    Ok(())
}

#[test]
fn indexes_above_fifteen_keep_their_low_nibble() -> anyhow::Result<()> {
    // 2 colors in use, but not within the first 16 slots
    let buffer = indexed8(2, 1, &[0x13, 0x20]);
    assert!(is_reducible(&buffer)?);
    let reduced = reduce_to_4bpp(&buffer)?;
    assert_eq!(indexes(&reduced), vec![0x3, 0x0]);
    Ok(())
}

#[test]
fn only_8_bit_sources_can_be_reduced() {
    let buffer = indexed4(2, 1, &[1, 2]);
    assert_eq!(reduce_to_4bpp(&buffer), Err(Error::UnsupportedDepth(4)));
}
