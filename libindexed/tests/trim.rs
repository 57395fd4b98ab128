use libindexed::{trim, BoundingBox, Error, PixelSource, Trim, TrimAnchor};

mod common;
use common::{indexed4, indexed8, indexes};

const ANCHORS: [TrimAnchor; 2] = [TrimAnchor::TopLeft, TrimAnchor::BottomRight];

#[rustfmt::skip]
const FRAMED: [u8; 16] = [
    0, 0, 0, 0,
    0, 5, 5, 0,
    0, 5, 5, 0,
    0, 0, 0, 0,
];

#[test]
fn one_pixel_border_is_removed() -> anyhow::Result<()> {
    let buffer = indexed4(4, 4, &FRAMED);
    let expected = BoundingBox {
        left: 1,
        top: 1,
        right: 2,
        bottom: 2,
    };
    assert_eq!(trim(&buffer, TrimAnchor::TopLeft)?, Trim::Crop(expected));
    assert_eq!(expected.width(), 2);
    assert_eq!(expected.height(), 2);
    Ok(())
}

#[test]
fn uniform_image_is_kept_whole() -> anyhow::Result<()> {
    let buffer = indexed4(5, 3, &[7; 15]);
    for anchor in ANCHORS {
        assert_eq!(trim(&buffer, anchor)?, Trim::FullImage);
    }
    Ok(())
}

#[test]
fn single_pixel_image_is_kept_whole() -> anyhow::Result<()> {
    let buffer = indexed4(1, 1, &[3]);
    for anchor in ANCHORS {
        assert_eq!(trim(&buffer, anchor)?, Trim::FullImage);
    }
    Ok(())
}

#[test]
fn trimming_a_trimmed_image_changes_nothing() -> anyhow::Result<()> {
    let buffer = indexed4(4, 4, &FRAMED);
    let Trim::Crop(bounds) = trim(&buffer, TrimAnchor::TopLeft)? else {
        panic!("expected a crop");
    };
    let cropped = PixelSource::crop(buffer, bounds)?.to_buffer()?;
    assert_eq!(trim(&cropped, TrimAnchor::TopLeft)?, Trim::FullImage);
    Ok(())
}

#[test]
fn content_touching_every_edge_is_not_cropped() -> anyhow::Result<()> {
    #[rustfmt::skip]
    let buffer = indexed4(3, 3, &[
        0, 0, 1,
        0, 0, 0,
        2, 0, 0,
    ]);
    assert_eq!(trim(&buffer, TrimAnchor::TopLeft)?, Trim::FullImage);
    Ok(())
}

#[test]
fn bottom_right_anchor_picks_its_own_background() -> anyhow::Result<()> {
    #[rustfmt::skip]
    let buffer = indexed4(5, 3, &[
        7, 3, 3, 3, 3,
        3, 3, 3, 3, 3,
        3, 3, 3, 3, 3,
    ]);
    assert_eq!(
        trim(&buffer, TrimAnchor::BottomRight)?,
        Trim::Crop(BoundingBox {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0
        })
    );
    // with the top left color as background, every row and column has content
    assert_eq!(trim(&buffer, TrimAnchor::TopLeft)?, Trim::FullImage);
    Ok(())
}

#[test]
fn bottom_right_anchor_reads_the_correct_nibble() -> anyhow::Result<()> {
    // last column odd: low nibble, its high nibble neighbour differs
    #[rustfmt::skip]
    let even_width = indexed4(4, 2, &[
        4, 4, 4, 4,
        4, 1, 9, 4,
    ]);
    assert_eq!(
        trim(&even_width, TrimAnchor::BottomRight)?,
        Trim::Crop(BoundingBox {
            left: 1,
            top: 1,
            right: 2,
            bottom: 1
        })
    );

    // last column even: high nibble, the low nibble is row padding
    #[rustfmt::skip]
    let odd_width = indexed4(3, 2, &[
        6, 6, 6,
        2, 6, 6,
    ]);
    assert_eq!(
        trim(&odd_width, TrimAnchor::BottomRight)?,
        Trim::Crop(BoundingBox {
            left: 0,
            top: 1,
            right: 0,
            bottom: 1
        })
    );
    Ok(())
}

#[test]
fn edges_are_scanned_independently() -> anyhow::Result<()> {
    #[rustfmt::skip]
    let buffer = indexed4(5, 5, &[
        0, 0, 0, 0, 0,
        0, 0, 0, 8, 0,
        0, 0, 0, 0, 0,
        0, 8, 0, 0, 0,
        0, 0, 0, 0, 0,
    ]);
    assert_eq!(
        trim(&buffer, TrimAnchor::TopLeft)?,
        Trim::Crop(BoundingBox {
            left: 1,
            top: 1,
            right: 3,
            bottom: 3
        })
    );
    Ok(())
}

#[test]
fn only_4_bit_buffers_can_be_trimmed() {
    let buffer = indexed8(2, 2, &[0, 0, 0, 1]);
    assert_eq!(
        trim(&buffer, TrimAnchor::TopLeft),
        Err(Error::UnsupportedDepth(8))
    );
}

#[test]
fn cropped_view_offsets_reads() -> anyhow::Result<()> {
    #[rustfmt::skip]
    let buffer = indexed4(4, 3, &[
        0, 1, 2, 3,
        4, 5, 6, 7,
        8, 9, 10, 11,
    ]);
    let bounds = BoundingBox {
        left: 1,
        top: 1,
        right: 3,
        bottom: 2,
    };
    let view = PixelSource::crop(buffer.clone(), bounds)?;
    assert_eq!((view.width(), view.height()), (3, 2));
    assert_eq!(view.get_index(0, 0)?, 5);
    assert_eq!(view.get_index(2, 1)?, 11);
    assert!(matches!(
        view.get_index(3, 0),
        Err(Error::OutOfRange { .. })
    ));
    assert_eq!(view.buffer(), &buffer);
    assert_eq!(view.bounds(), Some(bounds));

    let materialized = view.to_buffer()?;
    assert_eq!(materialized.stride(), 2);
    assert_eq!(indexes(&materialized), vec![5, 6, 7, 9, 10, 11]);
    assert_eq!(materialized.palette(), buffer.palette());
    Ok(())
}

#[test]
fn crop_rejects_boxes_outside_the_buffer() {
    let buffer = indexed4(2, 2, &[0, 0, 0, 0]);
    let bounds = BoundingBox {
        left: 0,
        top: 0,
        right: 2,
        bottom: 1,
    };
    assert!(matches!(
        PixelSource::crop(buffer, bounds),
        Err(Error::OutOfRange { .. })
    ));
}

#[test]
fn inverted_box_has_unit_size_and_cannot_crop() {
    let inverted = BoundingBox {
        left: 3,
        top: 2,
        right: 1,
        bottom: 0,
    };
    assert_eq!((inverted.width(), inverted.height()), (1, 1));
    let buffer = indexed4(4, 4, &FRAMED);
    assert!(matches!(
        PixelSource::crop(buffer, inverted),
        Err(Error::OutOfRange { .. })
    ));
}

#[test]
fn anchors_parse_from_kebab_case() -> anyhow::Result<()> {
    assert_eq!("bottom-right".parse::<TrimAnchor>()?, TrimAnchor::BottomRight);
    assert_eq!(TrimAnchor::TopLeft.to_string(), "top-left");
    assert_eq!(TrimAnchor::default(), TrimAnchor::TopLeft);
    Ok(())
}
