use super::*;
use crate::error::ExtractError;
use tga::{Image, PixelLayout};

fn bgr_image(width: u32, height: u32, pixels: &[u8]) -> Image {
    assert_eq!(pixels.len(), width as usize * height as usize * 3);
    Image {
        width,
        height,
        layout: PixelLayout::Bgr,
        pixels: pixels.to_vec(),
    }
}

// Red, black, cyan, white in BGR storage order: the 2x2 reference level.
fn reference_image() -> Image {
    bgr_image(
        2,
        2,
        &[
            0, 0, 255, // red: start marker
            0, 0, 0, // black: no tile
            255, 255, 0, // cyan: end marker
            255, 255, 255, // white: ordinary tile
        ],
    )
}

#[test]
fn extract_reference_level() {
    let level = extract(&reference_image(), "levels/forest.tga").expect("extraction failed");

    assert_eq!(level.name, "forest");
    assert_eq!(level.rows, 2);
    assert_eq!(level.cols, 2);
    assert_eq!(level.tiles, vec![vec![1, 0], vec![1, 1]]);
    assert_eq!(level.start, Coord { row: 0, col: 0 });
    assert_eq!(level.end, Coord { row: 1, col: 0 });
}

#[test]
fn extract_from_decoded_tga() {
    // Same grid as reference_image, passed through the decoder first.
    let mut payload = vec![0u8; tga::HEADER_SIZE];
    payload[2] = 2;
    payload[0xC..0xE].copy_from_slice(&2u16.to_le_bytes());
    payload[0xE..0x10].copy_from_slice(&2u16.to_le_bytes());
    payload[0x10] = 24;
    payload.extend_from_slice(&reference_image().pixels);

    let image = tga::decode(payload.as_slice()).expect("failed to decode TGA");
    let level = extract(&image, "forest.tga").expect("extraction failed");
    assert_eq!(level.tiles, vec![vec![1, 0], vec![1, 1]]);
    assert_eq!(level.start, Coord { row: 0, col: 0 });
}

#[test]
fn start_coordinates_follow_pixel_ordinal() {
    // 3x3, start marker at ordinal 5 (row 1, col 2).
    let mut pixels = vec![0u8; 27];
    pixels[5 * 3 + 2] = 255;
    let level = extract(&bgr_image(3, 3, &pixels), "grid.tga").expect("extraction failed");
    assert_eq!(level.start, Coord { row: 1, col: 2 });
}

#[test]
fn missing_start_marker_is_rejected() {
    let pixels = vec![0u8; 12];
    let err = extract(&bgr_image(2, 2, &pixels), "empty.tga").unwrap_err();
    assert!(matches!(
        err,
        ExtractError::InvalidTileCount {
            start_count: 0,
            end_count: 0,
        }
    ));
}

#[test]
fn duplicate_start_markers_are_rejected() {
    let pixels = [
        0, 0, 255, // start
        0, 0, 255, // start again
        255, 255, 0, // end
        0, 0, 0,
    ];
    let err = extract(&bgr_image(2, 2, &pixels), "twice.tga").unwrap_err();
    assert!(matches!(
        err,
        ExtractError::InvalidTileCount {
            start_count: 2,
            end_count: 1,
        }
    ));
}

#[test]
fn several_end_markers_are_tolerated_last_wins() {
    let pixels = [
        0, 0, 255, // start
        255, 255, 0, // end
        0, 0, 0, //
        255, 255, 0, // end again
    ];
    let level = extract(&bgr_image(2, 2, &pixels), "ends.tga").expect("extraction failed");
    assert_eq!(level.end, Coord { row: 1, col: 1 });
}

#[test]
fn absent_end_marker_keeps_unset_coordinate() {
    let pixels = [
        0, 0, 255, // start
        0, 0, 0,
    ];
    let level = extract(&bgr_image(2, 1, &pixels), "noend.tga").expect("extraction failed");
    assert_eq!(level.end, Coord { row: 0, col: -1 });
}

#[test]
fn tiles_are_binary_by_intensity() {
    let pixels = [
        0, 0, 255, // start, intensity 85
        3, 0, 0, // intensity 1
        0, 0, 0, // intensity 0
        1, 0, 0, // nonzero bytes, but the intensity still rounds to 0
        200, 200, 200, //
    ];
    let level = extract(&bgr_image(5, 1, &pixels), "t.tga").expect("extraction failed");
    assert_eq!(level.tiles, vec![vec![1, 1, 0, 0, 1]]);
}

#[test]
fn extract_monochrome_image() {
    let image = Image {
        width: 3,
        height: 1,
        layout: PixelLayout::Gray,
        pixels: vec![255, 0, 0],
    };
    let level = extract(&image, "gray.tga").expect("extraction failed");
    assert_eq!(level.tiles, vec![vec![1, 0, 0]]);
    assert_eq!(level.start, Coord { row: 0, col: 0 });
    assert_eq!(level.end, Coord { row: 0, col: -1 });
}

#[test]
fn level_name_strips_directory_and_extension() {
    assert_eq!(level_name("levels/forest.tga"), "forest");
    assert_eq!(level_name("C:\\maps\\cave.tga"), "cave");
    assert_eq!(level_name("plain.tga"), "plain");
    // A dot before the directory separator leaves the file name whole.
    assert_eq!(level_name("archive.v1/plain"), "plain");
    assert_eq!(level_name("dir/.hidden"), "");
}

#[test]
fn level_name_without_dot_is_empty() {
    assert_eq!(level_name("abcname"), "");
}

#[test]
fn write_reference_level_record() {
    let level = extract(&reference_image(), "levels/forest.tga").expect("extraction failed");
    let mut out = Vec::new();
    write_level(&mut out, &level).expect("write failed");

    let expected = concat!(
        "  {\n",
        "    'name': 'forest',\n",
        "    'rows': 2,\n",
        "    'cols': 2,\n",
        "    'tiles': [\n",
        "      [ 1, 0, ],\n",
        "      [ 1, 1, ],\n",
        "    ],\n",
        "    'startTile': { 'row': 0, 'col': 0 },\n",
        "    'endTile': { 'row': 1, 'col': 0 },\n",
        "    'width': null,\n",
        "    'depth': null,\n",
        "  },\n",
    );
    assert_eq!(String::from_utf8(out).expect("invalid UTF-8"), expected);
}

#[test]
fn preamble_and_trailer_bracket_the_list() {
    let mut out = Vec::new();
    write_preamble(&mut out).expect("write failed");
    write_trailer(&mut out).expect("write failed");
    assert_eq!(String::from_utf8(out).expect("invalid UTF-8"), "var levels = [\n];\n");
}
