pub mod error;

use std::io::{self, Write};

use log::debug;
use tga::Image;

use crate::error::ExtractError;

pub type Result<T> = core::result::Result<T, ExtractError>;

/// Marker pixels are recognized by the raw byte sum of their channels:
/// a pure red pixel (B+G+R in storage order) sums to 255, cyan to 510 and
/// white to 765. Any other channel mix with the same sum counts as well.
const START_SUM: u32 = 255;
const END_SUM: u32 = 255 * 2;
const ACTIVE_SUM: u32 = 255 * 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Coord {
    pub row: i64,
    pub col: i64,
}

/// Level description extracted from one image. `tiles` holds `rows` rows of
/// `cols` values, each 0 (no tile) or 1 (tile present).
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    pub tiles: Vec<Vec<u8>>,
    pub start: Coord,
    pub end: Coord,
}

/// Classify a decoded image into a [`Level`].
///
/// The image must contain exactly one start marker. End markers are not
/// validated: with none present the end coordinate keeps its unset value
/// (row 0, col -1), with several the last one wins.
pub fn extract(img: &Image, source_path: &str) -> Result<Level> {
    let channels = img.channels();
    let mut start_index: i64 = -1;
    let mut start_count: u32 = 0;
    let mut end_index: i64 = -1;
    let mut end_count: u32 = 0;
    let mut active_count: u32 = 0;

    for (ordinal, offset) in (0..img.pixels.len()).step_by(channels).enumerate() {
        // For monochrome images the three-byte window spans the pixel and
        // its neighbors; it is clamped at the end of the buffer.
        let val: u32 = img.pixels[offset..]
            .iter()
            .take(3)
            .map(|&byte| u32::from(byte))
            .sum();
        if val == START_SUM {
            start_index = ordinal as i64;
            start_count += 1;
        } else if val == END_SUM {
            end_index = ordinal as i64;
            end_count += 1;
        } else if val == ACTIVE_SUM {
            active_count += 1;
        }
    }

    if start_count != 1 {
        return Err(ExtractError::InvalidTileCount {
            start_count,
            end_count,
        });
    }

    debug!(
        "{}: {} active tiles, {} end markers",
        source_path, active_count, end_count
    );

    let tiles = (0..img.height)
        .map(|y| {
            (0..img.width)
                .map(|x| u8::from(img.intensity(x, y) != 0))
                .collect()
        })
        .collect();

    let width = i64::from(img.width);
    Ok(Level {
        name: level_name(source_path).to_string(),
        rows: img.height,
        cols: img.width,
        tiles,
        start: Coord {
            row: start_index / width,
            col: start_index % width,
        },
        end: Coord {
            row: end_index / width,
            col: end_index % width,
        },
    })
}

/// Display name for a level: the source path with the directory part and the
/// trailing extension stripped. A path without any `.` yields an empty name.
pub fn level_name(path: &str) -> &str {
    let start = path.rfind(['/', '\\']).map_or(0, |sep| sep + 1);
    match path.rfind('.') {
        Some(end) if end >= start => &path[start..end],
        Some(_) => &path[start..],
        None => "",
    }
}

pub fn write_preamble<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "var levels = [")
}

pub fn write_trailer<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "];")
}

/// Append one level record to the output stream.
pub fn write_level<W: Write>(out: &mut W, level: &Level) -> io::Result<()> {
    writeln!(out, "  {{")?;
    writeln!(out, "    'name': '{}',", level.name)?;
    writeln!(out, "    'rows': {},", level.rows)?;
    writeln!(out, "    'cols': {},", level.cols)?;
    writeln!(out, "    'tiles': [")?;
    for row in &level.tiles {
        write!(out, "      [")?;
        for tile in row {
            write!(out, " {},", tile)?;
        }
        writeln!(out, " ],")?;
    }
    writeln!(out, "    ],")?;
    writeln!(
        out,
        "    'startTile': {{ 'row': {}, 'col': {} }},",
        level.start.row, level.start.col
    )?;
    writeln!(
        out,
        "    'endTile': {{ 'row': {}, 'col': {} }},",
        level.end.row, level.end.col
    )?;
    writeln!(out, "    'width': null,")?;
    writeln!(out, "    'depth': null,")?;
    writeln!(out, "  }},")
}

#[cfg(test)]
mod tests;
