pub mod error;

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::DecodeError;

pub type Result<T> = core::result::Result<T, DecodeError>;

/// Channel offsets within a multi-channel pixel, in TGA storage order.
pub const BLUE: usize = 0;
pub const GREEN: usize = 1;
pub const RED: usize = 2;
pub const ALPHA: usize = 3;
/// The only channel of a monochrome pixel.
pub const GRAY: usize = 0;

/// Size of the fixed TGA header (in bytes)
pub const HEADER_SIZE: usize = 18;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    Gray,
    Bgr,
    Bgra,
}

impl PixelLayout {
    pub fn from_bit_depth(bit_depth: u8) -> Option<Self> {
        match bit_depth {
            8 => Some(Self::Gray),
            24 => Some(Self::Bgr),
            32 => Some(Self::Bgra),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Bgr => 3,
            Self::Bgra => 4,
        }
    }
}

/// A fully decoded raster. `pixels` always holds exactly
/// `width * height * channels` bytes in row-major order, channels stored
/// Blue, Green, Red, [Alpha].
#[derive(Clone, Debug)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    pub pixels: Vec<u8>,
}

impl Image {
    pub fn channels(&self) -> usize {
        self.layout.bytes_per_pixel()
    }

    pub fn at(&self, x: u32, y: u32, channel: usize) -> u8 {
        assert!(x < self.width);
        assert!(y < self.height);
        assert!(channel < self.channels());
        let row_stride = self.width as usize * self.channels();
        let col_stride = self.channels();
        self.pixels[y as usize * row_stride + x as usize * col_stride + channel]
    }

    /// Single grayscale value of a pixel. For color pixels this is the
    /// average of the three color channels; alpha never contributes.
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        match self.layout {
            PixelLayout::Gray => self.at(x, y, GRAY),
            PixelLayout::Bgr | PixelLayout::Bgra => {
                let r = u16::from(self.at(x, y, RED));
                let g = u16::from(self.at(x, y, GREEN));
                let b = u16::from(self.at(x, y, BLUE));
                ((r + g + b) / 3) as u8
            }
        }
    }
}

/// Decode a TGA byte stream into an [`Image`].
///
/// Supports uncompressed and run-length-encoded true-color and monochrome
/// files at 8, 24 or 32 bits per pixel. Colormapped files are rejected.
pub fn decode<R: Read>(reader: R) -> Result<Image> {
    let mut stream = Stream {
        inner: reader,
        offset: 0,
    };

    let mut header = [0u8; HEADER_SIZE];
    stream.read_exact(&mut header)?;

    let colormap_type = header[1];
    if colormap_type != 0 {
        return Err(DecodeError::UnsupportedColormap { colormap_type });
    }

    let width = u32::from(LittleEndian::read_u16(&header[0xC..0xE]));
    let height = u32::from(LittleEndian::read_u16(&header[0xE..0x10]));
    let bit_depth = header[0x10];
    let layout = PixelLayout::from_bit_depth(bit_depth)
        .ok_or(DecodeError::UnsupportedBitDepth { bit_depth })?;

    let num_pixels = width as usize * height as usize;
    let bytes_per_pixel = layout.bytes_per_pixel();
    let mut pixels = vec![0u8; num_pixels * bytes_per_pixel];

    match header[2] {
        // True-color or monochrome, uncompressed
        2 | 3 => stream.read_exact(&mut pixels)?,
        // True-color or monochrome, RLE compressed
        10 | 11 => read_rle(&mut stream, num_pixels, bytes_per_pixel, &mut pixels)?,
        type_code => return Err(DecodeError::UnsupportedImageType { type_code }),
    }

    debug!(
        "decoded {}x{} TGA image, {} channels",
        width, height, bytes_per_pixel
    );

    Ok(Image {
        width,
        height,
        layout,
        pixels,
    })
}

fn read_rle<R: Read>(
    stream: &mut Stream<R>,
    num_pixels: usize,
    bytes_per_pixel: usize,
    pixels: &mut [u8],
) -> Result<()> {
    let mut pixel = [0u8; 4];
    let mut written = 0usize;
    while written < num_pixels {
        let packet = stream.read_byte()?;
        let count = usize::from(packet & 0x7F) + 1;
        // A packet may declare more pixels than the image has left; the
        // overrun is clamped to the end of the buffer.
        let run = count.min(num_pixels - written);
        if packet & 0x80 != 0 {
            let pixel = &mut pixel[..bytes_per_pixel];
            stream.read_exact(pixel)?;
            for _ in 0..run {
                let start = written * bytes_per_pixel;
                pixels[start..start + bytes_per_pixel].copy_from_slice(pixel);
                written += 1;
            }
        } else {
            let start = written * bytes_per_pixel;
            stream.read_exact(&mut pixels[start..start + run * bytes_per_pixel])?;
            written += run;
            // Consume the declared remainder so a clamped packet is still
            // held to delivering every byte it announced.
            let mut scratch = [0u8; 4];
            for _ in run..count {
                stream.read_exact(&mut scratch[..bytes_per_pixel])?;
            }
        }
    }
    Ok(())
}

struct Stream<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> Stream<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(DecodeError::TruncatedData {
                    offset: self.offset,
                })
            }
            Err(err) => Err(DecodeError::Io(err)),
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
