use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DecodeError {
    #[error("colormap TGA files aren't supported")]
    #[diagnostic(code(tga::colormap_error))]
    UnsupportedColormap { colormap_type: u8 },

    #[error("TGA files with a bit depth of {bit_depth} aren't supported")]
    #[diagnostic(code(tga::bit_depth_error))]
    UnsupportedBitDepth { bit_depth: u8 },

    #[error("unknown TGA image type (type code: {type_code})")]
    #[diagnostic(code(tga::image_type_error))]
    UnsupportedImageType { type_code: u8 },

    #[error("missing or invalid TGA image data (at byte {offset})")]
    #[diagnostic(code(tga::truncated_error))]
    TruncatedData { offset: u64 },

    #[error("TGA file reading error")]
    #[diagnostic(code(tga::io_error))]
    Io(#[from] std::io::Error),
}
