use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ExtractError {
    #[error("{start_count} start tiles and {end_count} end tiles")]
    #[diagnostic(code(level::tile_count_error))]
    InvalidTileCount { start_count: u32, end_count: u32 },
}
