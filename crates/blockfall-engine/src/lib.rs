pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected shape matrix.
///
/// Returned by [`Shape::from_rows`] when a matrix cannot describe a piece.
/// The built-in catalog is checked at compile time and never produces this.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeError {
    #[display("shape has no rows")]
    Empty,
    #[display("shape row {row} has {len} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("shape is {width}x{height}, larger than {max}x{max}")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[display("shape has no occupied cells")]
    NoCells,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid has no rows or no columns")]
    Empty,
    #[display("grid row {row} has {len} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("invalid cell {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// Board dimensions outside the supported range.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least {min}x{min}, got {width}x{height}")]
    TooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[display("board must be at most {max}x{max}, got {width}x{height}")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece seed {input:?}: expected 32 hex characters")]
pub struct ParseSeedError {
    input: String,
}

impl ParseSeedError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }
}
