//! Setup errors. Runtime ticks never fail; these only come out of constructors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field width must be at least 1 column (got {0})")]
    ZeroWidth(usize),
    #[error("field height must be at least 2 rows, one playable plus the reserved row (got {0})")]
    TooShort(usize),
    #[error("colour count must be at least 1")]
    NoColors,
    #[error("step speed must be positive (got {0})")]
    InvalidStep(i32),
    #[error("cell size must be positive (got {0})")]
    InvalidCellSize(i32),
    #[error("step speed {step} does not evenly divide cell size {cell_size}; blocks would never settle")]
    StepNotDivisor { cell_size: i32, step: i32 },
    #[error("a {width}x{height} field with cell size {cell_size} does not fit in animation units")]
    TooLarge {
        width: usize,
        height: usize,
        cell_size: i32,
    },
    #[error("row {row} has {got} cells, expected {expected}")]
    RowWidth {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("{got} rows given, field has {expected} playable rows")]
    RowCount { got: usize, expected: usize },
    #[error("colour {color} at ({x}, {y}) is out of range for {color_count} colours")]
    ColorOutOfRange {
        x: usize,
        y: usize,
        color: u8,
        color_count: u8,
    },
}
