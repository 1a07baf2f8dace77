//! Shiftrow engine: a grid of coloured blocks where the player slides rows sideways
//! (wrapping around) to line up three or more, which pop and let the blocks above fall.
//!
//! The host calls [`PuzzleField::advance`] once per frame and reads
//! [`PuzzleField::snapshot_blocks`] to draw.

pub mod block;
pub mod config;
pub mod error;
pub mod field;
pub mod grid;

pub use block::{Block, Kind, Point};
pub use config::{FieldConfig, FieldGeometry};
pub use error::FieldError;
pub use field::{BlockView, CursorDir, Intent, Phase, PuzzleField};
pub use grid::{Grid, ShiftDir};
