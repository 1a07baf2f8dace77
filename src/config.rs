//! Field configuration and the read-only geometry handed to the presentation layer.

use crate::error::FieldError;

/// Columns of the classic field.
pub const DEFAULT_WIDTH: usize = 6;
/// Rows of the classic field, including the reserved bottom row.
pub const DEFAULT_HEIGHT: usize = 13;
pub const DEFAULT_COLORS: u8 = 4;
/// Animation units per cell.
pub const DEFAULT_CELL_SIZE: i32 = 32;
/// Animation units moved per tick on each axis.
pub const DEFAULT_STEP: i32 = 4;
/// Largest width the terminal front end lays out.
pub const MAX_WIDTH: usize = 64;
/// Largest height the terminal front end lays out.
pub const MAX_HEIGHT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    pub width: usize,
    /// Total rows; the last one is the reserved buffer row.
    pub height: usize,
    pub color_count: u8,
    pub cell_size: i32,
    pub step: i32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_COLORS)
    }
}

impl FieldConfig {
    pub fn new(width: usize, height: usize, color_count: u8) -> Self {
        Self {
            width,
            height,
            color_count,
            cell_size: DEFAULT_CELL_SIZE,
            step: DEFAULT_STEP,
        }
    }

    pub fn with_animation(mut self, cell_size: i32, step: i32) -> Self {
        self.cell_size = cell_size;
        self.step = step;
        self
    }

    /// Reject setups the engine cannot run: empty fields, no colours, a step
    /// that does not evenly divide the cell size, or a field whose coordinates
    /// overflow `i32` animation units.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.width == 0 {
            return Err(FieldError::ZeroWidth(self.width));
        }
        if self.height < 2 {
            return Err(FieldError::TooShort(self.height));
        }
        if self.color_count == 0 {
            return Err(FieldError::NoColors);
        }
        if self.step <= 0 {
            return Err(FieldError::InvalidStep(self.step));
        }
        if self.cell_size <= 0 {
            return Err(FieldError::InvalidCellSize(self.cell_size));
        }
        if self.cell_size % self.step != 0 {
            return Err(FieldError::StepNotDivisor {
                cell_size: self.cell_size,
                step: self.step,
            });
        }
        // Wrapping blocks and ghosts reach one cell past either edge.
        let span = |cells: usize| {
            i32::try_from(cells)
                .ok()
                .and_then(|n| n.checked_add(1))
                .and_then(|n| n.checked_mul(self.cell_size))
        };
        if span(self.width).is_none() || span(self.height).is_none() {
            return Err(FieldError::TooLarge {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }

    pub fn geometry(&self) -> FieldGeometry {
        FieldGeometry {
            width: self.width,
            height: self.height,
            cell_size: self.cell_size,
            color_count: self.color_count,
        }
    }
}

/// Layout facts the renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGeometry {
    pub width: usize,
    pub height: usize,
    pub cell_size: i32,
    pub color_count: u8,
}

impl FieldGeometry {
    /// Rows that hold blocks (everything above the reserved row).
    #[inline]
    pub fn playable_rows(&self) -> usize {
        self.height - 1
    }

    /// Largest valid cursor row.
    #[inline]
    pub fn max_cursor_row(&self) -> usize {
        self.height - 2
    }

    /// Width of the field in animation units.
    #[inline]
    pub fn pixel_width(&self) -> i32 {
        self.width as i32 * self.cell_size
    }

    /// Height of the playable area in animation units.
    #[inline]
    pub fn pixel_height(&self) -> i32 {
        self.playable_rows() as i32 * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = FieldConfig::default();
        assert_eq!(c.validate(), Ok(()));
        assert_eq!(c.geometry().playable_rows(), 12);
        assert_eq!(c.geometry().max_cursor_row(), 11);
    }

    #[test]
    fn test_rejects_step_not_dividing_cell() {
        let c = FieldConfig::default().with_animation(32, 6);
        assert_eq!(
            c.validate(),
            Err(FieldError::StepNotDivisor {
                cell_size: 32,
                step: 6
            })
        );
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        assert_eq!(
            FieldConfig::new(0, 13, 4).validate(),
            Err(FieldError::ZeroWidth(0))
        );
        assert_eq!(
            FieldConfig::new(6, 1, 4).validate(),
            Err(FieldError::TooShort(1))
        );
        assert_eq!(FieldConfig::new(6, 13, 0).validate(), Err(FieldError::NoColors));
        assert_eq!(
            FieldConfig::default().with_animation(32, 0).validate(),
            Err(FieldError::InvalidStep(0))
        );
    }

    #[test]
    fn test_rejects_coordinates_past_i32() {
        let huge_cell = FieldConfig::default().with_animation(2_147_483_644, 4);
        assert_eq!(
            huge_cell.validate(),
            Err(FieldError::TooLarge {
                width: 6,
                height: 13,
                cell_size: 2_147_483_644
            })
        );
        let wide = FieldConfig::new(usize::MAX, 13, 4).with_animation(1, 1);
        assert!(matches!(wide.validate(), Err(FieldError::TooLarge { .. })));
        let tall = FieldConfig::new(6, 70_000_000, 4);
        assert!(matches!(tall.validate(), Err(FieldError::TooLarge { .. })));
        // (6 + 1) * 306_783_378 is the last multiple of 7 under i32::MAX.
        let edge = FieldConfig::new(6, 6, 4).with_animation(306_783_378, 2);
        assert_eq!(edge.validate(), Ok(()));
    }

    #[test]
    fn test_geometry_pixels() {
        let g = FieldConfig::new(6, 13, 4).geometry();
        assert_eq!(g.pixel_width(), 192);
        assert_eq!(g.pixel_height(), 384);
    }
}
