//! Grid: column-major slots of blocks, match windows, drop swaps and row rotation.

use crate::block::{Block, Kind, Point};
use crate::config::FieldGeometry;

/// Horizontal direction of a row shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDir {
    Left,
    Right,
}

impl ShiftDir {
    #[inline]
    pub fn delta(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Axes checked by the match window: (dx, dy).
const MATCH_AXES: [(isize, isize); 2] = [(0, 1), (1, 0)];

/// Fixed-size field of blocks indexed `[column, row]`. The last row is the reserved
/// buffer row: always empty, never matched, never dropped into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    geometry: FieldGeometry,
    cells: Vec<Block>,
}

impl Grid {
    /// All slots empty and at rest. `geometry` must come from a validated config.
    pub(crate) fn new(geometry: FieldGeometry) -> Self {
        let mut cells = Vec::with_capacity(geometry.width * geometry.height);
        for x in 0..geometry.width {
            for y in 0..geometry.height {
                cells.push(Block::empty(rest_position(&geometry, x, y)));
            }
        }
        Self { geometry, cells }
    }

    #[inline]
    pub fn geometry(&self) -> FieldGeometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }

    /// Where cell `(x, y)` sits when at rest.
    #[inline]
    pub fn rest_position(&self, x: usize, y: usize) -> Point {
        rest_position(&self.geometry, x, y)
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.geometry.height + y
    }

    /// True for playable cells. The reserved row and anything outside count as empty.
    #[inline]
    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.geometry.width
            && (y as usize) < self.geometry.playable_rows()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Block> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        self.cells.get(self.index(x, y))
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Block> {
        if x >= self.geometry.width || y >= self.geometry.height {
            return None;
        }
        let i = self.index(x, y);
        self.cells.get_mut(i)
    }

    /// Set the kind of a playable slot; ignored for the reserved row and out-of-range cells.
    pub fn set_kind(&mut self, x: usize, y: usize, kind: Kind) {
        if !self.in_bounds(x as isize, y as isize) {
            return;
        }
        if let Some(b) = self.get_mut(x, y) {
            b.kind = kind;
        }
    }

    /// Kind of a playable cell that is at rest; `None` for moving or out-of-bounds cells.
    fn settled_kind(&self, x: isize, y: isize) -> Option<Kind> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.get(x as usize, y as usize)
            .filter(|b| b.is_at_rest())
            .map(|b| b.kind)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + Clone {
        self.cells.iter()
    }

    /// Cells with their coordinates, column by column.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &Block)> + Clone {
        let h = self.geometry.height;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, b)| ((i / h, i % h), b))
    }

    pub fn all_at_rest(&self) -> bool {
        self.cells.iter().all(Block::is_at_rest)
    }

    pub fn step_all(&mut self, speed: i32) {
        for b in &mut self.cells {
            b.step(speed);
        }
    }

    pub fn any_matched(&self) -> bool {
        self.cells.iter().any(|b| b.matched)
    }

    /// Members of the window runs around an anchor (at most two cells each way per axis).
    /// Returns nothing unless the anchor is settled, non-empty and forms a run of three or more.
    pub fn match_window(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let (ax, ay) = (x as isize, y as isize);
        let kind = match self.settled_kind(ax, ay) {
            Some(k @ Kind::Color(_)) => k,
            _ => return Vec::new(),
        };
        let mut out = Vec::new();
        for (dx, dy) in MATCH_AXES {
            let mut run = vec![(x, y)];
            for sign in [-1, 1] {
                let near = (ax + sign * dx, ay + sign * dy);
                if self.settled_kind(near.0, near.1) != Some(kind) {
                    continue;
                }
                run.push((near.0 as usize, near.1 as usize));
                let far = (ax + 2 * sign * dx, ay + 2 * sign * dy);
                if self.settled_kind(far.0, far.1) == Some(kind) {
                    run.push((far.0 as usize, far.1 as usize));
                }
            }
            if run.len() >= 3 {
                out.extend(run);
            }
        }
        out
    }

    /// Run the match window on every playable cell and flag the members.
    /// Returns true if at least one block got flagged by this scan.
    pub fn mark_matches(&mut self) -> bool {
        let mut hits = Vec::new();
        for y in (0..self.geometry.playable_rows()).rev() {
            for x in 0..self.geometry.width {
                hits.extend(self.match_window(x, y));
            }
        }
        let found = !hits.is_empty();
        for (x, y) in hits {
            if let Some(b) = self.get_mut(x, y) {
                b.matched = true;
            }
        }
        found
    }

    /// First matched cell scanning bottom row up, right column to left.
    pub fn first_matched(&self) -> Option<(usize, usize)> {
        for y in (0..self.geometry.playable_rows()).rev() {
            for x in (0..self.geometry.width).rev() {
                if self.get(x, y).is_some_and(|b| b.matched) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Empty a matched slot in place; the block keeps its position so the slot stays settled.
    pub fn destroy(&mut self, x: usize, y: usize) {
        if let Some(b) = self.get_mut(x, y) {
            b.kind = Kind::Empty;
            b.matched = false;
        }
    }

    /// A settled, non-empty block with an empty playable cell directly below.
    pub fn can_drop(&self, x: usize, y: usize) -> bool {
        let (ix, iy) = (x as isize, y as isize);
        if !matches!(self.settled_kind(ix, iy), Some(Kind::Color(_))) {
            return false;
        }
        self.in_bounds(ix, iy + 1) && self.get(x, y + 1).is_some_and(|b| b.kind.is_empty())
    }

    /// Swap `(x, y)` with the empty slot below. The slots change now; targets move one
    /// cell (upper down, empty up) and positions catch up over the next ticks.
    pub fn drop_cell(&mut self, x: usize, y: usize) {
        let upper = self.index(x, y);
        let lower = self.index(x, y + 1);
        self.cells.swap(upper, lower);
        let cell = self.geometry.cell_size;
        self.cells[lower].target.y += cell;
        self.cells[upper].target.y -= cell;
    }

    /// Drop every droppable cell, bottom row up, so a column falls together. Returns the count.
    pub fn drop_all(&mut self) -> usize {
        let mut dropped = 0;
        for y in (0..self.geometry.playable_rows()).rev() {
            for x in 0..self.geometry.width {
                if self.can_drop(x, y) {
                    self.drop_cell(x, y);
                    dropped += 1;
                }
            }
        }
        dropped
    }

    /// Retarget every block in `row` one cell in `dir`, wrap the edge block around, and
    /// rotate the row's slots. Returns ghosts for blocks that slid off the field.
    pub fn shift_row(&mut self, row: usize, dir: ShiftDir) -> Vec<Block> {
        assert!(self.geometry.width > 0, "shift on a field with no columns");
        assert!(
            row < self.geometry.playable_rows(),
            "shift row {row} outside playable rows"
        );
        let cell = self.geometry.cell_size;
        let right_edge = self.geometry.pixel_width();
        let offset = dir.delta() * cell;
        let mut ghosts = Vec::new();

        let row_slots: Vec<usize> = (0..self.geometry.width)
            .map(|x| self.index(x, row))
            .collect();
        for &i in &row_slots {
            let block = &mut self.cells[i];
            let dest = block.target.x + offset;
            let (wrapped, entry_x) = if dest >= right_edge {
                (0, -cell)
            } else if dest < 0 {
                (right_edge - cell, right_edge)
            } else {
                block.target.x = dest;
                continue;
            };
            if !block.kind.is_empty() {
                let mut ghost = Block::new(block.position, block.kind);
                ghost.target = Point::new(dest, block.target.y);
                ghosts.push(ghost);
            }
            block.position.x = entry_x;
            block.target.x = wrapped;
        }

        let mut rotated: Vec<Block> = row_slots.iter().map(|&i| self.cells[i]).collect();
        match dir {
            ShiftDir::Right => rotated.rotate_right(1),
            ShiftDir::Left => rotated.rotate_left(1),
        }
        for (&i, b) in row_slots.iter().zip(rotated) {
            self.cells[i] = b;
        }
        ghosts
    }
}

#[inline]
fn rest_position(geometry: &FieldGeometry, x: usize, y: usize) -> Point {
    Point::new(
        x as i32 * geometry.cell_size,
        y as i32 * geometry.cell_size,
    )
}
