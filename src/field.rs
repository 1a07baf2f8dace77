//! PuzzleField: phase state machine, ghosts, cursor and the per-tick `advance`.
//!
//! One `advance()` is one tick: consume at most one queued intent, step every block
//! and ghost once, then run the current phase's arm, which picks the next phase.

use std::collections::VecDeque;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::block::{Block, Kind, Point};
use crate::config::{FieldConfig, FieldGeometry};
use crate::error::FieldError;
use crate::grid::{Grid, ShiftDir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Settled board: small drops plus the match scan.
    Normal,
    /// A row is sliding.
    Shift,
    /// Gravity cascade.
    Drop,
    /// Popping matched blocks one per tick.
    Destroy,
}

impl Phase {
    /// Whether a row shift is honoured in this phase.
    #[inline]
    pub fn accepts_shift(self) -> bool {
        matches!(self, Self::Normal | Self::Drop)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Shift => "Shift",
            Self::Drop => "Drop",
            Self::Destroy => "Destroy",
        }
    }
}

/// Vertical direction of a cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorDir {
    Up,
    Down,
}

/// Player input waiting for the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveCursor(CursorDir),
    ShiftRow(ShiftDir),
}

/// What the renderer needs for one visible block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockView {
    pub position: Point,
    pub color: u8,
    pub matched: bool,
    pub ghost: bool,
}

#[derive(Debug, Clone)]
pub struct PuzzleField {
    config: FieldConfig,
    grid: Grid,
    ghosts: Vec<Block>,
    cursor_row: usize,
    phase: Phase,
    intents: VecDeque<Intent>,
    last_destroyed: Option<(usize, usize)>,
    seed: Option<u64>,
}

impl PuzzleField {
    /// Build a field and fill every playable cell from a generator seeded with `seed`.
    pub fn initialize(config: FieldConfig, seed: u64) -> Result<Self, FieldError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut field = Self::with_rng(config, &mut rng)?;
        field.seed = Some(seed);
        info!(
            "field {}x{} ({} colours) seeded with {}",
            config.width, config.height, config.color_count, seed
        );
        Ok(field)
    }

    /// Build a field, drawing each playable cell's colour uniformly from `rng`.
    pub fn with_rng<R: Rng>(config: FieldConfig, rng: &mut R) -> Result<Self, FieldError> {
        let mut field = Self::empty(config)?;
        for x in 0..config.width {
            for y in 0..field.field_geometry().playable_rows() {
                let color = rng.gen_range(0..config.color_count);
                field.grid.set_kind(x, y, Kind::Color(color));
            }
        }
        Ok(field)
    }

    /// Build a field from explicit rows (top row first, playable rows only).
    pub fn from_rows(config: FieldConfig, rows: &[Vec<Kind>]) -> Result<Self, FieldError> {
        let mut field = Self::empty(config)?;
        let playable = field.field_geometry().playable_rows();
        if rows.len() != playable {
            return Err(FieldError::RowCount {
                got: rows.len(),
                expected: playable,
            });
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != config.width {
                return Err(FieldError::RowWidth {
                    row: y,
                    got: row.len(),
                    expected: config.width,
                });
            }
            for (x, &kind) in row.iter().enumerate() {
                if let Kind::Color(color) = kind {
                    if color >= config.color_count {
                        return Err(FieldError::ColorOutOfRange {
                            x,
                            y,
                            color,
                            color_count: config.color_count,
                        });
                    }
                }
                field.grid.set_kind(x, y, kind);
            }
        }
        Ok(field)
    }

    fn empty(config: FieldConfig) -> Result<Self, FieldError> {
        config.validate()?;
        let geometry = config.geometry();
        let cursor_row = (config.height / 2)
            .saturating_sub(1)
            .min(geometry.max_cursor_row());
        Ok(Self {
            config,
            grid: Grid::new(geometry),
            ghosts: Vec::new(),
            cursor_row,
            phase: Phase::Normal,
            intents: VecDeque::new(),
            last_destroyed: None,
            seed: None,
        })
    }

    pub fn config(&self) -> FieldConfig {
        self.config
    }

    pub fn field_geometry(&self) -> FieldGeometry {
        self.grid.geometry()
    }

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    /// Seed the board was generated from, when built by [`PuzzleField::initialize`].
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn block_at(&self, x: usize, y: usize) -> Option<&Block> {
        self.grid.get(x, y)
    }

    pub fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }

    /// Cell emptied during the most recent tick, if any.
    pub fn last_destroyed(&self) -> Option<(usize, usize)> {
        self.last_destroyed
    }

    pub fn request_cursor_move(&mut self, dir: CursorDir) {
        self.intents.push_back(Intent::MoveCursor(dir));
    }

    pub fn request_row_shift(&mut self, dir: ShiftDir) {
        self.intents.push_back(Intent::ShiftRow(dir));
    }

    /// Every non-empty grid block followed by every ghost. Cloning the iterator restarts it.
    pub fn snapshot_blocks(&self) -> impl Iterator<Item = BlockView> + Clone + '_ {
        let grid = self.grid.blocks().filter_map(|b| view(b, false));
        let ghosts = self.ghosts.iter().filter_map(|b| view(b, true));
        grid.chain(ghosts)
    }

    /// Run one tick.
    pub fn advance(&mut self) {
        self.last_destroyed = None;
        if let Some(intent) = self.intents.pop_front() {
            self.apply_intent(intent);
        }

        let speed = self.config.step;
        self.grid.step_all(speed);
        for ghost in &mut self.ghosts {
            ghost.step(speed);
        }
        self.ghosts.retain(Block::is_moving);

        let next = match self.phase {
            Phase::Normal => tick_normal(&mut self.grid),
            Phase::Shift => tick_shift(&self.grid),
            Phase::Drop => tick_drop(&mut self.grid),
            Phase::Destroy => {
                let (next, destroyed) = tick_destroy(&mut self.grid);
                if let Some((x, y)) = destroyed {
                    debug!("destroyed block at ({x}, {y})");
                }
                self.last_destroyed = destroyed;
                next
            }
        };
        self.set_phase(next);
    }

    fn set_phase(&mut self, next: Phase) {
        if next != self.phase {
            debug!("phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    fn apply_intent(&mut self, intent: Intent) {
        match intent {
            Intent::MoveCursor(dir) => self.move_cursor(dir),
            Intent::ShiftRow(dir) if self.phase.accepts_shift() => self.shift_row(dir),
            Intent::ShiftRow(dir) => {
                trace!("ignored {:?} shift during {:?}", dir, self.phase);
            }
        }
    }

    /// Move the cursor one row; moves past either end are no-ops.
    fn move_cursor(&mut self, dir: CursorDir) {
        let max = self.field_geometry().max_cursor_row();
        let next = match dir {
            CursorDir::Up => self.cursor_row.checked_sub(1),
            CursorDir::Down => Some(self.cursor_row + 1).filter(|&r| r <= max),
        };
        if let Some(row) = next {
            trace!("cursor {} -> {}", self.cursor_row, row);
            self.cursor_row = row;
        }
        debug_assert!(self.cursor_row <= max);
    }

    fn shift_row(&mut self, dir: ShiftDir) {
        debug_assert!(self.cursor_row <= self.field_geometry().max_cursor_row());
        trace!("shift row {} {:?}", self.cursor_row, dir);
        let ghosts = self.grid.shift_row(self.cursor_row, dir);
        self.ghosts.extend(ghosts);
        self.set_phase(Phase::Shift);
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}

fn view(block: &Block, ghost: bool) -> Option<BlockView> {
    block.kind.color().map(|color| BlockView {
        position: block.position,
        color,
        matched: block.matched,
        ghost,
    })
}

/// Settle stray holes under resting blocks, then flag runs.
fn tick_normal(grid: &mut Grid) -> Phase {
    for y in (0..grid.geometry().playable_rows()).rev() {
        for x in 0..grid.width() {
            if grid.can_drop(x, y) {
                grid.drop_cell(x, y);
            }
        }
    }
    if grid.mark_matches() {
        Phase::Destroy
    } else {
        Phase::Normal
    }
}

/// Wait for the row to land; ghosts may still be sliding off.
fn tick_shift(grid: &Grid) -> Phase {
    if grid.all_at_rest() {
        Phase::Drop
    } else {
        Phase::Shift
    }
}

fn tick_drop(grid: &mut Grid) -> Phase {
    if !grid.all_at_rest() {
        return Phase::Drop;
    }
    if grid.drop_all() > 0 {
        Phase::Drop
    } else {
        Phase::Normal
    }
}

/// Pop at most one matched block per tick.
fn tick_destroy(grid: &mut Grid) -> (Phase, Option<(usize, usize)>) {
    match grid.first_matched() {
        Some((x, y)) => {
            grid.destroy(x, y);
            (Phase::Destroy, Some((x, y)))
        }
        None => (Phase::Drop, None),
    }
}
