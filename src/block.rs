//! Block: one cell's animation state (position, target, kind, matched flag).

/// Point in field-local animation space. Cell `(x, y)` rests at `(x * cell_size, y * cell_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What occupies a slot: nothing, or a block of colour index `0..color_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    #[default]
    Empty,
    Color(u8),
}

impl Kind {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    /// Colour index, or `None` for an empty slot.
    #[inline]
    pub fn color(self) -> Option<u8> {
        match self {
            Self::Empty => None,
            Self::Color(c) => Some(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub position: Point,
    pub target: Point,
    pub kind: Kind,
    pub matched: bool,
}

impl Block {
    /// A block at rest at `position`.
    pub fn new(position: Point, kind: Kind) -> Self {
        Self {
            position,
            target: position,
            kind,
            matched: false,
        }
    }

    pub fn empty(position: Point) -> Self {
        Self::new(position, Kind::Empty)
    }

    /// True while the block has not reached its target.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.position != self.target
    }

    #[inline]
    pub fn is_at_rest(&self) -> bool {
        !self.is_moving()
    }

    /// Move `speed` units toward the target on each axis independently.
    ///
    /// Not clamped to the remaining distance: a delta that is not a multiple of
    /// `speed` oscillates around the target. Callers keep every delta a multiple.
    pub fn step(&mut self, speed: i32) {
        self.position.x += axis_step(self.position.x, self.target.x, speed);
        self.position.y += axis_step(self.position.y, self.target.y, speed);
    }
}

#[inline]
fn axis_step(current: i32, target: i32, speed: i32) -> i32 {
    match current.cmp(&target) {
        std::cmp::Ordering::Less => speed,
        std::cmp::Ordering::Greater => -speed,
        std::cmp::Ordering::Equal => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_is_at_rest() {
        let b = Block::new(Point::new(32, 64), Kind::Color(1));
        assert!(!b.is_moving());
        assert!(!b.matched);
    }

    #[test]
    fn test_step_reaches_target_without_overshoot() {
        let mut b = Block::new(Point::new(0, 0), Kind::Color(0));
        b.target = Point::new(32, -16);
        let mut steps = 0;
        while b.is_moving() {
            b.step(4);
            steps += 1;
            assert!(b.position.x <= 32 && b.position.y >= -16);
        }
        // Axes move independently; the longer one sets the count.
        assert_eq!(steps, 8);
        assert_eq!(b.position, b.target);
    }

    #[test]
    fn test_step_at_rest_is_noop() {
        let mut b = Block::empty(Point::new(8, 8));
        b.step(4);
        assert_eq!(b.position, Point::new(8, 8));
    }

    #[test]
    fn test_step_oscillates_on_uneven_distance() {
        let mut b = Block::new(Point::new(0, 0), Kind::Color(2));
        b.target = Point::new(6, 0);
        b.step(4);
        assert_eq!(b.position.x, 4);
        b.step(4);
        assert_eq!(b.position.x, 8);
        b.step(4);
        assert_eq!(b.position.x, 4);
        assert!(b.is_moving());
    }

    #[test]
    fn test_kind_color() {
        assert_eq!(Kind::Empty.color(), None);
        assert_eq!(Kind::Color(3).color(), Some(3));
        assert!(Kind::default().is_empty());
    }
}
