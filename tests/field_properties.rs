//! Property tests: animation convergence, shift cyclicity, cascade termination.

use proptest::prelude::*;
use shiftrow::{Block, FieldConfig, Kind, Phase, Point, PuzzleField, ShiftDir};

/// No three equal colours next to each other, counting the wrap from last to first.
fn has_cyclic_triple(row: &[u8]) -> bool {
    let n = row.len();
    (0..n).any(|i| row[i] == row[(i + 1) % n] && row[i] == row[(i + 2) % n])
}

fn settle(field: &mut PuzzleField) {
    for _ in 0..20_000 {
        field.advance();
        if field.current_phase() == Phase::Normal
            && field.grid().all_at_rest()
            && field.ghost_count() == 0
        {
            return;
        }
    }
    panic!("field did not settle");
}

proptest! {
    #[test]
    fn step_reaches_target_in_distance_over_speed(
        speed in prop::sample::select(vec![1i32, 2, 4, 8, 16]),
        start_x in -50i32..50,
        start_y in -50i32..50,
        kx in -20i32..20,
        ky in -20i32..20,
    ) {
        let start = Point::new(start_x * speed, start_y * speed);
        let target = Point::new(start.x + kx * speed, start.y + ky * speed);
        let mut block = Block::new(start, Kind::Color(0));
        block.target = target;

        let expected = kx.unsigned_abs().max(ky.unsigned_abs());
        for _ in 0..expected {
            prop_assert!(block.is_moving());
            block.step(speed);
            // Never past the target on either axis.
            prop_assert!((block.position.x - start.x).abs() <= (target.x - start.x).abs());
            prop_assert!((block.position.y - start.y).abs() <= (target.y - start.y).abs());
        }
        prop_assert_eq!(block.position, target);
        prop_assert!(!block.is_moving());
    }

    #[test]
    fn shift_then_unshift_restores_row(
        row in prop::collection::vec(0u8..4, 3..10)
            .prop_filter("row must not contain a cyclic run of three", |r| !has_cyclic_triple(r)),
        right_first in any::<bool>(),
    ) {
        let width = row.len();
        let kinds: Vec<Kind> = row.iter().copied().map(Kind::Color).collect();
        let mut field = PuzzleField::from_rows(FieldConfig::new(width, 2, 4), &[kinds.clone()]).unwrap();
        let before = field.grid().clone();

        let (first, second) = if right_first {
            (ShiftDir::Right, ShiftDir::Left)
        } else {
            (ShiftDir::Left, ShiftDir::Right)
        };
        field.request_row_shift(first);
        settle(&mut field);
        field.request_row_shift(second);
        settle(&mut field);

        let after: Vec<Kind> = (0..width).map(|x| field.block_at(x, 0).unwrap().kind).collect();
        prop_assert_eq!(after, kinds);
        for x in 0..width {
            let now = field.block_at(x, 0).unwrap();
            let was = before.get(x, 0).unwrap();
            prop_assert_eq!(now.target, was.target);
            prop_assert_eq!(now.position, was.position);
        }
    }

    #[test]
    fn cascades_terminate_and_leave_no_holes_under_blocks(
        width in 1usize..7,
        rows in 1usize..8,
        seed in any::<u64>(),
        holes in prop::collection::vec(any::<bool>(), 49),
    ) {
        let config = FieldConfig::new(width, rows + 1, 3);
        let base = PuzzleField::initialize(config, seed).unwrap();
        let board: Vec<Vec<Kind>> = (0..rows)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if holes[y * 7 + x] {
                            Kind::Empty
                        } else {
                            base.block_at(x, y).unwrap().kind
                        }
                    })
                    .collect()
            })
            .collect();
        let mut field = PuzzleField::from_rows(config, &board).unwrap();
        settle(&mut field);

        for x in 0..width {
            for y in 0..rows.saturating_sub(1) {
                let here = field.block_at(x, y).unwrap().kind;
                let below = field.block_at(x, y + 1).unwrap().kind;
                prop_assert!(here.is_empty() || !below.is_empty());
            }
        }
        // A settled board stays put.
        let snapshot = field.grid().clone();
        for _ in 0..50 {
            field.advance();
        }
        prop_assert_eq!(field.current_phase(), Phase::Normal);
        prop_assert_eq!(field.grid(), &snapshot);
    }
}
