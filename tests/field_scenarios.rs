//! Scenario tests for the puzzle field, driven through the public API only.

use shiftrow::{CursorDir, FieldConfig, Kind, Phase, Point, PuzzleField, ShiftDir};

const A: Kind = Kind::Color(0);
const B: Kind = Kind::Color(1);
const C: Kind = Kind::Color(2);

fn row_kinds(field: &PuzzleField, y: usize) -> Vec<Kind> {
    (0..field.field_geometry().width)
        .map(|x| field.block_at(x, y).unwrap().kind)
        .collect()
}

/// Advance until the board is back in Normal with nothing moving.
fn settle(field: &mut PuzzleField) -> usize {
    for ticks in 1..=10_000 {
        field.advance();
        if field.current_phase() == Phase::Normal
            && field.grid().all_at_rest()
            && field.ghost_count() == 0
        {
            return ticks;
        }
    }
    panic!("field did not settle");
}

#[test]
fn test_initialize_colours_in_range_and_reserved_row_empty() {
    for seed in [0, 1, 99, 123_456_789] {
        let config = FieldConfig::new(7, 9, 5);
        let field = PuzzleField::initialize(config, seed).unwrap();
        for x in 0..7 {
            for y in 0..8 {
                match field.block_at(x, y).unwrap().kind {
                    Kind::Color(c) => assert!(c < 5, "colour {c} at ({x}, {y})"),
                    Kind::Empty => panic!("playable cell ({x}, {y}) left empty"),
                }
            }
            assert_eq!(field.block_at(x, 8).unwrap().kind, Kind::Empty);
        }
    }
}

#[test]
fn test_reserved_row_stays_empty_while_playing() {
    let mut field = PuzzleField::initialize(FieldConfig::default(), 2024).unwrap();
    let bottom = field.field_geometry().height - 1;
    for i in 0..600 {
        if i % 10 == 0 {
            field.request_row_shift(if i % 20 == 0 {
                ShiftDir::Left
            } else {
                ShiftDir::Right
            });
        }
        if i % 35 == 0 {
            field.request_cursor_move(CursorDir::Down);
        }
        field.advance();
        for x in 0..field.field_geometry().width {
            assert_eq!(field.block_at(x, bottom).unwrap().kind, Kind::Empty);
        }
    }
}

#[test]
fn test_bottom_row_of_three_is_the_only_match() {
    let rows = vec![vec![A, A, B], vec![A, B, B], vec![C, C, C]];
    let mut field = PuzzleField::from_rows(FieldConfig::new(3, 4, 3), &rows).unwrap();
    field.advance();

    assert_eq!(field.current_phase(), Phase::Destroy);
    let matched: Vec<(usize, usize)> = field
        .grid()
        .cells()
        .filter(|(_, b)| b.matched)
        .map(|(pos, _)| pos)
        .collect();
    assert_eq!(matched, vec![(0, 2), (1, 2), (2, 2)]);
}

#[test]
fn test_matched_row_pops_and_column_falls() {
    let rows = vec![vec![A, A, B], vec![A, B, B], vec![C, C, C]];
    let mut field = PuzzleField::from_rows(FieldConfig::new(3, 4, 3), &rows).unwrap();
    settle(&mut field);

    assert_eq!(row_kinds(&field, 0), vec![Kind::Empty; 3]);
    assert_eq!(row_kinds(&field, 1), vec![A, A, B]);
    assert_eq!(row_kinds(&field, 2), vec![A, B, B]);
    for ((x, y), b) in field.grid().cells() {
        assert_eq!(b.position, field.grid().rest_position(x, y));
        assert!(!b.matched);
    }
}

#[test]
fn test_shift_right_rotates_row_with_one_ghost() {
    let row: Vec<Kind> = (0..6).map(Kind::Color).collect();
    let mut field = PuzzleField::from_rows(FieldConfig::new(6, 2, 6), &[row]).unwrap();
    assert_eq!(field.cursor_row(), 0);

    field.request_row_shift(ShiftDir::Right);
    field.advance();
    assert_eq!(field.current_phase(), Phase::Shift);
    assert_eq!(field.ghost_count(), 1);

    settle(&mut field);
    let expected: Vec<Kind> = [5, 0, 1, 2, 3, 4].into_iter().map(Kind::Color).collect();
    assert_eq!(row_kinds(&field, 0), expected);
    assert_eq!(field.ghost_count(), 0);
}

#[test]
fn test_wrapped_block_enters_from_far_side() {
    let row: Vec<Kind> = (0..6).map(Kind::Color).collect();
    let mut field = PuzzleField::from_rows(FieldConfig::new(6, 2, 6), &[row]).unwrap();
    field.request_row_shift(ShiftDir::Left);
    field.advance();

    let wrapped = field.block_at(5, 0).unwrap();
    assert_eq!(wrapped.kind, Kind::Color(0));
    assert_eq!(wrapped.target, Point::new(160, 0));
    // Teleported to one cell past the right edge, then one step in.
    assert_eq!(wrapped.position, Point::new(192 - 4, 0));

    let ghost = field.snapshot_blocks().find(|v| v.ghost).unwrap();
    assert_eq!(ghost.color, 0);
    assert_eq!(ghost.position, Point::new(-4, 0));
}

#[test]
fn test_snapshot_is_restartable() {
    let field = PuzzleField::initialize(FieldConfig::default(), 5).unwrap();
    let snap = field.snapshot_blocks();
    let first: Vec<_> = snap.clone().collect();
    let second: Vec<_> = snap.collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 6 * 12);
}

#[test]
fn test_cursor_never_leaves_playable_rows() {
    let mut field = PuzzleField::initialize(FieldConfig::default(), 11).unwrap();
    for _ in 0..30 {
        field.request_cursor_move(CursorDir::Down);
        field.advance();
    }
    assert_eq!(field.cursor_row(), field.field_geometry().max_cursor_row());
    for _ in 0..30 {
        field.request_cursor_move(CursorDir::Up);
        field.advance();
    }
    assert_eq!(field.cursor_row(), 0);
}
