//! Board tests - grid, collision and piece movement

use guideline_tetris::core::board::FIXTURE_COLOR;
use guideline_tetris::core::{Board, InvariantViolation, RotationOutcome, Tetromino};
use guideline_tetris::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn filled_count(board: &Board) -> usize {
    board.cells().iter().filter(|cell| cell.is_some()).count()
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert!(board.active().is_none());

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {}) should be empty", x, y);
            assert_eq!(board.is_occupied(x, y), Some(false));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);

    assert_eq!(board.is_occupied(-1, 5), None);
    assert_eq!(board.is_occupied(3, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_board_set_and_get() {
    let mut board = Board::new();
    let t = PieceKind::T.color();
    let i = PieceKind::I.color();

    assert!(board.set(5, 10, Some(t)));
    assert_eq!(board.get(5, 10), Some(Some(t)));
    assert_eq!(board.is_occupied(5, 10), Some(true));

    assert!(board.set(0, 0, Some(i)));
    assert_eq!(board.get(0, 0), Some(Some(i)));

    assert!(board.set(5, 10, None));
    assert_eq!(board.get(5, 10), Some(None));
}

#[test]
fn test_board_set_out_of_bounds() {
    let mut board = Board::new();
    let color = Some(FIXTURE_COLOR);

    assert!(!board.set(-1, 0, color));
    assert!(!board.set(0, -1, color));
    assert!(!board.set(BOARD_WIDTH as i8, 0, color));
    assert!(!board.set(0, BOARD_HEIGHT as i8, color));
    assert_eq!(filled_count(&board), 0);
}

#[test]
fn test_from_rows_is_bottom_aligned() {
    let board = Board::from_rows(&["#.........", "##########"]);
    assert_eq!(board.get(0, 18), Some(Some(FIXTURE_COLOR)));
    assert_eq!(board.get(1, 18), Some(None));
    assert!(board.is_row_full(19));
    assert!(!board.is_row_full(18));
    assert_eq!(filled_count(&board), 11);
}

#[test]
fn test_is_row_full_out_of_range() {
    let board = Board::from_rows(&["##########"]);
    assert!(!board.is_row_full(BOARD_HEIGHT as usize));
    assert!(!board.is_row_full(usize::MAX));
}

#[test]
fn test_clear_single_row() {
    let mut board = Board::from_rows(&["#.........", "##########"]);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[19]);

    // the partial row drops into the cleared one
    assert_eq!(board.is_occupied(0, 19), Some(true));
    assert_eq!(board.is_occupied(0, 18), Some(false));
    assert_eq!(filled_count(&board), 1);
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::from_rows(&[
        "##########",
        "#.........",
        "##########",
        ".#........",
    ]);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[16, 18]);

    assert_eq!(board.is_occupied(1, 19), Some(true));
    assert_eq!(board.is_occupied(0, 18), Some(true));
    assert_eq!(filled_count(&board), 2);
}

#[test]
fn test_clear_four_rows() {
    let mut board = Board::from_rows(&[
        "..........",
        "..#.......",
        "##########",
        "##########",
        "##########",
        "##########",
    ]);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[16, 17, 18, 19]);
    assert_eq!(board.is_occupied(2, 19), Some(true));
    assert_eq!(filled_count(&board), 1);
}

#[test]
fn test_clear_nothing() {
    let mut board = Board::from_rows(&["#########."]);
    assert!(board.clear_full_rows().is_empty());
    assert_eq!(filled_count(&board), 9);
}

#[test]
fn test_spawn_sits_above_skyline() {
    let mut board = Board::new();
    let piece = board.spawn(PieceKind::T);
    assert_eq!((piece.x, piece.y), (3, -2));
    assert_eq!(board.active(), Some(&piece));

    let hit = board.collide(&piece);
    assert!(!hit.collides);
    assert!(hit.out_of_bounds.top);
    assert!(!hit.blocks_fall());
    assert!(!hit.blocks_rotation());
    assert!(!board.is_grounded());
}

#[test]
fn test_collide_reports_each_wall() {
    let board = Board::new();

    let left = board.collide_at(PieceKind::I, Rotation::North, -1, 5);
    assert!(left.out_of_bounds.left && !left.out_of_bounds.right);

    let right = board.collide_at(PieceKind::I, Rotation::North, 7, 5);
    assert!(right.out_of_bounds.right);

    let bottom = board.collide_at(PieceKind::T, Rotation::North, 3, 19);
    assert!(bottom.out_of_bounds.bottom);
    assert!(bottom.blocks_fall());

    let inside = board.collide_at(PieceKind::O, Rotation::North, 4, 10);
    assert!(!inside.collides && !inside.out_of_bounds.any());
}

#[test]
fn test_collide_with_locked_cell() {
    let mut board = Board::new();
    board.set(4, 10, Some(FIXTURE_COLOR));

    let hit = board.collide_at(PieceKind::T, Rotation::North, 3, 10);
    assert!(hit.collides);
    assert!(!hit.out_of_bounds.any());
    assert!(hit.blocks_rotation());
}

#[test]
fn test_move_stops_at_walls() {
    let mut board = Board::new();
    board.spawn(PieceKind::T);

    for _ in 0..3 {
        assert!(board.move_left());
    }
    assert!(!board.move_left());
    assert_eq!(board.active().unwrap().x, 0);

    for _ in 0..7 {
        assert!(board.move_right());
    }
    assert!(!board.move_right());
    assert_eq!(board.active().unwrap().x, 7);
}

#[test]
fn test_move_blocked_by_stack() {
    let mut board = Board::new();
    board.set_active(Tetromino::at(PieceKind::O, Rotation::North, 4, 10));
    board.set(3, 11, Some(FIXTURE_COLOR));

    assert!(!board.move_left());
    assert!(board.move_right());
}

#[test]
fn test_drop_and_ghost() {
    let mut board = Board::new();
    board.spawn(PieceKind::T);

    assert_eq!(board.ghost_y(), Some(18));
    assert_eq!(board.drop(), 20);
    assert_eq!(board.active().unwrap().y, 18);
    assert!(board.is_grounded());
    assert!(!board.fall_one_step());
    assert_eq!(board.drop(), 0);
}

#[test]
fn test_ghost_lands_on_stack() {
    let mut board = Board::from_rows(&["##########", "##########"]);
    board.spawn(PieceKind::I);
    // I north occupies row y + 1 of its box
    assert_eq!(board.ghost_y(), Some(16));
}

#[test]
fn test_rotate_in_open_space() {
    let mut board = Board::new();
    board.set_active(Tetromino::at(PieceKind::T, Rotation::North, 3, 5));

    assert_eq!(board.rotate(true), RotationOutcome::NoKick);
    let piece = *board.active().unwrap();
    assert_eq!(piece.rotation, Rotation::East);
    assert_eq!((piece.x, piece.y), (3, 5));

    assert_eq!(board.rotate(false), RotationOutcome::NoKick);
    assert_eq!(board.active().unwrap().rotation, Rotation::North);
}

#[test]
fn test_rotate_kicks_off_floor() {
    let mut board = Board::new();
    board.spawn(PieceKind::T);
    board.drop();

    // East would poke through the floor; third candidate lifts it a row
    assert_eq!(board.rotate(true), RotationOutcome::Kicked);
    let piece = *board.active().unwrap();
    assert_eq!(piece.rotation, Rotation::East);
    assert_eq!((piece.x, piece.y), (2, 17));
}

#[test]
fn test_rotate_o_is_a_no_op() {
    let mut board = Board::new();
    let before = board.spawn(PieceKind::O);
    assert_eq!(board.rotate(true), RotationOutcome::NoKick);
    assert_eq!(board.active(), Some(&before));
}

#[test]
fn test_rotate_without_active_piece() {
    let mut board = Board::new();
    assert_eq!(board.rotate(true), RotationOutcome::Blocked);
    assert!(!RotationOutcome::Blocked.is_success());
}

#[test]
fn test_merge_piece_writes_color() {
    let mut board = Board::new();
    board.spawn(PieceKind::L);
    board.drop();
    let cells = board.active().unwrap().cells();

    board.merge_piece().unwrap();
    assert!(board.active().is_none());
    for (x, y) in cells {
        assert_eq!(board.get(x, y), Some(Some(PieceKind::L.color())));
    }
    assert_eq!(filled_count(&board), 4);
}

#[test]
fn test_merge_rejects_bad_placements() {
    let mut board = Board::new();
    assert_eq!(board.merge_piece(), Err(InvariantViolation::NoActivePiece));

    board.spawn(PieceKind::T);
    assert!(matches!(
        board.merge_piece(),
        Err(InvariantViolation::MergeOutOfBounds { .. })
    ));

    board.set_active(Tetromino::at(PieceKind::T, Rotation::North, 3, 10));
    board.set(4, 10, Some(FIXTURE_COLOR));
    assert_eq!(
        board.merge_piece(),
        Err(InvariantViolation::MergeCollision { x: 4, y: 10 })
    );
    // nothing was written
    assert_eq!(filled_count(&board), 1);
}

#[test]
fn test_cell_with_active_overlays_piece() {
    let mut board = Board::new();
    board.set_active(Tetromino::at(PieceKind::S, Rotation::North, 0, 0));
    board.set(9, 19, Some(FIXTURE_COLOR));

    assert_eq!(board.cell_with_active(1, 0), Some(Some(PieceKind::S.color())));
    assert_eq!(board.cell_with_active(9, 19), Some(Some(FIXTURE_COLOR)));
    assert_eq!(board.cell_with_active(5, 5), Some(None));
    assert_eq!(board.cell_with_active(-1, 0), None);
}

#[test]
fn test_clear_resets_everything() {
    let mut board = Board::from_rows(&["#####.....", "##########"]);
    board.spawn(PieceKind::Z);
    board.clear();
    assert_eq!(filled_count(&board), 0);
    assert!(board.active().is_none());
}

#[test]
fn test_rows_iterate_top_to_bottom() {
    let board = Board::from_rows(&["#........."]);
    let rows: Vec<_> = board.rows().collect();
    assert_eq!(rows.len(), BOARD_HEIGHT as usize);
    assert!(rows[..19].iter().all(|row| row.iter().all(|c| c.is_none())));
    assert_eq!(rows[19][0], Some(FIXTURE_COLOR));
}
