/// Width and height of the Reversi grid.
pub const BOARD_SIZE: u8 = 8;

/// Total number of cells on the board.
pub const NUM_CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// The eight compass directions walked by the flanking rule, as `(dx, dy)`.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
