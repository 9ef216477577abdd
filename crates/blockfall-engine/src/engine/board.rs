use std::mem;

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::{
        color::Color,
        grid::{Cell, Grid},
        shape::{MAX_SHAPE_SIZE, PieceKind, Shape},
    },
};

use super::{
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
};

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

impl BoardConfig {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;
    /// Every catalog shape must fit the board in any orientation.
    pub const MIN_SIZE: usize = MAX_SHAPE_SIZE;
    /// Keeps every coordinate representable as `i32`.
    pub const MAX_SIZE: usize = 1024;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self { width, height } = *self;
        if width < Self::MIN_SIZE || height < Self::MIN_SIZE {
            return Err(ConfigError::TooSmall {
                width,
                height,
                min: Self::MIN_SIZE,
            });
        }
        if width > Self::MAX_SIZE || height > Self::MAX_SIZE {
            return Err(ConfigError::TooLarge {
                width,
                height,
                max: Self::MAX_SIZE,
            });
        }
        Ok(())
    }
}

/// The falling piece: a shape and the grid position of its top-left corner.
///
/// Pieces are immutable; moving or rotating returns a new `ActivePiece`. The anchor is
/// signed so that candidate positions left of or above the grid can be expressed and
/// rejected by [`Board::can_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    shape: Shape,
    x: i32,
    y: i32,
}

impl ActivePiece {
    #[must_use]
    pub const fn new(shape: Shape, x: i32, y: i32) -> Self {
        Self { shape, x, y }
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.shape.kind()
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.shape.color()
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            shape: self.shape,
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Same anchor, shape turned by [`Shape::rotated`].
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            x: self.x,
            y: self.y,
        }
    }

    /// Returns the absolute `(x, y)` grid position of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .offsets()
            .map(|(i, j)| (self.x.saturating_add(j), self.y.saturating_add(i)))
    }
}

/// Lifecycle of a board.
///
/// Locking happens inside a single [`Board::advance`] call, so it is never observable
/// as a state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoardState {
    Falling,
    /// Terminal. A spawned piece collided; nothing changes the board afterwards.
    GameOver,
}

/// What happened when a piece was locked into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    /// Rows removed by this lock (also the score gained).
    pub cleared_lines: usize,
    /// The following piece could not spawn, ending the game.
    pub topped_out: bool,
}

/// Result of one [`Board::advance`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Tick {
    /// The piece moved down one row.
    Fell,
    /// The piece could not move down and was locked.
    Locked(LockOutcome),
    /// The game is already over; nothing changed.
    Halted,
}

/// Game state engine: the grid, the falling piece, the next piece, and the score.
///
/// All mutation goes through [`Board::can_move`]: moves and rotations are committed
/// only if the candidate placement fits, and illegal requests return `false` without
/// changing anything. The board is driven by a collaborator that calls the command
/// methods on input and [`Board::advance`] once per fixed tick, stopping once
/// [`Board::is_game_over`] is true.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceSeed, Tick};
///
/// let seed: PieceSeed = "00000000000000000000000000000001".parse().unwrap();
/// let mut board = Board::with_seed(seed);
///
/// board.move_left();
/// board.rotate_cw();
///
/// let mut ticks = 0;
/// while !board.is_game_over() && ticks < 10_000 {
///     if let Tick::Locked(outcome) = board.advance() {
///         assert!(outcome.cleared_lines <= 4);
///     }
///     ticks += 1;
/// }
/// assert!(board.is_game_over());
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    current: ActivePiece,
    next: Shape,
    generator: PieceGenerator,
    stats: GameStats,
    state: BoardState,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a standard 10×20 board with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Creates a standard 10×20 board whose piece sequence is fixed by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::build(BoardConfig::default(), PieceGenerator::with_seed(seed))
    }

    /// Creates a board with custom dimensions.
    pub fn with_config(config: BoardConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, PieceGenerator::with_seed(seed)))
    }

    fn build(config: BoardConfig, mut generator: PieceGenerator) -> Self {
        let grid = Grid::new(config.width, config.height);
        let current = generator.new_piece();
        let next = generator.new_piece();
        let current = ActivePiece::new(current, spawn_x(&grid, &current), 0);
        Self {
            grid,
            current,
            next,
            generator,
            stats: GameStats::new(),
            state: BoardState::Falling,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn current(&self) -> &ActivePiece {
        &self.current
    }

    #[must_use]
    pub fn next(&self) -> &Shape {
        &self.next
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> BoardState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Tests whether `shape` anchored at `(x, y)` fits the grid.
    ///
    /// Every occupied cell must land inside the grid on an empty cell. Rows above the
    /// grid (negative `y + i`) count as out of bounds just like columns outside
    /// `0..width` and rows at or below `height`.
    #[must_use]
    pub fn can_move(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.offsets().all(|(i, j)| {
            let (Some(col), Some(row)) = (x.checked_add(j), y.checked_add(i)) else {
                return false;
            };
            self.grid.cell_at(col, row).is_some_and(Cell::is_empty)
        })
    }

    fn fits(&self, piece: &ActivePiece) -> bool {
        self.can_move(piece.shape(), piece.x(), piece.y())
    }

    /// Locks `shape` at `(x, y)`, clears full rows, and spawns the next piece.
    ///
    /// The caller is expected to have established that the piece cannot fall any
    /// further. Cells outside the grid are skipped and occupied cells are overwritten,
    /// so a misplaced call cannot corrupt the grid dimensions. If the promoted piece
    /// does not fit at its spawn position the board enters [`BoardState::GameOver`].
    ///
    /// Returns `None` without touching the board once the game is over.
    pub fn place_piece(&mut self, shape: &Shape, x: i32, y: i32) -> Option<LockOutcome> {
        if self.is_game_over() {
            return None;
        }

        let cell = Cell::Filled(shape.kind());
        for (i, j) in shape.offsets() {
            if let (Some(col), Some(row)) = (x.checked_add(j), y.checked_add(i)) {
                self.grid.set_at(col, row, cell);
            }
        }

        let cleared_lines = self.grid.clear_full_rows();
        self.stats.complete_piece_drop(cleared_lines);

        let promoted = mem::replace(&mut self.next, self.generator.new_piece());
        self.current = ActivePiece::new(promoted, spawn_x(&self.grid, &promoted), 0);

        let topped_out = !self.fits(&self.current);
        if topped_out {
            self.state = BoardState::GameOver;
        }

        Some(LockOutcome {
            cleared_lines,
            topped_out,
        })
    }

    /// Shifts the falling piece one column left.
    pub fn move_left(&mut self) -> bool {
        self.try_replace(self.current.shifted(-1, 0))
    }

    /// Shifts the falling piece one column right.
    pub fn move_right(&mut self) -> bool {
        self.try_replace(self.current.shifted(1, 0))
    }

    /// Moves the falling piece one row down without locking it.
    pub fn soft_drop(&mut self) -> bool {
        self.try_replace(self.current.shifted(0, 1))
    }

    /// Turns the falling piece in place (see [`Shape::rotated`]). There are no kicks:
    /// a rotation that does not fit at the same anchor is discarded.
    pub fn rotate_cw(&mut self) -> bool {
        self.try_replace(self.current.rotated())
    }

    fn try_replace(&mut self, piece: ActivePiece) -> bool {
        if self.is_game_over() || !self.fits(&piece) {
            return false;
        }
        self.current = piece;
        true
    }

    /// Runs one simulation step: the falling piece moves down a row, or locks when it
    /// cannot.
    pub fn advance(&mut self) -> Tick {
        if self.is_game_over() {
            return Tick::Halted;
        }
        let below = self.current.shifted(0, 1);
        if self.fits(&below) {
            self.current = below;
            return Tick::Fell;
        }
        let ActivePiece { shape, x, y } = self.current;
        self.place_piece(&shape, x, y)
            .map_or(Tick::Halted, Tick::Locked)
    }
}

/// Horizontal spawn offset: the shape centered on the grid, rounding left.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn spawn_x(grid: &Grid, shape: &Shape) -> i32 {
    // Grid widths are capped at `BoardConfig::MAX_SIZE`, far below `i32::MAX`.
    (grid.width() / 2).saturating_sub(shape.width() / 2) as i32
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    /// Builds a board over a hand-made grid with a chosen falling and next piece.
    fn board_with(rows: &[&str], current: ActivePiece, next: PieceKind) -> Board {
        Board {
            grid: Grid::parse(rows).unwrap(),
            current,
            next: next.shape(),
            generator: PieceGenerator::with_seed(SEED),
            stats: GameStats::new(),
            state: BoardState::Falling,
        }
    }

    fn empty_rows(width: usize, height: usize) -> Vec<String> {
        vec![".".repeat(width); height]
    }

    fn empty_board(current: ActivePiece, next: PieceKind) -> Board {
        let rows = empty_rows(10, 20);
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        board_with(&rows, current, next)
    }

    fn all_orientations() -> impl Iterator<Item = Shape> {
        PieceKind::ALL.into_iter().flat_map(|kind| {
            let shape = kind.shape();
            [
                shape,
                shape.rotated(),
                shape.rotated().rotated(),
                shape.rotated().rotated().rotated(),
            ]
        })
    }

    fn advance_until_locked(board: &mut Board) -> LockOutcome {
        for _ in 0..100 {
            if let Tick::Locked(outcome) = board.advance() {
                return outcome;
            }
        }
        panic!("piece never locked");
    }

    #[test]
    fn test_new_board() {
        let board = Board::with_seed(SEED);
        assert_eq!(board.grid().width(), 10);
        assert_eq!(board.grid().height(), 20);
        assert_eq!(board.grid().filled_count(), 0);
        assert_eq!(board.score(), 0);
        assert_eq!(board.state(), BoardState::Falling);
        assert!(!board.is_game_over());

        let current = board.current();
        assert_eq!(current.y(), 0);
        assert_eq!(current.x(), 5 - i32::try_from(current.shape().width() / 2).unwrap());
        assert_eq!(*current.shape(), current.kind().shape());
        assert_eq!(*board.next(), board.next().kind().shape());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut board1 = Board::with_seed(SEED);
        let mut board2 = Board::with_seed(SEED);
        for _ in 0..500 {
            assert_eq!(board1.advance(), board2.advance());
            assert_eq!(board1.current(), board2.current());
            assert_eq!(board1.next(), board2.next());
        }
        assert_eq!(board1.grid(), board2.grid());
    }

    #[test]
    fn test_spawn_positions() {
        let grid = Grid::new(10, 20);
        assert_eq!(spawn_x(&grid, &PieceKind::I.shape()), 3);
        assert_eq!(spawn_x(&grid, &PieceKind::O.shape()), 4);
        assert_eq!(spawn_x(&grid, &PieceKind::T.shape()), 4);
        assert_eq!(spawn_x(&grid, &PieceKind::I.shape().rotated()), 5);
    }

    #[test]
    fn test_can_move_rejects_boundaries_for_every_shape() {
        let board = empty_board(ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);
        let width = 10;
        let height = 20;
        for shape in all_orientations() {
            assert!(board.can_move(&shape, 0, 0), "{shape:?} should fit at origin");
            assert!(!board.can_move(&shape, -1, 0), "{shape:?} at x = -1");
            assert!(!board.can_move(&shape, width, 0), "{shape:?} at x = width");
            assert!(!board.can_move(&shape, 0, height), "{shape:?} at y = height");

            let max_x = width - i32::try_from(shape.width()).unwrap();
            let max_y = height - i32::try_from(shape.height()).unwrap();
            assert!(board.can_move(&shape, max_x, max_y));
            assert!(!board.can_move(&shape, max_x + 1, max_y));
            assert!(!board.can_move(&shape, max_x, max_y + 1));
        }
    }

    #[test]
    fn test_can_move_rejects_rows_above_grid() {
        let board = empty_board(ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);
        for shape in all_orientations() {
            assert!(!board.can_move(&shape, 0, -1), "{shape:?} at y = -1");
            assert!(!board.can_move(&shape, 3, -4), "{shape:?} at y = -4");
        }
    }

    #[test]
    fn test_can_move_ignores_empty_shape_cells() {
        // The T's top corners are empty, so a filled cell under one is fine
        let mut rows = empty_rows(10, 20);
        rows[18] = "T.........".to_owned();
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        let board = board_with(&rows, ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);

        let t = PieceKind::T.shape();
        assert!(board.can_move(&t, 0, 18));
        assert!(!board.can_move(&t, 0, 17));
        assert!(board.can_move(&t, 1, 18));
        assert!(board.can_move(&t, 0, 16));
    }

    #[test]
    fn test_can_move_rejects_occupied_cells() {
        let mut rows = empty_rows(10, 20);
        rows[19] = "....I.....".to_owned();
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        let board = board_with(&rows, ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);

        let o = PieceKind::O.shape();
        assert!(board.can_move(&o, 4, 17));
        assert!(!board.can_move(&o, 4, 18));
        assert!(!board.can_move(&o, 3, 18));
        assert!(board.can_move(&o, 2, 18));
        assert!(board.can_move(&o, 5, 18));
        assert!(board.can_move(&o, 5, 17));
    }

    #[test]
    fn test_can_move_extreme_anchor() {
        let board = Board::with_seed(SEED);
        let shape = PieceKind::I.shape();
        assert!(!board.can_move(&shape, i32::MAX, 0));
        assert!(!board.can_move(&shape, 0, i32::MAX));
        assert!(!board.can_move(&shape, i32::MIN, i32::MIN));
    }

    #[test]
    fn test_move_left_and_right_stop_at_walls() {
        let mut board = empty_board(ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);
        let mut moves = 0;
        while board.move_left() {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(board.current().x(), 0);
        assert!(!board.move_left());

        let mut moves = 0;
        while board.move_right() {
            moves += 1;
        }
        assert_eq!(moves, 8);
        assert_eq!(board.current().x(), 8);
    }

    #[test]
    fn test_soft_drop_stops_at_floor() {
        let mut board = empty_board(ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);
        let mut drops = 0;
        while board.soft_drop() {
            drops += 1;
        }
        assert_eq!(drops, 18);
        assert_eq!(board.current().y(), 18);
        // soft drop never locks
        assert_eq!(board.grid().filled_count(), 0);
        assert_eq!(board.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_rotate_commits_when_it_fits() {
        let mut board = empty_board(ActivePiece::new(PieceKind::T.shape(), 4, 5), PieceKind::O);
        assert!(board.rotate_cw());
        assert_eq!(*board.current().shape(), PieceKind::T.shape().rotated());
        assert_eq!((board.current().x(), board.current().y()), (4, 5));
        assert_eq!(board.current().color(), Color::MAGENTA);
    }

    #[test]
    fn test_rotate_discarded_at_wall() {
        let vertical_i = PieceKind::I.shape().rotated();
        let mut board = empty_board(ActivePiece::new(vertical_i, 9, 5), PieceKind::O);
        assert!(!board.rotate_cw());
        assert_eq!(*board.current().shape(), vertical_i);

        // Away from the wall the same rotation fits
        let mut board = empty_board(ActivePiece::new(vertical_i, 0, 16), PieceKind::O);
        assert!(board.rotate_cw());
        assert_eq!(*board.current().shape(), PieceKind::I.shape());
    }

    #[test]
    fn test_rotate_discarded_when_blocked() {
        let mut rows = empty_rows(10, 20);
        rows[7] = ".I........".to_owned();
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        // Horizontal I at row 5 turns into column 1 covering rows 5..8
        let mut board =
            board_with(&rows, ActivePiece::new(PieceKind::I.shape(), 1, 5), PieceKind::O);
        let rotated = PieceKind::I.shape().rotated();
        assert!(!board.can_move(&rotated, 1, 5));
        assert!(!board.rotate_cw());
        assert_eq!(*board.current().shape(), PieceKind::I.shape());
    }

    #[test]
    fn test_advance_falls_then_locks() {
        let mut board = empty_board(ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);
        for y in 1..=18 {
            assert_eq!(board.advance(), Tick::Fell);
            assert_eq!(board.current().y(), y);
        }
        let next_before = *board.next();
        let tick = board.advance();
        assert_eq!(
            tick,
            Tick::Locked(LockOutcome {
                cleared_lines: 0,
                topped_out: false
            })
        );
        assert_eq!(
            board.grid().to_string().lines().skip(18).collect::<Vec<_>>(),
            ["....OO....", "....OO...."]
        );
        assert_eq!(*board.current().shape(), next_before);
        assert_eq!(board.current().y(), 0);
        assert_eq!(board.current().x(), 4);
        assert_eq!(board.stats().completed_pieces(), 1);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_five_o_pieces_fill_both_rows() {
        let mut board = empty_board(ActivePiece::new(PieceKind::O.shape(), 0, 0), PieceKind::O);
        for k in 0..5 {
            board.current = ActivePiece::new(PieceKind::O.shape(), 2 * k, 0);
            board.next = PieceKind::O.shape();
            let outcome = advance_until_locked(&mut board);
            if k < 4 {
                assert_eq!(outcome.cleared_lines, 0);
            } else {
                // An O is two rows tall, so the fifth one completes rows 18 and 19
                assert_eq!(outcome.cleared_lines, 2);
            }
        }
        assert_eq!(board.score(), 2);
        assert_eq!(board.grid().height(), 20);
        assert_eq!(board.grid().filled_count(), 0);
    }

    #[test]
    fn test_single_row_clear_prepends_empty_row() {
        let mut rows = empty_rows(10, 20);
        rows[19] = "TTTTTTTT..".to_owned();
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        let mut board =
            board_with(&rows, ActivePiece::new(PieceKind::O.shape(), 8, 0), PieceKind::O);

        let outcome = advance_until_locked(&mut board);
        assert_eq!(outcome.cleared_lines, 1);
        assert!(!outcome.topped_out);
        assert_eq!(board.score(), 1);
        assert_eq!(board.grid().height(), 20);
        assert_eq!(board.grid().filled_count(), 2);
        let text = board.grid().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "..........");
        assert_eq!(lines[18], "..........");
        assert_eq!(lines[19], "........OO");
    }

    #[test]
    fn test_clear_shifts_rows_above_cleared_one() {
        let mut rows = empty_rows(10, 20);
        rows[16] = "J.........".to_owned();
        rows[17] = "JJJ.......".to_owned();
        rows[18] = "IIIIIIII..".to_owned();
        rows[19] = "ZZZZZZZZ.Z".to_owned();
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        let mut board =
            board_with(&rows, ActivePiece::new(PieceKind::O.shape(), 8, 0), PieceKind::T);

        // The O rests on the Z at column 9, filling rows 17 and 18; only 18 is complete
        let outcome = advance_until_locked(&mut board);
        assert_eq!(outcome.cleared_lines, 1);
        let text = board.grid().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[16], "..........");
        assert_eq!(lines[17], "J.........");
        assert_eq!(lines[18], "JJJ.....OO");
        assert_eq!(lines[19], "ZZZZZZZZ.Z");
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        for next in PieceKind::ALL {
            let mut rows = empty_rows(10, 20);
            rows[0] = "IIII.IIIII".to_owned();
            rows[1] = "IIII.IIIII".to_owned();
            let rows: Vec<_> = rows.iter().map(String::as_str).collect();
            let mut board =
                board_with(&rows, ActivePiece::new(PieceKind::O.shape(), 0, 18), next);

            let tick = board.advance();
            assert_eq!(
                tick,
                Tick::Locked(LockOutcome {
                    cleared_lines: 0,
                    topped_out: true
                }),
                "{next:?} should not spawn"
            );
            assert!(board.is_game_over());
            assert_eq!(board.current().kind(), next);

            // Terminal: nothing is honored afterwards
            let grid = board.grid().clone();
            assert_eq!(board.advance(), Tick::Halted);
            assert!(!board.move_left());
            assert!(!board.move_right());
            assert!(!board.soft_drop());
            assert!(!board.rotate_cw());
            assert_eq!(board.place_piece(&PieceKind::O.shape(), 0, 10), None);
            assert_eq!(board.grid(), &grid);
            assert_eq!(board.state(), BoardState::GameOver);
        }
    }

    #[test]
    fn test_place_piece_tolerates_bad_placement() {
        let mut rows = empty_rows(10, 20);
        rows[19] = "IIII......".to_owned();
        let rows: Vec<_> = rows.iter().map(String::as_str).collect();
        let mut board =
            board_with(&rows, ActivePiece::new(PieceKind::O.shape(), 4, 0), PieceKind::T);

        // Overlaps the I cells and hangs off the bottom edge
        let outcome = board.place_piece(&PieceKind::T.shape(), 1, 19).unwrap();
        assert_eq!(outcome.cleared_lines, 0);
        assert_eq!(board.grid().height(), 20);
        let text = board.grid().to_string();
        assert_eq!(text.lines().last(), Some("IITI......"));

        // Entirely outside the grid: nothing is written
        let filled = board.grid().filled_count();
        board.place_piece(&PieceKind::O.shape(), -5, -5).unwrap();
        assert_eq!(board.grid().filled_count(), filled);
    }

    #[test]
    fn test_with_config() {
        let config = BoardConfig {
            width: 6,
            height: 8,
        };
        let mut board = Board::with_config(config, SEED).unwrap();
        assert_eq!((board.grid().width(), board.grid().height()), (6, 8));
        let mut ticks = 0;
        while !board.is_game_over() {
            board.advance();
            ticks += 1;
            assert!(ticks < 10_000);
        }

        assert_eq!(
            Board::with_config(
                BoardConfig {
                    width: 3,
                    height: 20
                },
                SEED
            )
            .unwrap_err(),
            ConfigError::TooSmall {
                width: 3,
                height: 20,
                min: 4
            }
        );
        assert!(matches!(
            Board::with_config(
                BoardConfig {
                    width: 10,
                    height: 5000
                },
                SEED
            ),
            Err(ConfigError::TooLarge { .. })
        ));
        assert_eq!(BoardConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_can_move_matches_grid_contents() {
        // Play a random game to get irregular stacks, then try random placements.
        let mut rng = Pcg32::seed_from_u64(2024);
        let mut board = Board::with_seed(SEED);
        for _ in 0..300 {
            match rng.random_range(0..4) {
                0 => _ = board.move_left(),
                1 => _ = board.move_right(),
                2 => _ = board.rotate_cw(),
                _ => {}
            }
            board.advance();
        }

        let shapes: Vec<_> = all_orientations().collect();
        for _ in 0..5000 {
            let shape = shapes[rng.random_range(0..shapes.len())];
            let x = rng.random_range(-4..14);
            let y = rng.random_range(-4..24);
            let expected = shape.offsets().all(|(i, j)| {
                board.grid().cell_at(x + j, y + i) == Some(Cell::Empty)
            });
            assert_eq!(board.can_move(&shape, x, y), expected, "{shape} at ({x}, {y})");
        }
    }

    #[test]
    fn test_random_play_invariants() {
        let mut rng = Pcg32::seed_from_u64(99);
        for game in 0..20 {
            let mut board = Board::with_seed(rng.random());
            let mut previous_score = 0;
            for _ in 0..5000 {
                if board.is_game_over() {
                    break;
                }
                match rng.random_range(0..5) {
                    0 => _ = board.move_left(),
                    1 => _ = board.move_right(),
                    2 => _ = board.rotate_cw(),
                    3 => _ = board.soft_drop(),
                    _ => {}
                }

                // The falling piece always sits on empty, in-bounds cells
                assert!(board.fits(board.current()), "game {game}");

                let filled_before = board.grid().filled_count();
                let piece = *board.current();
                if let Tick::Locked(outcome) = board.advance() {
                    let added = piece.shape().cell_count();
                    assert_eq!(
                        board.grid().filled_count(),
                        filled_before + added - outcome.cleared_lines * 10,
                        "game {game}: lock must not overwrite occupied cells"
                    );
                    assert_eq!(board.score(), previous_score + outcome.cleared_lines);
                    assert_eq!(outcome.topped_out, board.is_game_over());
                }
                assert!(board.score() >= previous_score);
                previous_score = board.score();
                assert_eq!(board.grid().height(), 20);
                assert!((0..20).all(|row| !board.grid().is_row_full(row)));
            }
            assert_eq!(board.score(), board.stats().total_cleared_lines());
        }
    }
}
