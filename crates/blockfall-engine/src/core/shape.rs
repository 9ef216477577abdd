use std::fmt;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::{ShapeError, core::color::Color};

/// Largest width or height of a shape matrix.
pub const MAX_SHAPE_SIZE: usize = 4;

type Mask = [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];

/// Occupancy matrix of a piece in one rotation, paired with its kind (and so its color).
///
/// Shapes are immutable values. Rotation returns a new `Shape` whose width and height
/// are swapped; the matrix always stays within a [`MAX_SHAPE_SIZE`]-square box.
///
/// # Coordinate System
///
/// - Row 0 is the top row of the matrix
/// - A cell is addressed as `(row, col)`, i.e. `(i, j)` offsets from the anchor
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, Shape};
///
/// let t = PieceKind::T.shape();
/// assert_eq!((t.width(), t.height()), (3, 2));
///
/// let rotated = t.rotated();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated.cell_count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    kind: PieceKind,
    width: u8,
    height: u8,
    mask: Mask,
}

impl Shape {
    /// Builds a shape from a 0/1 matrix given row by row.
    ///
    /// Every row must have the same length, the matrix must fit in a
    /// [`MAX_SHAPE_SIZE`]-square box, and at least one cell must be occupied.
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_rows<R>(kind: PieceKind, rows: &[R]) -> Result<Self, ShapeError>
    where
        R: AsRef<[u8]>,
    {
        let Some(first) = rows.first() else {
            return Err(ShapeError::Empty);
        };
        let width = first.as_ref().len();
        for (row, cells) in rows.iter().enumerate() {
            let len = cells.as_ref().len();
            if len != width {
                return Err(ShapeError::RaggedRows {
                    row,
                    len,
                    expected: width,
                });
            }
        }
        if width == 0 {
            return Err(ShapeError::Empty);
        }

        let height = rows.len();
        if width > MAX_SHAPE_SIZE || height > MAX_SHAPE_SIZE {
            return Err(ShapeError::TooLarge {
                width,
                height,
                max: MAX_SHAPE_SIZE,
            });
        }

        let mut mask = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (mask_row, cells) in mask.iter_mut().zip(rows) {
            for (mask_cell, &cell) in mask_row.iter_mut().zip(cells.as_ref()) {
                *mask_cell = cell != 0;
            }
        }
        if !mask.iter().flatten().any(|&occupied| occupied) {
            return Err(ShapeError::NoCells);
        }

        Ok(Self {
            kind,
            width: width as u8,
            height: height as u8,
            mask,
        })
    }

    // Compile-time counterpart of `from_rows` used for the catalog.
    #[expect(clippy::cast_possible_truncation)]
    const fn from_matrix<const W: usize, const H: usize>(kind: PieceKind, rows: [[u8; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_SIZE);
        assert!(H > 0 && H <= MAX_SHAPE_SIZE);
        let mut mask = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut occupied = false;
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                if rows[y][x] != 0 {
                    mask[y][x] = true;
                    occupied = true;
                }
                x += 1;
            }
            y += 1;
        }
        assert!(occupied);
        Self {
            kind,
            width: W as u8,
            height: H as u8,
            mask,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.kind.color()
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Returns whether `(row, col)` is occupied. Positions outside the matrix are empty.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.mask[row][col]
    }

    /// Returns the matrix rows, each `width()` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        let width = self.width();
        self.mask[..self.height()]
            .iter()
            .map(move |row| &row[..width])
    }

    /// Returns the `(row, col)` offsets of every occupied cell, top to bottom.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, &occupied)| occupied.then_some((i, j)))
        })
    }

    /// Like [`Self::cells`], but as signed offsets for anchor arithmetic.
    pub(crate) fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |i| {
            (0..self.width)
                .filter(move |&j| self.mask[usize::from(i)][usize::from(j)])
                .map(move |j| (i32::from(i), i32::from(j)))
        })
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Returns this shape turned a quarter turn.
    ///
    /// Source cell `(row = y, col = x)` moves to `(row = width - 1 - x, col = y)`, so the
    /// result is `height` columns wide and `width` rows tall. Row 0 being the top, this is
    /// a counterclockwise turn on screen. No bounds checking happens here; the caller has
    /// to test the result against the grid before committing it.
    #[must_use]
    pub fn rotated(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut mask = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in mask.iter_mut().enumerate().take(width) {
            for (c, cell) in row.iter_mut().enumerate().take(height) {
                *cell = self.mask[c][width - 1 - r];
            }
        }
        Self {
            kind: self.kind,
            width: self.height,
            height: self.width,
            mask,
        }
    }
}

/// Writes the matrix one row per line, using the kind's character for occupied cells
/// and `.` for empty ones.
impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &occupied in row {
                let ch = if occupied { self.kind.as_char() } else { '.' };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// T-piece.
    T = 6,
}

/// Picks a piece kind uniformly from the catalog.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::J,
        Self::L,
        Self::S,
        Self::Z,
        Self::T,
    ];

    /// Returns the spawn orientation of this kind from the catalog.
    #[must_use]
    pub const fn shape(self) -> Shape {
        CATALOG[self as usize]
    }

    /// Returns the canonical color of this kind.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            PieceKind::I => Color::CYAN,
            PieceKind::O => Color::YELLOW,
            PieceKind::J => Color::BLUE,
            PieceKind::L => Color::ORANGE,
            PieceKind::S => Color::GREEN,
            PieceKind::Z => Color::RED,
            PieceKind::T => Color::MAGENTA,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('O'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

const CATALOG: [Shape; PieceKind::LEN] = [
    Shape::from_matrix(PieceKind::I, [[1, 1, 1, 1]]),
    Shape::from_matrix(PieceKind::O, [[1, 1], [1, 1]]),
    Shape::from_matrix(PieceKind::J, [[1, 0, 0], [1, 1, 1]]),
    Shape::from_matrix(PieceKind::L, [[0, 0, 1], [1, 1, 1]]),
    Shape::from_matrix(PieceKind::S, [[0, 1, 1], [1, 1, 0]]),
    Shape::from_matrix(PieceKind::Z, [[1, 1, 0], [0, 1, 1]]),
    Shape::from_matrix(PieceKind::T, [[0, 1, 0], [1, 1, 1]]),
];
