use std::{fmt, iter};

use serde::{Deserialize, Serialize};

use super::{color::Color, shape::PieceKind};
use crate::GridError;

/// A single grid position.
///
/// Occupied cells remember which kind of piece was locked there, which doubles as
/// the color reference for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked cell of a specific piece type.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }

    #[must_use]
    pub fn color(self) -> Option<Color> {
        self.kind().map(PieceKind::color)
    }

    /// Returns `.` for empty cells and the piece character otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled(kind) => kind.as_char(),
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Filled(kind)),
                None => None,
            },
        }
    }
}

/// Fixed-size playfield of `height` rows by `width` columns.
///
/// Row 0 is the top. The dimensions never change after construction; line clearing
/// rebuilds the row list but always keeps exactly `height` rows.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Cell, Grid, PieceKind};
///
/// let mut grid = Grid::parse(["..", "OO", "IJ"]).unwrap();
/// assert_eq!(grid.cell(0, 1), Some(Cell::Filled(PieceKind::O)));
///
/// assert_eq!(grid.clear_full_rows(), 2);
/// assert_eq!(grid.to_string(), "..\n..\n..");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
        }
    }

    /// Builds a grid from explicit rows, top row first.
    ///
    /// Rows must be non-empty and all of the same width.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let width = first.len();
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(GridError::RaggedRows {
                row,
                len: cells.len(),
                expected: width,
            });
        }
        if width == 0 {
            return Err(GridError::Empty);
        }
        Ok(Self {
            width,
            height: rows.len(),
            rows,
        })
    }

    /// Parses a grid from text rows, using `.` for empty cells and piece characters
    /// (`I`, `O`, `J`, `L`, `S`, `Z`, `T`) for filled ones.
    pub fn parse<I, S>(lines: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = lines
            .into_iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .chars()
                    .enumerate()
                    .map(|(col, ch)| {
                        Cell::from_char(ch).ok_or(GridError::InvalidCell { row, col, ch })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `(col, row)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<Cell> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Looks up a cell by signed coordinates; anything outside the grid, including
    /// negative rows and columns, is `None`.
    pub(crate) fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        let col = usize::try_from(x).ok()?;
        let row = usize::try_from(y).ok()?;
        self.cell(col, row)
    }

    /// Writes `cell` at signed coordinates. Returns `false` (and changes nothing) when
    /// the position is outside the grid.
    pub(crate) fn set_at(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let (Ok(col), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        match self.rows.get_mut(row).and_then(|cells| cells.get_mut(col)) {
            Some(target) => {
                *target = cell;
                true
            }
            None => false,
        }
    }

    /// Returns the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Returns whether `row` has no empty cell. Rows outside the grid are not full.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_some_and(|cells| cells.iter().all(|cell| cell.is_filled()))
    }

    /// Number of filled cells in the whole grid.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_filled())
            .count()
    }

    /// Removes every full row in a single pass and returns how many were removed.
    ///
    /// Kept rows stay in their original order and move down by the number of cleared
    /// rows below them; the same number of empty rows is inserted at the top.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width;
        let kept: Vec<_> = self
            .rows
            .drain(..)
            .filter(|cells| cells.iter().any(|cell| cell.is_empty()))
            .collect();
        let cleared = self.height - kept.len();
        self.rows = iter::repeat_with(|| vec![Cell::Empty; width])
            .take(cleared)
            .chain(kept)
            .collect();
        cleared
    }
}

/// Writes the grid one row per line with [`Cell::as_char`]; the output parses back
/// with [`Grid::parse`].
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}
