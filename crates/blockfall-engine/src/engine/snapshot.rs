use serde::{Deserialize, Serialize};

use crate::core::shape::PieceKind;

use super::board::Board;

/// Serializable picture of a board at one instant.
///
/// Grid rows use the same text form as [`Grid`](crate::Grid)'s `Display`: `.` for
/// empty cells and the piece character for filled ones. The falling piece is not
/// drawn into `rows`; it is described separately by `current`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<String>,
    pub current: PieceSnapshot,
    pub next: PieceKind,
    pub score: usize,
    pub game_over: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    /// The shape matrix in its current orientation, one string per row.
    pub rows: Vec<String>,
    pub x: i32,
    pub y: i32,
}

impl Board {
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let current = self.current();
        BoardSnapshot {
            width: self.grid().width(),
            height: self.grid().height(),
            rows: self.grid().to_string().lines().map(str::to_owned).collect(),
            current: PieceSnapshot {
                kind: current.kind(),
                rows: current
                    .shape()
                    .to_string()
                    .lines()
                    .map(str::to_owned)
                    .collect(),
                x: current.x(),
                y: current.y(),
            },
            next: self.next().kind(),
            score: self.score(),
            game_over: self.is_game_over(),
        }
    }
}
