use blockfall_engine::Shape;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of a single shape, centered in a box sized for the widest catalog piece.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    shape: Option<Shape>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    /// Spawn orientations are at most four cells wide and two tall.
    const COLS: u16 = 4;
    const ROWS: u16 = 2;

    pub fn new() -> Self {
        Self {
            shape: None,
            block: None,
        }
    }

    pub fn shape(self, shape: Shape) -> Self {
        Self {
            shape: Some(shape),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        Self::COLS * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        Self::ROWS * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(shape) = self.shape else {
            return;
        };
        let (width, height) = (shape.width(), shape.height());
        let piece_area = area.centered(
            Constraint::Length(super::cells_to_u16(width, CellDisplay::width())),
            Constraint::Length(super::cells_to_u16(height, CellDisplay::height())),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let empty = CellDisplay::empty(false);
        let occupied = CellDisplay::filled(shape.kind());
        for (row, grid_row) in grid_rows.enumerate() {
            for (col, grid_cell) in grid_row.into_iter().enumerate() {
                if shape.is_occupied(row, col) {
                    Widget::render(&occupied, grid_cell, buf);
                } else {
                    Widget::render(&empty, grid_cell, buf);
                }
            }
        }
    }
}
