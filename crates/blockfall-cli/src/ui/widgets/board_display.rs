use std::iter;

use blockfall_engine::{ActivePiece, Grid};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The playfield: locked cells with the falling piece drawn on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    falling_piece: Option<ActivePiece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: ActivePiece) -> Self {
        Self {
            falling_piece: Some(piece),
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
        super::cells_to_u16(self.grid.width(), CellDisplay::width())
            .saturating_add(super::block_horizontal_margin(self.block.as_ref()))
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.grid.height(), CellDisplay::height())
            .saturating_add(super::block_vertical_margin(self.block.as_ref()))
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        // Cells above or beside the grid are never drawn
        let falling_cells: Vec<(usize, usize)> = self
            .falling_piece
            .iter()
            .flat_map(ActivePiece::cells)
            .filter_map(|(x, y)| Some((usize::try_from(x).ok()?, usize::try_from(y).ok()?)))
            .collect();
        let falling_kind = self.falling_piece.map(|piece| piece.kind());

        let col_constraints =
            (0..self.grid.width()).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints =
            (0..self.grid.height()).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (y, (grid_row, row)) in iter::zip(grid_cells, self.grid.rows()).enumerate() {
            for (x, (grid_cell, cell)) in iter::zip(grid_row, row).enumerate() {
                let display = match falling_kind {
                    Some(kind) if falling_cells.contains(&(x, y)) => CellDisplay::filled(kind),
                    _ => CellDisplay::from_cell(*cell, true),
                };
                display.render(grid_cell, buf);
            }
        }
    }
}
