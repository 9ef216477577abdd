use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, game_display::*, piece_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod game_display;
mod piece_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const RED: Color = Color::Rgb(255, 0, 0);

    /// Converts an engine color to a terminal color.
    pub const fn from_engine(color: blockfall_engine::Color) -> Color {
        Color::Rgb(color.r, color.g, color.b)
    }
}

pub mod style {
    use blockfall_engine::PieceKind;
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const HELP: Style = Style::new().fg(color::GRAY);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);

    /// Solid block in the canonical color of `kind`.
    pub const fn piece(kind: PieceKind) -> Style {
        bg_only(color::from_engine(kind.color()))
    }

    /// Border color of the panels around the board.
    pub const fn border(game_over: bool) -> Color {
        if game_over { color::RED } else { color::WHITE }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

/// Converts a cell count to terminal units, saturating on absurd sizes.
fn cells_to_u16(cells: usize, cell_size: u16) -> u16 {
    u16::try_from(cells)
        .unwrap_or(u16::MAX)
        .saturating_mul(cell_size)
}
