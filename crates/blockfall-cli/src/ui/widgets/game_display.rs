use blockfall_engine::Board;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, style};

/// Full game screen: stats on the left, the board in the middle and the next piece on
/// the right, with a banner over the board once the game is over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    board: &'a Board,
    horizontal_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            horizontal_padding: 1,
        }
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::horizontal(self.horizontal_padding))
            .border_style(style::border(self.board.is_game_over()))
            .style(style::DEFAULT)
    }

    fn board_display(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.board.grid())
            .falling_piece(*self.board.current())
            .block(
                Block::bordered()
                    .border_style(style::border(self.board.is_game_over()))
                    .style(style::DEFAULT),
            )
    }

    /// Rows needed to show everything.
    pub fn height(&self) -> u16 {
        let stats = StatsDisplay::new(self.board).block(self.panel("STATS"));
        let next = PieceDisplay::new().block(self.panel("NEXT"));
        self.board_display()
            .height()
            .max(stats.height())
            .max(next.height())
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board_display();
        let next_panel = PieceDisplay::new()
            .shape(*self.board.next())
            .block(self.panel("NEXT"));
        let stats = StatsDisplay::new(self.board).block(self.panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if self.board.is_game_over() {
            let block = Block::new().style(style::GAME_OVER);
            let text = Text::styled("GAME OVER", style::GAME_OVER).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
