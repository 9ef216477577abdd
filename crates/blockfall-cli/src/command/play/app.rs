use std::time::Duration;

use blockfall_engine::Board;
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::{
    tui::{App, Tui},
    ui::widgets::{GameDisplay, style},
};

#[derive(Debug)]
pub struct PlayApp {
    board: Board,
    tick_interval: Duration,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(board: Board, tick_interval: Duration) -> Self {
        Self {
            board,
            tick_interval,
            is_exiting: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn handle_key(&mut self, code: KeyCode) {
        let is_playing = !self.board.is_game_over();
        match code {
            KeyCode::Left if is_playing => _ = self.board.move_left(),
            KeyCode::Right if is_playing => _ = self.board.move_right(),
            KeyCode::Down if is_playing => _ = self.board.soft_drop(),
            KeyCode::Up if is_playing => _ = self.board.rotate_cw(),
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(self.tick_interval));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_press_event() {
            self.handle_key(key.code);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let display = GameDisplay::new(&self.board);
        let help_text = if self.board.is_game_over() {
            "Controls: Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Rotate) | Q (Quit)"
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(display.height()), Constraint::Length(1)])
                .areas(frame.area());
        frame.render_widget(&display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        if self.board.advance().is_halted() {
            // Nothing moves any more; only input can wake the loop
            tui.set_tick_interval(None);
        }
    }
}
