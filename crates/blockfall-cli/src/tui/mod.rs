//! Minimal terminal runtime: a fixed-rate tick clock, redraw-on-change rendering and
//! crossterm input, driving a single [`App`].

mod app;
mod event;
mod event_loop;
mod runner;

pub use self::{app::App, runner::Tui};
