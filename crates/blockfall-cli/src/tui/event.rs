use crossterm::event::Event as CrosstermEvent;

/// Events delivered by the event loop.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// The simulation clock advanced by one tick.
    Tick,
    /// Something changed since the last frame; redraw.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}
