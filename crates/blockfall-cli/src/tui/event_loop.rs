use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Produces ticks at a fixed interval, renders after every change, and forwards
/// terminal input in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates an event loop with ticks disabled.
    pub(super) fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            dirty: true, // first frame
        }
    }

    /// Sets the tick interval. `None` disables ticks.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    /// Blocks until the next event is available.
    ///
    /// Input that is already pending when a tick falls due is returned first, so a
    /// key press is always applied before the tick that follows it.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let now = Instant::now();
            let timeout = match self.tick_interval {
                Some(interval) => {
                    let due = self.last_tick + interval;
                    if now >= due {
                        if event::poll(Duration::ZERO)? {
                            self.dirty = true;
                            return Ok(event::read()?.into());
                        }
                        // Skip missed ticks instead of replaying them in a burst
                        self.last_tick = if now - due > interval { now } else { due };
                        self.dirty = true;
                        return Ok(TuiEvent::Tick);
                    }
                    Some(due - now)
                }
                None => None,
            };

            if let Some(timeout) = timeout
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }
}
