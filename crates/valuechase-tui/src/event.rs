use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    frame_interval: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            frame_interval: Duration::from_millis(16),
        }
    }

    /// Handler that polls at `frame_interval` while an animation is running
    pub fn with_frame_interval(tick_rate_ms: u64, frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            ..Self::new(tick_rate_ms)
        }
    }

    /// Poll for the next event at the slow tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate, AppEvent::Tick)
    }

    /// Poll for the next event at the frame rate; a timeout yields `AppEvent::Frame`
    pub fn next_frame(&self) -> Result<Option<AppEvent>> {
        self.poll(self.frame_interval, AppEvent::Frame)
    }

    fn poll(&self, timeout: Duration, on_timeout: AppEvent) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(on_timeout))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// A frame interval elapsed while the ticker was running
    Frame,
    /// Tick event for periodic redraws while idle
    Tick,
}
