//! Value chasing
//!
//! A [`Chaser`] follows a target value one frame at a time. Each step moves
//! the current value by `distance / friction`, optionally shaped by an
//! [`Ease`], and rounds it to the configured number of decimal digits. When a
//! step is too small to change the rounded value the chaser snaps onto the
//! target, so every chase settles in a finite number of frames.
//!
//! ```ignore
//! let ticker = Ticker::with_defaults();
//! let chaser = Chaser::new(ChaseConfig::default(), ticker.clone());
//! chaser.on(ChaseEventKind::Render, |frame| println!("{:?}", frame.progress))?;
//! chaser.start(None)?;
//! chaser.set_progress(0.5)?;
//! while ticker.step() {}
//! ```

mod chaser;
mod easing;
mod events;
mod motion;

pub use chaser::{ChaseStatus, Chaser};
pub use easing::{Ease, EaseFn, EasingType};
pub use events::{ChaseEvent, ChaseEventKind, ListenerId};
