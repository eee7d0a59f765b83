//! Frame source driving chasers
//!
//! A [`Ticker`] owns a loop flag and a list of subscribers. Every dispatched
//! frame runs an update pass over all subscribers, then a render pass.
//! Frames are pushed in manually with [`Ticker::step`] / [`Ticker::tick`] or
//! by the real-time [`driver::run`] loop.

pub mod driver;
mod frame;
mod source;

pub use frame::FrameEvent;
pub use source::{FrameListener, SubscriptionId, Ticker};
