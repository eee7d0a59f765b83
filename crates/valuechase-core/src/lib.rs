pub mod chase;
pub mod config;
pub mod error;
pub mod ticker;

pub use chase::{ChaseEvent, ChaseEventKind, ChaseStatus, Chaser, Ease, EasingType, ListenerId};
pub use config::{AppConfig, ChaseConfig, TickerConfig, UiConfig};
pub use error::{Error, Result};
pub use ticker::{FrameEvent, FrameListener, SubscriptionId, Ticker};
