use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::events::{ChaseEvent, ChaseEventKind, Emitter, ListenerId};
use super::motion::Motion;
use crate::config::ChaseConfig;
use crate::ticker::{FrameEvent, FrameListener, SubscriptionId, Ticker};
use crate::{Error, Result};

enum Lifecycle {
    Active(Motion),
    Destroyed,
}

struct ChaserInner {
    lifecycle: RefCell<Lifecycle>,
    running: Cell<bool>,
    ticker: RefCell<Option<Ticker>>,
    subscription: Cell<Option<SubscriptionId>>,
    events: Emitter,
}

/// Point-in-time view of a chaser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaseStatus {
    pub target: Option<f64>,
    pub progress: Option<f64>,
    pub raw: Option<f64>,
    pub running: bool,
    pub needs_update: bool,
    pub needs_change: bool,
    pub friction: f64,
    pub tolerance: f64,
    pub idle: bool,
    pub last_frame: Option<FrameEvent>,
}

/// Chases a target value across frames of a [`Ticker`]
///
/// The handle is cheap to clone; clones share the same state. A listener
/// closure that captures a clone keeps the chaser alive until
/// [`Chaser::destroy`] or [`Chaser::remove_all_listeners`] drops it.
#[derive(Clone)]
pub struct Chaser {
    inner: Rc<ChaserInner>,
}

impl Chaser {
    pub fn new(config: ChaseConfig, ticker: Ticker) -> Self {
        Self::build(config, Some(ticker))
    }

    /// A chaser without a frame source; `start` and `stop` do nothing
    pub fn without_ticker(config: ChaseConfig) -> Self {
        Self::build(config, None)
    }

    fn build(config: ChaseConfig, ticker: Option<Ticker>) -> Self {
        Self {
            inner: Rc::new(ChaserInner {
                lifecycle: RefCell::new(Lifecycle::Active(Motion::new(config))),
                running: Cell::new(false),
                ticker: RefCell::new(ticker),
                subscription: Cell::new(None),
                events: Emitter::default(),
            }),
        }
    }

    /// Subscribe to the frame source and chase `initial`, the configured
    /// initial value, or 0, in that order
    pub fn start(&self, initial: Option<f64>) -> Result<()> {
        let configured = self.inner.with_motion(|m| m.initial)?;
        let Some(ticker) = self.inner.ticker() else {
            return Ok(());
        };
        if self.inner.running.get() {
            return Ok(());
        }

        let strong: Rc<dyn FrameListener> = self.inner.clone();
        let listener: Weak<dyn FrameListener> = Rc::downgrade(&strong);
        let id = ticker.subscribe(listener);
        self.inner.subscription.set(Some(id));
        ticker.start();
        self.inner.running.set(true);

        let value = initial.or(configured).unwrap_or(0.0);
        debug!(initial = value, "Chaser started");
        self.set_progress(value)
    }

    /// Unsubscribe from the frame source, keeping the current values
    pub fn stop(&self) -> Result<()> {
        self.inner.ensure_active()?;
        let Some(ticker) = self.inner.ticker() else {
            return Ok(());
        };
        if !self.inner.running.get() {
            return Ok(());
        }

        if let Some(id) = self.inner.subscription.take() {
            ticker.unsubscribe(id);
        }
        self.inner.running.set(false);

        ticker.request_idle();
        debug!("Chaser stopped");
        Ok(())
    }

    pub fn is_running(&self) -> Result<bool> {
        self.inner.ensure_active()?;
        Ok(self.inner.running.get())
    }

    /// Chase a new target, clamped to the configured maximum
    pub fn set_progress(&self, value: f64) -> Result<()> {
        let (changed, idle) = self.inner.with_motion(|m| (m.set_progress(value), m.idle))?;

        // Wake the loop in case an earlier settle paused it
        if changed && idle {
            if let Some(ticker) = self.inner.ticker() {
                ticker.start();
            }
        }
        Ok(())
    }

    pub fn set_friction(&self, value: f64) -> Result<()> {
        self.inner.with_motion(|m| m.friction = value)
    }

    /// Set the rounding precision in decimal digits
    pub fn set_tolerance(&self, digits: u32) -> Result<()> {
        self.inner.with_motion(|m| m.set_tolerance(digits))
    }

    /// Jump to `value` and render it before returning
    pub fn set_value(&self, value: f64) -> Result<()> {
        let last = self.inner.with_motion(|m| {
            m.set_value(value);
            m.last_frame
        })?;

        let mut frame = last.unwrap_or_else(|| FrameEvent::synthetic(self.inner.fps()));
        self.inner.on_render(&mut frame);
        Ok(())
    }

    /// Stop, drop every listener and tear down the frame source
    ///
    /// Every later call fails with [`Error::Destroyed`].
    pub fn destroy(&self) -> Result<()> {
        self.stop()?;
        self.inner.events.clear();
        self.inner.running.set(false);

        let ticker = self.inner.ticker.borrow_mut().take();
        if let Some(ticker) = ticker {
            ticker.destroy();
        }

        *self.inner.lifecycle.borrow_mut() = Lifecycle::Destroyed;
        debug!("Chaser destroyed");
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(*self.inner.lifecycle.borrow(), Lifecycle::Destroyed)
    }

    /// Register a callback for one kind of notification
    pub fn on<F>(&self, kind: ChaseEventKind, callback: F) -> Result<ListenerId>
    where
        F: Fn(&FrameEvent) + 'static,
    {
        self.inner.ensure_active()?;
        Ok(self.inner.events.on(kind, Rc::new(callback)))
    }

    pub fn off(&self, id: ListenerId) -> Result<bool> {
        self.inner.ensure_active()?;
        Ok(self.inner.events.off(id))
    }

    pub fn remove_all_listeners(&self) -> Result<()> {
        self.inner.ensure_active()?;
        self.inner.events.clear();
        Ok(())
    }

    pub fn listener_count(&self) -> Result<usize> {
        self.inner.ensure_active()?;
        Ok(self.inner.events.len())
    }

    /// Forward every notification into a channel
    pub fn set_event_sender(&self, tx: mpsc::UnboundedSender<ChaseEvent>) -> Result<()> {
        self.inner.ensure_active()?;
        self.inner.events.set_sender(Some(tx));
        Ok(())
    }

    pub fn status(&self) -> Result<ChaseStatus> {
        let running = self.inner.running.get();
        self.inner.with_motion(|m| ChaseStatus {
            target: m.target,
            progress: m.current,
            raw: m.raw,
            running,
            needs_update: m.needs_update,
            needs_change: m.needs_change,
            friction: m.friction,
            tolerance: m.tolerance,
            idle: m.idle,
            last_frame: m.last_frame,
        })
    }

    /// Rounded current value
    pub fn progress(&self) -> Result<Option<f64>> {
        self.inner.with_motion(|m| m.current)
    }

    /// Unrounded current value
    pub fn raw(&self) -> Result<Option<f64>> {
        self.inner.with_motion(|m| m.raw)
    }

    pub fn target(&self) -> Result<Option<f64>> {
        self.inner.with_motion(|m| m.target)
    }

    pub fn friction(&self) -> Result<f64> {
        self.inner.with_motion(|m| m.friction)
    }

    /// Working tolerance (`10^digits`)
    pub fn tolerance(&self) -> Result<f64> {
        self.inner.with_motion(|m| m.tolerance)
    }

    /// The bound frame source, if any
    pub fn ticker(&self) -> Option<Ticker> {
        self.inner.ticker()
    }
}

impl std::fmt::Debug for Chaser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status() {
            Ok(status) => f.debug_tuple("Chaser").field(&status).finish(),
            Err(_) => write!(f, "Chaser(destroyed)"),
        }
    }
}

impl ChaserInner {
    fn with_motion<R>(&self, f: impl FnOnce(&mut Motion) -> R) -> Result<R> {
        match &mut *self.lifecycle.borrow_mut() {
            Lifecycle::Active(motion) => Ok(f(motion)),
            Lifecycle::Destroyed => Err(Error::Destroyed),
        }
    }

    fn ensure_active(&self) -> Result<()> {
        self.with_motion(|_| ())
    }

    fn ticker(&self) -> Option<Ticker> {
        self.ticker.borrow().clone()
    }

    fn fps(&self) -> f64 {
        self.ticker()
            .map(|t| t.fps())
            .unwrap_or_else(|| crate::TickerConfig::default().fps)
    }
}

impl FrameListener for ChaserInner {
    fn wants_frames(&self) -> bool {
        if !self.running.get() {
            return false;
        }
        match &*self.lifecycle.borrow() {
            Lifecycle::Active(m) => m.needs_update || m.needs_change || !m.idle,
            Lifecycle::Destroyed => false,
        }
    }

    fn on_update(&self, frame: &mut FrameEvent) {
        let changed = self
            .with_motion(|m| {
                if m.needs_update {
                    m.advance(frame);
                }
                if m.needs_change {
                    m.stamp(frame);
                }
                m.needs_change
            })
            .unwrap_or(false);

        if changed {
            self.events.emit(ChaseEvent::Update(*frame));
        }
    }

    fn on_render(&self, frame: &mut FrameEvent) {
        let changed = self
            .with_motion(|m| {
                if m.needs_change {
                    m.stamp(frame);
                }
                m.needs_change
            })
            .unwrap_or(false);

        if !changed {
            return;
        }

        self.events.emit(ChaseEvent::Render(*frame));

        // A render listener may have destroyed the chaser
        let settled = self
            .with_motion(|m| {
                if m.arrived() {
                    m.needs_update = false;
                    m.needs_change = false;
                    Some(m.idle)
                } else {
                    m.needs_update = true;
                    None
                }
            })
            .ok()
            .flatten();

        if let Some(idle) = settled {
            if idle {
                if let Some(ticker) = self.ticker() {
                    ticker.request_idle();
                }
            }
            trace!(progress = ?frame.progress, "Chaser settled");
            self.events.emit(ChaseEvent::Idle(*frame));
        }
    }
}
