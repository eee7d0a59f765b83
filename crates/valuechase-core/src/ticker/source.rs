use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, trace};

use super::frame::FrameEvent;
use crate::config::TickerConfig;

const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

/// Receiver of the two per-frame passes
pub trait FrameListener {
    /// Called for every subscriber before any render call of the same frame
    fn on_update(&self, frame: &mut FrameEvent);
    /// Called after the update pass has reached every subscriber
    fn on_render(&self, frame: &mut FrameEvent);
    /// Whether this subscriber still needs the loop running
    fn wants_frames(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    listener: Weak<dyn FrameListener>,
}

struct TickerInner {
    fps: f64,
    running: Cell<bool>,
    destroyed: Cell<bool>,
    /// Time of the latest dispatched frame
    time: Cell<f64>,
    /// Time of the previous frame in the current run; cleared on restart
    last: Cell<Option<f64>>,
    frame: Cell<u64>,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
    wake: Notify,
}

/// Shared handle to a frame loop
///
/// Cloning the handle shares the loop. The ticker is single-threaded: no
/// borrow is held while listeners run, so listeners may subscribe,
/// unsubscribe, start or stop from inside a frame.
#[derive(Clone)]
pub struct Ticker {
    inner: Rc<TickerInner>,
}

impl Ticker {
    pub fn new(config: TickerConfig) -> Self {
        Self {
            inner: Rc::new(TickerInner {
                fps: config.fps,
                running: Cell::new(false),
                destroyed: Cell::new(false),
                time: Cell::new(0.0),
                last: Cell::new(None),
                frame: Cell::new(0),
                next_id: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
                wake: Notify::new(),
            }),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(TickerConfig::default())
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.inner.fps
    }

    /// Nominal time between frames
    ///
    /// Always non-zero; rates that do not map to a representable interval
    /// fall back to 16ms.
    pub fn frame_interval(&self) -> Duration {
        let fps = self.inner.fps;
        if !(fps.is_finite() && fps > 0.0) {
            return DEFAULT_INTERVAL;
        }
        Duration::try_from_secs_f64(1.0 / fps)
            .unwrap_or(DEFAULT_INTERVAL)
            .max(Duration::from_nanos(1))
    }

    fn interval_ms(&self) -> f64 {
        if self.inner.fps > 0.0 {
            1000.0 / self.inner.fps
        } else {
            16.0
        }
    }

    /// Start (or resume) the frame loop
    pub fn start(&self) {
        if self.inner.destroyed.get() || self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);
        self.inner.last.set(None);
        self.inner.wake.notify_one();
        debug!(fps = self.inner.fps, "Ticker loop started");
    }

    /// Pause the frame loop; subscriptions are kept
    pub fn stop(&self) {
        if self.inner.running.replace(false) {
            debug!(frame = self.inner.frame.get(), "Ticker loop paused");
        }
    }

    /// Pause the loop unless a subscriber still wants frames
    ///
    /// Returns true when the loop was paused (or already was).
    pub fn request_idle(&self) -> bool {
        let listeners: Vec<Weak<dyn FrameListener>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|s| s.listener.clone())
            .collect();

        let busy = listeners
            .iter()
            .filter_map(Weak::upgrade)
            .any(|l| l.wants_frames());

        if busy {
            trace!("Idle request ignored: a subscriber still wants frames");
            return false;
        }
        self.stop();
        true
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Time of the latest dispatched frame in milliseconds
    pub fn time(&self) -> f64 {
        self.inner.time.get()
    }

    /// Number of frames dispatched so far
    pub fn frame_count(&self) -> u64 {
        self.inner.frame.get()
    }

    pub fn subscribe(&self, listener: Weak<dyn FrameListener>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Subscriber { id, listener });
        trace!(id = id.0, "Frame listener subscribed");
        id
    }

    /// Remove a subscription; returns false if it was not present
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        before != subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.borrow().iter().any(|s| s.id == id)
    }

    /// Dispatch one frame exactly one interval after the previous one
    pub fn step(&self) -> bool {
        let interval = self.interval_ms();
        let time = self.inner.time.get() + interval;
        self.dispatch(time, interval, self.inner.fps)
    }

    /// Dispatch a frame at `now`, measured from the ticker origin
    ///
    /// The true frame rate comes from the gap to the previous frame of the
    /// current run. A first frame, or time that did not move forward, reports
    /// the configured rate.
    pub fn tick(&self, now: Duration) -> bool {
        let time = now.as_nanos() as f64 / 1_000_000.0;
        let (delta, true_fps) = match self.inner.last.get() {
            Some(last) if time > last => {
                let delta = time - last;
                (delta, 1000.0 / delta)
            }
            _ => (0.0, self.inner.fps),
        };
        self.dispatch(time, delta, true_fps)
    }

    fn dispatch(&self, time: f64, delta: f64, true_fps: f64) -> bool {
        if self.inner.destroyed.get() || !self.inner.running.get() {
            return false;
        }

        let frame = self.inner.frame.get() + 1;
        self.inner.frame.set(frame);
        self.inner.time.set(time);
        self.inner.last.set(Some(time));

        let base = FrameEvent::new(time, delta, self.inner.fps, true_fps, frame);
        let snapshot: Vec<(SubscriptionId, Weak<dyn FrameListener>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|s| (s.id, s.listener.clone()))
            .collect();

        for (id, listener) in &snapshot {
            if !self.is_subscribed(*id) {
                continue;
            }
            if let Some(listener) = listener.upgrade() {
                let mut evt = base;
                listener.on_update(&mut evt);
            }
        }

        for (id, listener) in &snapshot {
            if !self.is_subscribed(*id) {
                continue;
            }
            if let Some(listener) = listener.upgrade() {
                let mut evt = base;
                listener.on_render(&mut evt);
            }
        }

        self.inner
            .subscribers
            .borrow_mut()
            .retain(|s| s.listener.strong_count() > 0);

        true
    }

    /// Wait until the loop is started again
    pub async fn started(&self) {
        self.inner.wake.notified().await;
    }

    /// Stop the loop and drop every subscription; no frame is dispatched afterwards
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        self.inner.running.set(false);
        self.inner.subscribers.borrow_mut().clear();
        self.inner.wake.notify_waiters();
        debug!("Ticker destroyed");
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticker")
            .field("fps", &self.inner.fps)
            .field("running", &self.inner.running.get())
            .field("destroyed", &self.inner.destroyed.get())
            .field("frame", &self.inner.frame.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
