use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;
use valuechase_core::{AppConfig, ChaseEvent, Chaser, Ease, EasingType, Result, Ticker};

use crate::input::Action;
use crate::theme::Theme;

/// Number of rendered values kept for the trail line
const TRAIL_LEN: usize = 120;
const MAX_TOLERANCE: u32 = 8;

/// Demo state around one chaser
pub struct App {
    /// Application configuration
    pub config: AppConfig,
    pub theme: Theme,
    pub ticker: Ticker,
    pub chaser: Chaser,
    events: mpsc::UnboundedReceiver<ChaseEvent>,
    /// Value the chaser is heading for
    pub target: f64,
    /// Latest rendered value
    pub progress: f64,
    /// Latest unrounded value
    pub raw: f64,
    pub friction: f64,
    /// Tolerance in decimal digits
    pub tolerance: u32,
    /// Measured frame rate of the latest frame
    pub true_fps: f64,
    /// Recent rendered values, oldest first
    pub trail: VecDeque<f64>,
    pub renders: u64,
    pub idles: u64,
    pub settled: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
}

impl App {
    /// Build the demo chaser and start it on a fresh ticker
    ///
    /// Without a configured curve the demo chases with `in_circ`.
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut chase = config.chase.clone();
        if chase.ease.is_none() {
            chase.ease = Some(Ease::Named(EasingType::InCirc));
        }
        let friction = chase.friction;
        let tolerance = chase.tolerance;

        let ticker = Ticker::new(config.ticker.clone());
        let chaser = Chaser::new(chase, ticker.clone());
        let (tx, events) = mpsc::unbounded_channel();
        chaser.set_event_sender(tx)?;
        chaser.start(None)?;

        let target = chaser.target()?.unwrap_or(config.chase.min);
        let true_fps = ticker.fps();

        Ok(Self {
            config,
            theme: Theme::default(),
            ticker,
            chaser,
            events,
            target,
            progress: target,
            raw: target,
            friction,
            tolerance,
            true_fps,
            trail: VecDeque::with_capacity(TRAIL_LEN),
            renders: 0,
            idles: 0,
            settled: false,
            should_quit: false,
            status_message: None,
        })
    }

    /// Whether frames should be driven at the frame rate
    pub fn is_animating(&self) -> bool {
        self.ticker.is_running()
    }

    /// Push one real-time frame at `now` and apply what the chaser published
    pub fn on_frame(&mut self, now: Duration) {
        self.ticker.tick(now);
        self.drain_events();
    }

    /// Apply pending chaser notifications to the view state
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                ChaseEvent::Update(frame) => {
                    self.settled = false;
                    self.true_fps = frame.true_fps;
                }
                ChaseEvent::Render(frame) => {
                    if let Some(progress) = frame.progress {
                        self.progress = progress;
                        self.trail.push_back(progress);
                        if self.trail.len() > TRAIL_LEN {
                            self.trail.pop_front();
                        }
                    }
                    if let Some(raw) = frame.raw {
                        self.raw = raw;
                    }
                    self.renders += 1;
                }
                ChaseEvent::Idle(frame) => {
                    self.settled = true;
                    self.idles += 1;
                    self.status_message = frame
                        .progress
                        .map(|p| format!(" Settled on {}", self.format_value(p)));
                }
            }
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                self.chaser.destroy()?;
                return Ok(());
            }
            Action::RaiseTarget => self.move_target(self.config.ui.step)?,
            Action::LowerTarget => self.move_target(-self.config.ui.step)?,
            Action::FrictionUp => {
                self.friction += 1.0;
                self.chaser.set_friction(self.friction)?;
                self.status_message = Some(format!(" Friction {:.1}", self.friction));
            }
            Action::FrictionDown => {
                self.friction = (self.friction - 1.0).max(1.0);
                self.chaser.set_friction(self.friction)?;
                self.status_message = Some(format!(" Friction {:.1}", self.friction));
            }
            Action::ToleranceUp => {
                self.tolerance = (self.tolerance + 1).min(MAX_TOLERANCE);
                self.chaser.set_tolerance(self.tolerance)?;
                self.status_message = Some(format!(" Tolerance {} digits", self.tolerance));
            }
            Action::ToleranceDown => {
                self.tolerance = self.tolerance.saturating_sub(1);
                self.chaser.set_tolerance(self.tolerance)?;
                self.status_message = Some(format!(" Tolerance {} digits", self.tolerance));
            }
            Action::Jump => {
                self.chaser.set_value(self.target)?;
                self.status_message = Some(format!(" Jumped to {}", self.format_value(self.target)));
            }
            Action::None => {}
        }
        self.drain_events();
        Ok(())
    }

    fn move_target(&mut self, delta: f64) -> Result<()> {
        let chase = &self.config.chase;
        let target = (self.target + delta).clamp(chase.min, chase.max);
        // Snap away accumulated float error from repeated steps
        self.target = (target * 1e6).round() / 1e6;
        debug!(target = self.target, "Demo target moved");
        self.status_message = None;
        self.chaser.set_progress(self.target)
    }

    /// Position of `value` within the configured range, clamped to 0..=1
    pub fn ratio(&self, value: f64) -> f64 {
        let chase = &self.config.chase;
        let span = chase.max - chase.min;
        if span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - chase.min) / span).clamp(0.0, 1.0)
    }

    /// Format a value with as many decimals as the tolerance resolves
    pub fn format_value(&self, value: f64) -> String {
        format!("{:.*}", self.tolerance as usize, value)
    }
}
