//! Real-time driver pushing wall-clock frames into a [`Ticker`]
//!
//! Runs on the current task (the ticker is not `Send`). While the loop is
//! paused the driver parks until the ticker is started again, so idle chasers
//! consume no frames.

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::Ticker;

/// Drive `ticker` at its frame rate until `shutdown` flips to true or the
/// ticker is destroyed. Returns the number of frames dispatched.
pub async fn run(ticker: Ticker, mut shutdown: watch::Receiver<bool>) -> u64 {
    let origin = Instant::now();
    let mut interval = time::interval(ticker.frame_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut dispatched = 0;

    info!(fps = ticker.fps(), "Frame driver started");

    loop {
        if *shutdown.borrow() || ticker.is_destroyed() {
            break;
        }

        if !ticker.is_running() {
            debug!("Frame driver parked while ticker is paused");
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() {
                        break;
                    }
                }
                _ = ticker.started() => {
                    interval.reset();
                }
            }
            continue;
        }

        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() {
                    break;
                }
            }
            _ = interval.tick() => {
                if ticker.tick(origin.elapsed()) {
                    dispatched += 1;
                }
            }
        }
    }

    info!(frames = dispatched, "Frame driver stopped");
    dispatched
}
