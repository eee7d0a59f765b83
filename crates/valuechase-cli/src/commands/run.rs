use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use valuechase_core::ticker::driver;
use valuechase_core::{AppConfig, ChaseEventKind, Chaser, FrameEvent, Ticker};

const BAR_WIDTH: usize = 40;

/// Chase in real time, redrawing a progress bar on every render
pub async fn run(config: &AppConfig, from: Option<f64>, to: f64) -> Result<()> {
    let (min, max) = (config.chase.min, config.chase.max);
    let summary = chase(config, from, to, move |frame| {
        let ratio = bar_ratio(min, max, frame.progress.unwrap_or(min));
        let filled = (ratio * BAR_WIDTH as f64).round() as usize;
        print!(
            "\r[{}{}] {:<12} {:>5.1} fps",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            frame.progress.unwrap_or(f64::NAN),
            frame.true_fps
        );
        let _ = io::stdout().flush();
    })
    .await?;

    match summary.settled_at {
        Some(frame) => println!("\nSettled after {} frames ({:.0}ms)", summary.frames, frame.time),
        None if summary.frames == 0 => println!("Already at {}", to),
        None => println!("\nInterrupted after {} frames", summary.frames),
    }
    Ok(())
}

pub struct RunSummary {
    pub frames: u64,
    pub settled_at: Option<FrameEvent>,
}

/// Drive a chase on the frame driver until it settles or ctrl-c is pressed
pub async fn chase<F>(config: &AppConfig, from: Option<f64>, to: f64, on_render: F) -> Result<RunSummary>
where
    F: Fn(&FrameEvent) + 'static,
{
    let ticker = Ticker::new(config.ticker.clone());
    let chaser = Chaser::new(config.chase.clone(), ticker.clone());

    let start = from.or(config.chase.initial).unwrap_or(0.0);
    chaser.set_value(start)?;
    chaser.start(Some(start))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let settled_at = Rc::new(Cell::new(None));
    {
        let settled_at = Rc::clone(&settled_at);
        chaser.on(ChaseEventKind::Idle, move |frame| {
            settled_at.set(Some(*frame));
            if shutdown_tx.send(true).is_err() {
                warn!("Frame driver already gone");
            }
        })?;
    }
    chaser.on(ChaseEventKind::Render, on_render)?;

    chaser.set_progress(to)?;
    if !chaser.status()?.needs_update {
        chaser.destroy()?;
        return Ok(RunSummary {
            frames: 0,
            settled_at: None,
        });
    }

    info!(from = start, to, fps = ticker.fps(), "Chasing in real time");
    let frames = tokio::select! {
        frames = driver::run(ticker.clone(), shutdown_rx) => frames,
        _ = tokio::signal::ctrl_c() => ticker.frame_count(),
    };

    chaser.destroy()?;
    Ok(RunSummary {
        frames,
        settled_at: settled_at.get(),
    })
}

fn bar_ratio(min: f64, max: f64, value: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[tokio::test(start_paused = true)]
    async fn test_chase_settles_in_real_time() {
        let renders = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&renders);
        let summary = chase(&AppConfig::default(), Some(0.0), 1.0, move |frame| {
            sink.borrow_mut().push(frame.progress)
        })
        .await
        .unwrap();

        let settled = summary.settled_at.unwrap();
        assert_eq!(settled.progress, Some(1.0));
        assert!(summary.frames > 10);
        assert_eq!(renders.borrow().last().copied().flatten(), Some(1.0));
        // first frame lands at 0ms, then ~16.7ms apart on the paused clock
        assert!(settled.time >= (summary.frames - 1) as f64 * 16.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chase_to_current_value_returns_immediately() {
        let summary = chase(&AppConfig::default(), Some(0.4), 0.4, |_| {})
            .await
            .unwrap();
        assert_eq!(summary.frames, 0);
        assert!(summary.settled_at.is_none());
    }

    #[test]
    fn test_bar_ratio_is_clamped() {
        assert_eq!(bar_ratio(0.0, 1.0, 0.5), 0.5);
        assert_eq!(bar_ratio(0.0, 1.0, 2.0), 1.0);
        assert_eq!(bar_ratio(0.0, 1.0, f64::NAN), 0.0);
        assert_eq!(bar_ratio(1.0, 1.0, 1.0), 0.0);
    }
}
