use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::debug;

use valuechase_core::{AppConfig, ChaseEvent, Chaser, Ticker};

/// Notifications of one deterministic chase
pub struct Simulation {
    pub events: Vec<ChaseEvent>,
    pub frames: usize,
    pub settled: bool,
}

/// Chase from `from` to `to` by stepping the ticker one interval at a time
///
/// Stops at the first idle notification or after `max_frames` frames.
pub fn simulate(config: &AppConfig, from: Option<f64>, to: f64, max_frames: usize) -> Result<Simulation> {
    let ticker = Ticker::new(config.ticker.clone());
    let chaser = Chaser::new(config.chase.clone(), ticker.clone());

    // Settle on the starting value first so only the chase itself is reported
    let start = from.or(config.chase.initial).unwrap_or(0.0);
    chaser.set_value(start)?;
    chaser.start(Some(start))?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    chaser.set_event_sender(tx)?;
    chaser.set_progress(to)?;

    let mut events = Vec::new();
    let mut frames = 0;
    let mut settled = false;
    // Nothing to chase when already on the target
    let moving = chaser.status()?.needs_update;
    while moving && frames < max_frames && !settled {
        if !ticker.step() {
            break;
        }
        frames += 1;
        while let Ok(event) = rx.try_recv() {
            settled |= matches!(event, ChaseEvent::Idle(_));
            events.push(event);
        }
    }

    debug!(frames, settled, "Simulation finished");
    chaser.destroy()?;

    Ok(Simulation {
        events,
        frames,
        settled,
    })
}

pub fn run(config: &AppConfig, from: Option<f64>, to: f64, max_frames: usize, json: bool) -> Result<()> {
    let simulation = simulate(config, from, to, max_frames)?;

    for event in &simulation.events {
        if matches!(event, ChaseEvent::Update(_)) {
            continue;
        }
        if json {
            println!("{}", serde_json::to_string(event)?);
            continue;
        }

        let frame = event.frame();
        let progress = frame.progress.unwrap_or(f64::NAN);
        let raw = frame.raw.unwrap_or(f64::NAN);
        match event {
            ChaseEvent::Idle(_) => {
                println!("idle    #{:<5} {:>9.2}ms  progress {}", frame.frame, frame.time, progress)
            }
            _ => println!(
                "render  #{:<5} {:>9.2}ms  progress {:<12} raw {}",
                frame.frame, frame.time, progress, raw
            ),
        }
    }

    if !simulation.settled {
        if simulation.frames == 0 {
            println!("Already at {}", to);
            return Ok(());
        }
        bail!("Did not settle within {} frames", simulation.frames);
    }

    if !json {
        println!("\nSettled after {} frames", simulation.frames);
    }
    Ok(())
}
