use std::cell::{Cell, RefCell};
use std::rc::Rc;

use valuechase_core::{
    ChaseConfig, ChaseEvent, ChaseEventKind, Chaser, Ease, EasingType, Error, FrameEvent, Ticker,
    TickerConfig,
};

const MAX_FRAMES: usize = 2_000;

/// Records every notification a chaser publishes
#[derive(Default)]
struct Log {
    updates: RefCell<Vec<FrameEvent>>,
    renders: RefCell<Vec<FrameEvent>>,
    idles: RefCell<Vec<FrameEvent>>,
}

impl Log {
    fn attach(chaser: &Chaser) -> Rc<Self> {
        let log = Rc::new(Self::default());
        for kind in [
            ChaseEventKind::Update,
            ChaseEventKind::Render,
            ChaseEventKind::Idle,
        ] {
            let log = Rc::clone(&log);
            chaser
                .on(kind, move |frame| {
                    let list = match kind {
                        ChaseEventKind::Update => &log.updates,
                        ChaseEventKind::Render => &log.renders,
                        ChaseEventKind::Idle => &log.idles,
                    };
                    list.borrow_mut().push(*frame);
                })
                .unwrap();
        }
        log
    }

    fn clear(&self) {
        self.updates.borrow_mut().clear();
        self.renders.borrow_mut().clear();
        self.idles.borrow_mut().clear();
    }
}

fn setup(config: ChaseConfig) -> (Chaser, Ticker, Rc<Log>) {
    let ticker = Ticker::new(TickerConfig::default());
    let chaser = Chaser::new(config, ticker.clone());
    let log = Log::attach(&chaser);
    (chaser, ticker, log)
}

/// Step until the loop pauses; returns the number of frames dispatched
fn run_until_paused(ticker: &Ticker) -> usize {
    let mut frames = 0;
    while ticker.step() {
        frames += 1;
        assert!(frames < MAX_FRAMES, "chase did not settle");
    }
    frames
}

/// Step until `log` has seen `count` idle notifications
fn run_until_idles(ticker: &Ticker, log: &Log, count: usize) -> usize {
    let mut frames = 0;
    while log.idles.borrow().len() < count {
        assert!(ticker.step(), "ticker paused before settling");
        frames += 1;
        assert!(frames < MAX_FRAMES, "chase did not settle");
    }
    frames
}

#[test]
fn test_default_config_settles_on_half() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    chaser.start(None).unwrap();
    chaser.set_progress(0.5).unwrap();

    run_until_paused(&ticker);

    assert!(!log.updates.borrow().is_empty());
    assert_eq!(log.idles.borrow().len(), 1);
    assert_eq!(log.idles.borrow()[0].progress, Some(0.5));
    assert_eq!(log.renders.borrow().last().unwrap().progress, Some(0.5));
    assert_eq!(chaser.progress().unwrap(), Some(0.5));
}

#[test]
fn test_chasing_from_rest_approaches_target_and_idles_once() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    log.clear();

    chaser.set_progress(0.5).unwrap();
    let frames = run_until_paused(&ticker);

    let updates = log.updates.borrow();
    assert!(frames > 10, "expected gradual motion, got {} frames", frames);
    assert!(updates.len() > 10);
    assert!(updates.iter().all(|f| f.raw.unwrap() <= 0.5));
    let near_end = updates[updates.len() - 2].raw.unwrap();
    assert!((0.5 - near_end).abs() < 0.001);

    assert_eq!(log.idles.borrow().len(), 1);
    assert_eq!(log.idles.borrow()[0].progress, Some(0.5));
}

#[test]
fn test_linear_motion_converges_monotonically() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    log.clear();

    chaser.set_progress(1.0).unwrap();
    run_until_paused(&ticker);

    let updates = log.updates.borrow();
    let mut prev_distance = f64::INFINITY;
    let mut prev_raw_distance = f64::INFINITY;
    for frame in updates.iter() {
        let distance = (1.0 - frame.progress.unwrap()).abs();
        let raw_distance = (1.0 - frame.raw.unwrap()).abs();
        assert!(distance < prev_distance, "progress moved away at {:?}", frame);
        assert!(raw_distance <= prev_raw_distance, "raw moved away at {:?}", frame);
        assert!(frame.raw.unwrap() <= 1.0, "overshoot at {:?}", frame);
        prev_distance = distance;
        prev_raw_distance = raw_distance;
    }
    assert_eq!(prev_distance, 0.0);
}

#[test]
fn test_eased_motion_still_settles() {
    let (chaser, ticker, log) = setup(ChaseConfig {
        ease: Some(Ease::Named(EasingType::InCirc)),
        initial: Some(0.0),
        ..Default::default()
    });
    chaser.start(None).unwrap();
    run_until_paused(&ticker);

    chaser.set_progress(1.0).unwrap();
    run_until_paused(&ticker);

    assert_eq!(chaser.progress().unwrap(), Some(1.0));
    assert_eq!(log.idles.borrow().len(), 2);
}

#[test]
fn test_custom_ease_is_called_with_unit_arguments() {
    let sink = Rc::new(Cell::new(0usize));
    let seen = Rc::clone(&sink);
    let ease = Ease::custom(|t, b, c, d| {
        assert_eq!((b, c, d), (0.0, 1.0, 1.0));
        t
    });

    let (chaser, ticker, _log) = setup(ChaseConfig {
        ease: Some(ease),
        ..Default::default()
    });
    chaser
        .on(ChaseEventKind::Update, move |_| seen.set(seen.get() + 1))
        .unwrap();
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    chaser.set_progress(0.8).unwrap();
    run_until_paused(&ticker);

    // an identity curve leaves linear velocity untouched
    assert_eq!(chaser.progress().unwrap(), Some(0.8));
    assert!(sink.get() > 0);
}

#[test]
fn test_set_value_after_settling_renders_immediately() {
    let (chaser, ticker, log) = setup(ChaseConfig {
        max: 10.0,
        initial: Some(1.0),
        ..Default::default()
    });
    chaser.start(None).unwrap();
    run_until_paused(&ticker);
    assert_eq!(chaser.progress().unwrap(), Some(1.0));
    log.clear();

    chaser.set_value(5.0).unwrap();

    let renders = log.renders.borrow();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].progress, Some(5.0));
    assert_eq!(renders[0].raw, Some(5.0));
    assert_eq!(log.idles.borrow().len(), 1);
    assert_eq!(chaser.target().unwrap(), Some(5.0));
    assert_eq!(chaser.raw().unwrap(), Some(5.0));
}

#[test]
fn test_set_value_twice_is_idempotent() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    log.clear();

    chaser.set_value(0.7).unwrap();
    let first = chaser.status().unwrap();
    assert_eq!(log.renders.borrow().len(), 1);

    chaser.set_value(0.7).unwrap();
    let second = chaser.status().unwrap();
    assert_eq!(first, second);
    assert_eq!(second.target, Some(0.7));
    assert_eq!(second.progress, Some(0.7));
    assert_eq!(second.raw, Some(0.7));

    let renders = log.renders.borrow();
    assert_eq!(renders.len(), 2);
    assert_eq!(renders[0], renders[1]);
    assert_eq!(renders[1].progress, Some(0.7));
    assert!(!ticker.step());
}

#[test]
fn test_set_value_before_any_frame_uses_synthetic_payload() {
    let (chaser, _ticker, log) = setup(ChaseConfig::default());
    chaser.set_value(0.3).unwrap();

    let renders = log.renders.borrow();
    assert_eq!(renders.len(), 1);
    assert_eq!(renders[0].time, 0.0);
    assert_eq!(renders[0].fps, 60.0);
    assert_eq!(renders[0].progress, Some(0.3));
}

#[test]
fn test_set_value_interrupts_a_chase() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    chaser.set_progress(1.0).unwrap();
    for _ in 0..5 {
        ticker.step();
    }

    chaser.set_value(0.2).unwrap();
    assert_eq!(chaser.progress().unwrap(), Some(0.2));
    assert!(!ticker.is_running());

    // nothing left to move
    assert!(!ticker.step());
    assert_eq!(log.renders.borrow().last().unwrap().progress, Some(0.2));
}

#[test]
fn test_one_idle_per_settle() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    assert_eq!(log.idles.borrow().len(), 1);

    chaser.set_progress(0.6).unwrap();
    run_until_paused(&ticker);
    assert_eq!(log.idles.borrow().len(), 2);

    chaser.set_progress(0.1).unwrap();
    run_until_paused(&ticker);
    assert_eq!(log.idles.borrow().len(), 3);
    assert_eq!(chaser.progress().unwrap(), Some(0.1));
}

#[test]
fn test_idle_mode_pauses_and_set_progress_wakes_the_ticker() {
    let (chaser, ticker, _log) = setup(ChaseConfig::default());
    chaser.start(None).unwrap();
    run_until_paused(&ticker);
    assert!(!ticker.is_running());
    assert!(chaser.is_running().unwrap());

    chaser.set_progress(0.3).unwrap();
    assert!(ticker.is_running());

    // same target again does not restart a paused loop
    run_until_paused(&ticker);
    chaser.set_progress(0.3).unwrap();
    assert!(!ticker.is_running());
}

#[test]
fn test_idle_disabled_keeps_the_ticker_running() {
    let (chaser, ticker, log) = setup(ChaseConfig {
        idle: false,
        ..Default::default()
    });
    chaser.start(Some(0.0)).unwrap();
    chaser.set_progress(0.4).unwrap();
    run_until_idles(&ticker, &log, 1);
    let renders_at_idle = log.renders.borrow().len();

    let before = ticker.time();
    for _ in 0..10 {
        assert!(ticker.step());
    }
    assert!(ticker.is_running());
    assert!(ticker.time() > before);
    // settled chasers stay quiet even though frames keep coming
    assert_eq!(log.renders.borrow().len(), renders_at_idle);
    assert_eq!(log.idles.borrow().len(), 1);
}

#[test]
fn test_set_progress_above_max_chases_max() {
    let (chaser, ticker, _log) = setup(ChaseConfig {
        max: 1.0,
        initial: Some(0.0),
        ..Default::default()
    });
    chaser.start(None).unwrap();
    run_until_paused(&ticker);

    chaser.set_progress(3.0).unwrap();
    assert_eq!(chaser.target().unwrap(), Some(1.0));
    run_until_paused(&ticker);
    assert_eq!(chaser.progress().unwrap(), Some(1.0));
}

#[test]
fn test_set_progress_below_min_is_not_clamped() {
    let (chaser, ticker, _log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);

    chaser.set_progress(-0.25).unwrap();
    run_until_paused(&ticker);
    assert_eq!(chaser.progress().unwrap(), Some(-0.25));
}

#[test]
fn test_is_running_tracks_subscription() {
    let (chaser, ticker, _log) = setup(ChaseConfig::default());
    assert!(!chaser.is_running().unwrap());

    chaser.start(None).unwrap();
    assert!(chaser.is_running().unwrap());
    assert_eq!(ticker.subscriber_count(), 1);

    chaser.stop().unwrap();
    assert!(!chaser.is_running().unwrap());
    assert_eq!(ticker.subscriber_count(), 0);

    chaser.start(None).unwrap();
    assert!(chaser.is_running().unwrap());
}

#[test]
fn test_stop_inside_update_listener_halts_notifications() {
    let (chaser, ticker, log) = setup(ChaseConfig::default());
    let handle = chaser.clone();
    let running_inside = Rc::new(Cell::new(None));
    let observed = Rc::clone(&running_inside);
    chaser
        .on(ChaseEventKind::Update, move |_| {
            handle.stop().unwrap();
            observed.set(Some(handle.is_running().unwrap()));
        })
        .unwrap();

    chaser.start(None).unwrap();
    chaser.set_progress(0.5).unwrap();
    ticker.step();

    assert_eq!(running_inside.get(), Some(false));
    assert_eq!(log.updates.borrow().len(), 1);
    // unsubscribed during the update pass, so no render for that frame
    assert!(log.renders.borrow().is_empty());
    assert!(!ticker.step());
    chaser.destroy().unwrap();
}

#[test]
fn test_restarted_chaser_chases_from_stopped_value() {
    let (chaser, ticker, _log) = setup(ChaseConfig::default());
    chaser.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);
    chaser.set_progress(1.0).unwrap();
    for _ in 0..3 {
        ticker.step();
    }
    let paused_at = chaser.progress().unwrap().unwrap();
    chaser.stop().unwrap();

    // waking the loop without a subscription moves nothing
    chaser.set_progress(0.9).unwrap();
    assert!(ticker.is_running());
    ticker.step();
    assert_eq!(chaser.progress().unwrap(), Some(paused_at));

    chaser.start(None).unwrap();
    assert_eq!(chaser.target().unwrap(), Some(0.0));
    ticker.step();
    assert!(chaser.progress().unwrap().unwrap() < paused_at);
    run_until_paused(&ticker);
    assert_eq!(chaser.progress().unwrap(), Some(0.0));
}

#[test]
fn test_destroy_inside_update_listener_poisons_chaser() {
    let (chaser, ticker, _log) = setup(ChaseConfig::default());
    let handle = chaser.clone();
    chaser
        .on(ChaseEventKind::Update, move |_| {
            handle.destroy().unwrap();
        })
        .unwrap();

    chaser.start(None).unwrap();
    chaser.set_progress(0.5).unwrap();
    ticker.step();

    assert!(chaser.is_destroyed());
    assert!(matches!(chaser.status(), Err(Error::Destroyed)));
    assert!(matches!(chaser.progress(), Err(Error::Destroyed)));
    assert!(matches!(chaser.friction(), Err(Error::Destroyed)));
    assert!(matches!(chaser.set_friction(2.0), Err(Error::Destroyed)));
    assert!(matches!(chaser.set_tolerance(2), Err(Error::Destroyed)));
    assert!(matches!(chaser.on(ChaseEventKind::Idle, |_| {}), Err(Error::Destroyed)));
    assert!(ticker.is_destroyed());
    assert!(!ticker.step());
}

#[test]
fn test_shared_ticker_drives_chasers_independently() {
    let ticker = Ticker::new(TickerConfig::default());
    let fast = Chaser::new(
        ChaseConfig {
            friction: 2.0,
            ..Default::default()
        },
        ticker.clone(),
    );
    let slow = Chaser::new(
        ChaseConfig {
            friction: 20.0,
            ..Default::default()
        },
        ticker.clone(),
    );
    let fast_log = Log::attach(&fast);
    let slow_log = Log::attach(&slow);

    fast.start(Some(0.0)).unwrap();
    slow.start(Some(0.0)).unwrap();
    run_until_paused(&ticker);

    fast.set_progress(1.0).unwrap();
    slow.set_progress(1.0).unwrap();
    run_until_paused(&ticker);

    // the fast chaser idling first must not strand the slow one
    assert_eq!(fast.progress().unwrap(), Some(1.0));
    assert_eq!(slow.progress().unwrap(), Some(1.0));
    assert_eq!(fast_log.idles.borrow().len(), 2);
    assert_eq!(slow_log.idles.borrow().len(), 2);
    let fast_idle = fast_log.idles.borrow()[1].frame;
    let slow_idle = slow_log.idles.borrow()[1].frame;
    assert!(fast_idle < slow_idle);
}

#[test]
fn test_slow_frames_reduce_the_step() {
    let ticker = Ticker::new(TickerConfig { fps: 60.0 });
    let chaser = Chaser::new(ChaseConfig::default(), ticker.clone());
    chaser.set_value(0.0).unwrap();
    chaser.start(Some(0.0)).unwrap();
    chaser.set_progress(1.0).unwrap();

    // first frame of a run reports the configured rate
    ticker.tick(std::time::Duration::from_millis(0));
    assert_eq!(chaser.progress().unwrap(), Some(0.1));

    // a 50ms gap is 20fps, a third of the configured rate
    ticker.tick(std::time::Duration::from_millis(50));
    let progress = chaser.progress().unwrap().unwrap();
    assert!((progress - 0.13).abs() < 1e-9, "progress {}", progress);
}

#[test]
fn test_event_sender_receives_every_notification() {
    let (chaser, ticker, _log) = setup(ChaseConfig::default());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    chaser.set_event_sender(tx).unwrap();

    chaser.start(None).unwrap();
    chaser.set_progress(0.5).unwrap();
    run_until_paused(&ticker);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(matches!(events.first(), Some(ChaseEvent::Update(_))));
    assert!(matches!(events.last(), Some(ChaseEvent::Idle(f)) if f.progress == Some(0.5)));
}
