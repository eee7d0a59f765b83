use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use valuechase_core::AppConfig;
use valuechase_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{GaugesWidget, StatusBarWidget, TrailWidget},
    App,
};

pub fn run(config: AppConfig) -> Result<()> {
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("valuechase"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let frame_interval = app.ticker.frame_interval();
    let event_handler = EventHandler::with_frame_interval(app.config.ui.tick_rate_ms, frame_interval);
    let origin = Instant::now();
    let mut last_frame = origin;

    loop {
        terminal.draw(|frame| {
            let size = frame.area();
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6),
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(size);

            GaugesWidget::render(frame, layout[0], app);
            TrailWidget::render(frame, layout[1], app);
            StatusBarWidget::render(frame, layout[3], app);
        })?;

        // Poll at the frame rate only while the ticker wants frames
        let event = if app.is_animating() {
            event_handler.next_frame()?
        } else {
            event_handler.next()?
        };

        match event {
            Some(AppEvent::Key(key)) => app.handle_action(handle_key_event(key))?,
            Some(AppEvent::Tick) => app.drain_events(),
            Some(AppEvent::Frame) | Some(AppEvent::Resize(_, _)) | None => {}
        }

        if app.should_quit {
            break;
        }

        // Key presses cut polls short, so frames are paced by wall time
        if app.is_animating() && last_frame.elapsed() >= frame_interval {
            last_frame = Instant::now();
            app.on_frame(origin.elapsed());
        }
    }

    Ok(())
}
