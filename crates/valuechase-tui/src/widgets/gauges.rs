use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::app::App;

/// Target gauge above the chased-value gauge
pub struct GaugesWidget;

impl GaugesWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(area);

        let target = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Target ")
                    .border_style(Style::default().fg(app.theme.muted)),
            )
            .gauge_style(Style::default().fg(app.theme.target).bg(app.theme.bg))
            .ratio(app.ratio(app.target))
            .label(app.format_value(app.target));
        frame.render_widget(target, rows[0]);

        let ease_name = app
            .config
            .chase
            .ease
            .as_ref()
            .map(|e| e.named().map(|kind| kind.name()).unwrap_or("custom"))
            .unwrap_or("in_circ");
        let progress = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Eased ({}) ", ease_name))
                    .border_style(Style::default().fg(app.theme.muted)),
            )
            .gauge_style(
                Style::default()
                    .fg(app.theme.progress)
                    .bg(app.theme.bg)
                    .add_modifier(Modifier::BOLD),
            )
            .ratio(app.ratio(app.progress))
            .label(format!(
                "{} (raw {})",
                app.format_value(app.progress),
                app.format_value(app.raw)
            ));
        frame.render_widget(progress, rows[1]);
    }
}
