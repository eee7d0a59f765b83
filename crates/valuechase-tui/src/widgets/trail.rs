use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Recent rendered values as a row of bars
pub struct TrailWidget;

impl TrailWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let width = area.width.saturating_sub(2) as usize;
        let line = Line::from(Self::bars(app, width));

        let paragraph = Paragraph::new(line)
            .style(Style::default().fg(app.theme.progress))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Trail ")
                    .border_style(Style::default().fg(app.theme.muted)),
            );
        frame.render_widget(paragraph, area);
    }

    /// Newest `width` trail values mapped to bar glyphs
    pub fn bars(app: &App, width: usize) -> String {
        let skip = app.trail.len().saturating_sub(width);
        app.trail
            .iter()
            .skip(skip)
            .map(|&v| {
                let level = (app.ratio(v) * (LEVELS.len() - 1) as f64).round() as usize;
                LEVELS[level.min(LEVELS.len() - 1)]
            })
            .collect()
    }
}
