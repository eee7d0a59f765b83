use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let (mode_str, mode_color) = if app.ticker.is_running() {
            (" RUNNING ", theme.running)
        } else {
            (" IDLE ", theme.idle)
        };

        let status_text = if let Some(msg) = &app.status_message {
            msg.clone()
        } else {
            format!(
                " friction {:.1} | tolerance {} | {:.0} fps | renders {} ",
                app.friction, app.tolerance, app.true_fps, app.renders
            )
        };

        let help_hint = " q:quit ←/→:target f/F:friction t/T:tolerance space:jump ";
        let used = mode_str.chars().count() + status_text.chars().count() + help_hint.chars().count();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(mode_str, Style::default().fg(theme.bg).bg(mode_color)),
            Span::styled(status_text, Style::default().fg(theme.fg).bg(theme.bar_bg)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bar_bg)),
            Span::styled(help_hint, Style::default().fg(theme.muted).bg(theme.bar_bg)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
