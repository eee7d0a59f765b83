use ratatui::style::Color;

/// Colors used by the demo widgets
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bar_bg: Color,
    pub fg: Color,
    pub muted: Color,

    /// Gauge showing where the value is headed
    pub target: Color,
    /// Gauge showing the chased value
    pub progress: Color,
    pub running: Color,
    pub idle: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg: Color::Rgb(0x28, 0x28, 0x28),
            bar_bg: Color::Rgb(0x45, 0x40, 0x3d),
            fg: Color::Rgb(0xd4, 0xbe, 0x98),
            muted: Color::Rgb(0xa8, 0x99, 0x84),
            target: Color::Rgb(0xd8, 0xa6, 0x57),
            progress: Color::Rgb(0x89, 0xb4, 0x82),
            running: Color::Rgb(0xe7, 0x8a, 0x4e),
            idle: Color::Rgb(0xa9, 0xb6, 0x65),
        }
    }
}
