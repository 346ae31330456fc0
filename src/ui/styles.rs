use ratatui::style::{Color, Style};

/// Dark colour scheme for the bar and its backdrop.
pub struct BarStyles {
    /// Backdrop gradient, top row.
    pub backdrop_top: Color,
    /// Backdrop gradient, bottom row.
    pub backdrop_bottom: Color,
    /// Translucent layer behind the fill.
    pub track: Style,
    pub fill: Style,
}

impl Default for BarStyles {
    fn default() -> Self {
        Self {
            backdrop_top: Color::Rgb(28, 30, 40),
            backdrop_bottom: Color::Rgb(10, 10, 14),
            track: Style::default().bg(Color::Rgb(72, 74, 84)),
            fill: Style::default().fg(Color::White).bg(Color::White),
        }
    }
}

impl BarStyles {
    pub fn track_color(&self) -> Color {
        self.track.bg.unwrap_or(Color::DarkGray)
    }

    pub fn fill_color(&self) -> Color {
        self.fill.bg.or(self.fill.fg).unwrap_or(Color::White)
    }
}
