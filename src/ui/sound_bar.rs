//! Widgets for the bar: the gradient backdrop and the rounded, bottom-filled
//! bar itself.

use crate::geometry::{CellScale, Placement};
use crate::ui::styles::BarStyles;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

/// Lower-eighth blocks for the partially filled top row, indexed by eighths.
const EIGHTHS: [&str; 8] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇"];

/// Split a fill fraction over `rows` into fully filled rows plus the eighths
/// of the next row.
pub fn fill_split(fill: f64, rows: u16) -> (u16, usize) {
    let fill = if fill.is_nan() { 0.0 } else { fill.clamp(0.0, 1.0) };
    let exact = fill * rows as f64;
    let mut full = exact.floor() as u16;
    let mut eighths = ((exact - full as f64) * 8.0).round() as usize;
    if eighths >= 8 {
        full += 1;
        eighths = 0;
    }
    (full.min(rows), eighths)
}

fn blend(a: Color, b: Color, t: f64) -> Color {
    match (a, b) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => a,
        _ => b,
    }
}

/// Dark gradient standing in for the blurred background image.
pub struct Backdrop<'a> {
    pub styles: &'a BarStyles,
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let span = area.height.saturating_sub(1).max(1) as f64;
        for row in 0..area.height {
            let color = blend(self.styles.backdrop_top, self.styles.backdrop_bottom, row as f64 / span);
            for col in 0..area.width {
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(" ").set_bg(color);
                }
            }
        }
    }
}

/// The bar: a track clipped to a rounded rectangle with a bottom-anchored
/// fill `fill * height` tall. Rounding and fill are laid out over the full
/// container; cells cut off by the frame are skipped.
pub struct SoundBar<'a> {
    pub fill: f64,
    /// Corner radius in layout points.
    pub corner_radius: f64,
    pub scale: CellScale,
    pub placement: Placement,
    pub styles: &'a BarStyles,
}

impl Widget for SoundBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Placement { cols, rows, skip_cols, skip_rows, .. } = self.placement;
        if cols == 0 || rows == 0 {
            return;
        }
        let radius = self.scale.corner_radius(self.corner_radius, cols, rows);
        let (full, eighths) = fill_split(self.fill, rows);
        let track = self.styles.track_color();
        let fill = self.styles.fill_color();

        let shown_rows = area.height.min(rows.saturating_sub(skip_rows));
        let shown_cols = area.width.min(cols.saturating_sub(skip_cols));
        for row in 0..shown_rows {
            let bar_row = row + skip_rows;
            let from_bottom = rows - 1 - bar_row;
            for col in 0..shown_cols {
                if !self.scale.inside_rounded(col + skip_cols, bar_row, cols, rows, radius) {
                    continue;
                }
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                if from_bottom < full {
                    cell.set_symbol(" ").set_bg(fill);
                } else if from_bottom == full && eighths > 0 {
                    cell.set_symbol(EIGHTHS[eighths]).set_fg(fill).set_bg(track);
                } else {
                    cell.set_symbol(" ").set_bg(track);
                }
            }
        }
    }
}
