//! Bar geometry: the compiled-in layout table, the direction resolver and the
//! mapping from layout points onto terminal cells.

use crate::state::ExpansionDirection;
use ratatui::layout::Rect;

/// Fixed visual constants, in layout points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    pub corner_radius: f64,
    pub std_width: f64,
    pub expand_width: f64,
    pub std_height: f64,
    pub expand_height: f64,
    pub top_offset: f64,
    pub bottom_offset: f64,
}

pub const LAYOUT: LayoutConstants = LayoutConstants {
    corner_radius: 22.0,
    std_width: 90.0,
    expand_width: 80.0,
    std_height: 200.0,
    expand_height: 220.0,
    top_offset: -20.0,
    bottom_offset: 20.0,
};

/// Size and vertical offset of the bar container, in layout points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    /// Negative moves the container up.
    pub offset_y: f64,
}

impl Geometry {
    /// Linear blend between two geometries, `t` in [0, 1].
    pub fn lerp(self, to: Geometry, t: f64) -> Geometry {
        Geometry {
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
            offset_y: lerp(self.offset_y, to.offset_y, t),
        }
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Resolve the container geometry for an expansion direction.
pub fn resolve(direction: ExpansionDirection) -> Geometry {
    resolve_with(&LAYOUT, direction)
}

pub fn resolve_with(layout: &LayoutConstants, direction: ExpansionDirection) -> Geometry {
    match direction {
        ExpansionDirection::Top => Geometry {
            width: layout.expand_width,
            height: layout.expand_height,
            offset_y: layout.top_offset,
        },
        ExpansionDirection::Bottom => Geometry {
            width: layout.expand_width,
            height: layout.expand_height,
            offset_y: layout.bottom_offset,
        },
        ExpansionDirection::Default => Geometry {
            width: layout.std_width,
            height: layout.std_height,
            offset_y: 0.0,
        },
    }
}

/// How many layout points one terminal cell covers on each axis.
/// Cells are roughly twice as tall as they are wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub points_per_column: f64,
    pub points_per_row: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            points_per_column: 5.0,
            points_per_row: 10.0,
        }
    }
}

/// Where a container landed in the frame. The container keeps its full size;
/// only `visible` is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    /// Part of the container inside the frame.
    pub visible: Rect,
    /// Full container size in cells.
    pub cols: u16,
    pub rows: u16,
    /// Columns and rows of the container cut off at the left and top edges.
    pub skip_cols: u16,
    pub skip_rows: u16,
}

impl CellScale {
    /// Place a container of `geometry` centred in `area` and shifted by its
    /// vertical offset. The container is clipped to `area`, not resized.
    pub fn place(&self, geometry: Geometry, area: Rect) -> Placement {
        let cols = to_cells(geometry.width, self.points_per_column);
        let rows = to_cells(geometry.height, self.points_per_row);
        let shift = (geometry.offset_y / self.points_per_row).round() as i32;

        let x = area.x as i32 + (area.width as i32 - cols as i32) / 2;
        let y = area.y as i32 + (area.height as i32 - rows as i32) / 2 + shift;

        let left = x.max(area.x as i32);
        let top = y.max(area.y as i32);
        let right = (x + cols as i32).min(area.right() as i32);
        let bottom = (y + rows as i32).min(area.bottom() as i32);
        if right <= left || bottom <= top {
            return Placement {
                visible: Rect::new(area.x, area.y, 0, 0),
                cols,
                rows,
                ..Placement::default()
            };
        }
        Placement {
            visible: Rect::new(
                left as u16,
                top as u16,
                (right - left) as u16,
                (bottom - top) as u16,
            ),
            cols,
            rows,
            skip_cols: (left - x) as u16,
            skip_rows: (top - y) as u16,
        }
    }

    /// Corner radius in points, limited to half of the smaller side of a
    /// `cols` x `rows` cell container.
    pub fn corner_radius(&self, radius: f64, cols: u16, rows: u16) -> f64 {
        let w = cols as f64 * self.points_per_column;
        let h = rows as f64 * self.points_per_row;
        radius.min(w / 2.0).min(h / 2.0).max(0.0)
    }

    /// Whether the centre of cell (`col`, `row`) lies inside the rounded
    /// rectangle of a `cols` x `rows` container with corner `radius` (points).
    pub fn inside_rounded(&self, col: u16, row: u16, cols: u16, rows: u16, radius: f64) -> bool {
        if col >= cols || row >= rows {
            return false;
        }
        let w = cols as f64 * self.points_per_column;
        let h = rows as f64 * self.points_per_row;
        let px = (col as f64 + 0.5) * self.points_per_column;
        let py = (row as f64 + 0.5) * self.points_per_row;
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
        let qx = px.clamp(r, w - r);
        let qy = py.clamp(r, h - r);
        let (dx, dy) = (px - qx, py - qy);
        dx * dx + dy * dy <= r * r
    }
}

fn to_cells(points: f64, per_cell: f64) -> u16 {
    if !points.is_finite() || per_cell <= 0.0 {
        return 0;
    }
    (points / per_cell).round().clamp(0.0, u16::MAX as f64) as u16
}
