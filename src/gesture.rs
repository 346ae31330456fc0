//! Vertical drag recognition over the bar container.
//!
//! Raw crossterm mouse events are reduced to two gesture callbacks:
//! `Changed` while the left button is held after a press inside the
//! container, and `Ended` on release, on a second press, or on cancel.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Pointer moved during a drag. Rows grow downwards.
    Changed { start_y: u16, y: u16 },
    Ended,
}

impl GestureEvent {
    /// Pointer offset in rows, upwards positive.
    pub fn offset(&self) -> f64 {
        match *self {
            GestureEvent::Changed { start_y, y } => start_y as f64 - y as f64,
            GestureEvent::Ended => 0.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct DragRecognizer {
    start_y: Option<u16>,
}

impl DragRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.start_y.is_some()
    }

    /// Feed one mouse event. `container` is the rectangle the bar occupied in
    /// the last rendered frame.
    pub fn handle_mouse(&mut self, ev: &MouseEvent, container: Option<Rect>) -> Option<GestureEvent> {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = container
                    .map(|r| r.contains(Position::new(ev.column, ev.row)))
                    .unwrap_or(false);
                if self.start_y.is_some() {
                    // A press while already dragging means the release was lost.
                    self.start_y = None;
                    return Some(GestureEvent::Ended);
                }
                if hit {
                    self.start_y = Some(ev.row);
                }
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => self.start_y.map(|start_y| GestureEvent::Changed {
                start_y,
                y: ev.row,
            }),
            MouseEventKind::Up(MouseButton::Left) => self.cancel(),
            _ => None,
        }
    }

    /// End any drag in progress (focus loss, escape).
    pub fn cancel(&mut self) -> Option<GestureEvent> {
        self.start_y.take().map(|_| GestureEvent::Ended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    const BAR: Rect = Rect {
        x: 10,
        y: 5,
        width: 18,
        height: 20,
    };

    #[test]
    fn test_press_inside_then_drag() {
        let mut g = DragRecognizer::new();
        assert_eq!(g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 20), Some(BAR)), None);
        assert!(g.is_dragging());
        let ev = g.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 10), Some(BAR));
        assert_eq!(ev, Some(GestureEvent::Changed { start_y: 20, y: 10 }));
        assert_eq!(ev.map(|e| e.offset()), Some(10.0));
        let ev = g.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 10), Some(BAR));
        assert_eq!(ev, Some(GestureEvent::Ended));
        assert!(!g.is_dragging());
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut g = DragRecognizer::new();
        g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 2), Some(BAR));
        assert!(!g.is_dragging());
        assert_eq!(g.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 12, 6), Some(BAR)), None);
        assert_eq!(g.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 12, 6), Some(BAR)), None);
    }

    #[test]
    fn test_no_container_means_no_drag() {
        let mut g = DragRecognizer::new();
        g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 6), None);
        assert!(!g.is_dragging());
    }

    #[test]
    fn test_downward_drag_has_negative_offset() {
        let mut g = DragRecognizer::new();
        g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 6), Some(BAR));
        let ev = g.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 12, 16), Some(BAR));
        assert_eq!(ev.map(|e| e.offset()), Some(-10.0));
    }

    #[test]
    fn test_second_press_ends_stale_drag() {
        let mut g = DragRecognizer::new();
        g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 6), Some(BAR));
        let ev = g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 8), Some(BAR));
        assert_eq!(ev, Some(GestureEvent::Ended));
        assert!(!g.is_dragging());
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut g = DragRecognizer::new();
        g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Right), 12, 6), Some(BAR));
        assert!(!g.is_dragging());
        assert_eq!(g.handle_mouse(&mouse(MouseEventKind::ScrollUp, 12, 6), Some(BAR)), None);
    }

    #[test]
    fn test_cancel() {
        let mut g = DragRecognizer::new();
        assert_eq!(g.cancel(), None);
        g.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 6), Some(BAR));
        assert_eq!(g.cancel(), Some(GestureEvent::Ended));
        assert_eq!(g.cancel(), None);
    }
}
