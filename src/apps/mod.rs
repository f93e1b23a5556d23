//! Applications hosted inside desktop windows.
//!
//! Apps render into their window's content rectangle and receive events in
//! window-local coordinates (the window's top-left cell is `(0, 0)`).

pub mod flowclip;
pub mod messages;
pub mod ontext;

pub use flowclip::FlowClipApp;
pub use messages::MessagesApp;
pub use ontext::OnTextApp;

use std::time::Instant;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::ComponentContext;
use crate::theme;
use crate::ui::UiFrame;

/// How an app disposed of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppResponse {
    Ignored,
    Consumed,
    /// The app's own close control was activated.
    RequestClose,
}

pub trait HostedApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, event: &Event, area: Rect, ctx: &ComponentContext) -> AppResponse;

    /// Called once per frame while the window is open.
    fn tick(&mut self, _now: Instant) {}

    /// Called when the window opens.
    fn mount(&mut self, _now: Instant) {}

    /// Called when the window closes. Outstanding work must be abandoned.
    fn unmount(&mut self) {}

    /// Window-local rectangles inside the grab band that must receive
    /// clicks instead of starting a drag.
    fn no_drag_zones(&self, _area: Rect) -> Vec<Rect> {
        Vec::new()
    }
}

/// Traffic-light strip drawn by undecorated apps at the top-left of their
/// content.
pub(crate) fn window_controls_rect(area: Rect) -> Rect {
    Rect::new(area.x, area.y, 7.min(area.width), 1.min(area.height))
}

/// The red light; clicking it closes the window.
pub(crate) fn close_control_rect(area: Rect) -> Rect {
    Rect::new(area.x, area.y, 3.min(area.width), 1.min(area.height))
}

pub(crate) fn render_window_controls(buffer: &mut Buffer, area: Rect, bg: Style) {
    let lights = [
        theme::traffic_close(),
        theme::traffic_minimize(),
        theme::traffic_zoom(),
    ];
    let controls = window_controls_rect(area);
    for (idx, color) in lights.into_iter().enumerate() {
        let x = controls.x + 1 + idx as u16 * 2;
        if x >= controls.x + controls.width {
            break;
        }
        if let Some(cell) = buffer.cell_mut((x, controls.y)) {
            cell.set_symbol("●");
            cell.set_style(bg.fg(color));
        }
    }
}

/// Cell of a left-button press, if `event` is one.
pub(crate) fn left_click(event: &Event) -> Option<(u16, u16)> {
    match event {
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some((mouse.column, mouse.row))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseEvent};

    #[test]
    fn close_control_sits_inside_controls_strip() {
        let area = Rect::new(1, 1, 40, 10);
        let controls = window_controls_rect(area);
        let close = close_control_rect(area);
        assert_eq!(controls.intersection(close), close);
    }

    #[test]
    fn left_click_only_matches_presses() {
        let down = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        let up = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(left_click(&down), Some((3, 4)));
        assert_eq!(left_click(&up), None);
    }
}
