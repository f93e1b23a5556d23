use ratatui::layout::Rect;

use super::{WindowFrame, WindowId, rect_contains};
use crate::constants::MIN_VISIBLE_MARGIN;

/// Classification of a pointer press against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabHit {
    /// Inside the title bar or top band and outside every no-drag zone.
    Grab,
    /// Inside the grab region but on an interactive control.
    NoDrag,
    /// Inside the window, below the grab region.
    Content,
    Outside,
}

/// Classifies a press at a screen cell. `no_drag` holds window-relative
/// rectangles that must keep receiving clicks even inside the grab region.
pub fn hit_test(frame: &WindowFrame, no_drag: &[Rect], column: u16, row: u16) -> GrabHit {
    let Some((x, y)) = frame.local(column, row) else {
        return GrabHit::Outside;
    };
    if !rect_contains(frame.grab_region_local(), x, y) {
        return GrabHit::Content;
    }
    let on_close = frame
        .close_button_local()
        .is_some_and(|close| rect_contains(close, x, y));
    if on_close || no_drag.iter().any(|zone| rect_contains(*zone, x, y)) {
        GrabHit::NoDrag
    } else {
        GrabHit::Grab
    }
}

/// Clamps a window origin so at least `MIN_VISIBLE_MARGIN` cells stay inside
/// `bounds` horizontally and the top edge never leaves the desktop.
pub fn clamp_origin(x: i32, y: i32, width: u16, height: u16, bounds: Rect) -> (i32, i32) {
    if bounds.width == 0 || bounds.height == 0 {
        return (x, y);
    }
    let margin_w = MIN_VISIBLE_MARGIN.min(width) as i32;
    let margin_h = MIN_VISIBLE_MARGIN.min(height) as i32;
    let left = bounds.x as i32;
    let top = bounds.y as i32;
    let right = left + bounds.width as i32;
    let bottom = top + bounds.height as i32;

    let min_x = left - (width as i32 - margin_w);
    let max_x = (right - margin_w).max(min_x);
    let max_y = (bottom - margin_h).max(top);
    (x.clamp(min_x, max_x), y.clamp(top, max_y))
}

#[derive(Debug, Clone, Copy)]
struct HeaderDrag {
    id: WindowId,
    initial_x: i32,
    initial_y: i32,
    start_x: u16,
    start_y: u16,
}

/// Moves windows by their grab region. At most one drag is active at a
/// time and the window keeps its position after the gesture ends.
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<HeaderDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a drag when the press lands on the grab region. Returns whether
    /// a drag began.
    pub fn begin(&mut self, frame: &WindowFrame, no_drag: &[Rect], column: u16, row: u16) -> bool {
        if hit_test(frame, no_drag, column, row) != GrabHit::Grab {
            return false;
        }
        let (initial_x, initial_y) = frame.origin();
        tracing::debug!(window_id = ?frame.id(), column, row, "drag started");
        self.active = Some(HeaderDrag {
            id: frame.id(),
            initial_x,
            initial_y,
            start_x: column,
            start_y: row,
        });
        true
    }

    pub fn dragging(&self) -> Option<WindowId> {
        self.active.map(|drag| drag.id)
    }

    /// Moves the dragged window so the grab point follows the pointer.
    /// Returns `false` when `frame` is not the window being dragged.
    pub fn update(&mut self, frame: &mut WindowFrame, column: u16, row: u16, bounds: Rect) -> bool {
        let Some(drag) = self.active else {
            return false;
        };
        if drag.id != frame.id() {
            return false;
        }
        let dx = column as i32 - drag.start_x as i32;
        let dy = row as i32 - drag.start_y as i32;
        let rect = frame.rect();
        let (x, y) = clamp_origin(
            drag.initial_x + dx,
            drag.initial_y + dy,
            rect.width,
            rect.height,
            bounds,
        );
        frame.set_origin(x, y);
        true
    }

    pub fn end(&mut self) -> Option<WindowId> {
        let ended = self.active.take().map(|drag| drag.id);
        if let Some(id) = ended {
            tracing::debug!(window_id = ?id, "drag ended");
        }
        ended
    }

    /// Drops an in-flight drag of `id`, e.g. when that window closes.
    pub fn cancel_for(&mut self, id: WindowId) {
        if self.dragging() == Some(id) {
            self.active = None;
        }
    }
}
