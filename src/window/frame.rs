use ratatui::layout::Rect;

use super::{FloatRect, WindowId};
use crate::constants::TOP_DRAG_BAND_ROWS;

/// Geometry of a window on the desktop. All `*_local` rectangles are
/// relative to the window's own origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    id: WindowId,
    title: Option<&'static str>,
    rect: FloatRect,
}

impl WindowFrame {
    pub fn new(id: WindowId) -> Self {
        let spec = id.spec();
        Self {
            id,
            title: spec.title,
            rect: FloatRect {
                x: spec.origin.0,
                y: spec.origin.1,
                width: spec.width,
                height: spec.height,
            },
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> Option<&'static str> {
        self.title
    }

    pub fn rect(&self) -> FloatRect {
        self.rect
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.rect.x, self.rect.y)
    }

    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn local_area(&self) -> Rect {
        Rect::new(0, 0, self.rect.width, self.rect.height)
    }

    pub fn title_bar_local(&self) -> Option<Rect> {
        self.title
            .map(|_| Rect::new(0, 0, self.rect.width, 1.min(self.rect.height)))
    }

    /// Region that starts a drag: the title bar when there is one, the top
    /// band of the frame otherwise.
    pub fn grab_region_local(&self) -> Rect {
        match self.title_bar_local() {
            Some(bar) => bar,
            None => Rect::new(
                0,
                0,
                self.rect.width,
                TOP_DRAG_BAND_ROWS.min(self.rect.height),
            ),
        }
    }

    /// Close control drawn by the decorator. Only decorated windows have one;
    /// undecorated windows draw their own inside the content area.
    pub fn close_button_local(&self) -> Option<Rect> {
        self.title_bar_local()
            .map(|bar| Rect::new(1, 0, 3.min(bar.width.saturating_sub(1)), 1))
    }

    pub fn content_local(&self) -> Rect {
        Rect::new(
            1,
            1,
            self.rect.width.saturating_sub(2),
            self.rect.height.saturating_sub(2),
        )
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.rect.contains(column, row)
    }

    pub fn local(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        self.rect.local(column, row)
    }
}
