//! Window identities, geometry, and the registry that stacks them.

pub mod decorator;
pub mod drag;
pub mod frame;
pub mod registry;
pub mod stack;

pub use decorator::{DeskDecorator, WindowDecorator};
pub use drag::{DragController, GrabHit};
pub use frame::WindowFrame;
pub use registry::WindowRegistry;
pub use stack::StackOrder;

use ratatui::layout::Rect;

/// Identifies one of the desktop's built-in windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WindowId {
    Messages,
    OnText,
    FlowClip,
}

impl WindowId {
    pub const ALL: [WindowId; 3] = [WindowId::Messages, WindowId::OnText, WindowId::FlowClip];

    pub fn label(self) -> &'static str {
        match self {
            WindowId::Messages => "Messages",
            WindowId::OnText => "OnText",
            WindowId::FlowClip => "FlowClip",
        }
    }

    /// Static placement and chrome for this window.
    pub fn spec(self) -> WindowSpec {
        match self {
            WindowId::Messages => WindowSpec {
                title: None,
                origin: (3, 2),
                width: 74,
                height: 20,
            },
            WindowId::OnText => WindowSpec {
                title: None,
                origin: (8, 3),
                width: 70,
                height: 18,
            },
            WindowId::FlowClip => WindowSpec {
                title: Some("FlowClip"),
                origin: (14, 4),
                width: 58,
                height: 16,
            },
        }
    }
}

/// Initial geometry and chrome of a window. A `title` gives the window a
/// decorated title bar; without one the top band of the frame is the grab
/// region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: Option<&'static str>,
    pub origin: (i32, i32),
    pub width: u16,
    pub height: u16,
}

/// Signed floating rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl FloatRect {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let (col, row) = (column as i32, row as i32);
        col >= self.x
            && col < self.x + self.width as i32
            && row >= self.y
            && row < self.y + self.height as i32
    }

    /// Position of a screen cell relative to this rectangle's origin, or
    /// `None` when the cell lies outside it.
    pub fn local(&self, column: u16, row: u16) -> Option<(u16, u16)> {
        if !self.contains(column, row) {
            return None;
        }
        Some(((column as i32 - self.x) as u16, (row as i32 - self.y) as u16))
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rect_contains_handles_negative_origins() {
        let rect = FloatRect {
            x: -3,
            y: 1,
            width: 5,
            height: 2,
        };
        assert!(rect.contains(0, 1));
        assert!(rect.contains(1, 2));
        assert!(!rect.contains(2, 1));
        assert!(!rect.contains(0, 3));
        assert_eq!(rect.local(1, 2), Some((4, 1)));
        assert_eq!(rect.local(5, 2), None);
    }

    #[test]
    fn rect_contains_edge_cases() {
        let rect = Rect::new(2, 2, 3, 1);
        assert!(rect_contains(rect, 2, 2));
        assert!(rect_contains(rect, 4, 2));
        assert!(!rect_contains(rect, 5, 2));
        assert!(!rect_contains(rect, 2, 3));
        assert!(!rect_contains(Rect::new(0, 0, 0, 0), 0, 0));
    }

    #[test]
    fn only_flowclip_has_a_title_bar() {
        let titled: Vec<WindowId> = WindowId::ALL
            .into_iter()
            .filter(|id| id.spec().title.is_some())
            .collect();
        assert_eq!(titled, vec![WindowId::FlowClip]);
    }
}
