use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{Component, ComponentContext};
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// One-row bar with left- and right-aligned text.
pub struct MenuBar {
    left: String,
    right: String,
    style: Style,
}

impl MenuBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default(),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl Default for MenuBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for MenuBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        frame.fill(row, self.style);
        let width = area.width as usize;
        let buffer = frame.buffer_mut();

        let left = truncate_to_width(&self.left, width);
        let left_width = left.chars().count();
        safe_set_string(buffer, row, area.x, area.y, &left, self.style);

        // The right text only shows when it fits beside the left text.
        let right_width = self.right.chars().count();
        if !self.right.is_empty() && left_width + right_width < width {
            let start_x = area.x.saturating_add((width - right_width) as u16);
            safe_set_string(buffer, row, start_x, area.y, &self.right, self.style);
        }
    }
}
