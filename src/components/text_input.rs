use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

/// Single-line text field with a character limit. Editing happens at the
/// end of the value.
#[derive(Debug, Clone)]
pub struct TextInput {
    value: String,
    max_chars: usize,
    masked: bool,
    placeholder: String,
}

impl TextInput {
    pub fn new(max_chars: usize) -> Self {
        Self {
            value: String::new(),
            max_chars,
            masked: false,
            placeholder: String::new(),
        }
    }

    /// Render every character as a bullet.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.char_count())
        } else {
            self.value.clone()
        }
    }
}

impl Component for TextInput {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = Style::default().bg(theme::field_bg()).fg(theme::window_fg());
        frame.fill(area, style);
        let width = area.width as usize;
        let buffer = frame.buffer_mut();
        if self.value.is_empty() {
            safe_set_string(
                buffer,
                area,
                area.x,
                area.y,
                &self.placeholder,
                style.fg(theme::window_muted_fg()),
            );
        } else {
            let shown: Vec<char> = self.display_value().chars().collect();
            // Keep the tail visible, leaving room for the cursor.
            let visible = width.saturating_sub(1).max(1);
            let start = shown.len().saturating_sub(visible);
            let text: String = shown[start..].iter().collect();
            safe_set_string(buffer, area, area.x, area.y, &text, style);
        }
        if ctx.focused() {
            let used = if self.value.is_empty() {
                0
            } else {
                self.char_count().min(width.saturating_sub(1))
            };
            let cursor_x = area.x.saturating_add(used as u16);
            safe_set_string(buffer, area, cursor_x, area.y, "▏", style.fg(theme::accent()));
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => {
                if self.char_count() < self.max_chars {
                    self.value.push(ch);
                }
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }
}
