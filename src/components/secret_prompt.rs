use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear};

use super::{Component, ComponentContext, TextInput};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};
use crate::window::rect_contains;

const SECRET_MAX_CHARS: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Submitted(String),
    Cancelled,
}

/// Modal prompt asking for the owner secret. Input is masked; `Enter`
/// confirms, `Ctrl+C` or a click outside the box cancels.
#[derive(Debug, Clone)]
pub struct SecretPrompt {
    title: String,
    body: String,
    input: TextInput,
    width: u16,
    height: u16,
}

impl SecretPrompt {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            input: TextInput::new(SECRET_MAX_CHARS)
                .masked()
                .with_placeholder("owner secret"),
            width: 44,
            height: 7,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Centers the prompt, shrinking it to fit small areas.
    pub fn rect_for(&self, area: Rect) -> Rect {
        let width = area.width.min(self.width).max(1);
        let height = area.height.min(self.height).max(1);
        let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
        let y = area
            .y
            .saturating_add(area.height.saturating_sub(height) / 2);
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn handle(&mut self, event: &Event, area: Rect, ctx: &ComponentContext) -> PromptOutcome {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return PromptOutcome::Cancelled;
                }
                if key.code == KeyCode::Enter {
                    if self.input.is_empty() {
                        return PromptOutcome::Pending;
                    }
                    return PromptOutcome::Submitted(self.input.value().to_string());
                }
                self.input.handle_event(event, ctx);
                PromptOutcome::Pending
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if rect_contains(self.rect_for(area), mouse.column, mouse.row) {
                    PromptOutcome::Pending
                } else {
                    PromptOutcome::Cancelled
                }
            }
            _ => PromptOutcome::Pending,
        }
    }
}

impl Component for SecretPrompt {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let rect = self.rect_for(area);
        let style = Style::default().bg(theme::window_bg()).fg(theme::window_fg());
        frame.render_widget(Clear, rect);
        frame.fill(rect, style);
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style.fg(theme::accent()))
            .title_style(style.add_modifier(Modifier::BOLD));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        if inner.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        safe_set_string(buffer, inner, inner.x + 1, inner.y, &self.body, style);
        if inner.height >= 3 {
            let hint = "Enter confirm · Ctrl+C cancel";
            safe_set_string(
                buffer,
                inner,
                inner.x + 1,
                inner.y + inner.height - 1,
                hint,
                style.fg(theme::window_muted_fg()),
            );
        }
        let field_y = if inner.height >= 3 {
            inner.y + 2
        } else {
            inner.y + inner.height - 1
        };
        let field = Rect::new(inner.x + 1, field_y, inner.width.saturating_sub(2), 1);
        self.input.render(frame, field, &ctx.with_focus(true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};
    use ratatui::buffer::Buffer;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn enter_submits_typed_secret() {
        let area = Rect::new(0, 0, 60, 20);
        let ctx = ComponentContext::default();
        let mut prompt = SecretPrompt::new("Delete", "Owner secret:");
        assert_eq!(
            prompt.handle(&press(KeyCode::Enter, KeyModifiers::NONE), area, &ctx),
            PromptOutcome::Pending
        );
        for ch in "k3y".chars() {
            prompt.handle(&press(KeyCode::Char(ch), KeyModifiers::NONE), area, &ctx);
        }
        assert_eq!(
            prompt.handle(&press(KeyCode::Enter, KeyModifiers::NONE), area, &ctx),
            PromptOutcome::Submitted("k3y".into())
        );
    }

    #[test]
    fn ctrl_c_and_outside_click_cancel() {
        let area = Rect::new(0, 0, 60, 20);
        let ctx = ComponentContext::default();
        let mut prompt = SecretPrompt::new("Delete", "Owner secret:");
        assert_eq!(
            prompt.handle(&press(KeyCode::Char('c'), KeyModifiers::CONTROL), area, &ctx),
            PromptOutcome::Cancelled
        );
        let outside = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(prompt.handle(&outside, area, &ctx), PromptOutcome::Cancelled);
    }

    #[test]
    fn rect_for_centers_and_clamps() {
        let prompt = SecretPrompt::new("t", "b");
        assert_eq!(prompt.rect_for(Rect::new(0, 0, 64, 17)), Rect::new(10, 5, 44, 7));
        assert_eq!(prompt.rect_for(Rect::new(2, 2, 20, 4)), Rect::new(2, 2, 20, 4));
    }

    #[test]
    fn render_never_shows_the_secret() {
        let area = Rect::new(0, 0, 50, 9);
        let ctx = ComponentContext::default();
        let mut prompt = SecretPrompt::new("Owner", "Owner secret:");
        for ch in "zz".chars() {
            prompt.handle(&press(KeyCode::Char(ch), KeyModifiers::NONE), area, &ctx);
        }
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        prompt.render(&mut frame, area, &ctx);
        let rendered: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(!rendered.contains('z'));
        assert!(rendered.contains('•'));
    }
}
