//! FlowClip: a static product showcase.

use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::{AppResponse, HostedApp, left_click};
use crate::components::ComponentContext;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, wrap_text};
use crate::window::rect_contains;

const HEADLINE: &str = "Clipboard history, now in flow.";
const BODY: &str = "FlowClip maintains Maccy's lightness while adding sequential pasting, \
so you can queue and paste copied items in order without breaking flow.";
const FOOTER: &str = "Visit gityeop.github.io/FlowClip for more.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCard {
    pub title: &'static str,
    pub media: &'static str,
    pub description: &'static str,
}

pub const FEATURE_CARDS: [FeatureCard; 2] = [
    FeatureCard {
        title: "Basic Clipboard",
        media: "/flowclip-demo/maccy_demo.gif",
        description: "Quickly access copied items, preview content, and paste without leaving your context.",
    },
    FeatureCard {
        title: "Queue Clipboard",
        media: "/flowclip-demo/product_demo.gif",
        description: "Build a paste queue and dispatch snippets in sequence for repetitive workflows.",
    },
];

#[derive(Debug, Default)]
pub struct FlowClipApp {
    highlighted: usize,
}

impl FlowClipApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> &'static FeatureCard {
        &FEATURE_CARDS[self.highlighted]
    }

    fn card_rects(area: Rect) -> [Rect; 2] {
        let top = area.y + 7;
        let height = (area.y + area.height).saturating_sub(top + 1).min(7);
        let width = area.width.saturating_sub(3) / 2;
        [
            Rect::new(area.x + 1, top, width, height),
            Rect::new(area.x + 2 + width, top, width, height),
        ]
    }

    fn render_card(&self, frame: &mut UiFrame<'_>, index: usize, rect: Rect, base: Style) {
        if rect.width < 4 || rect.height < 2 {
            return;
        }
        let card = &FEATURE_CARDS[index];
        let active = index == self.highlighted;
        let (border, title_style) = if active {
            (
                base.fg(theme::accent()),
                base.fg(theme::accent()).add_modifier(Modifier::BOLD),
            )
        } else {
            (base.fg(theme::window_border()), base)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(format!(" {} ", card.title))
            .title_style(title_style)
            .style(base);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let buffer = frame.buffer_mut();
        safe_set_string(
            buffer,
            inner,
            inner.x,
            inner.y,
            &format!("▶ {}", card.media),
            base.fg(theme::info_fg()),
        );
        for (offset, line) in wrap_text(card.description, inner.width as usize)
            .iter()
            .enumerate()
        {
            safe_set_string(
                buffer,
                inner,
                inner.x,
                inner.y + 1 + offset as u16,
                line,
                base.fg(theme::window_muted_fg()),
            );
        }
    }
}

impl HostedApp for FlowClipApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default().bg(theme::window_bg()).fg(theme::window_fg());
        frame.fill(area, base);
        let x = area.x + 1;
        let text_width = area.width.saturating_sub(2) as usize;
        let buffer = frame.buffer_mut();
        safe_set_string(
            buffer,
            area,
            x,
            area.y,
            HEADLINE,
            base.fg(theme::accent()).add_modifier(Modifier::BOLD),
        );
        for (offset, line) in wrap_text(BODY, text_width).iter().take(4).enumerate() {
            safe_set_string(buffer, area, x, area.y + 1 + offset as u16, line, base);
        }
        safe_set_string(
            buffer,
            area,
            x,
            area.y + 6,
            "Product Preview",
            base.add_modifier(Modifier::BOLD),
        );
        for (index, rect) in Self::card_rects(area).into_iter().enumerate() {
            self.render_card(frame, index, rect, base);
        }
        let footer_y = (area.y + area.height).saturating_sub(1);
        safe_set_string(
            frame.buffer_mut(),
            area,
            x,
            footer_y,
            FOOTER,
            base.fg(theme::window_muted_fg()),
        );
    }

    fn handle_event(&mut self, event: &Event, area: Rect, _ctx: &ComponentContext) -> AppResponse {
        if let Some((column, row)) = left_click(event) {
            return match Self::card_rects(area)
                .iter()
                .position(|rect| rect_contains(*rect, column, row))
            {
                Some(index) => {
                    self.highlighted = index;
                    AppResponse::Consumed
                }
                None => AppResponse::Ignored,
            };
        }
        let Event::Key(key) = event else {
            return AppResponse::Ignored;
        };
        if key.kind == KeyEventKind::Release {
            return AppResponse::Ignored;
        }
        match key.code {
            KeyCode::Left => self.highlighted = self.highlighted.saturating_sub(1),
            KeyCode::Right => self.highlighted = (self.highlighted + 1).min(FEATURE_CARDS.len() - 1),
            _ => return AppResponse::Ignored,
        }
        AppResponse::Consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::buffer::Buffer;

    fn area() -> Rect {
        Rect::new(1, 1, 56, 14)
    }

    fn press(app: &mut FlowClipApp, code: KeyCode) -> AppResponse {
        app.handle_event(
            &Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
            area(),
            &ComponentContext::new(true),
        )
    }

    #[test]
    fn arrows_switch_highlighted_card() {
        let mut app = FlowClipApp::new();
        assert_eq!(app.highlighted().title, "Basic Clipboard");
        assert_eq!(press(&mut app, KeyCode::Right), AppResponse::Consumed);
        assert_eq!(app.highlighted().title, "Queue Clipboard");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.highlighted().title, "Queue Clipboard");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.highlighted().title, "Basic Clipboard");
        assert_eq!(press(&mut app, KeyCode::Char('x')), AppResponse::Ignored);
    }

    #[test]
    fn clicking_card_highlights_it() {
        let mut app = FlowClipApp::new();
        let second = FlowClipApp::card_rects(area())[1];
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: second.x + 1,
            row: second.y + 1,
            modifiers: KeyModifiers::NONE,
        });
        app.handle_event(&click, area(), &ComponentContext::new(true));
        assert_eq!(app.highlighted().title, "Queue Clipboard");
    }

    #[test]
    fn render_shows_copy_and_cards() {
        let mut app = FlowClipApp::new();
        let window = Rect::new(0, 0, 58, 16);
        let mut buffer = Buffer::empty(window);
        let mut frame = UiFrame::from_parts(window, &mut buffer);
        app.render(&mut frame, area(), &ComponentContext::new(true));
        let screen = buffer
            .content()
            .chunks(window.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(screen.contains(HEADLINE));
        assert!(screen.contains("Product Preview"));
        assert!(screen.contains("Basic Clipboard"));
        assert!(screen.contains("Queue Clipboard"));
        assert!(screen.contains(FOOTER));
    }
}
