use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::launcher::{AppId, DOCK_CATALOG, LaunchBehavior};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};
use crate::window::{WindowRegistry, rect_contains};

const SLOT_GAP: u16 = 1;

fn glyph(app: AppId) -> &'static str {
    match app {
        AppId::Messages => "✉",
        AppId::Instagram => "◎",
        AppId::Threads => "@",
        AppId::Mail => "✎",
        AppId::OnText => "¶",
        AppId::FlowClip => "⧉",
    }
}

/// Bottom launcher strip. Entries are laid out centered, in catalog order.
#[derive(Debug, Default)]
pub struct Dock;

impl Dock {
    pub fn new() -> Self {
        Self
    }

    /// Screen rectangle of each entry for a dock occupying `area`.
    pub fn layout(&self, area: Rect) -> Vec<(AppId, Rect)> {
        if area.width == 0 || area.height == 0 {
            return Vec::new();
        }
        let widths: Vec<u16> = DOCK_CATALOG
            .iter()
            .map(|entry| entry.label.chars().count() as u16 + 4)
            .collect();
        let total = widths.iter().sum::<u16>() + SLOT_GAP * (widths.len() as u16 - 1) + 2;
        let mut x = area.x + area.width.saturating_sub(total) / 2 + 1;
        let row = area.y + area.height / 2;
        DOCK_CATALOG
            .iter()
            .zip(widths)
            .map(|(entry, width)| {
                let slot = Rect::new(x, row, width, 1);
                x = x.saturating_add(width + SLOT_GAP);
                (entry.app, slot.intersection(area))
            })
            .collect()
    }

    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<AppId> {
        self.layout(area)
            .into_iter()
            .find(|(_, slot)| rect_contains(*slot, column, row))
            .map(|(app, _)| app)
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, area: Rect, registry: &WindowRegistry) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let slots = self.layout(area);
        let (Some(first), Some(last)) = (slots.first(), slots.last()) else {
            return;
        };
        let base = Style::default().bg(theme::dock_bg()).fg(theme::dock_fg());
        let left = first.1.x.saturating_sub(1);
        let right = last.1.x + last.1.width + 1;
        let shelf = Rect::new(left, area.y, right.saturating_sub(left), area.height).intersection(area);
        frame.fill(shelf, base);
        frame.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(base.fg(theme::window_border())),
            shelf,
        );

        let buffer = frame.buffer_mut();
        for (entry, (_, slot)) in DOCK_CATALOG.iter().zip(slots.iter()) {
            let (style, running) = match entry.behavior {
                LaunchBehavior::InternalWindow(id) => {
                    let running = registry.is_open(id);
                    let style = if running {
                        base.fg(theme::dock_running()).add_modifier(Modifier::BOLD)
                    } else {
                        base
                    };
                    (style, running)
                }
                LaunchBehavior::ExternalAction(_) => (base.fg(theme::dock_external()), false),
            };
            let marker = if running { "•" } else { " " };
            let text = format!("{marker}{} {}", glyph(entry.app), entry.label);
            safe_set_string(buffer, *slot, slot.x, slot.y, &text, style);
        }
    }
}
