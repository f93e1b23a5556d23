use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;

/// Draws window chrome into a buffer sized to the window itself.
pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(&self, buffer: &mut Buffer, area: Rect, title: Option<&str>, focused: bool);
}

/// Rounded frame with an optional title bar carrying traffic-light controls.
#[derive(Debug, Default)]
pub struct DeskDecorator;

impl WindowDecorator for DeskDecorator {
    fn render_window(&self, buffer: &mut Buffer, area: Rect, title: Option<&str>, focused: bool) {
        if area.width < 2 || area.height < 2 {
            return;
        }
        let body_style = Style::default().bg(theme::window_bg()).fg(theme::window_fg());
        let border_style = Style::default().bg(theme::window_bg()).fg(if focused {
            theme::window_border_focused()
        } else {
            theme::window_border()
        });

        let left = area.x;
        let top = area.y;
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        for y in top..=bottom {
            for x in left..=right {
                let symbol = match (x, y) {
                    (x, y) if x == left && y == top => "╭",
                    (x, y) if x == right && y == top => "╮",
                    (x, y) if x == left && y == bottom => "╰",
                    (x, y) if x == right && y == bottom => "╯",
                    (_, y) if y == top || y == bottom => "─",
                    (x, _) if x == left || x == right => "│",
                    _ => " ",
                };
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                    cell.set_style(if symbol == " " { body_style } else { border_style });
                }
            }
        }

        let Some(title) = title else {
            return;
        };
        let header_style = if focused {
            Style::default()
                .bg(theme::title_bar_bg())
                .fg(theme::title_bar_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::title_bar_inactive_bg())
                .fg(theme::title_bar_fg())
        };
        for x in left..=right {
            if let Some(cell) = buffer.cell_mut((x, top)) {
                cell.set_symbol(" ");
                cell.set_style(header_style);
            }
        }
        let lights = [
            theme::traffic_close(),
            theme::traffic_minimize(),
            theme::traffic_zoom(),
        ];
        for (idx, color) in lights.into_iter().enumerate() {
            let x = left + 2 + idx as u16 * 2;
            if x >= right {
                break;
            }
            if let Some(cell) = buffer.cell_mut((x, top)) {
                cell.set_symbol("●");
                cell.set_style(header_style.fg(color));
            }
        }
        let title_len = title.chars().count() as u16;
        if title_len + 2 <= area.width {
            let start = left + (area.width - title_len) / 2;
            buffer.set_string(start, top, title, header_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undecorated_frame_draws_rounded_border() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buffer = Buffer::empty(area);
        DeskDecorator.render_window(&mut buffer, area, None, true);
        assert_eq!(buffer[(0, 0)].symbol(), "╭");
        assert_eq!(buffer[(9, 3)].symbol(), "╯");
        assert_eq!(buffer[(4, 0)].symbol(), "─");
        assert_eq!(buffer[(4, 2)].symbol(), " ");
    }

    #[test]
    fn title_bar_replaces_top_border() {
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);
        DeskDecorator.render_window(&mut buffer, area, Some("Clip"), false);
        assert_eq!(buffer[(2, 0)].symbol(), "●");
        assert_eq!(buffer[(8, 0)].symbol(), "C");
        assert_eq!(buffer[(0, 0)].symbol(), " ");
        assert_eq!(buffer[(0, 1)].symbol(), "│");
    }
}
