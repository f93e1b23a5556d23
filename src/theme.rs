use std::sync::OnceLock;

use ratatui::style::Color;

// Centralized theme colors. RGB values degrade to the xterm 256-color cube
// when the terminal does not advertise truecolor support.

fn truecolor() -> bool {
    static TRUECOLOR: OnceLock<bool> = OnceLock::new();
    *TRUECOLOR.get_or_init(|| {
        std::env::var("COLORTERM")
            .map(|value| value.contains("truecolor") || value.contains("24bit"))
            .unwrap_or(false)
    })
}

pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    if truecolor() {
        Color::Rgb(r, g, b)
    } else {
        Color::Indexed(cube_index(r, g, b))
    }
}

fn cube_index(r: u8, g: u8, b: u8) -> u8 {
    let level = |v: u8| -> u8 {
        if v < 48 {
            0
        } else if v < 115 {
            1
        } else {
            (v - 35) / 40
        }
    };
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

// Desktop
pub fn desktop_bg() -> Color {
    rgb(28, 36, 58)
}
pub fn desktop_pattern() -> Color {
    rgb(44, 54, 82)
}
pub fn menu_bar_bg() -> Color {
    rgb(232, 232, 236)
}
pub fn menu_bar_fg() -> Color {
    Color::Black
}

// Dock
pub fn dock_bg() -> Color {
    rgb(60, 64, 76)
}
pub fn dock_fg() -> Color {
    Color::White
}
pub fn dock_running() -> Color {
    rgb(120, 200, 255)
}
pub fn dock_external() -> Color {
    rgb(190, 190, 200)
}

// Windows
pub fn window_bg() -> Color {
    rgb(248, 248, 250)
}
pub fn window_fg() -> Color {
    Color::Black
}
pub fn window_muted_fg() -> Color {
    rgb(120, 120, 130)
}
pub fn window_border() -> Color {
    rgb(150, 150, 160)
}
pub fn window_border_focused() -> Color {
    rgb(0, 122, 255)
}
pub fn title_bar_bg() -> Color {
    rgb(214, 214, 220)
}
pub fn title_bar_inactive_bg() -> Color {
    rgb(236, 236, 240)
}
pub fn title_bar_fg() -> Color {
    rgb(40, 40, 48)
}
pub fn traffic_close() -> Color {
    rgb(255, 95, 86)
}
pub fn traffic_minimize() -> Color {
    rgb(255, 189, 46)
}
pub fn traffic_zoom() -> Color {
    rgb(39, 201, 63)
}

// Content
pub fn accent() -> Color {
    rgb(0, 122, 255)
}
pub fn accent_fg() -> Color {
    Color::White
}
pub fn sidebar_bg() -> Color {
    rgb(236, 236, 240)
}
pub fn bubble_owner_bg() -> Color {
    rgb(229, 229, 234)
}
pub fn bubble_owner_fg() -> Color {
    rgb(28, 28, 30)
}
pub fn bubble_visitor_bg() -> Color {
    rgb(0, 122, 255)
}
pub fn bubble_visitor_fg() -> Color {
    Color::White
}
pub fn selection_bg() -> Color {
    rgb(255, 214, 102)
}
pub fn field_bg() -> Color {
    Color::White
}
pub fn error_fg() -> Color {
    rgb(215, 38, 61)
}
pub fn warning_fg() -> Color {
    rgb(200, 120, 0)
}
pub fn info_fg() -> Color {
    rgb(40, 140, 70)
}
