//! OnText: select text, press F3, pick an action from the panel.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear};

use super::{
    AppResponse, HostedApp, close_control_rect, left_click, render_window_controls,
    window_controls_rect,
};
use crate::components::ComponentContext;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, wrap_text};
use crate::window::rect_contains;

pub const SENTENCE: &str = "Select this sentence, then press F3.";
const HINT: &str = "Select the text above to see the OnText action panel.";

pub const INTRO_INTERVAL: Duration = Duration::from_millis(3200);

const PANEL_WIDTH: u16 = 32;
const PANEL_HEIGHT: u16 = ACTIONS.len() as u16 + 2;
const PANEL_MARGIN: i32 = 1;
const PANEL_OFFSET: i32 = 1;
const RIGHT_PANE_WIDTH: u16 = 30;

const QUICK_START_KEYS: [&str; 8] = ["F3", "q", "w", "e", "r", "t", "a", "s"];
const INTEGRATIONS: [&str; 4] = ["BYOK", "DeepL", "Shortcuts", "Shell/AppleScript"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextAction {
    pub shortcut: char,
    pub label: &'static str,
    pub media: &'static str,
    pub description: &'static str,
}

pub const ACTIONS: [TextAction; 7] = [
    TextAction {
        shortcut: 'q',
        label: "Inline AI (BYOK)",
        media: "/ontext-demo/inline_ai.mp4",
        description: "Run inline AI with your own API key, without leaving the current context.",
    },
    TextAction {
        shortcut: 'w',
        label: "URL Action Search",
        media: "/ontext-demo/url_action.mp4",
        description: "Trigger URL actions to search instantly in Google, Brave, DuckDuckGo, YouTube, and more.",
    },
    TextAction {
        shortcut: 'e',
        label: "Prompt Relay",
        media: "/ontext-demo/prompt_panel.mp4",
        description: "Send selected text to ChatGPT, Gemini, or Claude with predefined prompts.",
    },
    TextAction {
        shortcut: 'r',
        label: "Bi-directional Translate",
        media: "/ontext-demo/translation.mp4",
        description: "Translate selected text in both directions and compare source and target instantly.",
    },
    TextAction {
        shortcut: 't',
        label: "Case Converting",
        media: "/ontext-demo/caseConverting.mp4",
        description: "Convert to camelCase, PascalCase, snake_case, kebab-case, CONSTANT_CASE, and dot.case.",
    },
    TextAction {
        shortcut: 'a',
        label: "Shell/AppleScript Workflow",
        media: "/ontext-demo/shell_script.mp4",
        description: "Build personal workflows with shell scripts or AppleScript and run them on selected text.",
    },
    TextAction {
        shortcut: 's',
        label: "Shortcut Action",
        media: "/ontext-demo/shortcuts.mp4",
        description: "Trigger Apple Shortcuts actions directly, so OnText can integrate with your existing automations.",
    },
];

struct IntroCard {
    title: &'static str,
    media: &'static str,
    description: &'static str,
}

const INTRO_CARDS: [IntroCard; 5] = [
    IntroCard {
        title: "Inline AI (BYOK)",
        media: "/ontext-demo/inline_ai.mp4",
        description: "Edit or rewrite selected text inline without context switching.",
    },
    IntroCard {
        title: "URL Action Search",
        media: "/ontext-demo/url_action.mp4",
        description: "Send selected text to Google, Brave, DuckDuckGo, or YouTube instantly.",
    },
    IntroCard {
        title: "Prompt Relay",
        media: "/ontext-demo/prompt_panel.mp4",
        description: "Forward text with preset prompts to ChatGPT, Gemini, or Claude.",
    },
    IntroCard {
        title: "Bi-directional Translate",
        media: "/ontext-demo/translation.mp4",
        description: "Translate in both directions and keep source context.",
    },
    IntroCard {
        title: "Case Converting",
        media: "/ontext-demo/caseConverting.mp4",
        description: "Convert quickly to camel, pascal, snake, kebab, constant, and dot case.",
    },
];

pub fn action_for_shortcut(key: char) -> Option<&'static TextAction> {
    let key = key.to_ascii_lowercase();
    ACTIONS.iter().find(|action| action.shortcut == key)
}

/// Top-left of a `width` x `height` panel anchored at `anchor`, relative to
/// a container of `container_width` x `container_height`.
///
/// The panel is centred on the anchor column and sits above the anchor row,
/// flipping below it when there is no room above. Both axes are then clamped
/// so the panel keeps a margin from the container edges.
pub fn place_panel(
    anchor: (i32, i32),
    container_width: i32,
    container_height: i32,
    width: i32,
    height: i32,
) -> (i32, i32) {
    let (anchor_x, anchor_y) = anchor;
    let left = (anchor_x - width / 2)
        .max(PANEL_MARGIN)
        .min(container_width - width - PANEL_MARGIN);
    let mut top = anchor_y - height - PANEL_OFFSET;
    if top < PANEL_MARGIN {
        top = anchor_y + PANEL_OFFSET;
    }
    let top = top
        .max(PANEL_MARGIN)
        .min(container_height - height - PANEL_MARGIN);
    (left, top)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub action: &'static TextAction,
    pub text: String,
}

pub struct OnTextApp {
    caret: usize,
    anchor: Option<usize>,
    /// Cell the current mouse selection started on.
    press_cell: Option<usize>,
    panel_open: bool,
    result: Option<ActionResult>,
    intro_index: usize,
    last_advance: Option<Instant>,
}

impl Default for OnTextApp {
    fn default() -> Self {
        Self::new()
    }
}

impl OnTextApp {
    pub fn new() -> Self {
        Self {
            caret: 0,
            anchor: None,
            press_cell: None,
            panel_open: false,
            result: None,
            intro_index: 0,
            last_advance: None,
        }
    }

    /// Selected character range of [`SENTENCE`], end exclusive.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        let range = (anchor.min(self.caret), anchor.max(self.caret));
        (range.0 < range.1).then_some(range)
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        Some(SENTENCE.chars().skip(start).take(end - start).collect())
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn result(&self) -> Option<&ActionResult> {
        self.result.as_ref()
    }

    pub fn intro_index(&self) -> usize {
        self.intro_index
    }

    fn sentence_len() -> usize {
        SENTENCE.chars().count()
    }

    fn clear_selection(&mut self) {
        self.anchor = None;
        self.press_cell = None;
        self.panel_open = false;
    }

    fn after_selection_change(&mut self) {
        if self.selection().is_none() {
            self.panel_open = false;
        }
    }

    fn extend_selection(&mut self, forward: bool) {
        if self.anchor.is_none() {
            self.anchor = Some(self.caret);
        }
        self.caret = if forward {
            (self.caret + 1).min(Self::sentence_len())
        } else {
            self.caret.saturating_sub(1)
        };
        self.after_selection_change();
    }

    fn move_caret(&mut self, forward: bool) {
        self.caret = match (self.selection(), forward) {
            (Some((_, end)), true) => end,
            (Some((start, _)), false) => start,
            (None, true) => (self.caret + 1).min(Self::sentence_len()),
            (None, false) => self.caret.saturating_sub(1),
        };
        self.clear_selection();
    }

    fn open_panel(&mut self) {
        if self.selection().is_some() {
            self.panel_open = true;
            self.result = None;
        }
    }

    fn run_action(&mut self, action: &'static TextAction) {
        let text = self.selected_text().unwrap_or_default();
        tracing::debug!(action = action.label, "ontext action picked");
        self.result = Some(ActionResult { action, text });
    }

    fn sentence_origin(area: Rect) -> (u16, u16) {
        (area.x + 2, area.y + 3)
    }

    fn left_pane(area: Rect) -> Rect {
        let width = area.width.saturating_sub(RIGHT_PANE_WIDTH + 1);
        Rect::new(area.x, area.y + 1, width, area.height.saturating_sub(1))
    }

    fn right_pane(area: Rect) -> Rect {
        let width = RIGHT_PANE_WIDTH.min(area.width);
        Rect::new(
            area.x + area.width - width,
            area.y + 1,
            width.saturating_sub(1),
            area.height.saturating_sub(1),
        )
    }

    /// Sentence cell under `column`, clamped to the sentence when on its row.
    fn sentence_cell(area: Rect, column: u16, row: u16) -> Option<usize> {
        let (x, y) = Self::sentence_origin(area);
        if row != y {
            return None;
        }
        let len = Self::sentence_len() as u16;
        if column < x || column >= x + len {
            return None;
        }
        Some((column - x) as usize)
    }

    fn drag_to(&mut self, area: Rect, column: u16) {
        let Some(origin) = self.press_cell else {
            return;
        };
        let (x, _) = Self::sentence_origin(area);
        let last = Self::sentence_len().saturating_sub(1);
        let cell = (column.saturating_sub(x) as usize).min(last);
        if cell >= origin {
            self.anchor = Some(origin);
            self.caret = cell + 1;
        } else {
            self.anchor = Some(origin + 1);
            self.caret = cell;
        }
        self.after_selection_change();
    }

    /// Screen rectangle of the action panel while it is open.
    pub fn panel_rect(&self, area: Rect) -> Option<Rect> {
        if !self.panel_open {
            return None;
        }
        let (start, end) = self.selection()?;
        let (x, y) = Self::sentence_origin(area);
        let anchor_x = (x - area.x) as i32 + ((start + end) / 2) as i32;
        let anchor_y = (y - area.y) as i32;
        let width = PANEL_WIDTH.min(area.width);
        let height = PANEL_HEIGHT.min(area.height);
        let (left, top) = place_panel(
            (anchor_x, anchor_y),
            area.width as i32,
            area.height as i32,
            width as i32,
            height as i32,
        );
        Some(Rect::new(
            area.x + left.max(0) as u16,
            area.y + top.max(0) as u16,
            width,
            height,
        ))
    }

    fn render_sentence(&self, frame: &mut UiFrame<'_>, area: Rect, base: Style) {
        let (x, y) = Self::sentence_origin(area);
        let selection = self.selection();
        let buffer = frame.buffer_mut();
        for (index, ch) in SENTENCE.chars().enumerate() {
            let selected = selection.is_some_and(|(start, end)| index >= start && index < end);
            let style = if selected {
                base.bg(theme::selection_bg()).fg(theme::accent_fg())
            } else {
                base
            };
            safe_set_string(buffer, area, x + index as u16, y, &ch.to_string(), style);
        }
        let caret_x = x + self.caret as u16;
        if self.selection().is_none()
            && let Some(cell) = buffer.cell_mut((caret_x, y + 1))
            && rect_contains(area, caret_x, y + 1)
        {
            cell.set_symbol("^");
            cell.set_style(base.fg(theme::accent()));
        }
        let hint_style = base.fg(theme::window_muted_fg());
        let left = Self::left_pane(area);
        for (offset, line) in wrap_text(HINT, left.width.saturating_sub(4) as usize)
            .iter()
            .enumerate()
        {
            safe_set_string(buffer, left, x, y + 3 + offset as u16, line, hint_style);
        }
    }

    fn render_integrations(&self, frame: &mut UiFrame<'_>, area: Rect, base: Style) {
        let left = Self::left_pane(area);
        if left.height < 3 {
            return;
        }
        let buffer = frame.buffer_mut();
        let x0 = left.x + 2;
        let max_x = left.x + left.width;
        let mut rows: Vec<Vec<&str>> = vec![Vec::new()];
        let mut cursor = x0;
        for badge in INTEGRATIONS {
            let width = badge.chars().count() as u16 + 2;
            if cursor > x0 && cursor + width > max_x {
                rows.push(Vec::new());
                cursor = x0;
            }
            if let Some(row) = rows.last_mut() {
                row.push(badge);
            }
            cursor += width + 1;
        }
        let bottom = left.y + left.height;
        let label_y = bottom.saturating_sub(rows.len() as u16 + 1);
        safe_set_string(
            buffer,
            left,
            x0,
            label_y,
            "Integrations",
            base.add_modifier(Modifier::BOLD),
        );
        let badge_style = base.bg(theme::field_bg()).fg(theme::window_fg());
        for (offset, row) in rows.iter().enumerate() {
            let mut x = x0;
            for badge in row {
                let text = format!(" {badge} ");
                safe_set_string(buffer, left, x, label_y + 1 + offset as u16, &text, badge_style);
                x += text.chars().count() as u16 + 1;
            }
        }
    }

    fn render_card(
        frame: &mut UiFrame<'_>,
        card: Rect,
        title: &str,
        lines: &[(String, Style)],
        base: Style,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(base.fg(theme::window_border()))
            .title(format!(" {title} "))
            .style(base);
        let inner = block.inner(card);
        frame.render_widget(block, card);
        let buffer = frame.buffer_mut();
        for (offset, (line, style)) in lines.iter().enumerate() {
            if offset as u16 >= inner.height {
                break;
            }
            safe_set_string(buffer, inner, inner.x, inner.y + offset as u16, line, *style);
        }
    }

    fn render_right_pane(&self, frame: &mut UiFrame<'_>, area: Rect, base: Style) {
        let pane = Self::right_pane(area);
        if pane.width < 8 || pane.height < 4 {
            return;
        }
        let muted = base.fg(theme::window_muted_fg());
        let text_width = pane.width.saturating_sub(2) as usize;
        let card_height = 8.min(pane.height.saturating_sub(1));
        let card = Rect::new(pane.x, pane.y + 1, pane.width, card_height);

        let (heading, title, mut lines) = match &self.result {
            Some(result) => {
                let mut lines = vec![
                    (format!("“{}”", result.text), base.add_modifier(Modifier::ITALIC)),
                    (format!("▶ {}", result.action.media), base.fg(theme::accent())),
                ];
                lines.extend(
                    wrap_text(result.action.description, text_width)
                        .into_iter()
                        .map(|line| (line, muted)),
                );
                ("Action Preview", result.action.label, lines)
            }
            None => {
                let intro = &INTRO_CARDS[self.intro_index % INTRO_CARDS.len()];
                let mut lines = vec![(format!("▶ {}", intro.media), base.fg(theme::accent()))];
                lines.extend(
                    wrap_text(intro.description, text_width)
                        .into_iter()
                        .map(|line| (line, muted)),
                );
                ("Mini Demo", intro.title, lines)
            }
        };
        if self.result.is_none() {
            let dots = (0..INTRO_CARDS.len())
                .map(|index| if index == self.intro_index { "●" } else { "○" })
                .collect::<Vec<_>>()
                .join(" ");
            lines.truncate(card_height.saturating_sub(3) as usize);
            lines.push((dots, base.fg(theme::accent())));
        }

        safe_set_string(
            frame.buffer_mut(),
            pane,
            pane.x,
            pane.y,
            heading,
            base.add_modifier(Modifier::BOLD),
        );
        Self::render_card(frame, card, title, &lines, base);

        let mut y = card.y + card.height + 1;
        let buffer = frame.buffer_mut();
        safe_set_string(buffer, pane, pane.x, y, "Quick Start", base.add_modifier(Modifier::BOLD));
        y += 1;
        let mut x = pane.x;
        for key in QUICK_START_KEYS {
            let text = format!("[{key}]");
            safe_set_string(buffer, pane, x, y, &text, base.fg(theme::accent()));
            x += text.chars().count() as u16;
        }
        y += 1;
        let hint = if self.panel_open {
            "Action panel is open. Press one key to run an action preview."
        } else {
            "Select text, press F3, then press one action key."
        };
        for (offset, line) in wrap_text(hint, pane.width as usize).iter().enumerate() {
            safe_set_string(buffer, pane, pane.x, y + offset as u16, line, muted);
        }
    }

    fn render_panel(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let Some(panel) = self.panel_rect(area) else {
            return;
        };
        let style = Style::default().bg(theme::field_bg()).fg(theme::window_fg());
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style.fg(theme::accent()))
            .title(" OnText ")
            .style(style);
        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        let buffer = frame.buffer_mut();
        for (offset, action) in ACTIONS.iter().enumerate() {
            let picked = self
                .result
                .as_ref()
                .is_some_and(|result| result.action == action);
            let row_style = if picked {
                style.bg(theme::selection_bg()).fg(theme::accent_fg())
            } else {
                style
            };
            let line = format!("{}  {}", action.shortcut, action.label);
            safe_set_string(buffer, inner, inner.x, inner.y + offset as u16, &line, row_style);
        }
    }

    fn handle_click(&mut self, column: u16, row: u16, area: Rect) -> AppResponse {
        if rect_contains(close_control_rect(area), column, row) {
            return AppResponse::RequestClose;
        }
        if let Some(panel) = self.panel_rect(area)
            && rect_contains(panel, column, row)
        {
            let inner_row = row.saturating_sub(panel.y + 1) as usize;
            if row > panel.y
                && let Some(action) = ACTIONS.get(inner_row)
            {
                self.run_action(action);
            }
            return AppResponse::Consumed;
        }
        match Self::sentence_cell(area, column, row) {
            Some(cell) => {
                self.anchor = Some(cell);
                self.caret = cell;
                self.press_cell = Some(cell);
                self.panel_open = false;
            }
            None => self.clear_selection(),
        }
        AppResponse::Consumed
    }
}

impl HostedApp for OnTextApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default().bg(theme::window_bg()).fg(theme::window_fg());
        frame.fill(area, base);
        render_window_controls(frame.buffer_mut(), area, base);
        let title = "OnText";
        let title_x = area.x + area.width.saturating_sub(title.len() as u16) / 2;
        safe_set_string(
            frame.buffer_mut(),
            area,
            title_x,
            area.y,
            title,
            base.add_modifier(Modifier::BOLD),
        );
        self.render_sentence(frame, area, base);
        self.render_integrations(frame, area, base);
        self.render_right_pane(frame, area, base);
        self.render_panel(frame, area);
    }

    fn handle_event(&mut self, event: &Event, area: Rect, _ctx: &ComponentContext) -> AppResponse {
        if let Some((column, row)) = left_click(event) {
            return self.handle_click(column, row, area);
        }
        if let Event::Mouse(mouse) = event {
            return match mouse.kind {
                MouseEventKind::Drag(MouseButton::Left) if self.press_cell.is_some() => {
                    self.drag_to(area, mouse.column);
                    AppResponse::Consumed
                }
                MouseEventKind::Up(MouseButton::Left) if self.press_cell.is_some() => {
                    self.press_cell = None;
                    self.after_selection_change();
                    AppResponse::Consumed
                }
                _ => AppResponse::Ignored,
            };
        }
        let Event::Key(key) = event else {
            return AppResponse::Ignored;
        };
        if key.kind == KeyEventKind::Release {
            return AppResponse::Ignored;
        }
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::F(3) => self.open_panel(),
            KeyCode::Left if shift => self.extend_selection(false),
            KeyCode::Right if shift => self.extend_selection(true),
            KeyCode::Left => self.move_caret(false),
            KeyCode::Right => self.move_caret(true),
            KeyCode::Char(ch) if self.panel_open => {
                if key.kind == KeyEventKind::Repeat {
                    return AppResponse::Consumed;
                }
                match action_for_shortcut(ch) {
                    Some(action) => self.run_action(action),
                    None => return AppResponse::Ignored,
                }
            }
            _ => return AppResponse::Ignored,
        }
        AppResponse::Consumed
    }

    fn tick(&mut self, now: Instant) {
        let Some(last) = self.last_advance else {
            self.last_advance = Some(now);
            return;
        };
        if now.saturating_duration_since(last) >= INTRO_INTERVAL {
            self.intro_index = (self.intro_index + 1) % INTRO_CARDS.len();
            self.last_advance = Some(now);
        }
    }

    fn mount(&mut self, now: Instant) {
        *self = Self::new();
        self.last_advance = Some(now);
    }

    fn no_drag_zones(&self, area: Rect) -> Vec<Rect> {
        vec![window_controls_rect(area)]
    }
}
