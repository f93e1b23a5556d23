//! Messages: the guestbook, rendered as a chat thread.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{
    AppResponse, HostedApp, close_control_rect, left_click, render_window_controls,
    window_controls_rect,
};
use crate::components::{Component, ComponentContext, PromptOutcome, SecretPrompt, TextInput};
use crate::guestbook::model::{MAX_MESSAGE_CHARS, MAX_NAME_CHARS, format_timestamp};
use crate::guestbook::{
    Comment, CommentsApi, GuestbookSync, Spawner, StatusKind, SyncUpdate,
};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, wrap_text};
use crate::window::rect_contains;

const SIDEBAR_WIDTH: u16 = 22;
const FIELD_LABEL_WIDTH: u16 = 9;

const DESCRIPTION: &str = indoc! {"
    Leave a note for the
    owner. Owner notes sit
    on the left, visitors
    on the right.
"};

const KEY_HELP: [&str; 6] = [
    "Tab     switch field",
    "Enter   send",
    "↑/↓     select",
    "^D      delete",
    "^O      post as owner",
    "^R      reload",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Nickname,
    Message,
}

enum PromptPurpose {
    Delete(String),
    OwnerPost,
}

struct ActivePrompt {
    purpose: PromptPurpose,
    prompt: SecretPrompt,
}

struct Layout {
    sidebar: Rect,
    header: Rect,
    list: Rect,
    status: Rect,
    nickname_row: Rect,
    message_row: Rect,
}

fn layout(area: Rect) -> Layout {
    let sidebar = Rect::new(area.x, area.y, SIDEBAR_WIDTH.min(area.width), area.height);
    let main_x = area.x + sidebar.width + 1;
    let main_w = area.width.saturating_sub(sidebar.width + 1);
    let bottom = area.y + area.height;
    let row = |offset: u16| Rect::new(main_x, bottom.saturating_sub(offset).max(area.y), main_w, 1);
    Layout {
        sidebar,
        header: Rect::new(main_x, area.y, main_w, 1.min(area.height)),
        list: Rect::new(main_x, area.y + 1, main_w, area.height.saturating_sub(4)),
        status: row(3),
        nickname_row: row(2),
        message_row: row(1),
    }
}

fn field_rect(row: Rect) -> Rect {
    Rect::new(
        row.x + FIELD_LABEL_WIDTH,
        row.y,
        row.width.saturating_sub(FIELD_LABEL_WIDTH + 1),
        row.height,
    )
}

struct ListLine {
    text: String,
    style: Style,
    align_right: bool,
    comment: usize,
}

fn build_lines(comments: &[Comment], width: u16, selected: Option<&str>, sync: &GuestbookSync) -> Vec<ListLine> {
    let bubble_width = ((width as usize * 76) / 100).clamp(6.min(width as usize), width as usize);
    let mut lines = Vec::new();
    for (index, comment) in comments.iter().enumerate() {
        let (bg, fg) = if comment.is_owner {
            (theme::bubble_owner_bg(), theme::bubble_owner_fg())
        } else {
            (theme::bubble_visitor_bg(), theme::bubble_visitor_fg())
        };
        let bubble = Style::default().bg(bg).fg(fg);
        let stamp = if sync.is_pending(&comment.id) {
            "sending…".to_string()
        } else {
            format_timestamp(&comment.created_at)
        };
        let header = if stamp.is_empty() {
            comment.name.clone()
        } else {
            format!("{} · {stamp}", comment.name)
        };
        let mut header_style = Style::default()
            .fg(theme::window_muted_fg())
            .add_modifier(Modifier::BOLD);
        if selected == Some(comment.id.as_str()) {
            header_style = header_style.add_modifier(Modifier::REVERSED);
        }
        lines.push(ListLine {
            text: header,
            style: header_style,
            align_right: !comment.is_owner,
            comment: index,
        });
        for line in wrap_text(&comment.text, bubble_width.saturating_sub(2)) {
            lines.push(ListLine {
                text: format!(" {line} "),
                style: bubble,
                align_right: !comment.is_owner,
                comment: index,
            });
        }
        lines.push(ListLine {
            text: String::new(),
            style: Style::default(),
            align_right: false,
            comment: index,
        });
    }
    lines
}

pub struct MessagesApp {
    sync: GuestbookSync,
    nickname: TextInput,
    message: TextInput,
    field: Field,
    selected: Option<String>,
    /// Lines scrolled up from the bottom of the thread.
    scroll: usize,
    follow_selection: bool,
    /// Screen row and comment id of each rendered header line.
    header_rows: Vec<(u16, String)>,
    prompt: Option<ActivePrompt>,
}

impl MessagesApp {
    pub fn new(api: Arc<dyn CommentsApi>, spawner: Arc<dyn Spawner>) -> Self {
        Self {
            sync: GuestbookSync::new(api, spawner),
            nickname: TextInput::new(MAX_NAME_CHARS).with_placeholder("Visitor"),
            message: TextInput::new(MAX_MESSAGE_CHARS).with_placeholder("iMessage"),
            field: Field::Message,
            selected: None,
            scroll: 0,
            follow_selection: false,
            header_rows: Vec::new(),
            prompt: None,
        }
    }

    pub fn sync(&self) -> &GuestbookSync {
        &self.sync
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn prompt_title(&self) -> Option<&str> {
        self.prompt.as_ref().map(|active| active.prompt.title())
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.field {
            Field::Nickname => &mut self.nickname,
            Field::Message => &mut self.message,
        }
    }

    fn submit(&mut self, secret: Option<String>) {
        let sent = self
            .sync
            .submit(self.nickname.value(), self.message.value(), secret);
        if sent {
            self.selected = None;
            self.scroll = 0;
        }
    }

    fn move_selection(&mut self, forward: bool) {
        let comments = self.sync.comments();
        if comments.is_empty() {
            return;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|id| comments.iter().position(|comment| &comment.id == id));
        let next = match (current, forward) {
            (None, false) => Some(comments.len() - 1),
            (None, true) => None,
            (Some(index), false) => Some(index.saturating_sub(1)),
            (Some(index), true) if index + 1 < comments.len() => Some(index + 1),
            (Some(_), true) => None,
        };
        self.selected = next.map(|index| comments[index].id.clone());
        if self.selected.is_none() {
            self.scroll = 0;
        }
        self.follow_selection = true;
    }

    fn open_prompt(&mut self, purpose: PromptPurpose) {
        let prompt = match &purpose {
            PromptPurpose::Delete(_) => SecretPrompt::new("Delete comment", "Owner secret:"),
            PromptPurpose::OwnerPost => SecretPrompt::new("Post as owner", "Owner secret:"),
        };
        self.prompt = Some(ActivePrompt { purpose, prompt });
    }

    fn deletable_selection(&self) -> Option<String> {
        let id = self.selected.as_ref()?;
        let comment = self
            .sync
            .comments()
            .into_iter()
            .find(|comment| &comment.id == id)?;
        if comment.is_welcome() || self.sync.is_pending(&comment.id) {
            None
        } else {
            Some(comment.id)
        }
    }

    fn handle_prompt(&mut self, event: &Event, area: Rect, ctx: &ComponentContext) -> AppResponse {
        let Some(active) = self.prompt.as_mut() else {
            return AppResponse::Ignored;
        };
        match active.prompt.handle(event, area, ctx) {
            PromptOutcome::Pending => {}
            PromptOutcome::Cancelled => self.prompt = None,
            PromptOutcome::Submitted(secret) => {
                if let Some(active) = self.prompt.take() {
                    match active.purpose {
                        PromptPurpose::Delete(id) => {
                            self.sync.delete(&id, secret);
                        }
                        PromptPurpose::OwnerPost => self.submit(Some(secret)),
                    }
                }
            }
        }
        AppResponse::Consumed
    }

    fn handle_click(&mut self, column: u16, row: u16, area: Rect) -> AppResponse {
        if rect_contains(close_control_rect(area), column, row) {
            return AppResponse::RequestClose;
        }
        let layout = layout(area);
        if rect_contains(layout.nickname_row, column, row) {
            self.field = Field::Nickname;
            return AppResponse::Consumed;
        }
        if rect_contains(layout.message_row, column, row) {
            self.field = Field::Message;
            return AppResponse::Consumed;
        }
        if rect_contains(layout.list, column, row) {
            self.selected = self
                .header_rows
                .iter()
                .find(|(header_row, _)| *header_row == row)
                .map(|(_, id)| id.clone());
            return AppResponse::Consumed;
        }
        AppResponse::Ignored
    }

    fn render_sidebar(&self, frame: &mut UiFrame<'_>, sidebar: Rect) {
        let style = Style::default().bg(theme::sidebar_bg()).fg(theme::window_fg());
        frame.fill(sidebar, style);
        let buffer = frame.buffer_mut();
        render_window_controls(buffer, sidebar, style);
        let x = sidebar.x + 1;
        let mut y = sidebar.y + 2;
        safe_set_string(
            buffer,
            sidebar,
            x,
            y,
            "Visitor Guestbook",
            style.add_modifier(Modifier::BOLD),
        );
        y += 2;
        for line in DESCRIPTION.lines() {
            safe_set_string(buffer, sidebar, x, y, line, style.fg(theme::window_muted_fg()));
            y += 1;
        }
        y += 1;
        let count = format!("Comments: {}", self.sync.visitor_count());
        safe_set_string(buffer, sidebar, x, y, &count, style.fg(theme::accent()));
        let help_top = (sidebar.y + sidebar.height).saturating_sub(KEY_HELP.len() as u16);
        if help_top > y + 1 {
            for (offset, line) in KEY_HELP.iter().enumerate() {
                safe_set_string(
                    buffer,
                    sidebar,
                    x,
                    help_top + offset as u16,
                    line,
                    style.fg(theme::window_muted_fg()),
                );
            }
        }
    }

    fn render_thread(&mut self, frame: &mut UiFrame<'_>, list: Rect) {
        self.header_rows.clear();
        if list.width == 0 || list.height == 0 {
            return;
        }
        let comments = self.sync.comments();
        let lines = build_lines(&comments, list.width, self.selected.as_deref(), &self.sync);
        let height = list.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        if self.follow_selection {
            self.follow_selection = false;
            if let Some(selected) = self.selected.as_ref()
                && let Some(index) = comments.iter().position(|comment| &comment.id == selected)
                && let Some(first) = lines.iter().position(|line| line.comment == index)
            {
                let end = lines.len() - self.scroll.min(max_scroll);
                let start = end.saturating_sub(height);
                if first < start {
                    self.scroll = lines.len() - (first + height).min(lines.len());
                } else if first >= end {
                    self.scroll = lines.len() - (first + 1);
                }
            }
        }
        self.scroll = self.scroll.min(max_scroll);
        let end = lines.len() - self.scroll;
        let start = end.saturating_sub(height);

        let buffer = frame.buffer_mut();
        for (offset, line) in lines[start..end].iter().enumerate() {
            let y = list.y + offset as u16;
            let width = line.text.chars().count() as u16;
            let x = if line.align_right {
                list.x + list.width.saturating_sub(width)
            } else {
                list.x
            };
            safe_set_string(buffer, list, x, y, &line.text, line.style);
            let is_header = lines[..start + offset]
                .last()
                .is_none_or(|previous| previous.comment != line.comment);
            if is_header && let Some(comment) = comments.get(line.comment) {
                self.header_rows.push((y, comment.id.clone()));
            }
        }
    }

    fn render_status(&self, frame: &mut UiFrame<'_>, status: Rect) {
        let base = Style::default().bg(theme::window_bg());
        let (text, style) = if self.sync.is_loading() {
            ("Loading comments…".to_string(), base.fg(theme::window_muted_fg()))
        } else if let Some(message) = self.sync.status() {
            let color = match message.kind {
                StatusKind::Info => theme::info_fg(),
                StatusKind::Warning => theme::warning_fg(),
                StatusKind::Error => theme::error_fg(),
            };
            (message.text.clone(), base.fg(color))
        } else if self.sync.is_submitting() {
            ("Sending…".to_string(), base.fg(theme::window_muted_fg()))
        } else {
            return;
        };
        safe_set_string(frame.buffer_mut(), status, status.x, status.y, &text, style);
    }
}

impl HostedApp for MessagesApp {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let layout = layout(area);
        frame.fill(area, Style::default().bg(theme::window_bg()));
        self.render_sidebar(frame, layout.sidebar);

        let base = Style::default().bg(theme::window_bg()).fg(theme::window_fg());
        let header = format!("To: Guestbook  ({} visitors)", self.sync.visitor_count());
        safe_set_string(
            frame.buffer_mut(),
            layout.header,
            layout.header.x,
            layout.header.y,
            &header,
            base.add_modifier(Modifier::BOLD),
        );
        self.render_thread(frame, layout.list);
        self.render_status(frame, layout.status);

        for (label, row, field) in [
            ("Name", layout.nickname_row, Field::Nickname),
            ("Message", layout.message_row, Field::Message),
        ] {
            let active = self.field == field && self.prompt.is_none();
            let label_style = if active {
                base.fg(theme::accent()).add_modifier(Modifier::BOLD)
            } else {
                base.fg(theme::window_muted_fg())
            };
            safe_set_string(frame.buffer_mut(), row, row.x, row.y, label, label_style);
            let input_ctx = ctx.with_focus(ctx.focused() && active);
            let input = match field {
                Field::Nickname => &mut self.nickname,
                Field::Message => &mut self.message,
            };
            input.render(frame, field_rect(row), &input_ctx);
        }

        if let Some(active) = self.prompt.as_mut() {
            active.prompt.render(frame, area, ctx);
        }
    }

    fn handle_event(&mut self, event: &Event, area: Rect, ctx: &ComponentContext) -> AppResponse {
        if self.prompt.is_some() {
            return self.handle_prompt(event, area, ctx);
        }
        if let Some((column, row)) = left_click(event) {
            return self.handle_click(column, row, area);
        }
        if let Event::Mouse(mouse) = event {
            return match mouse.kind {
                MouseEventKind::ScrollUp => {
                    self.scroll += 1;
                    AppResponse::Consumed
                }
                MouseEventKind::ScrollDown => {
                    self.scroll = self.scroll.saturating_sub(1);
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
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => {
                if let Some(id) = self.deletable_selection() {
                    self.open_prompt(PromptPurpose::Delete(id));
                }
            }
            KeyCode::Char('o') if ctrl => {
                if !self.message.value().trim().is_empty() && !self.sync.is_submitting() {
                    self.open_prompt(PromptPurpose::OwnerPost);
                }
            }
            KeyCode::Char('r') if ctrl => self.sync.refresh(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.field = match self.field {
                    Field::Nickname => Field::Message,
                    Field::Message => Field::Nickname,
                };
            }
            KeyCode::Enter => self.submit(None),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            _ => {
                return if self.focused_input().handle_event(event, ctx) {
                    AppResponse::Consumed
                } else {
                    AppResponse::Ignored
                };
            }
        }
        AppResponse::Consumed
    }

    fn tick(&mut self, _now: Instant) {
        for update in self.sync.poll() {
            match update {
                SyncUpdate::Posted(_) => {
                    self.message.clear();
                    self.scroll = 0;
                }
                SyncUpdate::Deleted(id) | SyncUpdate::Tombstoned(id) => {
                    if self.selected.as_deref() == Some(id.as_str()) {
                        self.selected = None;
                    }
                }
                _ => {}
            }
        }
    }

    fn mount(&mut self, _now: Instant) {
        self.sync.mount();
    }

    fn unmount(&mut self) {
        self.sync.unmount();
        self.prompt = None;
        self.selected = None;
        self.scroll = 0;
    }

    fn no_drag_zones(&self, area: Rect) -> Vec<Rect> {
        vec![window_controls_rect(area)]
    }
}
