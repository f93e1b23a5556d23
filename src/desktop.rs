//! The desktop: owns the window registry, window frames, and hosted apps,
//! routes input to them, and composes the scene.
//!
//! Screen layout, top to bottom: the menu bar, the desktop area windows live
//! in, and the dock. Windows are drawn bottom-up in registry stack order and
//! the dock is drawn over them.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::apps::{AppResponse, HostedApp};
use crate::components::{Component, ComponentContext, Dock, MenuBar};
use crate::constants::{DOCK_HEIGHT, MENU_BAR_HEIGHT};
use crate::keyboard::{EscapeController, EscapeOutcome};
use crate::launcher::{AppId, LaunchOutcome, Launcher};
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{
    DeskDecorator, DragController, WindowDecorator, WindowFrame, WindowId, WindowRegistry,
    rect_contains,
};

pub struct Desktop {
    registry: WindowRegistry,
    frames: BTreeMap<WindowId, WindowFrame>,
    apps: BTreeMap<WindowId, Box<dyn HostedApp>>,
    mounted: BTreeSet<WindowId>,
    drag: DragController,
    escape: EscapeController,
    launcher: Launcher,
    dock: Dock,
    menu_bar: MenuBar,
    decorator: Box<dyn WindowDecorator>,
    area: Rect,
    /// Window that received the last left press; it keeps receiving the
    /// gesture's drag and release events.
    pointer_owner: Option<WindowId>,
    now: Instant,
}

impl Desktop {
    /// Builds a desktop over `area` with every window closed. `make_app` is
    /// called once per window.
    pub fn new(
        area: Rect,
        launcher: Launcher,
        mut make_app: impl FnMut(WindowId) -> Box<dyn HostedApp>,
    ) -> Self {
        let frames = WindowId::ALL
            .into_iter()
            .map(|id| (id, WindowFrame::new(id)))
            .collect();
        let apps = WindowId::ALL
            .into_iter()
            .map(|id| (id, make_app(id)))
            .collect();
        let mut menu_bar = MenuBar::new();
        menu_bar.set_style(
            Style::default()
                .bg(theme::menu_bar_bg())
                .fg(theme::menu_bar_fg()),
        );
        menu_bar.set_right("Esc close  ^Q quit ");
        Self {
            registry: WindowRegistry::new(),
            frames,
            apps,
            mounted: BTreeSet::new(),
            drag: DragController::new(),
            escape: EscapeController::new(),
            launcher,
            dock: Dock::new(),
            menu_bar,
            decorator: Box::new(DeskDecorator),
            area,
            pointer_owner: None,
            now: Instant::now(),
        }
    }

    pub fn with_decorator(mut self, decorator: Box<dyn WindowDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn frame(&self, id: WindowId) -> Option<&WindowFrame> {
        self.frames.get(&id)
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn menu_bar_area(&self) -> Rect {
        let area = self.area;
        Rect::new(area.x, area.y, area.width, MENU_BAR_HEIGHT.min(area.height))
    }

    pub fn dock_area(&self) -> Rect {
        let area = self.area;
        let height = DOCK_HEIGHT.min(area.height.saturating_sub(MENU_BAR_HEIGHT));
        Rect::new(
            area.x,
            area.y + area.height - height,
            area.width,
            height,
        )
    }

    /// Region windows live in and are clamped to while dragged.
    pub fn desktop_area(&self) -> Rect {
        let top = self.menu_bar_area();
        let dock = self.dock_area();
        let y = top.y + top.height;
        Rect::new(self.area.x, y, self.area.width, dock.y.saturating_sub(y))
    }

    /// Activates a dock entry as if it had been clicked.
    pub fn activate_dock(&mut self, app: AppId) -> LaunchOutcome {
        let outcome = self.launcher.activate(app, &mut self.registry);
        self.sync_lifecycle();
        outcome
    }

    /// Mounts apps whose window just opened and unmounts those whose window
    /// just closed.
    fn sync_lifecycle(&mut self) {
        for id in WindowId::ALL {
            let open = self.registry.is_open(id);
            let mounted = self.mounted.contains(&id);
            if open && !mounted {
                self.mounted.insert(id);
                if let Some(app) = self.apps.get_mut(&id) {
                    app.mount(self.now);
                }
                tracing::debug!(window_id = ?id, "app mounted");
            } else if !open && mounted {
                self.mounted.remove(&id);
                if let Some(app) = self.apps.get_mut(&id) {
                    app.unmount();
                }
                self.drag.cancel_for(id);
                if self.pointer_owner == Some(id) {
                    self.pointer_owner = None;
                }
                tracing::debug!(window_id = ?id, "app unmounted");
            }
        }
    }

    fn close_window(&mut self, id: WindowId) {
        self.registry.close(id);
        self.sync_lifecycle();
    }

    fn window_at(&self, column: u16, row: u16) -> Option<WindowId> {
        self.registry
            .stack_order()
            .iter()
            .rev()
            .copied()
            .find(|id| self.frames.get(id).is_some_and(|f| f.contains(column, row)))
    }

    fn context_for(&self, id: WindowId) -> ComponentContext {
        ComponentContext::new(self.registry.topmost_open() == Some(id)).with_now(self.now)
    }

    /// Hands `event` to the app in window `id`, translating mouse
    /// coordinates into the window's own space.
    fn dispatch_to_app(&mut self, id: WindowId, event: &Event) -> bool {
        let Some(frame) = self.frames.get(&id).copied() else {
            return false;
        };
        let event = match event {
            Event::Mouse(mouse) => {
                let rect = frame.rect();
                let column = (i32::from(mouse.column) - rect.x).clamp(0, i32::from(u16::MAX)) as u16;
                let row = (i32::from(mouse.row) - rect.y).clamp(0, i32::from(u16::MAX)) as u16;
                Event::Mouse(MouseEvent {
                    kind: mouse.kind,
                    column,
                    row,
                    modifiers: mouse.modifiers,
                })
            }
            other => other.clone(),
        };
        let ctx = self.context_for(id);
        let Some(app) = self.apps.get_mut(&id) else {
            return false;
        };
        match app.handle_event(&event, frame.content_local(), &ctx) {
            AppResponse::Ignored => false,
            AppResponse::Consumed => true,
            AppResponse::RequestClose => {
                tracing::debug!(window_id = ?id, "app requested close");
                self.close_window(id);
                true
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Resize(width, height) => {
                self.set_area(Rect::new(0, 0, *width, *height));
                true
            }
            Event::Key(key) => match self
                .escape
                .handle_key(key, &mut self.registry, Instant::now())
            {
                EscapeOutcome::Closed(_) => {
                    self.sync_lifecycle();
                    true
                }
                EscapeOutcome::Suppressed => true,
                EscapeOutcome::PassThrough => match self.registry.topmost_open() {
                    Some(id) => self.dispatch_to_app(id, event),
                    None => false,
                },
            },
            Event::Mouse(mouse) => self.handle_mouse(event, mouse),
            Event::Paste(_) => match self.registry.topmost_open() {
                Some(id) => self.dispatch_to_app(id, event),
                None => false,
            },
            _ => false,
        }
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent) -> bool {
        if let Some(id) = self.drag.dragging() {
            match mouse.kind {
                MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                    let bounds = self.desktop_area();
                    if let Some(frame) = self.frames.get_mut(&id) {
                        self.drag.update(frame, mouse.column, mouse.row, bounds);
                    }
                    return true;
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    self.drag.end();
                    return true;
                }
                _ => {
                    self.drag.end();
                }
            }
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_press(event, mouse),
            MouseEventKind::Drag(MouseButton::Left) => match self.pointer_owner {
                Some(id) => self.dispatch_to_app(id, event),
                None => false,
            },
            MouseEventKind::Up(MouseButton::Left) => match self.pointer_owner.take() {
                Some(id) => self.dispatch_to_app(id, event),
                None => false,
            },
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                match self.window_at(mouse.column, mouse.row) {
                    Some(id) => self.dispatch_to_app(id, event),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn handle_press(&mut self, event: &Event, mouse: &MouseEvent) -> bool {
        self.pointer_owner = None;
        if let Some(app) = self.dock.hit_test(self.dock_area(), mouse.column, mouse.row) {
            self.activate_dock(app);
            return true;
        }
        let Some(id) = self.window_at(mouse.column, mouse.row) else {
            return false;
        };
        self.registry.focus(id);
        let Some(frame) = self.frames.get(&id).copied() else {
            return true;
        };
        if let (Some(close), Some((x, y))) =
            (frame.close_button_local(), frame.local(mouse.column, mouse.row))
            && rect_contains(close, x, y)
        {
            tracing::debug!(window_id = ?id, "title bar close clicked");
            self.close_window(id);
            return true;
        }
        let no_drag = self
            .apps
            .get(&id)
            .map(|app| app.no_drag_zones(frame.content_local()))
            .unwrap_or_default();
        if self.drag.begin(&frame, &no_drag, mouse.column, mouse.row) {
            return true;
        }
        self.pointer_owner = Some(id);
        self.dispatch_to_app(id, event);
        true
    }

    /// Advances time-driven state of every open app.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        for id in self.registry.stack_order().to_vec() {
            if let Some(app) = self.apps.get_mut(&id) {
                app.tick(now);
            }
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.area = frame.area();
        let desktop = self.desktop_area();
        frame.fill(self.area, Style::default().bg(theme::desktop_bg()));
        render_pattern(frame, desktop);

        let topmost = self.registry.topmost_open();
        for id in self.registry.stack_order().to_vec() {
            let Some(window) = self.frames.get(&id).copied() else {
                continue;
            };
            let local = window.local_area();
            let mut buffer = Buffer::empty(local);
            let focused = topmost == Some(id);
            self.decorator
                .render_window(&mut buffer, local, window.title(), focused);
            if let Some(app) = self.apps.get_mut(&id) {
                let ctx = ComponentContext::new(focused).with_now(self.now);
                let mut offscreen = UiFrame::from_parts(local, &mut buffer);
                app.render(&mut offscreen, window.content_local(), &ctx);
            }
            frame.blit_from_signed(&buffer, window.rect());
        }

        self.dock.render(frame, self.dock_area(), &self.registry);
        let front = topmost.map(WindowId::label).unwrap_or("Finder");
        self.menu_bar.set_left(format!("  term-desk   {front}"));
        let ctx = ComponentContext::default().with_now(self.now);
        let bar = self.menu_bar_area();
        self.menu_bar.render(frame, bar, &ctx);
    }
}

fn render_pattern(frame: &mut UiFrame<'_>, area: Rect) {
    let style = Style::default()
        .bg(theme::desktop_bg())
        .fg(theme::desktop_pattern());
    let buffer = frame.buffer_mut();
    for y in (area.y..area.y + area.height).step_by(2) {
        let shift = (y / 2) % 2 * 3;
        for x in (area.x + shift..area.x + area.width).step_by(6) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol("·");
                cell.set_style(style);
            }
        }
    }
}
