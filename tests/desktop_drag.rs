use std::sync::Arc;

use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;
use ratatui::layout::Rect;
use term_desk::apps::{FlowClipApp, HostedApp, MessagesApp, OnTextApp};
use term_desk::desktop::Desktop;
use term_desk::guestbook::{InlineSpawner, MemoryCommentsApi};
use term_desk::launcher::{AppId, Launcher};
use term_desk::window::WindowId;

fn desktop() -> Desktop {
    let api = Arc::new(MemoryCommentsApi::new());
    Desktop::new(Rect::new(0, 0, 100, 30), Launcher::default(), |id| match id {
        WindowId::Messages => {
            Box::new(MessagesApp::new(api.clone(), Arc::new(InlineSpawner))) as Box<dyn HostedApp>
        }
        WindowId::OnText => Box::new(OnTextApp::new()),
        WindowId::FlowClip => Box::new(FlowClipApp::new()),
    })
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn drag(desk: &mut Desktop, from: (u16, u16), to: (u16, u16)) {
    desk.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), from.0, from.1));
    desk.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), to.0, to.1));
    desk.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), to.0, to.1));
}

fn origin(desk: &Desktop, id: WindowId) -> (i32, i32) {
    desk.frame(id).map(|frame| frame.origin()).unwrap()
}

#[test]
fn grab_band_drag_moves_by_pointer_delta() {
    let mut desk = desktop();
    desk.activate_dock(AppId::Messages);
    assert_eq!(origin(&desk, WindowId::Messages), (3, 2));
    drag(&mut desk, (30, 2), (35, 5));
    assert_eq!(origin(&desk, WindowId::Messages), (8, 5));
}

#[test]
fn press_on_close_control_does_not_drag() {
    let mut desk = desktop();
    desk.activate_dock(AppId::Messages);
    // The red light sits one cell inside the frame, on the second band row.
    desk.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 3));
    desk.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 20, 9));
    assert_eq!(origin(&desk, WindowId::Messages), (3, 2));
    assert!(!desk.registry().is_open(WindowId::Messages));
}

#[test]
fn press_below_band_of_untitled_window_does_not_drag() {
    let mut desk = desktop();
    desk.activate_dock(AppId::OnText);
    // OnText sits at (8, 3); its band covers rows 3 and 4.
    drag(&mut desk, (40, 6), (50, 12));
    assert_eq!(origin(&desk, WindowId::OnText), (8, 3));
}

#[test]
fn title_bar_drag_is_clamped_to_desktop() {
    let mut desk = desktop();
    desk.activate_dock(AppId::FlowClip);
    // FlowClip's title bar is row 4; the menu bar owns row 0.
    drag(&mut desk, (40, 4), (45, 0));
    assert_eq!(origin(&desk, WindowId::FlowClip), (19, 1));
    drag(&mut desk, (40, 1), (200, 1));
    assert_eq!(origin(&desk, WindowId::FlowClip), (96, 1));
}

#[test]
fn reopening_keeps_dragged_position() {
    let mut desk = desktop();
    desk.activate_dock(AppId::FlowClip);
    drag(&mut desk, (40, 4), (30, 8));
    assert_eq!(origin(&desk, WindowId::FlowClip), (4, 8));
    desk.activate_dock(AppId::FlowClip);
    assert!(!desk.registry().is_open(WindowId::FlowClip));
    desk.activate_dock(AppId::FlowClip);
    assert_eq!(origin(&desk, WindowId::FlowClip), (4, 8));
}

#[test]
fn press_goes_to_the_topmost_window() {
    let mut desk = desktop();
    desk.activate_dock(AppId::FlowClip);
    desk.activate_dock(AppId::Messages);
    // (70, 4) is on FlowClip's title bar but Messages covers it, below its band.
    drag(&mut desk, (70, 4), (71, 4));
    assert_eq!(desk.registry().topmost_open(), Some(WindowId::Messages));
    assert_eq!(origin(&desk, WindowId::FlowClip), (14, 4));
}
