use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::desktop::Desktop;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};

/// `Ctrl+Q` press.
pub fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.code == KeyCode::Char('q')
                && key.modifiers.contains(KeyModifiers::CONTROL)
                && key.kind != KeyEventKind::Release
    )
}

/// Runs the desktop until the user quits. Every idle frame ticks the apps and
/// redraws; every input event goes to [`Desktop::handle_event`].
pub fn run_desktop<O, D>(
    output: &mut O,
    driver: D,
    desktop: &mut Desktop,
    frame_interval: Duration,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, frame_interval);
    event_loop.run(|event| match event {
        Some(evt) => {
            if is_quit(&evt) {
                tracing::info!("quit requested");
                return Ok(ControlFlow::Quit);
            }
            let handled = desktop.handle_event(&evt);
            tracing::trace!(?evt, handled, "event dispatched");
            Ok(ControlFlow::Continue)
        }
        None => {
            desktop.tick(Instant::now());
            output.draw(|frame| desktop.render(frame))?;
            Ok(ControlFlow::Continue)
        }
    })
}
