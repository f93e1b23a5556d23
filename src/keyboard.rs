use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::constants::ESCAPE_REPEAT_WINDOW;
use crate::window::{WindowId, WindowRegistry};

/// What the Escape handler did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// The topmost window was closed; the event is consumed.
    Closed(WindowId),
    /// An Escape repeat, release, or held press that must not close anything.
    Suppressed,
    /// Not handled here; route the event onwards.
    PassThrough,
}

/// Global Escape handling: each physical press closes the topmost window.
///
/// Auto-repeat events are always dropped. Once the terminal has shown that
/// it reports releases, a second press is dropped until the matching
/// release arrives. Before that, presses closer together than
/// `ESCAPE_REPEAT_WINDOW` count as one held key.
#[derive(Debug, Default)]
pub struct EscapeController {
    esc_down: bool,
    releases_seen: bool,
    last_press: Option<Instant>,
}

impl EscapeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        registry: &mut WindowRegistry,
        now: Instant,
    ) -> EscapeOutcome {
        if key.code != KeyCode::Esc {
            return EscapeOutcome::PassThrough;
        }
        match key.kind {
            KeyEventKind::Release => {
                self.releases_seen = true;
                self.esc_down = false;
                return EscapeOutcome::Suppressed;
            }
            KeyEventKind::Repeat => return EscapeOutcome::Suppressed,
            KeyEventKind::Press => {}
        }
        if self.releases_seen && self.esc_down {
            return EscapeOutcome::Suppressed;
        }
        let Some(topmost) = registry.topmost_open() else {
            return EscapeOutcome::PassThrough;
        };
        if !self.releases_seen {
            // The window slides with every press so a held key stays one press.
            let held = self
                .last_press
                .is_some_and(|last| now.saturating_duration_since(last) < ESCAPE_REPEAT_WINDOW);
            self.last_press = Some(now);
            if held {
                tracing::trace!("escape press inside repeat window ignored");
                return EscapeOutcome::Suppressed;
            }
        }
        self.esc_down = true;
        tracing::debug!(window_id = ?topmost, "escape closes topmost window");
        registry.close(topmost);
        EscapeOutcome::Closed(topmost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn esc(kind: KeyEventKind) -> KeyEvent {
        let mut key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        key.kind = kind;
        key
    }

    fn registry_with(ids: &[WindowId]) -> WindowRegistry {
        let mut registry = WindowRegistry::new();
        for id in ids {
            registry.open(*id);
        }
        registry
    }

    #[test]
    fn escape_closes_topmost_only() {
        let mut registry = registry_with(&[WindowId::Messages, WindowId::OnText]);
        let mut escape = EscapeController::new();
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Press), &mut registry, Instant::now()),
            EscapeOutcome::Closed(WindowId::OnText)
        );
        assert_eq!(registry.stack_order(), &[WindowId::Messages]);
    }

    #[test]
    fn escape_with_nothing_open_passes_through() {
        let mut registry = WindowRegistry::new();
        let mut escape = EscapeController::new();
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Press), &mut registry, Instant::now()),
            EscapeOutcome::PassThrough
        );
    }

    #[test]
    fn repeats_are_suppressed() {
        let mut registry = registry_with(&[WindowId::Messages, WindowId::OnText]);
        let mut escape = EscapeController::new();
        let now = Instant::now();
        escape.handle_key(&esc(KeyEventKind::Press), &mut registry, now);
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Repeat), &mut registry, now),
            EscapeOutcome::Suppressed
        );
        assert_eq!(registry.stack_order(), &[WindowId::Messages]);
    }

    #[test]
    fn held_press_waits_for_release_once_releases_are_reported() {
        let mut registry =
            registry_with(&[WindowId::Messages, WindowId::OnText, WindowId::FlowClip]);
        let mut escape = EscapeController::new();
        let now = Instant::now();
        escape.handle_key(&esc(KeyEventKind::Press), &mut registry, now);
        escape.handle_key(&esc(KeyEventKind::Release), &mut registry, now);
        escape.handle_key(&esc(KeyEventKind::Press), &mut registry, now);
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Press), &mut registry, now),
            EscapeOutcome::Suppressed
        );
        assert_eq!(registry.stack_order(), &[WindowId::Messages]);
        escape.handle_key(&esc(KeyEventKind::Release), &mut registry, now);
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Press), &mut registry, now),
            EscapeOutcome::Closed(WindowId::Messages)
        );
    }

    #[test]
    fn held_escape_without_release_reporting_closes_one_window() {
        let mut registry =
            registry_with(&[WindowId::Messages, WindowId::OnText, WindowId::FlowClip]);
        let mut escape = EscapeController::new();
        let start = Instant::now();
        let step = Duration::from_millis(30);
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Press), &mut registry, start),
            EscapeOutcome::Closed(WindowId::FlowClip)
        );
        // Auto-repeat arrives as a burst of presses; the window slides with it.
        for tick in 1..20u32 {
            assert_eq!(
                escape.handle_key(&esc(KeyEventKind::Press), &mut registry, start + step * tick),
                EscapeOutcome::Suppressed
            );
        }
        assert_eq!(registry.stack_order(), &[WindowId::Messages, WindowId::OnText]);

        let later = start + step * 19 + ESCAPE_REPEAT_WINDOW;
        assert_eq!(
            escape.handle_key(&esc(KeyEventKind::Press), &mut registry, later),
            EscapeOutcome::Closed(WindowId::OnText)
        );
        assert_eq!(registry.stack_order(), &[WindowId::Messages]);
    }

    #[test]
    fn other_keys_pass_through() {
        let mut registry = registry_with(&[WindowId::Messages]);
        let mut escape = EscapeController::new();
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(
            escape.handle_key(&key, &mut registry, Instant::now()),
            EscapeOutcome::PassThrough
        );
        assert!(registry.is_open(WindowId::Messages));
    }
}
