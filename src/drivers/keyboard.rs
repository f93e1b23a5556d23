use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

/// Cleans up raw key events before they reach the desktop.
///
/// Shift+Tab arrives as `Tab` with SHIFT on some terminals and is rewritten
/// to `BackTab`. Key releases are dropped, except for Escape: the Escape
/// controller uses them to tell a held key from a new press.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer;

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                if key.kind == KeyEventKind::Release && key.code != KeyCode::Esc {
                    return None;
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}
