use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod dock;
pub mod menu_bar;
pub mod secret_prompt;
pub mod text_input;

pub use dock::Dock;
pub use menu_bar::MenuBar;
pub use secret_prompt::{PromptOutcome, SecretPrompt};
pub use text_input::TextInput;

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    struct Noop;

    impl Component for Noop {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_ignores_input() {
        let area = Rect::new(0, 0, 1, 1);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        let ctx = ComponentContext::default();
        let mut noop = Noop;
        noop.render(&mut frame, area, &ctx);
        assert!(!noop.handle_event(&Event::FocusGained, &ctx));
    }
}
