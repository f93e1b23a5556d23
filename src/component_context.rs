//! Shared component rendering context
//!
//! `ComponentContext` carries the UI state that components and hosted apps
//! need while rendering and handling events, so the traits stay stable and
//! nothing relies on ad-hoc boolean parameters.

use std::time::Instant;

/// Context passed to `Component` and `HostedApp` methods.
///
/// - `focused`: whether the receiver belongs to the frontmost window.
/// - `now`: the frame's timestamp, used for time-driven state.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    now: Instant,
}

impl ComponentContext {
    pub fn new(focused: bool) -> Self {
        Self {
            focused,
            now: Instant::now(),
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn now(&self) -> Instant {
        self.now
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_now(mut self, now: Instant) -> Self {
        self.now = now;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builders_override_fields() {
        let start = Instant::now();
        let later = start + Duration::from_secs(1);
        let ctx = ComponentContext::new(false).with_focus(true).with_now(later);
        assert!(ctx.focused());
        assert_eq!(ctx.now(), later);
        assert!(!ComponentContext::default().focused());
    }
}
