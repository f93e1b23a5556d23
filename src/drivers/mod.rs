//! Terminal input and output behind small traits, so the runner can be
//! driven by a scripted input source in tests.

pub mod console;
pub mod keyboard;

use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::ui::UiFrame;

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }
}

pub trait OutputDriver {
    /// Takes over the terminal: alternate screen, raw mode, mouse capture.
    fn enter(&mut self) -> io::Result<()>;
    /// Restores the terminal. Calling it twice is harmless.
    fn exit(&mut self) -> io::Result<()>;

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut UiFrame<'_>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn drain<D: InputDriver>(mut driver: D) -> usize {
        let mut count = 0;
        while driver.poll(Duration::ZERO).unwrap() {
            driver.read().unwrap();
            count += 1;
        }
        count
    }

    #[test]
    fn mutable_reference_forwards_to_driver() {
        let key = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        let mut driver = Scripted(VecDeque::from(vec![key.clone(), key]));
        assert_eq!(drain(&mut driver), 2);
        assert!(driver.read().is_err());
    }
}
