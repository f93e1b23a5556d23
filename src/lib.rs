pub mod apps;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod event_loop;
pub mod guestbook;
pub mod keyboard;
pub mod launcher;
pub mod runner;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
