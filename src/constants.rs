//! Shared crate-wide constants.

use std::time::Duration;

/// Z-index reported for the bottom-most open window. Each window above it
/// adds one.
pub const Z_INDEX_BASE: i32 = 100;

/// Z-index reported for a window that is not part of the stack. Sits just
/// below every stacked window.
pub const Z_INDEX_UNSTACKED: i32 = Z_INDEX_BASE - 1;

/// Height (in terminal rows) of the grab band at the top of a window that
/// has no title bar.
pub const TOP_DRAG_BAND_ROWS: u16 = 2;

/// Minimum number of cells of a dragged window that must stay inside the
/// desktop on each axis so it can be grabbed again.
pub const MIN_VISIBLE_MARGIN: u16 = 4;

/// Escape presses closer together than this are treated as one held key
/// on terminals that do not report key releases.
pub const ESCAPE_REPEAT_WINDOW: Duration = Duration::from_millis(250);

/// Rows reserved at the top of the screen for the menu bar.
pub const MENU_BAR_HEIGHT: u16 = 1;

/// Rows reserved at the bottom of the screen for the dock.
pub const DOCK_HEIGHT: u16 = 3;

/// Default redraw cadence in milliseconds.
pub const DEFAULT_FRAME_MS: u64 = 16;

/// Default request timeout for the guestbook collaborator, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default origin of the guestbook collaborator.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
