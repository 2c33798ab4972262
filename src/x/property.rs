//! Data types for X window properties
use crate::pure::geometry::Rect;

/// A window's attributes as reported by the X server.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    /// Whether the window has opted out of window management
    pub override_redirect: bool,
    /// Whether the window is currently viewable
    pub viewable: bool,
    /// The window's current geometry
    pub rect: Rect,
    /// The window's current border width
    pub border_width: u32,
}

/// The subset of a window's WM_HINTS that the manager tracks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WmHints {
    /// Whether the urgency hint is set
    pub urgent: bool,
    /// The input hint, if the flag for it was set
    pub input: Option<bool>,
}

/// An ICCCM WM_STATE value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmState {
    /// The window is not mapped and has no icon
    Withdrawn,
    /// The window is mapped and visible
    Normal,
    /// The window is iconified
    Iconic,
}

impl From<WmState> for u32 {
    fn from(s: WmState) -> u32 {
        match s {
            WmState::Withdrawn => 0,
            WmState::Normal => 1,
            WmState::Iconic => 3,
        }
    }
}

impl WmState {
    /// Decode a WM_STATE property value.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Withdrawn),
            1 => Some(Self::Normal),
            3 => Some(Self::Iconic),
            _ => None,
        }
    }
}

/// The WM_PROTOCOLS messages the manager sends to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// WM_DELETE_WINDOW
    Delete,
    /// WM_TAKE_FOCUS
    TakeFocus,
}

/// The cursors the manager asks the backend to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardCursor {
    /// The default left pointer
    Normal,
    /// Shown while dragging a window
    Move,
    /// Shown while resizing a window
    Resize,
}
