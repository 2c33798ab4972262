//! Data types for working with X events
use crate::{
    core::bindings::KeyPress,
    pure::geometry::Point,
    Xid,
};

/// Wrapper around the low level X event types that the window manager
/// consumes.
///
/// Backends are responsible for decoding raw protocol events into this
/// form, including filtering crossing events the manager is not interested
/// in (grab induced enters and events for inferior windows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A mouse button was pressed
    ButtonPress(ButtonEvent),
    /// A mouse button was released (only delivered inside a drag)
    ButtonRelease(ButtonEvent),
    /// A message from another client
    ClientMessage {
        /// The window the message concerns
        id: Xid,
        /// The decoded request
        kind: ClientMessageKind,
    },
    /// A window's configuration changed (only the root is acted on)
    ConfigureNotify {
        /// The window that changed
        id: Xid,
        /// The new width
        w: u32,
        /// The new height
        h: u32,
        /// Whether this is the root window
        is_root: bool,
    },
    /// A window asked to be given a particular configuration
    ConfigureRequest(ConfigureRequest),
    /// A window was destroyed
    DestroyNotify {
        /// The window being destroyed
        id: Xid,
    },
    /// The pointer entered a window
    EnterNotify {
        /// The window that was entered
        id: Xid,
    },
    /// Part of a window was exposed and needs redrawing
    Expose {
        /// The window that was exposed
        id: Xid,
        /// The number of expose events still to follow
        count: usize,
    },
    /// A window acquired input focus
    FocusIn {
        /// The window that gained focus
        id: Xid,
    },
    /// A grabbed key combination was pressed
    KeyPress(KeyPress),
    /// The keyboard mapping changed
    MappingNotify {
        /// Whether the change affected the keyboard (vs the pointer)
        keyboard: bool,
    },
    /// A window asked to be mapped to the screen
    MapRequest {
        /// The window to be mapped
        id: Xid,
    },
    /// The pointer moved over the root window
    MotionNotify {
        /// The root relative position of the pointer
        point: Point,
        /// The server timestamp of the motion
        time: u32,
    },
    /// A property changed on some window
    PropertyNotify {
        /// The window whose property changed
        id: Xid,
        /// Which property changed
        kind: PropertyKind,
        /// Whether this is the root window
        is_root: bool,
        /// Whether the property was deleted rather than replaced
        deleted: bool,
    },
    /// A window was unmapped from the screen
    UnmapNotify {
        /// The window that was unmapped
        id: Xid,
        /// Whether this is a synthetic (client sent) event
        sent: bool,
    },
}

/// A button press or release along with pointer position and held state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// The window the press landed in
    pub id: Xid,
    /// Absolute position of the pointer
    pub rpt: Point,
    /// Position of the pointer relative to the window itself
    pub wpt: Point,
    /// The raw X button detail
    pub button: u8,
    /// The raw held modifier mask
    pub mask: u16,
    /// The server timestamp of the event
    pub time: u32,
}

/// Known client message requests. Anything else is dropped by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessageKind {
    /// A _NET_WM_STATE request naming the fullscreen atom
    FullscreenState(NetWmStateAction),
    /// A _NET_ACTIVE_WINDOW request from a pager or task switcher
    ActiveWindow,
}

/// The action field of a _NET_WM_STATE client message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetWmStateAction {
    /// _NET_WM_STATE_REMOVE
    Remove,
    /// _NET_WM_STATE_ADD
    Add,
    /// _NET_WM_STATE_TOGGLE
    Toggle,
}

impl NetWmStateAction {
    /// Decode the first data word of a _NET_WM_STATE message.
    pub fn from_data(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Remove),
            1 => Some(Self::Add),
            2 => Some(Self::Toggle),
            _ => None,
        }
    }

    /// Whether the action enables fullscreen given the current state.
    pub fn should_fullscreen(&self, currently_fullscreen: bool) -> bool {
        match self {
            Self::Add => true,
            Self::Remove => false,
            Self::Toggle => !currently_fullscreen,
        }
    }
}

/// The fields of a ConfigureRequest event. Unset fields were not named in
/// the request's value mask.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    /// The window making the request
    pub id: Xid,
    /// Requested x position
    pub x: Option<i32>,
    /// Requested y position
    pub y: Option<i32>,
    /// Requested width
    pub w: Option<u32>,
    /// Requested height
    pub h: Option<u32>,
    /// Requested border width
    pub border_width: Option<u32>,
    /// Requested stacking sibling
    pub sibling: Option<Xid>,
    /// Requested raw stacking mode
    pub stack_mode: Option<u32>,
}

/// The property named by a PropertyNotify event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// WM_TRANSIENT_FOR
    TransientFor,
    /// WM_NORMAL_HINTS
    NormalHints,
    /// WM_HINTS
    WmHints,
    /// WM_NAME or _NET_WM_NAME
    Name,
    /// _NET_WM_WINDOW_TYPE
    WindowType,
    /// A property the window manager does not track
    Other,
}
