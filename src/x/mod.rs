//! Logic and traits for interacting with the X server
use crate::{
    core::bindings::{ButtonSpec, KeyPress},
    pure::{
        client::SizeHints,
        geometry::{Point, Rect},
    },
    Color, Result, Xid,
};

pub mod atom;
pub mod event;
pub mod mock;
pub mod property;

pub use atom::Atom;
pub use event::{ButtonEvent, ClientMessageKind, ConfigureRequest, PropertyKind, XEvent};
pub use property::{Protocol, StandardCursor, WindowAttributes, WmHints, WmState};

/// A handle on a running X11 connection that we can use for issuing
/// requests.
///
/// XConn is the seam between the pure state machine in [core][crate::core]
/// and the display server. The production implementation lives in
/// [x11rb][crate::x11rb]; test code drives the manager through
/// [mock::MockXConn] instead.
///
/// Implementations are expected to swallow the transient errors that arise
/// from racing against windows that have already been destroyed (bad
/// window / bad match style errors on a known safe set of requests) and to
/// surface everything else.
pub trait XConn {
    /// The ID of the window manager root window.
    fn root(&self) -> Xid;
    /// The total size of the X screen in pixels.
    fn screen_size(&self) -> Result<(u32, u32)>;
    /// The geometry of each active output, duplicates collapsed.
    fn screen_details(&self) -> Result<Vec<Rect>>;
    /// The current root relative position of the pointer.
    fn cursor_position(&self) -> Result<Point>;

    /// Take ownership of the root substructure redirect mask, then select
    /// the full root event mask and install the default cursor.
    ///
    /// Errors with [WmAlreadyRunning][crate::Error::WmAlreadyRunning] if
    /// another window manager holds the redirect mask.
    fn become_wm(&self) -> Result<()>;
    /// Advertise EWMH support on the root window and create the
    /// supporting check window, returning it.
    fn init_wm_properties(&self, wm_name: &str) -> Result<Xid>;
    /// Remove the advertised state again on shutdown.
    fn teardown_wm_properties(&self, check_win: Xid) -> Result<()>;

    /// Block and wait for the next event from the X server.
    fn next_event(&self) -> Result<XEvent>;
    /// Block and wait for the next event from the restricted set that is
    /// dispatched during an interactive drag: pointer motion and buttons,
    /// expose, configure-request and map-request. Other events are
    /// discarded while waiting.
    fn next_drag_event(&self) -> Result<XEvent>;
    /// Throw away any queued enter notify events.
    ///
    /// Restacking windows generates crossing events for whatever ends up
    /// under the pointer; acting on them would fight the focus model.
    fn drain_enter_events(&self) -> Result<()>;
    /// Flush any pending requests to the X server.
    fn flush(&self);
    /// Flush and wait for all pending requests to be processed.
    fn sync(&self) -> Result<()>;

    /// Grab the given key bindings on the root window.
    fn grab_keys(&self, keys: &[KeyPress]) -> Result<()>;
    /// Re-read the keyboard mapping after a MappingNotify.
    fn refresh_keyboard_mapping(&self) -> Result<()>;
    /// The modifier mask currently acting as numlock.
    fn numlock_mask(&self) -> Result<u16>;
    /// Grab the given buttons on a client window. For unfocused clients an
    /// any-button grab is installed as well so that clicking the window
    /// can focus it.
    fn grab_buttons(&self, id: Xid, buttons: &[ButtonSpec], focused: bool) -> Result<()>;
    /// Release all button grabs on a client window.
    fn ungrab_buttons(&self, id: Xid) -> Result<()>;
    /// Start a pointer grab, returning false if the grab was denied.
    fn grab_pointer(&self, cursor: StandardCursor) -> Result<bool>;
    /// Release the pointer grab.
    fn ungrab_pointer(&self) -> Result<()>;
    /// Move the pointer to the given position relative to a window.
    fn warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()>;
    /// Replay a synchronously grabbed button press to its client.
    fn replay_pointer(&self) -> Result<()>;

    /// The IDs of all current children of the root window.
    fn existing_windows(&self) -> Result<Vec<Xid>>;
    /// Request a window's attributes and geometry.
    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes>;
    /// Create an override redirect bar window at the given position.
    fn create_bar_window(&self, r: Rect) -> Result<Xid>;
    /// Destroy a window created by the manager.
    fn destroy_window(&self, id: Xid) -> Result<()>;
    /// Select the client event mask (enter / focus / property / structure)
    /// on a managed window.
    fn select_client_events(&self, id: Xid) -> Result<()>;

    /// Position, size and border a client window.
    fn configure_client(&self, id: Xid, r: Rect, bw: u32) -> Result<()>;
    /// Pass an unmanaged window's configure request through verbatim.
    fn configure_passthrough(&self, req: &ConfigureRequest) -> Result<()>;
    /// Send a synthetic ConfigureNotify describing a client's current
    /// geometry.
    fn send_configure_notify(&self, id: Xid, r: Rect, bw: u32) -> Result<()>;
    /// Set only a window's border width.
    fn set_border_width(&self, id: Xid, bw: u32) -> Result<()>;
    /// Set a window's border color.
    fn set_border_color(&self, id: Xid, color: Color) -> Result<()>;
    /// Move a window without resizing it.
    fn move_window(&self, id: Xid, x: i32, y: i32) -> Result<()>;
    /// Move and resize a window (no border change).
    fn move_resize_window(&self, id: Xid, r: Rect) -> Result<()>;
    /// Raise a window to the top of the stacking order.
    fn raise_window(&self, id: Xid) -> Result<()>;
    /// Stack a window directly below a sibling.
    fn stack_window_below(&self, id: Xid, sibling: Xid) -> Result<()>;
    /// Map a window to the screen.
    fn map_window(&self, id: Xid) -> Result<()>;
    /// Unmap a window from the screen.
    fn unmap_window(&self, id: Xid) -> Result<()>;

    /// Give input focus to a window.
    fn set_input_focus(&self, id: Xid) -> Result<()>;
    /// Revert input focus to the root / pointer root.
    fn focus_root(&self) -> Result<()>;
    /// Advertise the active window on the root.
    fn set_active_window(&self, id: Xid) -> Result<()>;
    /// Clear the active window advertisement.
    fn clear_active_window(&self) -> Result<()>;
    /// Append a window to the advertised client list.
    fn append_to_client_list(&self, id: Xid) -> Result<()>;
    /// Replace the advertised client list.
    fn set_client_list(&self, ids: &[Xid]) -> Result<()>;

    /// A window's title following ICCCM / EWMH naming.
    fn window_title(&self, id: Xid) -> Result<Option<String>>;
    /// A window's WM_CLASS (instance, class) pair.
    fn class_hint(&self, id: Xid) -> Result<(Option<String>, Option<String>)>;
    /// The window this window is transient for, if any.
    fn transient_for(&self, id: Xid) -> Result<Option<Xid>>;
    /// Size constraints from WM_NORMAL_HINTS.
    fn size_hints(&self, id: Xid) -> Result<SizeHints>;
    /// The tracked subset of WM_HINTS, if the property is set.
    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>>;
    /// Set or clear the urgency flag within a window's WM_HINTS.
    fn set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()>;
    /// Whether _NET_WM_STATE names the fullscreen atom.
    fn window_state_is_fullscreen(&self, id: Xid) -> Result<bool>;
    /// Whether _NET_WM_WINDOW_TYPE names the dialog atom.
    fn window_type_is_dialog(&self, id: Xid) -> Result<bool>;
    /// A window's ICCCM WM_STATE, if set.
    fn get_wm_state(&self, id: Xid) -> Result<Option<WmState>>;
    /// Set a window's ICCCM WM_STATE.
    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()>;
    /// Set or clear _NET_WM_STATE_FULLSCREEN on a window.
    fn set_fullscreen_prop(&self, id: Xid, enabled: bool) -> Result<()>;
    /// Send the given WM_PROTOCOLS message if the window advertises
    /// support for it, returning whether it does.
    fn send_protocol(&self, id: Xid, proto: Protocol) -> Result<bool>;
    /// Forcibly disconnect a window's client.
    fn kill_window(&self, id: Xid) -> Result<()>;
    /// The root window WM_NAME, used as the bar status text.
    fn status_text(&self) -> Result<Option<String>>;
}
