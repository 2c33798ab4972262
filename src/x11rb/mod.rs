//! An [XConn] implementation backed by x11rb.
//!
//! Requests targetting client windows are issued unchecked: errors from
//! racing against windows that have already been destroyed come back
//! through the event stream, where the known safe set (bad window / bad
//! match style errors) is swallowed the same way the classic X error
//! handler approach does. Anything outside that set is surfaced as an
//! [Error][crate::Error] and treated as a protocol usage bug.
use crate::{
    core::bindings::{keysym::XK_NUM_LOCK, ButtonSpec, KeyPress, MouseButton},
    pure::{
        client::SizeHints,
        geometry::{Point, Rect},
    },
    x::{
        atom::Atom,
        event::{
            ButtonEvent, ClientMessageKind, ConfigureRequest, NetWmStateAction, PropertyKind,
            XEvent,
        },
        property::{Protocol, StandardCursor, WindowAttributes, WmHints, WmState},
        XConn,
    },
    Color, Error, Result, Xid,
};
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
};
use strum::IntoEnumIterator;
use tracing::{trace, warn};
use x11rb::{
    connection::Connection,
    properties,
    protocol::{
        randr::ConnectionExt as _,
        xproto::{
            AtomEnum, ButtonIndex, ChangeWindowAttributesAux, ClientMessageEvent, CloseDown,
            ConfigureNotifyEvent, ConfigWindow, ConfigureWindowAux, ConnectionExt as _,
            CreateWindowAux, EventMask, GrabMode, GrabStatus, InputFocus, MapState, Mapping,
            ModMask, NotifyDetail, NotifyMode, PropMode, Property, StackMode, WindowClass,
            CONFIGURE_NOTIFY_EVENT, CONFIGURE_WINDOW_REQUEST, COPY_AREA_REQUEST,
            GRAB_BUTTON_REQUEST, GRAB_KEY_REQUEST, POLY_FILL_RECTANGLE_REQUEST,
            POLY_SEGMENT_REQUEST, POLY_TEXT8_REQUEST, SET_INPUT_FOCUS_REQUEST,
        },
        Event,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    CURRENT_TIME, NONE,
};

pub mod draw;

#[doc(inline)]
pub use draw::CoreDraw;

fn button_mask() -> EventMask {
    EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE
}

fn mouse_mask() -> EventMask {
    button_mask() | EventMask::POINTER_MOTION
}

fn client_event_mask() -> EventMask {
    EventMask::ENTER_WINDOW
        | EventMask::FOCUS_CHANGE
        | EventMask::PROPERTY_CHANGE
        | EventMask::STRUCTURE_NOTIFY
}

fn root_event_mask() -> EventMask {
    EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::BUTTON_PRESS
        | EventMask::POINTER_MOTION
        | EventMask::ENTER_WINDOW
        | EventMask::LEAVE_WINDOW
        | EventMask::STRUCTURE_NOTIFY
        | EventMask::PROPERTY_CHANGE
}

// cursor font glyph indices
const XC_LEFT_PTR: u16 = 68;
const XC_SIZING: u16 = 120;
const XC_FLEUR: u16 = 52;

#[derive(Debug, Clone)]
struct KeyboardMap {
    min_keycode: u8,
    per_keycode: u8,
    keysyms: Vec<u32>,
}

impl KeyboardMap {
    fn keysym_for(&self, keycode: u8) -> u32 {
        let ix = (keycode.saturating_sub(self.min_keycode)) as usize * self.per_keycode as usize;
        self.keysyms.get(ix).copied().unwrap_or(0)
    }

    fn keycode_for(&self, keysym: u32) -> Option<u8> {
        (0..)
            .zip(self.keysyms.chunks(self.per_keycode.max(1) as usize))
            .find(|(_, syms)| syms.first() == Some(&keysym))
            .map(|(i, _)| self.min_keycode + i as u8)
    }
}

/// A production [XConn] over a [RustConnection].
pub struct Conn {
    conn: RustConnection,
    root: u32,
    screen_size: (u32, u32),
    atoms: HashMap<Atom, u32>,
    cursors: HashMap<StandardCursor, u32>,
    keymap: RefCell<KeyboardMap>,
    pending: RefCell<VecDeque<Event>>,
}

impl Conn {
    /// Connect to the display named by $DISPLAY.
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let screen_size = (
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        );

        let cookies: Vec<_> = Atom::iter()
            .map(|a| (a, conn.intern_atom(false, a.as_ref().as_bytes())))
            .collect();
        let mut atoms = HashMap::new();
        for (a, cookie) in cookies {
            atoms.insert(a, cookie?.reply()?.atom);
        }

        let cursor_font = conn.generate_id()?;
        conn.open_font(cursor_font, b"cursor")?;
        let mut cursors = HashMap::new();
        for (cursor, glyph) in [
            (StandardCursor::Normal, XC_LEFT_PTR),
            (StandardCursor::Move, XC_FLEUR),
            (StandardCursor::Resize, XC_SIZING),
        ] {
            let id = conn.generate_id()?;
            conn.create_glyph_cursor(
                id,
                cursor_font,
                cursor_font,
                glyph,
                glyph + 1,
                0,
                0,
                0,
                0xffff,
                0xffff,
                0xffff,
            )?;
            cursors.insert(cursor, id);
        }

        let keymap = RefCell::new(fetch_keyboard_map(&conn)?);

        Ok(Self {
            conn,
            root,
            screen_size,
            atoms,
            cursors,
            keymap,
            pending: RefCell::new(VecDeque::new()),
        })
    }

    fn atom(&self, a: Atom) -> u32 {
        self.atoms[&a]
    }

    fn cursor(&self, c: StandardCursor) -> u32 {
        self.cursors[&c]
    }

    fn next_converted_event(&self, in_drag: bool) -> Result<XEvent> {
        loop {
            let raw = match self.pending.borrow_mut().pop_front() {
                Some(e) => e,
                None => self.conn.wait_for_event()?,
            };

            if let Some(event) = self.convert_event(raw, in_drag)? {
                return Ok(event);
            }
        }
    }

    fn convert_event(&self, raw: Event, in_drag: bool) -> Result<Option<XEvent>> {
        let converted = match raw {
            Event::Error(e) => {
                if ignorable_error(&e) {
                    trace!(?e, "ignoring transient X error");
                    return Ok(None);
                }
                return Err(Error::Reply(e.into()));
            }

            Event::KeyPress(e) => Some(XEvent::KeyPress(KeyPress {
                mask: u16::from(e.state),
                keysym: self.keymap.borrow().keysym_for(e.detail),
            })),

            Event::ButtonPress(e) => Some(XEvent::ButtonPress(ButtonEvent {
                id: Xid(e.event),
                rpt: Point::new(e.root_x as i32, e.root_y as i32),
                wpt: Point::new(e.event_x as i32, e.event_y as i32),
                button: e.detail,
                mask: u16::from(e.state),
                time: e.time,
            })),

            Event::ButtonRelease(e) if in_drag => Some(XEvent::ButtonRelease(ButtonEvent {
                id: Xid(e.event),
                rpt: Point::new(e.root_x as i32, e.root_y as i32),
                wpt: Point::new(e.event_x as i32, e.event_y as i32),
                button: e.detail,
                mask: u16::from(e.state),
                time: e.time,
            })),
            Event::ButtonRelease(_) => None,

            Event::MotionNotify(e) if in_drag || e.event == self.root => {
                Some(XEvent::MotionNotify {
                    point: Point::new(e.root_x as i32, e.root_y as i32),
                    time: e.time,
                })
            }
            Event::MotionNotify(_) => None,

            Event::EnterNotify(e) => {
                let wanted = (e.mode == NotifyMode::NORMAL && e.detail != NotifyDetail::INFERIOR)
                    || e.event == self.root;
                wanted.then_some(XEvent::EnterNotify { id: Xid(e.event) })
            }

            Event::Expose(e) => Some(XEvent::Expose {
                id: Xid(e.window),
                count: e.count as usize,
            }),

            Event::FocusIn(e) => Some(XEvent::FocusIn { id: Xid(e.event) }),

            Event::MappingNotify(e) => Some(XEvent::MappingNotify {
                keyboard: e.request == Mapping::KEYBOARD,
            }),

            Event::MapRequest(e) => Some(XEvent::MapRequest {
                id: Xid(e.window),
            }),

            Event::ConfigureNotify(e) => Some(XEvent::ConfigureNotify {
                id: Xid(e.window),
                w: e.width as u32,
                h: e.height as u32,
                is_root: e.window == self.root,
            }),

            Event::ConfigureRequest(e) => {
                let m = e.value_mask;
                let has = |flag: ConfigWindow| u16::from(m) & u16::from(flag) != 0;
                Some(XEvent::ConfigureRequest(ConfigureRequest {
                    id: Xid(e.window),
                    x: has(ConfigWindow::X).then_some(e.x as i32),
                    y: has(ConfigWindow::Y).then_some(e.y as i32),
                    w: has(ConfigWindow::WIDTH).then_some(e.width as u32),
                    h: has(ConfigWindow::HEIGHT).then_some(e.height as u32),
                    border_width: has(ConfigWindow::BORDER_WIDTH)
                        .then_some(e.border_width as u32),
                    sibling: has(ConfigWindow::SIBLING).then_some(Xid(e.sibling)),
                    stack_mode: has(ConfigWindow::STACK_MODE)
                        .then_some(u32::from(e.stack_mode)),
                }))
            }

            Event::DestroyNotify(e) => Some(XEvent::DestroyNotify {
                id: Xid(e.window),
            }),

            Event::UnmapNotify(e) => Some(XEvent::UnmapNotify {
                id: Xid(e.window),
                sent: e.response_type & 0x80 != 0,
            }),

            Event::PropertyNotify(e) => Some(XEvent::PropertyNotify {
                id: Xid(e.window),
                kind: self.property_kind(e.atom),
                is_root: e.window == self.root,
                deleted: e.state == Property::DELETE,
            }),

            Event::ClientMessage(e) => self.convert_client_message(e),

            _ => None,
        };

        Ok(converted)
    }

    fn property_kind(&self, atom: u32) -> PropertyKind {
        if atom == u32::from(AtomEnum::WM_TRANSIENT_FOR) {
            PropertyKind::TransientFor
        } else if atom == u32::from(AtomEnum::WM_NORMAL_HINTS) {
            PropertyKind::NormalHints
        } else if atom == u32::from(AtomEnum::WM_HINTS) {
            PropertyKind::WmHints
        } else if atom == u32::from(AtomEnum::WM_NAME) || atom == self.atom(Atom::NetWmName) {
            PropertyKind::Name
        } else if atom == self.atom(Atom::NetWmWindowType) {
            PropertyKind::WindowType
        } else {
            PropertyKind::Other
        }
    }

    fn convert_client_message(&self, e: ClientMessageEvent) -> Option<XEvent> {
        let data = e.data.as_data32();

        if e.type_ == self.atom(Atom::NetWmState) {
            let fullscreen = self.atom(Atom::NetWmStateFullscreen);
            if data[1] == fullscreen || data[2] == fullscreen {
                return NetWmStateAction::from_data(data[0]).map(|action| XEvent::ClientMessage {
                    id: Xid(e.window),
                    kind: ClientMessageKind::FullscreenState(action),
                });
            }
            return None;
        }

        if e.type_ == self.atom(Atom::NetActiveWindow) {
            return Some(XEvent::ClientMessage {
                id: Xid(e.window),
                kind: ClientMessageKind::ActiveWindow,
            });
        }

        None
    }

    fn text_prop(&self, id: u32, prop: u32) -> Result<Option<String>> {
        let reply = self
            .conn
            .get_property(false, id, prop, AtomEnum::ANY, 0, 1024)?
            .reply()?;
        if reply.value.is_empty() {
            return Ok(None);
        }

        let s = String::from_utf8_lossy(&reply.value)
            .trim_end_matches('\0')
            .to_string();
        Ok(if s.is_empty() { None } else { Some(s) })
    }
}

fn fetch_keyboard_map(conn: &RustConnection) -> Result<KeyboardMap> {
    let setup = conn.setup();
    let (min, max) = (setup.min_keycode, setup.max_keycode);
    let reply = conn
        .get_keyboard_mapping(min, max - min + 1)?
        .reply()?;

    Ok(KeyboardMap {
        min_keycode: min,
        per_keycode: reply.keysyms_per_keycode,
        keysyms: reply.keysyms,
    })
}

fn ignorable_error(e: &x11rb::x11_utils::X11Error) -> bool {
    use x11rb::protocol::ErrorKind;

    matches!(e.error_kind, ErrorKind::Window)
        || matches!(
            (e.error_kind, e.major_opcode),
            (ErrorKind::Match, SET_INPUT_FOCUS_REQUEST)
                | (ErrorKind::Match, CONFIGURE_WINDOW_REQUEST)
                | (ErrorKind::Drawable, POLY_TEXT8_REQUEST)
                | (ErrorKind::Drawable, POLY_FILL_RECTANGLE_REQUEST)
                | (ErrorKind::Drawable, POLY_SEGMENT_REQUEST)
                | (ErrorKind::Drawable, COPY_AREA_REQUEST)
                | (ErrorKind::Access, GRAB_BUTTON_REQUEST)
                | (ErrorKind::Access, GRAB_KEY_REQUEST)
        )
}

fn button_index(b: MouseButton) -> ButtonIndex {
    match b {
        MouseButton::Left => ButtonIndex::M1,
        MouseButton::Middle => ButtonIndex::M2,
        MouseButton::Right => ButtonIndex::M3,
        MouseButton::ScrollUp => ButtonIndex::M4,
        MouseButton::ScrollDown => ButtonIndex::M5,
    }
}

impl XConn for Conn {
    fn root(&self) -> Xid {
        Xid(self.root)
    }

    fn screen_size(&self) -> Result<(u32, u32)> {
        Ok(self.screen_size)
    }

    fn screen_details(&self) -> Result<Vec<Rect>> {
        let monitors = match self.conn.randr_get_monitors(self.root, true) {
            Ok(cookie) => match cookie.reply() {
                Ok(reply) => reply.monitors,
                Err(e) => {
                    warn!(%e, "unable to query RandR monitors, falling back to the root screen");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(%e, "unable to query RandR monitors, falling back to the root screen");
                Vec::new()
            }
        };

        // only consider unique geometries as separate screens
        let mut rects: Vec<Rect> = Vec::with_capacity(monitors.len());
        for m in monitors {
            let r = Rect::new(m.x as i32, m.y as i32, m.width as u32, m.height as u32);
            if !rects.contains(&r) {
                rects.push(r);
            }
        }

        if rects.is_empty() {
            rects.push(Rect::new(0, 0, self.screen_size.0, self.screen_size.1));
        }

        Ok(rects)
    }

    fn cursor_position(&self) -> Result<Point> {
        let reply = self.conn.query_pointer(self.root)?.reply()?;

        Ok(Point::new(reply.root_x as i32, reply.root_y as i32))
    }

    fn become_wm(&self) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new()
            .event_mask(EventMask::SUBSTRUCTURE_REDIRECT);
        if self
            .conn
            .change_window_attributes(self.root, &aux)?
            .check()
            .is_err()
        {
            return Err(Error::WmAlreadyRunning);
        }

        let aux = ChangeWindowAttributesAux::new()
            .event_mask(root_event_mask())
            .cursor(self.cursor(StandardCursor::Normal));
        self.conn.change_window_attributes(self.root, &aux)?.check()?;

        Ok(())
    }

    fn init_wm_properties(&self, wm_name: &str) -> Result<Xid> {
        let check_win = self.conn.generate_id()?;
        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            check_win,
            self.root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new().override_redirect(1),
        )?;

        let check_atom = self.atom(Atom::NetSupportingWmCheck);
        self.conn.change_property32(
            PropMode::REPLACE,
            check_win,
            check_atom,
            AtomEnum::WINDOW,
            &[check_win],
        )?;
        self.conn.change_property8(
            PropMode::REPLACE,
            check_win,
            self.atom(Atom::NetWmName),
            self.atom(Atom::Utf8String),
            wm_name.as_bytes(),
        )?;
        self.conn.change_property32(
            PropMode::REPLACE,
            self.root,
            check_atom,
            AtomEnum::WINDOW,
            &[check_win],
        )?;

        let supported: Vec<u32> = Atom::iter().map(|a| self.atom(a)).collect();
        self.conn.change_property32(
            PropMode::REPLACE,
            self.root,
            self.atom(Atom::NetSupported),
            AtomEnum::ATOM,
            &supported,
        )?;
        self.conn
            .delete_property(self.root, self.atom(Atom::NetClientList))?;

        Ok(Xid(check_win))
    }

    fn teardown_wm_properties(&self, check_win: Xid) -> Result<()> {
        self.conn.destroy_window(*check_win)?;

        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        self.next_converted_event(false)
    }

    fn next_drag_event(&self) -> Result<XEvent> {
        self.next_converted_event(true)
    }

    fn drain_enter_events(&self) -> Result<()> {
        while let Some(raw) = self.conn.poll_for_event()? {
            if !matches!(raw, Event::EnterNotify(_)) {
                self.pending.borrow_mut().push_back(raw);
            }
        }

        Ok(())
    }

    fn flush(&self) {
        let _ = self.conn.flush();
    }

    fn sync(&self) -> Result<()> {
        self.conn.sync()?;

        Ok(())
    }

    fn grab_keys(&self, keys: &[KeyPress]) -> Result<()> {
        let numlock = self.numlock_mask()?;
        self.conn
            .ungrab_key(0u8, self.root, ModMask::ANY)?;

        let keymap = self.keymap.borrow();
        for key in keys {
            let code = match keymap.keycode_for(key.keysym) {
                Some(code) => code,
                None => {
                    warn!(keysym = key.keysym, "no keycode for bound keysym");
                    continue;
                }
            };

            for extra in [0, u16::from(ModMask::LOCK), numlock, numlock | u16::from(ModMask::LOCK)]
            {
                self.conn.grab_key(
                    true,
                    self.root,
                    ModMask::from(key.mask | extra),
                    code,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )?;
            }
        }

        Ok(())
    }

    fn refresh_keyboard_mapping(&self) -> Result<()> {
        *self.keymap.borrow_mut() = fetch_keyboard_map(&self.conn)?;

        Ok(())
    }

    fn numlock_mask(&self) -> Result<u16> {
        let reply = self.conn.get_modifier_mapping()?.reply()?;
        let per = (reply.keycodes.len() / 8).max(1);
        let keymap = self.keymap.borrow();

        for (i, row) in reply.keycodes.chunks(per).enumerate() {
            if row.iter().any(|&code| keymap.keysym_for(code) == XK_NUM_LOCK) {
                return Ok(1 << i);
            }
        }

        Ok(0)
    }

    fn grab_buttons(&self, id: Xid, buttons: &[ButtonSpec], focused: bool) -> Result<()> {
        let numlock = self.numlock_mask()?;
        self.conn
            .ungrab_button(ButtonIndex::ANY, *id, ModMask::ANY)?;

        if !focused {
            self.conn.grab_button(
                false,
                *id,
                (u32::from(button_mask()) as u16).into(),
                GrabMode::SYNC,
                GrabMode::SYNC,
                NONE,
                NONE,
                ButtonIndex::ANY,
                ModMask::ANY,
            )?;
        }

        for b in buttons {
            for extra in [0, u16::from(ModMask::LOCK), numlock, numlock | u16::from(ModMask::LOCK)]
            {
                self.conn.grab_button(
                    false,
                    *id,
                    (u32::from(button_mask()) as u16).into(),
                    GrabMode::ASYNC,
                    GrabMode::SYNC,
                    NONE,
                    NONE,
                    button_index(b.button),
                    ModMask::from(b.mask | extra),
                )?;
            }
        }

        Ok(())
    }

    fn ungrab_buttons(&self, id: Xid) -> Result<()> {
        self.conn
            .ungrab_button(ButtonIndex::ANY, *id, ModMask::ANY)?;

        Ok(())
    }

    fn grab_pointer(&self, cursor: StandardCursor) -> Result<bool> {
        let reply = self
            .conn
            .grab_pointer(
                false,
                self.root,
                (u32::from(mouse_mask()) as u16).into(),
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                NONE,
                self.cursor(cursor),
                CURRENT_TIME,
            )?
            .reply()?;

        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(CURRENT_TIME)?;

        Ok(())
    }

    fn warp_pointer(&self, id: Xid, x: i16, y: i16) -> Result<()> {
        self.conn.warp_pointer(NONE, *id, 0, 0, 0, 0, x, y)?;

        Ok(())
    }

    fn replay_pointer(&self) -> Result<()> {
        self.conn
            .allow_events(x11rb::protocol::xproto::Allow::REPLAY_POINTER, CURRENT_TIME)?;

        Ok(())
    }

    fn existing_windows(&self) -> Result<Vec<Xid>> {
        let reply = self.conn.query_tree(self.root)?.reply()?;

        Ok(reply.children.into_iter().map(Xid).collect())
    }

    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        let attrs = self.conn.get_window_attributes(*id)?.reply()?;
        let geo = self.conn.get_geometry(*id)?.reply()?;

        Ok(WindowAttributes {
            override_redirect: attrs.override_redirect,
            viewable: attrs.map_state == MapState::VIEWABLE,
            rect: Rect::new(geo.x as i32, geo.y as i32, geo.width as u32, geo.height as u32),
            border_width: geo.border_width as u32,
        })
    }

    fn create_bar_window(&self, r: Rect) -> Result<Xid> {
        let id = self.conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .override_redirect(1)
            .background_pixmap(1) // ParentRelative
            .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE)
            .cursor(self.cursor(StandardCursor::Normal));

        self.conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            id,
            self.root,
            r.x as i16,
            r.y as i16,
            r.w as u16,
            r.h as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &aux,
        )?;
        self.conn.map_window(id)?;
        self.conn
            .configure_window(id, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;

        Ok(Xid(id))
    }

    fn destroy_window(&self, id: Xid) -> Result<()> {
        self.conn.destroy_window(*id)?;

        Ok(())
    }

    fn select_client_events(&self, id: Xid) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().event_mask(client_event_mask());
        self.conn.change_window_attributes(*id, &aux)?;

        Ok(())
    }

    fn configure_client(&self, id: Xid, r: Rect, bw: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(r.x)
            .y(r.y)
            .width(r.w)
            .height(r.h)
            .border_width(bw);
        self.conn.configure_window(*id, &aux)?;

        Ok(())
    }

    fn configure_passthrough(&self, req: &ConfigureRequest) -> Result<()> {
        let mut aux = ConfigureWindowAux::new()
            .x(req.x)
            .y(req.y)
            .width(req.w)
            .height(req.h)
            .border_width(req.border_width)
            .sibling(req.sibling.map(|s| *s));
        if let Some(mode) = req.stack_mode {
            aux = aux.stack_mode(StackMode::from(mode as u8));
        }

        self.conn.configure_window(*req.id, &aux)?;

        Ok(())
    }

    fn send_configure_notify(&self, id: Xid, r: Rect, bw: u32) -> Result<()> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: *id,
            window: *id,
            above_sibling: NONE,
            x: r.x as i16,
            y: r.y as i16,
            width: r.w as u16,
            height: r.h as u16,
            border_width: bw as u16,
            override_redirect: false,
        };
        self.conn
            .send_event(false, *id, EventMask::STRUCTURE_NOTIFY, event)?;

        Ok(())
    }

    fn set_border_width(&self, id: Xid, bw: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new().border_width(bw);
        self.conn.configure_window(*id, &aux)?;

        Ok(())
    }

    fn set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().border_pixel(color.rgb());
        self.conn.change_window_attributes(*id, &aux)?;

        Ok(())
    }

    fn move_window(&self, id: Xid, x: i32, y: i32) -> Result<()> {
        self.conn
            .configure_window(*id, &ConfigureWindowAux::new().x(x).y(y))?;

        Ok(())
    }

    fn move_resize_window(&self, id: Xid, r: Rect) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(r.x)
            .y(r.y)
            .width(r.w)
            .height(r.h);
        self.conn.configure_window(*id, &aux)?;

        Ok(())
    }

    fn raise_window(&self, id: Xid) -> Result<()> {
        self.conn
            .configure_window(*id, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;

        Ok(())
    }

    fn stack_window_below(&self, id: Xid, sibling: Xid) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .sibling(*sibling)
            .stack_mode(StackMode::BELOW);
        self.conn.configure_window(*id, &aux)?;

        Ok(())
    }

    fn map_window(&self, id: Xid) -> Result<()> {
        self.conn.map_window(*id)?;

        Ok(())
    }

    fn unmap_window(&self, id: Xid) -> Result<()> {
        self.conn.unmap_window(*id)?;

        Ok(())
    }

    fn set_input_focus(&self, id: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, *id, CURRENT_TIME)?;

        Ok(())
    }

    fn focus_root(&self) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, self.root, CURRENT_TIME)?;

        Ok(())
    }

    fn set_active_window(&self, id: Xid) -> Result<()> {
        self.conn.change_property32(
            PropMode::REPLACE,
            self.root,
            self.atom(Atom::NetActiveWindow),
            AtomEnum::WINDOW,
            &[*id],
        )?;

        Ok(())
    }

    fn clear_active_window(&self) -> Result<()> {
        self.conn
            .delete_property(self.root, self.atom(Atom::NetActiveWindow))?;

        Ok(())
    }

    fn append_to_client_list(&self, id: Xid) -> Result<()> {
        self.conn.change_property32(
            PropMode::APPEND,
            self.root,
            self.atom(Atom::NetClientList),
            AtomEnum::WINDOW,
            &[*id],
        )?;

        Ok(())
    }

    fn set_client_list(&self, ids: &[Xid]) -> Result<()> {
        let raw: Vec<u32> = ids.iter().map(|id| **id).collect();
        self.conn
            .delete_property(self.root, self.atom(Atom::NetClientList))?;
        self.conn.change_property32(
            PropMode::APPEND,
            self.root,
            self.atom(Atom::NetClientList),
            AtomEnum::WINDOW,
            &raw,
        )?;

        Ok(())
    }

    fn window_title(&self, id: Xid) -> Result<Option<String>> {
        match self.text_prop(*id, self.atom(Atom::NetWmName))? {
            Some(name) => Ok(Some(name)),
            None => self.text_prop(*id, u32::from(AtomEnum::WM_NAME)),
        }
    }

    fn class_hint(&self, id: Xid) -> Result<(Option<String>, Option<String>)> {
        let reply = self
            .conn
            .get_property(false, *id, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 1024)?
            .reply()?;

        let mut parts = reply
            .value
            .split(|&b| b == 0)
            .map(|s| String::from_utf8_lossy(s).to_string());
        let instance = parts.next().filter(|s| !s.is_empty());
        let class = parts.next().filter(|s| !s.is_empty());

        Ok((instance, class))
    }

    fn transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        let reply = self
            .conn
            .get_property(
                false,
                *id,
                AtomEnum::WM_TRANSIENT_FOR,
                AtomEnum::WINDOW,
                0,
                1,
            )?
            .reply()?;

        Ok(reply.value32().and_then(|mut it| it.next()).map(Xid))
    }

    fn size_hints(&self, id: Xid) -> Result<SizeHints> {
        let reply = properties::WmSizeHints::get_normal_hints(&self.conn, *id)
            .ok()
            .and_then(|cookie| cookie.reply().ok());

        let mut hints = SizeHints::default();
        let raw = match reply {
            Some(r) => r,
            None => return Ok(hints),
        };

        match (raw.base_size, raw.min_size) {
            (Some((w, h)), _) => {
                hints.base_w = w.max(0) as u32;
                hints.base_h = h.max(0) as u32;
            }
            (None, Some((w, h))) => {
                hints.base_w = w.max(0) as u32;
                hints.base_h = h.max(0) as u32;
            }
            (None, None) => (),
        }

        if let Some((w, h)) = raw.size_increment {
            hints.inc_w = w.max(0) as u32;
            hints.inc_h = h.max(0) as u32;
        }

        if let Some((w, h)) = raw.max_size {
            hints.max_w = w.max(0) as u32;
            hints.max_h = h.max(0) as u32;
        }

        match (raw.min_size, raw.base_size) {
            (Some((w, h)), _) => {
                hints.min_w = w.max(0) as u32;
                hints.min_h = h.max(0) as u32;
            }
            (None, Some((w, h))) => {
                hints.min_w = w.max(0) as u32;
                hints.min_h = h.max(0) as u32;
            }
            (None, None) => (),
        }

        if let Some((min, max)) = raw.aspect {
            if min.denominator > 0 && max.denominator > 0 {
                hints.min_aspect = min.numerator as f32 / min.denominator as f32;
                hints.max_aspect = max.numerator as f32 / max.denominator as f32;
            }
        }

        Ok(hints)
    }

    fn wm_hints(&self, id: Xid) -> Result<Option<WmHints>> {
        let hints = properties::WmHints::get(&self.conn, *id)
            .ok()
            .and_then(|cookie| cookie.reply().ok());

        Ok(hints.map(|h| WmHints {
            urgent: h.urgent,
            input: h.input,
        }))
    }

    fn set_urgency_hint(&self, id: Xid, urgent: bool) -> Result<()> {
        let hints = properties::WmHints::get(&self.conn, *id)
            .ok()
            .and_then(|cookie| cookie.reply().ok());

        if let Some(mut h) = hints {
            h.urgent = urgent;
            h.set(&self.conn, *id)?;
        }

        Ok(())
    }

    fn window_state_is_fullscreen(&self, id: Xid) -> Result<bool> {
        let reply = self
            .conn
            .get_property(
                false,
                *id,
                self.atom(Atom::NetWmState),
                AtomEnum::ATOM,
                0,
                32,
            )?
            .reply()?;

        let fullscreen = self.atom(Atom::NetWmStateFullscreen);
        Ok(reply
            .value32()
            .map(|mut atoms| atoms.any(|a| a == fullscreen))
            .unwrap_or(false))
    }

    fn window_type_is_dialog(&self, id: Xid) -> Result<bool> {
        let reply = self
            .conn
            .get_property(
                false,
                *id,
                self.atom(Atom::NetWmWindowType),
                AtomEnum::ATOM,
                0,
                32,
            )?
            .reply()?;

        let dialog = self.atom(Atom::NetWmWindowTypeDialog);
        Ok(reply
            .value32()
            .map(|mut atoms| atoms.any(|a| a == dialog))
            .unwrap_or(false))
    }

    fn get_wm_state(&self, id: Xid) -> Result<Option<WmState>> {
        let state = self.atom(Atom::WmState);
        let reply = self
            .conn
            .get_property(false, *id, state, state, 0, 2)?
            .reply()?;

        Ok(reply
            .value32()
            .and_then(|mut it| it.next())
            .and_then(WmState::from_raw))
    }

    fn set_wm_state(&self, id: Xid, state: WmState) -> Result<()> {
        let atom = self.atom(Atom::WmState);
        self.conn
            .change_property32(PropMode::REPLACE, *id, atom, atom, &[state.into(), NONE])?;

        Ok(())
    }

    fn set_fullscreen_prop(&self, id: Xid, enabled: bool) -> Result<()> {
        let data: &[u32] = if enabled {
            &[self.atom(Atom::NetWmStateFullscreen)]
        } else {
            &[]
        };
        self.conn.change_property32(
            PropMode::REPLACE,
            *id,
            self.atom(Atom::NetWmState),
            AtomEnum::ATOM,
            data,
        )?;

        Ok(())
    }

    fn send_protocol(&self, id: Xid, proto: Protocol) -> Result<bool> {
        let target = match proto {
            Protocol::Delete => self.atom(Atom::WmDeleteWindow),
            Protocol::TakeFocus => self.atom(Atom::WmTakeFocus),
        };

        let reply = self
            .conn
            .get_property(
                false,
                *id,
                self.atom(Atom::WmProtocols),
                AtomEnum::ATOM,
                0,
                32,
            )?
            .reply()?;
        let supported = reply
            .value32()
            .map(|mut atoms| atoms.any(|a| a == target))
            .unwrap_or(false);

        if supported {
            let event = ClientMessageEvent::new(
                32,
                *id,
                self.atom(Atom::WmProtocols),
                [target, CURRENT_TIME, 0, 0, 0],
            );
            self.conn
                .send_event(false, *id, EventMask::NO_EVENT, event)?;
        }

        Ok(supported)
    }

    fn kill_window(&self, id: Xid) -> Result<()> {
        self.conn.grab_server()?;
        self.conn.set_close_down_mode(CloseDown::DESTROY_ALL)?;
        self.conn.kill_client(*id)?;
        self.conn.sync()?;
        self.conn.ungrab_server()?;

        Ok(())
    }

    fn status_text(&self) -> Result<Option<String>> {
        self.text_prop(self.root, u32::from(AtomEnum::WM_NAME))
    }
}
