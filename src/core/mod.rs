//! Core window manager state and the event driven state machine.
//!
//! All mutation of client / monitor state happens synchronously inside the
//! handler for a single X event: the handler runs to completion (including
//! any layout, focus and redraw side effects) before the next event is
//! fetched. The one exception is the interactive drag sub-state in [drag]
//! which dispatches a restricted subset of events while the pointer is
//! grabbed.
pub mod actions;
pub mod bindings;
pub mod config;
mod drag;

use crate::{
    bar::{self, BarRegion},
    core::{
        bindings::{
            clean_mask, ButtonSpec, ClickTarget, KeyBindings, KeyPress, MouseBinding, MouseButton,
            MouseBindings,
        },
        config::Config,
    },
    draw::Draw,
    layout::{layout_positions, LayoutKind},
    pure::{
        client::{Client, ClientFlags, ClientMap, BROKEN},
        geometry::{Point, Rect},
        monitor::Monitor,
        rules::apply_rules,
    },
    x::{
        event::{ButtonEvent, ClientMessageKind, ConfigureRequest, PropertyKind, XEvent},
        property::{Protocol, WindowAttributes, WmState},
        XConn,
    },
    Result, Xid,
};
use nix::sys::signal::{signal, SigHandler, Signal};
use tracing::{debug, trace, warn};

/// Mutable internal state for the window manager.
#[derive(Debug)]
pub struct State {
    /// The user supplied configuration
    pub config: Config,
    /// All managed clients, keyed by window
    pub clients: ClientMap,
    /// One monitor per active output
    pub monitors: Vec<Monitor>,
    /// Index of the selected monitor
    pub sel_mon: usize,
    /// Cooperative shutdown flag checked once per event
    pub running: bool,
    /// Total X screen size in pixels
    pub screen: (u32, u32),
    /// Height of the bar in pixels
    pub bar_height: u32,
    /// Status text shown on the selected monitor's bar
    pub status_text: String,
    /// The modifier mask currently acting as numlock
    pub numlock_mask: u16,
    /// The EWMH supporting check window
    pub check_win: Xid,
    client_buttons: Vec<ButtonSpec>,
    motion_mon: Option<usize>,
}

impl State {
    /// The currently selected monitor.
    pub fn selmon(&self) -> &Monitor {
        &self.monitors[self.sel_mon]
    }

    /// The currently selected monitor, mutably.
    pub fn selmon_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.sel_mon]
    }

    /// Look up a managed client.
    pub fn client(&self, id: Xid) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Whether a client is visible under its own monitor's active tags.
    pub fn is_visible(&self, id: Xid) -> bool {
        self.clients
            .get(&id)
            .map(|c| c.is_visible_on(&self.monitors[c.mon]))
            .unwrap_or(false)
    }

    /// The monitor whose usable rect has the greatest overlap with `r`,
    /// defaulting to the selected monitor.
    pub fn rect_to_mon(&self, r: Rect) -> usize {
        let mut best = self.sel_mon;
        let mut area = 0;

        for (i, m) in self.monitors.iter().enumerate() {
            let a = r.intersection_area(&m.w_rect);
            if a > area {
                area = a;
                best = i;
            }
        }

        best
    }

    /// The neighbouring monitor in the given direction, cyclically.
    pub fn dir_to_mon(&self, dir: i32) -> usize {
        let n = self.monitors.len();
        if dir > 0 {
            (self.sel_mon + 1) % n
        } else {
            (self.sel_mon + n - 1) % n
        }
    }

    fn all_client_ids(&self) -> Vec<Xid> {
        self.monitors
            .iter()
            .flat_map(|m| m.clients.iter().copied())
            .collect()
    }
}

/// A connected window manager arbitrating geometry, visibility, stacking
/// and focus for the clients of a single X display.
pub struct WindowManager<X: XConn> {
    /// The manager's mutable state
    pub state: State,
    pub(crate) x: X,
    pub(crate) draw: Box<dyn Draw>,
}

impl<X: XConn> WindowManager<X> {
    /// Construct a new WindowManager over a validated [Config].
    ///
    /// No X state is touched until [init][WindowManager::init] is called.
    pub fn new(config: Config, x: X, draw: Box<dyn Draw>) -> Result<Self> {
        config.validate()?;
        let bar_height = draw.font_height() + 2;

        Ok(Self {
            state: State {
                config,
                clients: ClientMap::new(),
                monitors: Vec::new(),
                sel_mon: 0,
                running: true,
                screen: (0, 0),
                bar_height,
                status_text: String::new(),
                numlock_mask: 0,
                check_win: Xid(0),
                client_buttons: Vec::new(),
                motion_mon: None,
            },
            x,
            draw,
        })
    }

    /// A reference to the underlying X connection.
    pub fn conn(&self) -> &X {
        &self.x
    }

    /// Take ownership of the display and build the initial monitor, bar
    /// and EWMH state.
    ///
    /// Fails with [WmAlreadyRunning][crate::Error::WmAlreadyRunning] if
    /// another window manager holds the substructure redirect mask.
    pub fn init(&mut self) -> Result<()> {
        self.x.become_wm()?;
        self.state.screen = self.x.screen_size()?;
        self.state.numlock_mask = self.x.numlock_mask()?;
        self.update_monitor_geometry()?;
        self.update_bars()?;
        self.update_status()?;
        self.state.check_win = self.x.init_wm_properties(env!("CARGO_PKG_NAME"))?;
        self.focus(None)?;

        Ok(())
    }

    /// Grab bindings, adopt any pre-existing windows and run the event
    /// loop until [quit][WindowManager::quit] is invoked.
    pub fn run(
        &mut self,
        mut keys: KeyBindings<X>,
        mut mouse: MouseBindings<X>,
    ) -> Result<()> {
        // spawned children are never waited on
        if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            return Err(std::io::Error::from_raw_os_error(e as i32).into());
        }

        self.state.client_buttons = mouse
            .keys()
            .filter(|b| b.target == ClickTarget::ClientWin)
            .map(|b| ButtonSpec {
                button: b.button,
                mask: b.mask,
            })
            .collect();

        let grabbed: Vec<KeyPress> = keys.keys().copied().collect();
        self.x.grab_keys(&grabbed)?;
        self.scan()?;
        self.x.sync()?;

        while self.state.running {
            let event = self.x.next_event()?;
            trace!(?event, "got event from X server");
            self.handle_event(event, &mut keys, &mut mouse)?;
            self.x.flush();
        }

        Ok(())
    }

    /// Release every managed window and tear down the state advertised on
    /// the root window.
    pub fn cleanup(&mut self) -> Result<()> {
        debug!("cleaning up before exit");
        self.view(u32::MAX)?;
        for i in 0..self.state.monitors.len() {
            self.state.monitors[i].set_layout(Some(LayoutKind::Float));
        }

        while let Some(id) = self
            .state
            .monitors
            .iter()
            .flat_map(|m| m.stack.first().copied())
            .next()
        {
            self.unmanage(id, false)?;
        }

        self.x.grab_keys(&[])?;
        for i in 0..self.state.monitors.len() {
            let bar_win = self.state.monitors[i].bar_win;
            if bar_win != Xid(0) {
                self.x.unmap_window(bar_win)?;
                self.x.destroy_window(bar_win)?;
            }
        }

        self.x.teardown_wm_properties(self.state.check_win)?;
        self.x.sync()?;
        self.x.focus_root()?;
        self.x.clear_active_window()
    }

    /*
     * Event dispatch
     */

    pub(crate) fn handle_event(
        &mut self,
        event: XEvent,
        keys: &mut KeyBindings<X>,
        mouse: &mut MouseBindings<X>,
    ) -> Result<()> {
        match event {
            XEvent::ButtonPress(e) => self.button_press(e, mouse),
            XEvent::ButtonRelease(_) => Ok(()),
            XEvent::ClientMessage { id, kind } => self.client_message(id, kind),
            XEvent::ConfigureNotify { w, h, is_root, .. } => self.configure_notify(w, h, is_root),
            XEvent::ConfigureRequest(req) => self.configure_request(req),
            XEvent::DestroyNotify { id } => self.destroy_notify(id),
            XEvent::EnterNotify { id } => self.enter_notify(id),
            XEvent::Expose { id, count } => self.expose(id, count),
            XEvent::FocusIn { id } => self.focus_in(id),
            XEvent::KeyPress(k) => self.key_press(k, keys),
            XEvent::MappingNotify { keyboard } => self.mapping_notify(keyboard, keys),
            XEvent::MapRequest { id } => self.map_request(id),
            XEvent::MotionNotify { point, .. } => self.motion_notify(point),
            XEvent::PropertyNotify {
                id,
                kind,
                is_root,
                deleted,
            } => self.property_notify(id, kind, is_root, deleted),
            XEvent::UnmapNotify { id, sent } => self.unmap_notify(id, sent),
        }
    }

    // The restricted dispatch table used while an interactive drag holds
    // the pointer: only these events keep the rest of the system
    // responsive, everything else belongs to the drag itself.
    pub(crate) fn handle_drag_forwarded(&mut self, event: XEvent) -> Result<()> {
        match event {
            XEvent::ConfigureRequest(req) => self.configure_request(req),
            XEvent::Expose { id, count } => self.expose(id, count),
            XEvent::MapRequest { id } => self.map_request(id),
            _ => Ok(()),
        }
    }

    fn button_press(&mut self, e: ButtonEvent, mouse: &mut MouseBindings<X>) -> Result<()> {
        let mut target = ClickTarget::RootWin;
        let mut click_arg = None;

        let m = self.win_to_mon(e.id);
        if m != self.state.sel_mon {
            if let Some(prev) = self.state.selmon().sel {
                self.unfocus(prev, true)?;
            }
            self.state.sel_mon = m;
            self.focus(None)?;
        }

        if e.id == self.state.selmon().bar_win {
            let region = bar::region_at(
                self.draw.as_mut(),
                self.state.selmon(),
                &self.state.config,
                &self.state.status_text,
                e.wpt.x,
            )?;
            target = match region {
                BarRegion::Tag(i) => {
                    click_arg = Some(1 << i);
                    ClickTarget::TagBar
                }
                BarRegion::LayoutSymbol => ClickTarget::LayoutSymbol,
                BarRegion::Status => ClickTarget::StatusText,
                BarRegion::Title => ClickTarget::WinTitle,
            };
        } else if self.state.client(e.id).is_some() {
            self.focus(Some(e.id))?;
            self.restack(self.state.sel_mon)?;
            self.x.replay_pointer()?;
            target = ClickTarget::ClientWin;
        }

        let button = match MouseButton::from_detail(e.button) {
            Some(b) => b,
            None => {
                warn!(button = e.button, "dropping unknown mouse button event");
                return Ok(());
            }
        };

        let binding = MouseBinding {
            target,
            button,
            mask: clean_mask(e.mask, self.state.numlock_mask),
        };
        if let Some(action) = mouse.get_mut(&binding) {
            action(self, click_arg)?;
        }

        Ok(())
    }

    fn client_message(&mut self, id: Xid, kind: ClientMessageKind) -> Result<()> {
        let c = match self.state.client(id) {
            Some(c) => c,
            None => return Ok(()),
        };

        match kind {
            ClientMessageKind::FullscreenState(action) => {
                let fullscreen = action.should_fullscreen(c.is_fullscreen());
                self.set_fullscreen(id, fullscreen)
            }
            ClientMessageKind::ActiveWindow => {
                if self.state.selmon().sel != Some(id) && !c.is_urgent() {
                    self.set_urgent(id, true)?;
                }
                Ok(())
            }
        }
    }

    fn configure_notify(&mut self, w: u32, h: u32, is_root: bool) -> Result<()> {
        if !is_root {
            return Ok(());
        }

        let size_changed = self.state.screen != (w, h);
        self.state.screen = (w, h);
        let dirty = self.update_monitor_geometry()?;

        if dirty || size_changed {
            let bar_h = self.state.bar_height;
            self.draw.resize(w, bar_h)?;
            self.update_bars()?;

            for i in 0..self.state.monitors.len() {
                let s_rect = self.state.monitors[i].s_rect;
                let fullscreen: Vec<Xid> = self.state.monitors[i]
                    .clients
                    .iter()
                    .copied()
                    .filter(|id| {
                        self.state
                            .client(*id)
                            .map(|c| c.is_fullscreen())
                            .unwrap_or(false)
                    })
                    .collect();
                for id in fullscreen {
                    self.resize_client(id, s_rect)?;
                }

                let m = &self.state.monitors[i];
                self.x.move_resize_window(
                    m.bar_win,
                    Rect::new(m.w_rect.x, m.bar_y, m.w_rect.w, bar_h),
                )?;
            }

            self.focus(None)?;
            self.arrange(None)?;
        }

        Ok(())
    }

    fn configure_request(&mut self, req: ConfigureRequest) -> Result<()> {
        if self.state.client(req.id).is_some() {
            self.client_configure_request(req)?;
        } else {
            self.x.configure_passthrough(&req)?;
        }

        self.x.sync()
    }

    fn client_configure_request(&mut self, req: ConfigureRequest) -> Result<()> {
        enum Outcome {
            BorderOnly,
            Applied {
                rect: Rect,
                bw: u32,
                visible: bool,
                notify: bool,
            },
            Ack {
                rect: Rect,
                bw: u32,
            },
        }

        let id = req.id;
        let outcome = {
            let State {
                clients,
                monitors,
                sel_mon,
                ..
            } = &mut self.state;
            let c = match clients.get_mut(&id) {
                Some(c) => c,
                None => return Ok(()),
            };
            let m = &monitors[c.mon];

            if let Some(bw) = req.border_width {
                c.bw = bw;
                Outcome::BorderOnly
            } else if c.is_floating() || !monitors[*sel_mon].layout().arranges() {
                if let Some(x) = req.x {
                    c.old_rect.x = c.rect.x;
                    c.rect.x = m.s_rect.x + x;
                }
                if let Some(y) = req.y {
                    c.old_rect.y = c.rect.y;
                    c.rect.y = m.s_rect.y + y;
                }
                if let Some(w) = req.w {
                    c.old_rect.w = c.rect.w;
                    c.rect.w = w;
                }
                if let Some(h) = req.h {
                    c.old_rect.h = c.rect.h;
                    c.rect.h = h;
                }

                if c.rect.x + c.rect.w as i32 > m.s_rect.right() && c.is_floating() {
                    // center horizontally
                    c.rect.x = m.s_rect.x + (m.s_rect.w as i32 / 2 - c.outer_w() as i32 / 2);
                }
                if c.rect.y + c.rect.h as i32 > m.s_rect.bottom() && c.is_floating() {
                    // center vertically
                    c.rect.y = m.s_rect.y + (m.s_rect.h as i32 / 2 - c.outer_h() as i32 / 2);
                }

                let notify = (req.x.is_some() || req.y.is_some())
                    && req.w.is_none()
                    && req.h.is_none();

                Outcome::Applied {
                    rect: c.rect,
                    bw: c.bw,
                    visible: c.is_visible_on(m),
                    notify,
                }
            } else {
                Outcome::Ack {
                    rect: c.rect,
                    bw: c.bw,
                }
            }
        };

        match outcome {
            Outcome::BorderOnly => Ok(()),
            Outcome::Ack { rect, bw } => self.x.send_configure_notify(id, rect, bw),
            Outcome::Applied {
                rect,
                bw,
                visible,
                notify,
            } => {
                if notify {
                    self.x.send_configure_notify(id, rect, bw)?;
                }
                if visible {
                    self.x.move_resize_window(id, rect)?;
                }
                Ok(())
            }
        }
    }

    fn destroy_notify(&mut self, id: Xid) -> Result<()> {
        if self.state.client(id).is_some() {
            self.unmanage(id, true)?;
        }

        Ok(())
    }

    fn enter_notify(&mut self, id: Xid) -> Result<()> {
        let c = self.state.client(id).map(|c| c.id);
        let m = match self.state.client(id) {
            Some(c) => c.mon,
            None => self.win_to_mon(id),
        };

        if m != self.state.sel_mon {
            if let Some(prev) = self.state.selmon().sel {
                self.unfocus(prev, true)?;
            }
            self.state.sel_mon = m;
        } else if c.is_none() || c == self.state.selmon().sel {
            return Ok(());
        }

        self.focus(c)
    }

    fn expose(&mut self, id: Xid, count: usize) -> Result<()> {
        if count == 0 {
            let m = self.win_to_mon(id);
            self.draw_bar(m)?;
        }

        Ok(())
    }

    // There are some broken focus acquiring clients that need extra
    // handling: reassert focus on the selected client if anything else
    // acquires it.
    fn focus_in(&mut self, id: Xid) -> Result<()> {
        match self.state.selmon().sel {
            Some(sel) if sel != id => self.give_input_focus(sel),
            _ => Ok(()),
        }
    }

    fn key_press(&mut self, k: KeyPress, keys: &mut KeyBindings<X>) -> Result<()> {
        let cleaned = KeyPress {
            mask: clean_mask(k.mask, self.state.numlock_mask),
            keysym: k.keysym,
        };

        if let Some(action) = keys.get_mut(&cleaned) {
            trace!(keysym = cleaned.keysym, mask = cleaned.mask, "running keybinding");
            action(self)?;
        }

        Ok(())
    }

    fn mapping_notify(&mut self, keyboard: bool, keys: &mut KeyBindings<X>) -> Result<()> {
        self.x.refresh_keyboard_mapping()?;
        if keyboard {
            self.state.numlock_mask = self.x.numlock_mask()?;
            let grabbed: Vec<KeyPress> = keys.keys().copied().collect();
            self.x.grab_keys(&grabbed)?;
        }

        Ok(())
    }

    fn map_request(&mut self, id: Xid) -> Result<()> {
        let wa = match self.x.window_attributes(id) {
            Ok(wa) => wa,
            Err(_) => return Ok(()),
        };

        if wa.override_redirect || self.state.client(id).is_some() {
            return Ok(());
        }

        self.manage(id, wa)
    }

    fn motion_notify(&mut self, p: Point) -> Result<()> {
        let m = self.state.rect_to_mon(Rect::new(p.x, p.y, 1, 1));

        if let Some(prev) = self.state.motion_mon {
            if m != prev {
                if let Some(sel) = self.state.selmon().sel {
                    self.unfocus(sel, true)?;
                }
                self.state.sel_mon = m;
                self.focus(None)?;
            }
        }
        self.state.motion_mon = Some(m);

        Ok(())
    }

    fn property_notify(
        &mut self,
        id: Xid,
        kind: PropertyKind,
        is_root: bool,
        deleted: bool,
    ) -> Result<()> {
        if is_root && kind == PropertyKind::Name {
            return self.update_status();
        }
        if deleted || self.state.client(id).is_none() {
            return Ok(());
        }

        match kind {
            PropertyKind::TransientFor => {
                let c = &self.state.clients[&id];
                if !c.is_floating() {
                    let trans = self.x.transient_for(id).ok().flatten();
                    if trans.map(|t| self.state.client(t).is_some()).unwrap_or(false) {
                        let mon = self.state.clients[&id].mon;
                        if let Some(c) = self.state.clients.get_mut(&id) {
                            c.flags.insert(ClientFlags::FLOATING);
                        }
                        self.arrange(Some(mon))?;
                    }
                }
            }
            PropertyKind::NormalHints => self.update_size_hints(id)?,
            PropertyKind::WmHints => {
                self.update_wm_hints(id)?;
                self.draw_bars()?;
            }
            PropertyKind::Name => {
                self.update_title(id)?;
                let mon = self.state.clients[&id].mon;
                if self.state.monitors[mon].sel == Some(id) {
                    self.draw_bar(mon)?;
                }
            }
            PropertyKind::WindowType => self.update_window_type(id)?,
            PropertyKind::Other => (),
        }

        Ok(())
    }

    fn unmap_notify(&mut self, id: Xid, sent: bool) -> Result<()> {
        if self.state.client(id).is_none() {
            return Ok(());
        }

        if sent {
            self.x.set_wm_state(id, WmState::Withdrawn)
        } else {
            self.unmanage(id, false)
        }
    }

    /*
     * Client lifecycle
     */

    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn manage(&mut self, id: Xid, wa: WindowAttributes) -> Result<()> {
        debug!(%id, "managing new client");
        let name = self.x.window_title(id).ok().flatten();
        let trans = self
            .x
            .transient_for(id)
            .ok()
            .flatten()
            .filter(|t| self.state.client(*t).is_some());

        let mut c = Client::new(id, wa.rect, wa.border_width, self.state.config.border_px);
        c.set_name(name);

        let (mon, tags, floating) = match trans {
            Some(t) => {
                let tc = &self.state.clients[&t];
                (tc.mon, tc.tags, false)
            }
            None => {
                let (instance, class) = self.x.class_hint(id).unwrap_or((None, None));
                let class = class.unwrap_or_else(|| BROKEN.to_owned());
                let instance = instance.unwrap_or_else(|| BROKEN.to_owned());
                let p = apply_rules(
                    &self.state.config.rules,
                    &class,
                    &instance,
                    &c.name,
                    &self.state.monitors,
                    self.state.sel_mon,
                    self.state.config.tag_mask(),
                );
                (p.mon, p.tags, p.floating)
            }
        };
        c.mon = mon;
        c.tags = tags;
        c.flags.set(ClientFlags::FLOATING, floating);

        // keep the new window's outer bounds within its monitor, reserving
        // bar height when a top bar would cover the window's center
        {
            let m = &self.state.monitors[mon];
            let (ow, oh) = (c.outer_w() as i32, c.outer_h() as i32);
            if c.rect.x + ow > m.s_rect.right() {
                c.rect.x = m.s_rect.right() - ow;
            }
            if c.rect.y + oh > m.s_rect.bottom() {
                c.rect.y = m.s_rect.bottom() - oh;
            }
            c.rect.x = c.rect.x.max(m.s_rect.x);
            let center_x = c.rect.x + c.rect.w as i32 / 2;
            let under_top_bar =
                m.bar_y == m.s_rect.y && center_x >= m.w_rect.x && center_x < m.w_rect.right();
            c.rect.y = c.rect.y.max(if under_top_bar {
                self.state.bar_height as i32
            } else {
                m.s_rect.y
            });
        }

        self.state.clients.insert(id, c);

        self.x.set_border_width(id, self.state.config.border_px)?;
        self.x.set_border_color(id, self.state.config.normal.border)?;
        {
            let c = &self.state.clients[&id];
            self.x.send_configure_notify(id, c.rect, c.bw)?;
        }
        self.update_window_type(id)?;
        self.update_size_hints(id)?;
        self.update_wm_hints(id)?;
        self.x.select_client_events(id)?;
        self.x.grab_buttons(id, &self.state.client_buttons, false)?;

        let raise = {
            let c = match self.state.clients.get_mut(&id) {
                Some(c) => c,
                None => return Ok(()),
            };
            if !c.is_floating() {
                let f = trans.is_some() || c.flags.contains(ClientFlags::FIXED);
                c.flags.set(ClientFlags::FLOATING, f);
                c.flags.set(ClientFlags::WAS_FLOATING, f);
            }
            c.is_floating()
        };
        if raise {
            self.x.raise_window(id)?;
        }

        self.x.append_to_client_list(id)?;
        {
            // park the window off screen until the first arrange
            let c = &self.state.clients[&id];
            let parked = Rect::new(
                c.rect.x + 2 * self.state.screen.0 as i32,
                c.rect.y,
                c.rect.w,
                c.rect.h,
            );
            self.x.move_resize_window(id, parked)?;
        }
        self.x.set_wm_state(id, WmState::Normal)?;

        if mon == self.state.sel_mon {
            if let Some(prev) = self.state.selmon().sel {
                self.unfocus(prev, false)?;
            }
        }

        self.state.monitors[mon].attach(id);
        self.state.monitors[mon].attach_stack(id);
        self.state.monitors[mon].sel = Some(id);
        self.arrange(Some(mon))?;
        self.x.map_window(id)?;
        self.focus(None)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn unmanage(&mut self, id: Xid, destroyed: bool) -> Result<()> {
        debug!(%id, destroyed, "unmanaging client");
        let (mon, old_bw) = match self.state.client(id) {
            Some(c) => (c.mon, c.old_bw),
            None => return Ok(()),
        };

        {
            let State {
                monitors, clients, ..
            } = &mut self.state;
            monitors[mon].detach(id);
            clients.remove(&id);
            monitors[mon].detach_stack(id, clients);
        }

        if !destroyed {
            self.x.set_border_width(id, old_bw)?;
            self.x.ungrab_buttons(id)?;
            self.x.set_wm_state(id, WmState::Withdrawn)?;
            self.x.sync()?;
        }

        self.focus(None)?;
        self.x.set_client_list(&self.state.all_client_ids())?;
        self.arrange(Some(mon))
    }

    fn scan(&mut self) -> Result<()> {
        let windows = self.x.existing_windows()?;
        let mut transients = Vec::new();

        for id in windows {
            let wa = match self.x.window_attributes(id) {
                Ok(wa) => wa,
                Err(_) => continue,
            };
            if wa.override_redirect {
                continue;
            }
            if self.x.transient_for(id).ok().flatten().is_some() {
                transients.push((id, wa));
                continue;
            }
            if wa.viewable || self.x.get_wm_state(id)? == Some(WmState::Iconic) {
                self.manage(id, wa)?;
            }
        }

        for (id, wa) in transients {
            if wa.viewable || self.x.get_wm_state(id)? == Some(WmState::Iconic) {
                self.manage(id, wa)?;
            }
        }

        Ok(())
    }

    /*
     * Focus discipline
     */

    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn focus(&mut self, c: Option<Xid>) -> Result<()> {
        let mut target = c.filter(|&id| self.state.is_visible(id));
        if target.is_none() {
            target = self
                .state
                .selmon()
                .first_visible_in_stack(&self.state.clients);
        }

        let prev = self.state.selmon().sel;
        if let Some(p) = prev {
            if Some(p) != target {
                self.unfocus(p, false)?;
            }
        }

        if let Some(id) = target {
            let mon = self.state.clients[&id].mon;
            if mon != self.state.sel_mon {
                self.state.sel_mon = mon;
            }
            if self.state.clients[&id].is_urgent() {
                self.set_urgent(id, false)?;
            }

            // MRU promotion
            {
                let State {
                    monitors, clients, ..
                } = &mut self.state;
                monitors[mon].detach_stack(id, clients);
                monitors[mon].attach_stack(id);
            }

            self.x.grab_buttons(id, &self.state.client_buttons, true)?;
            self.x
                .set_border_color(id, self.state.config.selected.border)?;
            self.give_input_focus(id)?;
        } else {
            self.x.focus_root()?;
            self.x.clear_active_window()?;
        }

        self.state.selmon_mut().sel = target;
        self.draw_bars()
    }

    fn give_input_focus(&mut self, id: Xid) -> Result<()> {
        let never_focus = match self.state.client(id) {
            Some(c) => c.never_focus(),
            None => return Ok(()),
        };

        if !never_focus {
            self.x.set_input_focus(id)?;
            self.x.set_active_window(id)?;
        }
        self.x.send_protocol(id, Protocol::TakeFocus)?;

        Ok(())
    }

    pub(crate) fn unfocus(&mut self, id: Xid, set_focus_root: bool) -> Result<()> {
        if self.state.client(id).is_none() {
            return Ok(());
        }

        self.x
            .grab_buttons(id, &self.state.client_buttons, false)?;
        self.x.set_border_color(id, self.state.config.normal.border)?;
        if set_focus_root {
            self.x.focus_root()?;
            self.x.clear_active_window()?;
        }

        Ok(())
    }

    fn set_urgent(&mut self, id: Xid, urgent: bool) -> Result<()> {
        if let Some(c) = self.state.clients.get_mut(&id) {
            c.flags.set(ClientFlags::URGENT, urgent);
        }
        self.x.set_urgency_hint(id, urgent)
    }

    /*
     * Geometry
     */

    /// Request a constrained resize for a client, suppressing the X call
    /// when the final geometry matches the current one.
    pub(crate) fn resize(&mut self, id: Xid, req: Rect, interact: bool) -> Result<()> {
        let r = {
            let c = match self.state.client(id) {
                Some(c) => c,
                None => return Ok(()),
            };
            let m = &self.state.monitors[c.mon];
            let apply_hints =
                self.state.config.resize_hints || c.is_floating() || !m.layout().arranges();
            c.resolve_resize(
                req,
                m,
                self.state.screen.0,
                self.state.screen.1,
                self.state.bar_height,
                interact,
                apply_hints,
            )
        };

        if Some(r) != self.state.client(id).map(|c| c.rect) {
            self.resize_client(id, r)?;
        }

        Ok(())
    }

    /// Apply a resolved geometry to a client and the X server.
    pub(crate) fn resize_client(&mut self, id: Xid, r: Rect) -> Result<()> {
        let bw = {
            let c = match self.state.clients.get_mut(&id) {
                Some(c) => c,
                None => return Ok(()),
            };
            c.old_rect = c.rect;
            c.rect = r;
            c.bw
        };

        self.x.configure_client(id, r, bw)?;
        self.x.send_configure_notify(id, r, bw)?;
        self.x.sync()
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn set_fullscreen(&mut self, id: Xid, fullscreen: bool) -> Result<()> {
        let currently = match self.state.client(id) {
            Some(c) => c.is_fullscreen(),
            None => return Ok(()),
        };

        if fullscreen && !currently {
            self.x.set_fullscreen_prop(id, true)?;
            let mon = {
                let c = match self.state.clients.get_mut(&id) {
                    Some(c) => c,
                    None => return Ok(()),
                };
                let was_floating = c.is_floating();
                c.flags.set(ClientFlags::WAS_FLOATING, was_floating);
                c.flags
                    .insert(ClientFlags::FULLSCREEN | ClientFlags::FLOATING);
                c.old_bw = c.bw;
                c.bw = 0;
                c.mon
            };
            let r = self.state.monitors[mon].s_rect;
            self.resize_client(id, r)?;
            self.x.raise_window(id)
        } else if !fullscreen && currently {
            self.x.set_fullscreen_prop(id, false)?;
            let (mon, restored) = {
                let c = match self.state.clients.get_mut(&id) {
                    Some(c) => c,
                    None => return Ok(()),
                };
                let was_floating = c.flags.contains(ClientFlags::WAS_FLOATING);
                c.flags.remove(ClientFlags::FULLSCREEN);
                c.flags.set(ClientFlags::FLOATING, was_floating);
                c.bw = c.old_bw;
                (c.mon, c.old_rect)
            };
            self.resize_client(id, restored)?;
            self.arrange(Some(mon))
        } else {
            Ok(())
        }
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn send_to_monitor(&mut self, id: Xid, target: usize) -> Result<()> {
        let mon = match self.state.client(id) {
            Some(c) => c.mon,
            None => return Ok(()),
        };
        if mon == target {
            return Ok(());
        }

        self.unfocus(id, true)?;
        {
            let State {
                monitors, clients, ..
            } = &mut self.state;
            monitors[mon].detach(id);
            monitors[mon].detach_stack(id, clients);
            let tags = monitors[target].active_tags();
            if let Some(c) = clients.get_mut(&id) {
                c.mon = target;
                c.tags = tags; // assign the tags of the target monitor
            }
            monitors[target].attach(id);
            monitors[target].attach_stack(id);
        }

        self.focus(None)?;
        self.arrange(None)
    }

    /*
     * Arrangement
     */

    pub(crate) fn arrange(&mut self, mon: Option<usize>) -> Result<()> {
        match mon {
            Some(m) => {
                self.show_hide(m)?;
                self.arrange_monitor(m)?;
                self.restack(m)
            }
            None => {
                for m in 0..self.state.monitors.len() {
                    self.show_hide(m)?;
                }
                for m in 0..self.state.monitors.len() {
                    self.arrange_monitor(m)?;
                }
                Ok(())
            }
        }
    }

    fn arrange_monitor(&mut self, mon: usize) -> Result<()> {
        let kind = self.state.monitors[mon].layout();
        let n_tiled = self.state.monitors[mon].n_tiled(&self.state.clients);

        let symbol = if kind == LayoutKind::Monocle && n_tiled > 0 {
            format!("[{}]", n_tiled)
        } else {
            kind.symbol().to_owned()
        };
        self.state.monitors[mon].ltsymbol = symbol;

        let positions = layout_positions(
            kind,
            &self.state.monitors[mon],
            &self.state.clients,
            self.state.screen,
            self.state.bar_height,
            self.state.config.resize_hints,
        );

        for (id, r) in positions {
            if self.state.client(id).map(|c| c.rect) != Some(r) {
                self.resize_client(id, r)?;
            }
        }

        Ok(())
    }

    fn show_hide(&mut self, mon: usize) -> Result<()> {
        let stack = self.state.monitors[mon].stack.clone();
        self.show_hide_from(&stack, 0)
    }

    // show clients top down, hide bottom up
    fn show_hide_from(&mut self, stack: &[Xid], i: usize) -> Result<()> {
        let id = match stack.get(i) {
            Some(&id) => id,
            None => return Ok(()),
        };

        let (visible, rect, free_floating, fullscreen, outer_w) = {
            let c = match self.state.client(id) {
                Some(c) => c,
                None => return self.show_hide_from(stack, i + 1),
            };
            let m = &self.state.monitors[c.mon];
            (
                c.is_visible_on(m),
                c.rect,
                c.is_floating() || !m.layout().arranges(),
                c.is_fullscreen(),
                c.outer_w(),
            )
        };

        if visible {
            self.x.move_window(id, rect.x, rect.y)?;
            if free_floating && !fullscreen {
                self.resize(id, rect, false)?;
            }
            self.show_hide_from(stack, i + 1)
        } else {
            self.show_hide_from(stack, i + 1)?;
            self.x.move_window(id, -2 * outer_w as i32, rect.y)
        }
    }

    pub(crate) fn restack(&mut self, mon: usize) -> Result<()> {
        self.draw_bar(mon)?;

        let (sel, arranges, bar_win, stack) = {
            let m = &self.state.monitors[mon];
            let sel = match m.sel {
                Some(s) => s,
                None => return Ok(()),
            };
            (sel, m.layout().arranges(), m.bar_win, m.stack.clone())
        };

        let sel_floating = self
            .state
            .client(sel)
            .map(|c| c.is_floating())
            .unwrap_or(false);
        if sel_floating || !arranges {
            self.x.raise_window(sel)?;
        }

        if arranges {
            let mut sibling = bar_win;
            for id in stack {
                let tiled_visible = self
                    .state
                    .client(id)
                    .map(|c| !c.is_floating() && c.is_visible_on(&self.state.monitors[mon]))
                    .unwrap_or(false);
                if tiled_visible {
                    self.x.stack_window_below(id, sibling)?;
                    sibling = id;
                }
            }
        }

        self.x.sync()?;
        self.x.drain_enter_events()
    }

    /*
     * Monitors
     */

    /// Reconcile the monitor set against the current output topology,
    /// returning whether anything changed.
    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn update_monitor_geometry(&mut self) -> Result<bool> {
        let mut rects = self.x.screen_details()?;
        if rects.is_empty() {
            rects.push(Rect::new(0, 0, self.state.screen.0, self.state.screen.1));
        }

        let mut dirty = false;
        let n = self.state.monitors.len();
        let nn = rects.len();

        if n <= nn {
            for _ in 0..(nn - n) {
                let cfg = &self.state.config;
                let m = Monitor::new(
                    self.state.monitors.len() as i32,
                    cfg.initial_layouts(),
                    cfg.mfact,
                    cfg.nmaster,
                    cfg.gap_px,
                    cfg.show_bar,
                    cfg.top_bar,
                );
                self.state.monitors.push(m);
            }

            for (i, &r) in rects.iter().enumerate() {
                if i >= n || r != self.state.monitors[i].s_rect {
                    dirty = true;
                    let bar_h = self.state.bar_height;
                    let m = &mut self.state.monitors[i];
                    m.num = i as i32;
                    m.set_geometry(r);
                    m.update_bar_pos(bar_h);
                }
            }
        } else {
            // fewer outputs than monitors: migrate clients from the
            // excess monitors onto the first surviving one
            for _ in nn..n {
                let mut removed = match self.state.monitors.pop() {
                    Some(m) => m,
                    None => break,
                };
                debug!(num = removed.num, "removing monitor");

                removed.stack.clear();
                removed.sel = None;
                let orphans: Vec<Xid> = removed.clients.drain(..).collect();
                for id in orphans {
                    dirty = true;
                    if let Some(c) = self.state.clients.get_mut(&id) {
                        c.mon = 0;
                    }
                    self.state.monitors[0].attach(id);
                    self.state.monitors[0].attach_stack(id);
                }

                if self.state.sel_mon >= self.state.monitors.len() {
                    self.state.sel_mon = 0;
                }
                if removed.bar_win != Xid(0) {
                    self.x.unmap_window(removed.bar_win)?;
                    self.x.destroy_window(removed.bar_win)?;
                }
            }
        }

        if dirty {
            self.state.sel_mon = 0;
            self.state.sel_mon = self.win_to_mon(self.x.root());
        }

        Ok(dirty)
    }

    fn win_to_mon(&self, id: Xid) -> usize {
        if id == self.x.root() {
            if let Ok(p) = self.x.cursor_position() {
                return self.state.rect_to_mon(Rect::new(p.x, p.y, 1, 1));
            }
        }
        if let Some(i) = self.state.monitors.iter().position(|m| m.bar_win == id) {
            return i;
        }
        if let Some(c) = self.state.client(id) {
            return c.mon;
        }

        self.state.sel_mon
    }

    /*
     * Bar handling
     */

    pub(crate) fn update_bars(&mut self) -> Result<()> {
        let bar_h = self.state.bar_height;
        for i in 0..self.state.monitors.len() {
            if self.state.monitors[i].bar_win != Xid(0) {
                continue;
            }
            let m = &self.state.monitors[i];
            let r = Rect::new(m.w_rect.x, m.bar_y, m.w_rect.w, bar_h);
            let bar_win = self.x.create_bar_window(r)?;
            self.state.monitors[i].bar_win = bar_win;
        }

        Ok(())
    }

    pub(crate) fn update_status(&mut self) -> Result<()> {
        self.state.status_text = self.x.status_text()?.unwrap_or_else(|| {
            format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        });
        self.draw_bar(self.state.sel_mon)
    }

    pub(crate) fn draw_bar(&mut self, mon: usize) -> Result<()> {
        bar::draw_bar(
            self.draw.as_mut(),
            &self.state.monitors[mon],
            &self.state.clients,
            &self.state.config,
            &self.state.status_text,
            self.state.bar_height,
            mon == self.state.sel_mon,
        )
    }

    pub(crate) fn draw_bars(&mut self) -> Result<()> {
        for m in 0..self.state.monitors.len() {
            self.draw_bar(m)?;
        }

        Ok(())
    }

    /*
     * Property tracking
     */

    fn update_window_type(&mut self, id: Xid) -> Result<()> {
        if self.x.window_state_is_fullscreen(id)? {
            self.set_fullscreen(id, true)?;
        }
        if self.x.window_type_is_dialog(id)? {
            if let Some(c) = self.state.clients.get_mut(&id) {
                c.flags.insert(ClientFlags::FLOATING);
            }
        }

        Ok(())
    }

    fn update_size_hints(&mut self, id: Xid) -> Result<()> {
        let hints = self.x.size_hints(id)?;
        if let Some(c) = self.state.clients.get_mut(&id) {
            c.flags.set(ClientFlags::FIXED, hints.is_fixed());
            c.hints = hints;
        }

        Ok(())
    }

    fn update_wm_hints(&mut self, id: Xid) -> Result<()> {
        let hints = match self.x.wm_hints(id)? {
            Some(h) => h,
            None => return Ok(()),
        };

        let is_sel = self.state.selmon().sel == Some(id);
        if is_sel && hints.urgent {
            // the selected window doesn't get to nag
            self.x.set_urgency_hint(id, false)?;
        } else if let Some(c) = self.state.clients.get_mut(&id) {
            c.flags.set(ClientFlags::URGENT, hints.urgent);
        }

        if let Some(c) = self.state.clients.get_mut(&id) {
            let never = hints.input.map(|input| !input).unwrap_or(false);
            c.flags.set(ClientFlags::NEVER_FOCUS, never);
        }

        Ok(())
    }

    fn update_title(&mut self, id: Xid) -> Result<()> {
        let name = self.x.window_title(id).ok().flatten();
        if let Some(c) = self.state.clients.get_mut(&id) {
            c.set_name(name);
        }

        Ok(())
    }
}

impl<X: XConn> std::fmt::Debug for WindowManager<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{draw::StubDraw, x::mock::MockXConn};
    use simple_test_case::test_case;
    use std::cell::RefCell;

    pub(crate) struct TestX {
        pub screens: RefCell<Vec<Rect>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl Default for TestX {
        fn default() -> Self {
            Self {
                screens: RefCell::new(vec![Rect::new(0, 0, 2000, 1200)]),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl MockXConn for TestX {
        fn mock_screen_details(&self) -> Result<Vec<Rect>> {
            Ok(self.screens.borrow().clone())
        }

        fn mock_configure_client(&self, id: Xid, r: Rect, _bw: u32) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("configure {} {:?}", id, r));
            Ok(())
        }

        fn mock_set_input_focus(&self, id: Xid) -> Result<()> {
            self.calls.borrow_mut().push(format!("focus {}", id));
            Ok(())
        }
    }

    pub(crate) fn test_wm() -> WindowManager<TestX> {
        let mut wm =
            WindowManager::new(Config::default(), TestX::default(), Box::new(StubDraw)).unwrap();
        wm.init().unwrap();
        wm
    }

    pub(crate) fn wa(r: Rect) -> WindowAttributes {
        WindowAttributes {
            override_redirect: false,
            viewable: true,
            rect: r,
            border_width: 0,
        }
    }

    pub(crate) fn assert_invariants<XC: XConn>(wm: &WindowManager<XC>) {
        for (i, m) in wm.state.monitors.iter().enumerate() {
            // stack is a permutation of clients
            let mut a = m.clients.clone();
            let mut b = m.stack.clone();
            a.sort();
            b.sort();
            assert_eq!(a, b, "stack is not a permutation of clients on monitor {i}");

            // ownership back references match membership
            for id in &m.clients {
                assert_eq!(wm.state.clients[id].mon, i, "stale monitor back reference");
            }

            // selection is visible when set
            if let Some(sel) = m.sel {
                assert!(m.clients.contains(&sel));
                assert_ne!(wm.state.clients[&sel].tags & m.active_tags(), 0);
            }

            // tag masks are always in range
            let valid = wm.state.config.tag_mask();
            for id in &m.clients {
                let tags = wm.state.clients[id].tags;
                assert_ne!(tags, 0);
                assert_eq!(tags & !valid, 0, "tags stored outside the valid range");
            }
        }
    }

    #[test]
    fn manage_attaches_and_selects_the_new_client() {
        let mut wm = test_wm();

        wm.manage(Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();
        wm.manage(Xid(2), wa(Rect::new(10, 10, 200, 100))).unwrap();

        let m = wm.state.selmon();
        assert_eq!(m.clients, vec![Xid(2), Xid(1)]);
        assert_eq!(m.sel, Some(Xid(2)));
        assert_eq!(wm.state.clients[&Xid(2)].tags, 1);
        assert_invariants(&wm);
    }

    #[test]
    fn focus_promotes_the_target_in_the_stack_order() {
        let mut wm = test_wm();
        for id in 1..=3 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }

        wm.focus(Some(Xid(1))).unwrap();

        let m = wm.state.selmon();
        assert_eq!(m.sel, Some(Xid(1)));
        assert_eq!(m.stack[0], Xid(1));
        // client order is untouched by focus changes
        assert_eq!(m.clients, vec![Xid(3), Xid(2), Xid(1)]);
        assert_invariants(&wm);
    }

    #[test]
    fn focus_with_no_visible_target_falls_back_to_mru() {
        let mut wm = test_wm();
        for id in 1..=3 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }
        wm.focus(Some(Xid(1))).unwrap();

        // hide client 1 by moving it to another tag, then refocus
        wm.state.clients.get_mut(&Xid(1)).unwrap().tags = 0b10;
        wm.focus(None).unwrap();

        // MRU order was [1, 3, 2]: 3 is the next visible candidate
        assert_eq!(wm.state.selmon().sel, Some(Xid(3)));
    }

    #[test]
    fn focus_stack_wraps_to_the_only_other_visible_client() {
        let mut wm = test_wm();
        for id in 1..=4 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }
        // collection order is [4, 3, 2, 1]: hide the middle two
        wm.state.clients.get_mut(&Xid(3)).unwrap().tags = 0b10;
        wm.state.clients.get_mut(&Xid(2)).unwrap().tags = 0b10;
        assert_eq!(wm.state.selmon().sel, Some(Xid(4)));

        wm.focus_stack(1).unwrap();

        assert_eq!(wm.state.selmon().sel, Some(Xid(1)));

        wm.focus_stack(1).unwrap();
        assert_eq!(wm.state.selmon().sel, Some(Xid(4)));
    }

    #[test]
    fn focus_stack_backward_finds_nearest_preceding_visible() {
        let mut wm = test_wm();
        for id in 1..=4 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }
        // collection order is [4, 3, 2, 1]
        wm.focus(Some(Xid(2))).unwrap();

        wm.focus_stack(-1).unwrap();
        assert_eq!(wm.state.selmon().sel, Some(Xid(3)));

        wm.focus_stack(-1).unwrap();
        assert_eq!(wm.state.selmon().sel, Some(Xid(4)));

        // wraps around from the head
        wm.focus_stack(-1).unwrap();
        assert_eq!(wm.state.selmon().sel, Some(Xid(1)));
    }

    #[test]
    fn fullscreen_round_trip_restores_geometry_and_border() {
        let mut wm = test_wm();
        wm.manage(Xid(1), wa(Rect::new(50, 50, 400, 300))).unwrap();
        // pin a known geometry via a direct resize
        wm.resize_client(Xid(1), Rect::new(60, 60, 400, 300)).unwrap();
        let before = wm.state.clients[&Xid(1)].rect;
        let bw_before = wm.state.clients[&Xid(1)].bw;

        wm.set_fullscreen(Xid(1), true).unwrap();
        {
            let c = &wm.state.clients[&Xid(1)];
            assert!(c.is_fullscreen());
            assert!(c.is_floating());
            assert_eq!(c.bw, 0);
            assert_eq!(c.rect, wm.state.monitors[0].s_rect);
        }

        wm.set_fullscreen(Xid(1), false).unwrap();
        {
            let c = &wm.state.clients[&Xid(1)];
            assert!(!c.is_fullscreen());
            assert!(!c.is_floating());
            assert_eq!(c.rect, before);
            assert_eq!(c.bw, bw_before);
        }
    }

    #[test]
    fn zoom_promotes_the_next_tiled_client_when_master_is_selected() {
        let mut wm = test_wm();
        for id in 1..=3 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }
        // 3 is master and selected: zoom should promote 2
        wm.zoom().unwrap();

        let m = wm.state.selmon();
        assert_eq!(m.clients, vec![Xid(2), Xid(3), Xid(1)]);
        assert_eq!(m.sel, Some(Xid(2)));
        assert_invariants(&wm);
    }

    #[test]
    fn zoom_promotes_the_selection_when_not_master() {
        let mut wm = test_wm();
        for id in 1..=3 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }
        wm.focus(Some(Xid(1))).unwrap();

        wm.zoom().unwrap();

        assert_eq!(wm.state.selmon().clients, vec![Xid(1), Xid(3), Xid(2)]);
        assert_eq!(wm.state.selmon().sel, Some(Xid(1)));
    }

    #[test]
    fn tag_masks_are_clamped_to_the_valid_range() {
        let mut wm = test_wm();
        wm.manage(Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();

        wm.tag(u32::MAX).unwrap();

        assert_eq!(
            wm.state.clients[&Xid(1)].tags,
            wm.state.config.tag_mask()
        );
        assert_invariants(&wm);
    }

    #[test]
    fn view_retains_selection_coherence() {
        let mut wm = test_wm();
        for id in 1..=2 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }

        // nothing lives on tag 5: selection must drop to None
        wm.view(1 << 4).unwrap();
        assert_eq!(wm.state.selmon().sel, None);
        assert_invariants(&wm);

        // and return to the previous view brings focus back
        wm.view(0).unwrap();
        assert!(wm.state.selmon().sel.is_some());
        assert_invariants(&wm);
    }

    #[test]
    fn toggle_view_to_the_current_tagset_is_a_no_op() {
        let mut wm = test_wm();
        wm.manage(Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();
        wm.x.calls.borrow_mut().clear();
        let before_sel = wm.state.selmon().sel;

        // active tags are 1: toggling 1 would produce 0
        wm.toggle_view(1).unwrap();

        assert_eq!(wm.state.selmon().active_tags(), 1);
        assert_eq!(wm.state.selmon().sel, before_sel);
        // no focus or arrange side effects fired
        assert!(wm.x.calls.borrow().is_empty());
    }

    #[test]
    fn removing_a_monitor_migrates_its_clients() {
        let mut wm = test_wm();
        wm.x.screens
            .replace(vec![Rect::new(0, 0, 1000, 600), Rect::new(1000, 0, 1000, 600)]);
        wm.update_monitor_geometry().unwrap();
        assert_eq!(wm.state.monitors.len(), 2);

        // two clients on the second monitor
        wm.state.sel_mon = 1;
        wm.manage(Xid(1), wa(Rect::new(1000, 0, 200, 100))).unwrap();
        wm.manage(Xid(2), wa(Rect::new(1100, 0, 200, 100))).unwrap();
        let first_before = wm.state.monitors[0].clients.len();

        wm.x.screens.replace(vec![Rect::new(0, 0, 1000, 600)]);
        wm.update_monitor_geometry().unwrap();

        assert_eq!(wm.state.monitors.len(), 1);
        assert_eq!(wm.state.monitors[0].clients.len(), first_before + 2);
        assert_eq!(wm.state.monitors[0].stack.len(), first_before + 2);
        assert_eq!(wm.state.sel_mon, 0);
        assert_invariants(&wm);
    }

    #[test_case(1 << 1; "single other tag")]
    #[test_case(0b101; "multiple tags")]
    #[test]
    fn toggle_tag_moves_selection_tags(mask: u32) {
        let mut wm = test_wm();
        wm.manage(Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();

        wm.toggle_tag(mask).unwrap();

        assert_eq!(wm.state.clients[&Xid(1)].tags, 1 ^ mask);
        assert_invariants(&wm);
    }

    #[test]
    fn send_to_monitor_reassigns_tags_and_membership() {
        let mut wm = test_wm();
        wm.x.screens
            .replace(vec![Rect::new(0, 0, 1000, 600), Rect::new(1000, 0, 1000, 600)]);
        wm.update_monitor_geometry().unwrap();

        wm.state.sel_mon = 0;
        wm.manage(Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();
        wm.state.monitors[1].view(0b10);

        wm.send_to_monitor(Xid(1), 1).unwrap();

        assert!(wm.state.monitors[0].clients.is_empty());
        assert_eq!(wm.state.monitors[1].clients, vec![Xid(1)]);
        assert_eq!(wm.state.clients[&Xid(1)].mon, 1);
        assert_eq!(wm.state.clients[&Xid(1)].tags, 0b10);
        assert_invariants(&wm);
    }

    #[test]
    fn unmanage_refocuses_and_detaches() {
        let mut wm = test_wm();
        for id in 1..=2 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }

        wm.unmanage(Xid(2), false).unwrap();

        assert!(wm.state.client(Xid(2)).is_none());
        assert_eq!(wm.state.selmon().sel, Some(Xid(1)));
        assert_invariants(&wm);
    }

    #[test]
    fn arrange_applies_tile_geometry() {
        let mut wm = test_wm();
        for id in 1..=2 {
            wm.manage(Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }

        let m = wm.state.selmon();
        let wr = m.w_rect;
        let r2 = wm.state.clients[&Xid(2)].rect;
        let r1 = wm.state.clients[&Xid(1)].rect;

        // master on the left, stack on the right, inside the usable rect
        assert_eq!(r2.x, wr.x + 5);
        assert!(r1.x > r2.x + r2.w as i32);
        assert!(r1.right() <= wr.right());
    }
}
