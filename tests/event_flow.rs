//! Integration tests driving the full event loop against a scripted
//! stub X connection.
use escher::{
    core::bindings::{KeyBindings, KeyPress, MouseBindings},
    draw::StubDraw,
    pure::geometry::Rect,
    x::{event::XEvent, mock::MockXConn, property::WindowAttributes},
    Config, Result, WindowManager, Xid,
};
use std::{cell::RefCell, collections::VecDeque};

// an arbitrary keysym reserved for stopping the event loop
const QUIT_KEYSYM: u32 = 0xffff;

struct ScriptedX {
    events: RefCell<VecDeque<XEvent>>,
    configured: RefCell<Vec<(Xid, Rect)>>,
}

impl ScriptedX {
    fn new(events: Vec<XEvent>) -> Self {
        Self {
            events: RefCell::new(events.into()),
            configured: RefCell::new(Vec::new()),
        }
    }
}

impl MockXConn for ScriptedX {
    fn mock_screen_details(&self) -> Result<Vec<Rect>> {
        Ok(vec![Rect::new(0, 0, 1000, 600)])
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        Ok(self
            .events
            .borrow_mut()
            .pop_front()
            .expect("event script exhausted without quitting"))
    }

    fn mock_window_attributes(&self, _id: Xid) -> Result<WindowAttributes> {
        Ok(WindowAttributes {
            override_redirect: false,
            viewable: true,
            rect: Rect::new(0, 0, 300, 200),
            border_width: 0,
        })
    }

    fn mock_configure_client(&self, id: Xid, r: Rect, _bw: u32) -> Result<()> {
        self.configured.borrow_mut().push((id, r));
        Ok(())
    }
}

fn quit_key() -> XEvent {
    XEvent::KeyPress(KeyPress {
        mask: 0,
        keysym: QUIT_KEYSYM,
    })
}

fn quit_bindings() -> KeyBindings<ScriptedX> {
    let mut keys: KeyBindings<ScriptedX> = KeyBindings::new();
    keys.insert(
        KeyPress::new(&[], QUIT_KEYSYM),
        Box::new(|wm| {
            wm.quit();
            Ok(())
        }),
    );

    keys
}

fn run_script(events: Vec<XEvent>) -> WindowManager<ScriptedX> {
    let x = ScriptedX::new(events);
    let mut wm = WindowManager::new(Config::default(), x, Box::new(StubDraw)).unwrap();
    wm.init().unwrap();
    wm.run(quit_bindings(), MouseBindings::new()).unwrap();

    wm
}

#[test]
fn map_requests_manage_and_tile_new_clients() {
    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::MapRequest { id: Xid::from(2) },
        quit_key(),
    ]);

    let m = wm.state.selmon();
    assert_eq!(m.clients, vec![Xid::from(2), Xid::from(1)]);
    assert_eq!(m.sel, Some(Xid::from(2)));

    // both clients were tiled into the usable rect
    let wr = m.w_rect;
    for id in [Xid::from(1), Xid::from(2)] {
        let r = wm.state.clients[&id].rect;
        assert!(r.x >= wr.x && r.right() <= wr.right(), "{r:?} not within {wr:?}");
        assert!(r.y >= wr.y && r.bottom() <= wr.bottom(), "{r:?} not within {wr:?}");
    }

    // the master / stack split put the newest client on the left
    let master = wm.state.clients[&Xid::from(2)].rect;
    let stacked = wm.state.clients[&Xid::from(1)].rect;
    assert!(master.x < stacked.x);
}

#[test]
fn duplicate_map_requests_are_ignored() {
    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::MapRequest { id: Xid::from(1) },
        quit_key(),
    ]);

    assert_eq!(wm.state.selmon().clients, vec![Xid::from(1)]);
    assert_eq!(wm.state.selmon().stack, vec![Xid::from(1)]);
}

#[test]
fn unmap_unmanages_and_refocuses_the_survivor() {
    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::MapRequest { id: Xid::from(2) },
        XEvent::UnmapNotify {
            id: Xid::from(2),
            sent: false,
        },
        quit_key(),
    ]);

    assert!(wm.state.client(Xid::from(2)).is_none());
    assert_eq!(wm.state.selmon().clients, vec![Xid::from(1)]);
    assert_eq!(wm.state.selmon().sel, Some(Xid::from(1)));
}

#[test]
fn destroy_notify_unmanages_the_client() {
    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::DestroyNotify { id: Xid::from(1) },
        quit_key(),
    ]);

    assert!(wm.state.client(Xid::from(1)).is_none());
    assert_eq!(wm.state.selmon().sel, None);
}

#[test]
fn enter_notify_follows_the_pointer() {
    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::MapRequest { id: Xid::from(2) },
        XEvent::EnterNotify { id: Xid::from(1) },
        quit_key(),
    ]);

    assert_eq!(wm.state.selmon().sel, Some(Xid::from(1)));
    // MRU order reflects the focus history
    assert_eq!(wm.state.selmon().stack[0], Xid::from(1));
}

#[test]
fn fullscreen_client_messages_round_trip() {
    use escher::x::event::{ClientMessageKind, NetWmStateAction};

    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::ClientMessage {
            id: Xid::from(1),
            kind: ClientMessageKind::FullscreenState(NetWmStateAction::Add),
        },
        XEvent::ClientMessage {
            id: Xid::from(1),
            kind: ClientMessageKind::FullscreenState(NetWmStateAction::Toggle),
        },
        quit_key(),
    ]);

    let c = &wm.state.clients[&Xid::from(1)];
    assert!(!c.is_fullscreen());
    assert!(!c.is_floating());
}

#[test]
fn tiled_geometry_is_reapplied_after_unmanage() {
    let wm = run_script(vec![
        XEvent::MapRequest { id: Xid::from(1) },
        XEvent::MapRequest { id: Xid::from(2) },
        XEvent::UnmapNotify {
            id: Xid::from(2),
            sent: false,
        },
        quit_key(),
    ]);

    // with a single tiled client left it spans the full master column
    let r = wm.state.clients[&Xid::from(1)].rect;
    let wr = wm.state.selmon().w_rect;
    let gap = wm.state.selmon().gap as i32;
    assert_eq!(r.x, wr.x + gap);
    assert_eq!(r.y, wr.y + gap);

    // and the X server saw every applied geometry
    assert!(wm
        .conn()
        .configured
        .borrow()
        .iter()
        .any(|&(id, cr)| id == Xid::from(1) && cr == r));
}
