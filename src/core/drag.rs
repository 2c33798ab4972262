//! The interactive move / resize sub-state.
//!
//! While a drag is active the pointer is grabbed and events are pulled
//! through [XConn::next_drag_event], which only ever yields pointer
//! motion / button events plus the small forwarded set (expose,
//! configure-request, map-request) that keeps the rest of the system
//! responsive. The sub-state exits on button release, at which point the
//! dragged client may have crossed onto another monitor.
use crate::{
    core::WindowManager,
    pure::geometry::{Point, Rect},
    x::{event::XEvent, property::StandardCursor, XConn},
    Result,
};
use tracing::trace;

// at most one geometry update per ~16ms of motion
const MOTION_INTERVAL_MS: u32 = 1000 / 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragKind {
    Move,
    Resize,
}

pub(crate) fn drag<X: XConn>(wm: &mut WindowManager<X>, kind: DragKind) -> Result<()> {
    let id = match wm.state.selmon().sel {
        Some(id) => id,
        None => return Ok(()),
    };
    if wm.state.clients[&id].is_fullscreen() {
        return Ok(()); // no interactive moves for fullscreen windows
    }

    wm.restack(wm.state.sel_mon)?;

    let cursor = match kind {
        DragKind::Move => StandardCursor::Move,
        DragKind::Resize => StandardCursor::Resize,
    };
    if !wm.x.grab_pointer(cursor)? {
        return Ok(());
    }

    let orig = wm.state.clients[&id].rect;
    let pointer_origin = match kind {
        DragKind::Move => match wm.x.cursor_position() {
            Ok(p) => p,
            Err(_) => {
                wm.x.ungrab_pointer()?;
                return Ok(());
            }
        },
        DragKind::Resize => {
            let c = &wm.state.clients[&id];
            wm.x.warp_pointer(
                id,
                (c.rect.w + c.bw - 1) as i16,
                (c.rect.h + c.bw - 1) as i16,
            )?;
            Point::default()
        }
    };

    trace!(%id, ?kind, "entering drag sub-state");
    let mut last_motion = 0u32;
    loop {
        let event = wm.x.next_drag_event()?;
        match event {
            XEvent::ConfigureRequest(_) | XEvent::Expose { .. } | XEvent::MapRequest { .. } => {
                wm.handle_drag_forwarded(event)?;
            }
            XEvent::MotionNotify { point, time } => {
                if time.saturating_sub(last_motion) <= MOTION_INTERVAL_MS {
                    continue;
                }
                last_motion = time;

                match kind {
                    DragKind::Move => drag_move(wm, id, orig, pointer_origin, point)?,
                    DragKind::Resize => drag_resize(wm, id, orig, point)?,
                }
            }
            XEvent::ButtonRelease(_) => break,
            _ => (),
        }
    }

    if kind == DragKind::Resize {
        if let Some(c) = wm.state.client(id) {
            wm.x.warp_pointer(
                id,
                (c.rect.w + c.bw - 1) as i16,
                (c.rect.h + c.bw - 1) as i16,
            )?;
        }
    }
    wm.x.ungrab_pointer()?;
    wm.x.drain_enter_events()?;

    // the final rectangle decides which monitor now owns the client
    if let Some(c) = wm.state.client(id) {
        let target = wm.state.rect_to_mon(c.rect);
        if target != wm.state.sel_mon {
            wm.send_to_monitor(id, target)?;
            wm.state.sel_mon = target;
            wm.focus(None)?;
        }
    }

    Ok(())
}

fn drag_move<X: XConn>(
    wm: &mut WindowManager<X>,
    id: crate::Xid,
    orig: Rect,
    p0: Point,
    p: Point,
) -> Result<()> {
    let mut nx = orig.x + (p.x - p0.x);
    let mut ny = orig.y + (p.y - p0.y);

    let (rect, outer_w, outer_h, floating) = {
        let c = match wm.state.client(id) {
            Some(c) => c,
            None => return Ok(()),
        };
        (c.rect, c.outer_w() as i32, c.outer_h() as i32, c.is_floating())
    };
    let (wr, gap, arranges, snap) = {
        let m = wm.state.selmon();
        (
            m.w_rect,
            m.gap as i32,
            m.layout().arranges(),
            wm.state.config.snap as i32,
        )
    };

    // snap to the usable rect edges
    if (wr.x - nx - gap).abs() < snap {
        nx = wr.x + gap;
    } else if (wr.right() - (nx + outer_w + gap)).abs() < snap {
        nx = wr.right() - outer_w - gap;
    }
    if (wr.y - ny - gap).abs() < snap {
        ny = wr.y + gap;
    } else if (wr.bottom() - (ny + outer_h + gap)).abs() < snap {
        ny = wr.bottom() - outer_h - gap;
    }

    // dragging a tiled client past the snap threshold floats it
    if !floating && arranges && ((nx - rect.x).abs() > snap || (ny - rect.y).abs() > snap) {
        wm.toggle_floating()?;
    }

    let floating = wm
        .state
        .client(id)
        .map(|c| c.is_floating())
        .unwrap_or(false);
    if !arranges || floating {
        wm.resize(id, Rect::new(nx, ny, rect.w, rect.h), true)?;
    }

    Ok(())
}

fn drag_resize<X: XConn>(
    wm: &mut WindowManager<X>,
    id: crate::Xid,
    orig: Rect,
    p: Point,
) -> Result<()> {
    let (rect, bw, mon, floating) = {
        let c = match wm.state.client(id) {
            Some(c) => c,
            None => return Ok(()),
        };
        (c.rect, c.bw as i32, c.mon, c.is_floating())
    };

    let nw = (p.x - orig.x - 2 * bw + 1).max(1);
    let nh = (p.y - orig.y - 2 * bw + 1).max(1);

    let (in_bounds, arranges, snap) = {
        let mwr = wm.state.monitors[mon].w_rect;
        let swr = wm.state.selmon().w_rect;
        let in_bounds = mwr.x + nw >= swr.x
            && mwr.x + nw <= swr.right()
            && mwr.y + nh >= swr.y
            && mwr.y + nh <= swr.bottom();
        (
            in_bounds,
            wm.state.selmon().layout().arranges(),
            wm.state.config.snap as i32,
        )
    };

    if in_bounds
        && !floating
        && arranges
        && ((nw - rect.w as i32).abs() > snap || (nh - rect.h as i32).abs() > snap)
    {
        wm.toggle_floating()?;
    }

    let floating = wm
        .state
        .client(id)
        .map(|c| c.is_floating())
        .unwrap_or(false);
    if !arranges || floating {
        wm.resize(
            id,
            Rect::new(rect.x, rect.y, nw as u32, nh as u32),
            true,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::tests::{assert_invariants, wa, TestX},
        core::WindowManager,
        draw::StubDraw,
        x::{event::ButtonEvent, mock::MockXConn},
        Config, Xid,
    };
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct DragX {
        inner: TestX,
        drag_events: RefCell<VecDeque<XEvent>>,
    }

    impl DragX {
        fn new(events: Vec<XEvent>) -> Self {
            Self {
                inner: TestX::default(),
                drag_events: RefCell::new(events.into()),
            }
        }
    }

    impl MockXConn for DragX {
        fn mock_screen_details(&self) -> crate::Result<Vec<Rect>> {
            self.inner.mock_screen_details()
        }

        fn mock_next_drag_event(&self) -> crate::Result<XEvent> {
            Ok(self
                .drag_events
                .borrow_mut()
                .pop_front()
                .expect("drag event stream exhausted"))
        }

        fn mock_cursor_position(&self) -> crate::Result<Point> {
            Ok(Point::new(0, 0))
        }
    }

    fn release() -> XEvent {
        XEvent::ButtonRelease(ButtonEvent {
            id: Xid(0),
            rpt: Point::new(0, 0),
            wpt: Point::new(0, 0),
            button: 1,
            mask: 0,
            time: 0,
        })
    }

    fn motion(x: i32, y: i32, time: u32) -> XEvent {
        XEvent::MotionNotify {
            point: Point::new(x, y),
            time,
        }
    }

    fn drag_wm(events: Vec<XEvent>) -> WindowManager<DragX> {
        let mut wm =
            WindowManager::new(Config::default(), DragX::new(events), Box::new(StubDraw)).unwrap();
        wm.init().unwrap();
        wm
    }

    #[test]
    fn moving_a_floating_client_updates_its_position() {
        let mut wm = drag_wm(vec![motion(200, 150, 100), release()]);
        wm.manage(Xid(1), wa(Rect::new(0, 0, 300, 200))).unwrap();
        wm.toggle_floating().unwrap();
        let orig = wm.state.clients[&Xid(1)].rect;

        drag(&mut wm, DragKind::Move).unwrap();

        let r = wm.state.clients[&Xid(1)].rect;
        assert_eq!(r.x, orig.x + 200);
        assert_eq!(r.y, orig.y + 150);
        assert_eq!((r.w, r.h), (orig.w, orig.h));
    }

    #[test]
    fn dragging_a_tiled_client_past_the_snap_threshold_floats_it() {
        // snap defaults to 32: a 100px drag forces floating
        let mut wm = drag_wm(vec![motion(100, 100, 100), release()]);
        wm.manage(Xid(1), wa(Rect::new(0, 0, 300, 200))).unwrap();
        assert!(!wm.state.clients[&Xid(1)].is_floating());

        drag(&mut wm, DragKind::Move).unwrap();

        assert!(wm.state.clients[&Xid(1)].is_floating());
        assert_invariants(&wm);
    }

    #[test]
    fn throttled_motion_is_ignored() {
        // second motion arrives within the 16ms window and must not win
        let mut wm = drag_wm(vec![
            motion(100, 100, 1000),
            motion(500, 500, 1010),
            release(),
        ]);
        wm.manage(Xid(1), wa(Rect::new(0, 0, 300, 200))).unwrap();
        wm.toggle_floating().unwrap();
        let orig = wm.state.clients[&Xid(1)].rect;

        drag(&mut wm, DragKind::Move).unwrap();

        let r = wm.state.clients[&Xid(1)].rect;
        assert_eq!((r.x, r.y), (orig.x + 100, orig.y + 100));
    }

    #[test]
    fn map_requests_are_forwarded_to_the_main_dispatcher_mid_drag() {
        let mut wm = drag_wm(vec![XEvent::MapRequest { id: Xid(9) }, release()]);
        wm.manage(Xid(1), wa(Rect::new(0, 0, 300, 200))).unwrap();
        wm.toggle_floating().unwrap();

        drag(&mut wm, DragKind::Move).unwrap();

        // the new window was managed while the drag was in flight
        assert!(wm.state.client(Xid(9)).is_some());
        assert_invariants(&wm);
    }

    #[test]
    fn resize_drag_updates_the_size_of_a_floating_client() {
        let mut wm = drag_wm(vec![motion(400, 300, 100), release()]);
        wm.manage(Xid(1), wa(Rect::new(0, 0, 300, 200))).unwrap();
        wm.toggle_floating().unwrap();
        let orig = wm.state.clients[&Xid(1)].rect;

        drag(&mut wm, DragKind::Resize).unwrap();

        let r = wm.state.clients[&Xid(1)].rect;
        assert_eq!((r.x, r.y), (orig.x, orig.y));
        // nw = 400 - x - 2*bw + 1
        assert_eq!(r.w as i32, 400 - orig.x - 2 + 1);
        assert_eq!(r.h as i32, 300 - orig.y - 2 + 1);
    }
}
