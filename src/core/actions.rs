//! The user facing command surface, intended for binding to keys and
//! buttons.
//!
//! Every command operates on the currently selected monitor and runs its
//! focus / arrange / redraw side effects synchronously before returning.
use crate::{
    core::{
        drag::{self, DragKind},
        WindowManager,
    },
    layout::LayoutKind,
    pure::client::ClientFlags,
    x::{property::Protocol, XConn},
    Result, Xid,
};
use tracing::debug;

impl<X: XConn> WindowManager<X> {
    /// Stop the event loop after the current event completes.
    pub fn quit(&mut self) {
        self.state.running = false;
    }

    /// View the given tag set, or return to the previous view for a zero
    /// mask.
    pub fn view(&mut self, mask: u32) -> Result<()> {
        let mask = mask & self.state.config.tag_mask();
        if mask == self.state.selmon().active_tags() {
            return Ok(());
        }

        debug!(mask, "viewing tagset");
        self.state.selmon_mut().view(mask);
        self.focus(None)?;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Toggle the given tags within the current view. A toggle that would
    /// leave nothing viewed is ignored.
    pub fn toggle_view(&mut self, mask: u32) -> Result<()> {
        let new = self.state.selmon().active_tags() ^ (mask & self.state.config.tag_mask());
        if new == 0 {
            return Ok(());
        }

        self.state.selmon_mut().set_active_tags(new);
        self.focus(None)?;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Move the selected client to the given tag set.
    pub fn tag(&mut self, mask: u32) -> Result<()> {
        let mask = mask & self.state.config.tag_mask();
        let sel = match self.state.selmon().sel {
            Some(sel) if mask != 0 => sel,
            _ => return Ok(()),
        };

        if let Some(c) = self.state.clients.get_mut(&sel) {
            c.tags = mask;
        }
        self.focus(None)?;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Toggle the given tags on the selected client. A client must always
    /// keep at least one tag.
    pub fn toggle_tag(&mut self, mask: u32) -> Result<()> {
        let sel = match self.state.selmon().sel {
            Some(sel) => sel,
            None => return Ok(()),
        };

        let new = self.state.clients[&sel].tags ^ (mask & self.state.config.tag_mask());
        if new == 0 {
            return Ok(());
        }

        if let Some(c) = self.state.clients.get_mut(&sel) {
            c.tags = new;
        }
        self.focus(None)?;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Move the selection forwards (positive) or backwards through the
    /// visible clients, in client collection order with wraparound.
    pub fn focus_stack(&mut self, dir: i32) -> Result<()> {
        let target = {
            let s = &self.state;
            let m = s.selmon();
            let sel = match m.sel {
                Some(sel) => sel,
                None => return Ok(()),
            };
            if s.clients[&sel].is_fullscreen() && s.config.lock_fullscreen {
                return Ok(());
            }

            let visible =
                |id: &Xid| s.clients.get(id).map(|c| c.is_visible_on(m)).unwrap_or(false);
            let idx = match m.clients.iter().position(|&c| c == sel) {
                Some(i) => i,
                None => return Ok(()),
            };

            if dir > 0 {
                m.clients[idx + 1..]
                    .iter()
                    .find(|id| visible(id))
                    .or_else(|| m.clients.iter().find(|id| visible(id)))
                    .copied()
            } else {
                // nearest preceding visible client, continuing past the
                // selection to the end if nothing precedes it
                let mut c = m.clients[..idx].iter().filter(|id| visible(id)).last();
                if c.is_none() {
                    c = m.clients[idx..].iter().filter(|id| visible(id)).last();
                }
                c.copied()
            }
        };

        if let Some(t) = target {
            self.focus(Some(t))?;
            self.restack(self.state.sel_mon)?;
        }

        Ok(())
    }

    /// Swap the selected client into the master position; if it is
    /// already the master, promote the next tiled client instead.
    pub fn zoom(&mut self) -> Result<()> {
        let target = {
            let s = &self.state;
            let m = s.selmon();
            if !m.layout().arranges() {
                return Ok(());
            }
            let sel = match m.sel {
                Some(sel) => sel,
                None => return Ok(()),
            };
            if s.clients[&sel].is_floating() {
                return Ok(());
            }

            if m.tiled_clients(&s.clients).next() == Some(sel) {
                match m
                    .tiled_clients(&s.clients)
                    .skip_while(|&id| id != sel)
                    .nth(1)
                {
                    Some(next) => next,
                    None => return Ok(()),
                }
            } else {
                sel
            }
        };

        let mon = self.state.sel_mon;
        self.state.monitors[mon].detach(target);
        self.state.monitors[mon].attach(target);
        self.focus(Some(target))?;
        self.arrange(Some(mon))
    }

    /// Adjust the number of clients in the master area.
    pub fn inc_nmaster(&mut self, delta: i32) -> Result<()> {
        let m = self.state.selmon_mut();
        m.nmaster = (m.nmaster as i32 + delta).max(0) as u32;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Adjust the master area factor. Values below 1.0 are relative
    /// deltas, values above are absolute (shifted by 1.0).
    pub fn set_mfact(&mut self, f: f32) -> Result<()> {
        if !self.state.selmon().layout().arranges() {
            return Ok(());
        }

        let new = if f < 1.0 {
            f + self.state.selmon().mfact
        } else {
            f - 1.0
        };
        if !(0.05..=0.95).contains(&new) {
            return Ok(());
        }

        self.state.selmon_mut().mfact = new;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Grow or shrink the gap between tiled windows; a zero delta resets
    /// the gap entirely.
    pub fn set_gaps(&mut self, delta: i32) -> Result<()> {
        let m = self.state.selmon_mut();
        m.gap = if delta == 0 || (m.gap as i32 + delta) < 0 {
            0
        } else {
            (m.gap as i32 + delta) as u32
        };

        self.arrange(Some(self.state.sel_mon))
    }

    /// Select a layout on the focused monitor. `None` toggles back to the
    /// previously selected layout.
    pub fn set_layout(&mut self, layout: Option<LayoutKind>) -> Result<()> {
        self.state.selmon_mut().set_layout(layout);

        if self.state.selmon().sel.is_some() {
            self.arrange(Some(self.state.sel_mon))
        } else {
            self.draw_bar(self.state.sel_mon)
        }
    }

    /// Toggle the selected client between floating and tiled.
    pub fn toggle_floating(&mut self) -> Result<()> {
        let sel = match self.state.selmon().sel {
            Some(sel) => sel,
            None => return Ok(()),
        };

        let (floating, rect) = {
            let c = match self.state.clients.get_mut(&sel) {
                Some(c) => c,
                None => return Ok(()),
            };
            if c.is_fullscreen() {
                return Ok(()); // no support for fullscreen windows
            }
            let floating = !c.is_floating() || c.flags.contains(ClientFlags::FIXED);
            c.flags.set(ClientFlags::FLOATING, floating);
            (floating, c.rect)
        };

        if floating {
            self.resize(sel, rect, false)?;
        }

        self.arrange(Some(self.state.sel_mon))
    }

    /// Toggle the bar on the focused monitor.
    pub fn toggle_bar(&mut self) -> Result<()> {
        let bar_h = self.state.bar_height;
        let (bar_win, bar_rect) = {
            let m = self.state.selmon_mut();
            m.show_bar = !m.show_bar;
            m.update_bar_pos(bar_h);
            (m.bar_win, crate::pure::Rect::new(m.w_rect.x, m.bar_y, m.w_rect.w, bar_h))
        };

        self.x.move_resize_window(bar_win, bar_rect)?;
        self.arrange(Some(self.state.sel_mon))
    }

    /// Move focus to the next monitor in the given direction.
    pub fn focus_mon(&mut self, dir: i32) -> Result<()> {
        if self.state.monitors.len() == 1 {
            return Ok(());
        }

        let target = self.state.dir_to_mon(dir);
        if target == self.state.sel_mon {
            return Ok(());
        }

        if let Some(sel) = self.state.selmon().sel {
            self.unfocus(sel, false)?;
        }
        self.state.sel_mon = target;
        self.focus(None)
    }

    /// Send the selected client to the next monitor in the given
    /// direction.
    pub fn tag_mon(&mut self, dir: i32) -> Result<()> {
        let sel = match self.state.selmon().sel {
            Some(sel) if self.state.monitors.len() > 1 => sel,
            _ => return Ok(()),
        };

        let target = self.state.dir_to_mon(dir);
        self.send_to_monitor(sel, target)
    }

    /// Close the selected client, preferring the WM_DELETE_WINDOW
    /// protocol over a forced kill.
    pub fn kill_client(&mut self) -> Result<()> {
        let sel = match self.state.selmon().sel {
            Some(sel) => sel,
            None => return Ok(()),
        };

        if !self.x.send_protocol(sel, Protocol::Delete)? {
            self.x.kill_window(sel)?;
        }

        Ok(())
    }

    /// Interactively move the selected client with the pointer.
    pub fn move_mouse(&mut self) -> Result<()> {
        drag::drag(self, DragKind::Move)
    }

    /// Interactively resize the selected client with the pointer.
    pub fn resize_mouse(&mut self) -> Result<()> {
        drag::drag(self, DragKind::Resize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tests::{assert_invariants, test_wm, wa};
    use crate::pure::geometry::Rect;

    #[test]
    fn inc_nmaster_clamps_at_zero() {
        let mut wm = test_wm();

        wm.inc_nmaster(-5).unwrap();
        assert_eq!(wm.state.selmon().nmaster, 0);

        wm.inc_nmaster(2).unwrap();
        assert_eq!(wm.state.selmon().nmaster, 2);
    }

    #[test]
    fn set_mfact_rejects_out_of_range_values() {
        let mut wm = test_wm();
        let before = wm.state.selmon().mfact;

        wm.set_mfact(0.9).unwrap(); // 0.55 + 0.9 > 0.95
        assert_eq!(wm.state.selmon().mfact, before);

        wm.set_mfact(0.05).unwrap();
        assert!((wm.state.selmon().mfact - 0.6).abs() < f32::EPSILON);

        // absolute form
        wm.set_mfact(1.5).unwrap();
        assert!((wm.state.selmon().mfact - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn set_gaps_resets_on_zero_and_clamps_below_zero() {
        let mut wm = test_wm();
        assert_eq!(wm.state.selmon().gap, 5);

        wm.set_gaps(3).unwrap();
        assert_eq!(wm.state.selmon().gap, 8);

        wm.set_gaps(-100).unwrap();
        assert_eq!(wm.state.selmon().gap, 0);

        wm.set_gaps(4).unwrap();
        wm.set_gaps(0).unwrap();
        assert_eq!(wm.state.selmon().gap, 0);
    }

    #[test]
    fn toggle_floating_marks_fixed_clients_floating_again() {
        let mut wm = test_wm();
        wm.manage(crate::Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();

        wm.toggle_floating().unwrap();
        assert!(wm.state.clients[&crate::Xid(1)].is_floating());

        wm.toggle_floating().unwrap();
        assert!(!wm.state.clients[&crate::Xid(1)].is_floating());

        wm.state
            .clients
            .get_mut(&crate::Xid(1))
            .unwrap()
            .flags
            .insert(ClientFlags::FIXED);
        wm.toggle_floating().unwrap();
        wm.toggle_floating().unwrap();
        // fixed clients always end up floating
        assert!(wm.state.clients[&crate::Xid(1)].is_floating());
        assert_invariants(&wm);
    }

    #[test]
    fn set_layout_none_toggles_between_slots() {
        let mut wm = test_wm();
        assert_eq!(wm.state.selmon().layout(), LayoutKind::Tile);

        wm.set_layout(Some(LayoutKind::Monocle)).unwrap();
        assert_eq!(wm.state.selmon().layout(), LayoutKind::Monocle);

        wm.set_layout(None).unwrap();
        assert_eq!(wm.state.selmon().layout(), LayoutKind::Tile);
    }

    #[test]
    fn monocle_layout_symbol_shows_visible_tiled_count() {
        let mut wm = test_wm();
        for id in 1..=3 {
            wm.manage(crate::Xid(id), wa(Rect::new(0, 0, 200, 100))).unwrap();
        }

        wm.set_layout(Some(LayoutKind::Monocle)).unwrap();

        assert_eq!(wm.state.selmon().ltsymbol, "[3]");
    }

    #[test]
    fn focus_mon_is_a_no_op_with_a_single_monitor() {
        let mut wm = test_wm();
        wm.manage(crate::Xid(1), wa(Rect::new(0, 0, 200, 100))).unwrap();

        wm.focus_mon(1).unwrap();

        assert_eq!(wm.state.sel_mon, 0);
        assert_eq!(wm.state.selmon().sel, Some(crate::Xid(1)));
    }
}
