//! Per-window client state
use crate::{
    pure::{geometry::Rect, monitor::Monitor},
    Xid,
};
use bitflags::bitflags;
use std::collections::HashMap;

/// Placeholder name used for clients that do not provide a usable name
/// property. The sentinel is visible to placement rules as well as the bar.
pub const BROKEN: &str = "broken";

/// Clients are owned centrally and referenced by [Xid] from the per-monitor
/// client and stacking orders.
pub type ClientMap = HashMap<Xid, Client>;

bitflags! {
    /// Independent boolean state for a single [Client].
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct ClientFlags: u8 {
        /// The size hints pin this window to a single fixed size
        const FIXED = 1 << 0;
        /// The window is free floating rather than tiled
        const FLOATING = 1 << 1;
        /// The window has requested the user's attention
        const URGENT = 1 << 2;
        /// The window has asked never to receive input focus
        const NEVER_FOCUS = 1 << 3;
        /// The window currently covers the full screen rect of its monitor
        const FULLSCREEN = 1 << 4;
        /// Whether the window was floating before entering fullscreen
        const WAS_FLOATING = 1 << 5;
    }
}

/// Size constraints derived from a window's WM_NORMAL_HINTS property.
///
/// A zero value for any field means "not specified by the client". Aspect
/// ratios are expressed uniformly as width / height bounds with
/// `min_aspect <= max_aspect` expected when both are set.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SizeHints {
    pub base_w: u32,
    pub base_h: u32,
    pub inc_w: u32,
    pub inc_h: u32,
    pub min_w: u32,
    pub min_h: u32,
    pub max_w: u32,
    pub max_h: u32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

impl SizeHints {
    /// True if the hints only ever permit a single size.
    pub fn is_fixed(&self) -> bool {
        self.max_w > 0 && self.max_h > 0 && self.max_w == self.min_w && self.max_h == self.min_h
    }

    /// Constrain a requested content size following ICCCM 4.1.2.3: remove
    /// base dimensions, clamp the aspect ratio, snap to resize increments,
    /// restore base dimensions and apply min/max bounds.
    pub fn constrain(&self, w: i32, h: i32) -> (u32, u32) {
        let (mut w, mut h) = (w, h);

        // If the base size is the min size it must be left in place for the
        // aspect calculation but removed for the increment calculation.
        let base_is_min = self.base_w == self.min_w && self.base_h == self.min_h;
        if !base_is_min {
            w -= self.base_w as i32;
            h -= self.base_h as i32;
        }

        if self.min_aspect > 0.0 && self.max_aspect > 0.0 && w > 0 && h > 0 {
            let ratio = w as f32 / h as f32;
            if ratio > self.max_aspect {
                w = (h as f32 * self.max_aspect + 0.5) as i32;
            } else if ratio < self.min_aspect {
                h = (w as f32 / self.min_aspect + 0.5) as i32;
            }
        }

        if base_is_min {
            w -= self.base_w as i32;
            h -= self.base_h as i32;
        }

        if self.inc_w > 0 {
            w -= w.rem_euclid(self.inc_w as i32);
        }
        if self.inc_h > 0 {
            h -= h.rem_euclid(self.inc_h as i32);
        }

        w = std::cmp::max(w + self.base_w as i32, self.min_w as i32);
        h = std::cmp::max(h + self.base_h as i32, self.min_h as i32);

        if self.max_w > 0 {
            w = std::cmp::min(w, self.max_w as i32);
        }
        if self.max_h > 0 {
            h = std::cmp::min(h, self.max_h as i32);
        }

        (std::cmp::max(w, 1) as u32, std::cmp::max(h, 1) as u32)
    }
}

/// The state of a single managed top level window.
///
/// A client is owned by exactly one [Monitor] at a time: `mon` is the index
/// of that monitor and is updated atomically with membership of the
/// monitor's client and stacking orders.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    /// The X window being managed
    pub id: Xid,
    /// Current display name, refreshed from name properties
    pub name: String,
    /// Workspace membership bitmask
    pub tags: u32,
    /// Index of the owning monitor
    pub mon: usize,
    /// Current content geometry
    pub rect: Rect,
    /// Geometry prior to the most recent resize (fullscreen restore point)
    pub old_rect: Rect,
    /// Current border width in pixels
    pub bw: u32,
    /// Border width prior to fullscreen / at manage time
    pub old_bw: u32,
    /// Boolean state flags
    pub flags: ClientFlags,
    /// Constraints derived from WM_NORMAL_HINTS
    pub hints: SizeHints,
}

impl Client {
    /// Create a new client for a window with the given initial geometry.
    ///
    /// `old_bw` is the border width the window had before being managed so
    /// that it can be restored when the window is unmanaged.
    pub fn new(id: Xid, rect: Rect, old_bw: u32, bw: u32) -> Self {
        Self {
            id,
            name: BROKEN.to_owned(),
            tags: 0,
            mon: 0,
            rect,
            old_rect: rect,
            bw,
            old_bw,
            flags: ClientFlags::empty(),
            hints: SizeHints::default(),
        }
    }

    /// Update the display name, substituting the broken sentinel for
    /// missing or empty values.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = match name {
            Some(s) if !s.is_empty() => s,
            _ => BROKEN.to_owned(),
        };
    }

    /// Width including both borders.
    pub fn outer_w(&self) -> u32 {
        self.rect.w + 2 * self.bw
    }

    /// Height including both borders.
    pub fn outer_h(&self) -> u32 {
        self.rect.h + 2 * self.bw
    }

    pub fn is_floating(&self) -> bool {
        self.flags.contains(ClientFlags::FLOATING)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.flags.contains(ClientFlags::FULLSCREEN)
    }

    pub fn is_urgent(&self) -> bool {
        self.flags.contains(ClientFlags::URGENT)
    }

    pub fn never_focus(&self) -> bool {
        self.flags.contains(ClientFlags::NEVER_FOCUS)
    }

    /// Whether this client is shown under the monitor's active tag set.
    pub fn is_visible_on(&self, m: &Monitor) -> bool {
        self.tags & m.active_tags() != 0
    }

    /// Visible and participating in the tiled layout.
    pub fn is_tiled_on(&self, m: &Monitor) -> bool {
        !self.is_floating() && self.is_visible_on(m)
    }

    /// Resolve a requested geometry to the final geometry that should be
    /// applied, clamping the position on screen and optionally applying
    /// size hints.
    ///
    /// In interactive mode the position is clamped so that at least part of
    /// the window stays on the physical screen (`screen_w` x `screen_h`);
    /// otherwise the window is kept within the monitor's usable rect.
    /// `min_dim` is the floor applied to both dimensions after clamping
    /// (the bar height in practice). The result always has a size of at
    /// least 1x1.
    pub fn resolve_resize(
        &self,
        req: Rect,
        m: &Monitor,
        screen_w: u32,
        screen_h: u32,
        min_dim: u32,
        interact: bool,
        apply_hints: bool,
    ) -> Rect {
        let mut x = req.x;
        let mut y = req.y;
        let mut w = std::cmp::max(1, req.w as i32);
        let mut h = std::cmp::max(1, req.h as i32);
        let bw = self.bw as i32;

        if interact {
            if x > screen_w as i32 {
                x = screen_w as i32 - (w + 2 * bw);
            }
            if y > screen_h as i32 {
                y = screen_h as i32 - (h + 2 * bw);
            }
            if x + w + 2 * bw < 0 {
                x = 0;
            }
            if y + h + 2 * bw < 0 {
                y = 0;
            }
        } else {
            let wr = m.w_rect;
            if x >= wr.right() {
                x = wr.right() - (w + 2 * bw);
            }
            if y >= wr.bottom() {
                y = wr.bottom() - (h + 2 * bw);
            }
            if x + w + 2 * bw <= wr.x {
                x = wr.x;
            }
            if y + h + 2 * bw <= wr.y {
                y = wr.y;
            }
        }

        w = std::cmp::max(w, min_dim as i32);
        h = std::cmp::max(h, min_dim as i32);

        let (w, h) = if apply_hints {
            self.hints.constrain(w, h)
        } else {
            (std::cmp::max(w, 1) as u32, std::cmp::max(h, 1) as u32)
        };

        Rect { x, y, w, h }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn hints() -> SizeHints {
        SizeHints {
            base_w: 2,
            base_h: 4,
            inc_w: 10,
            inc_h: 10,
            min_w: 12,
            min_h: 14,
            max_w: 102,
            max_h: 104,
            min_aspect: 0.0,
            max_aspect: 0.0,
        }
    }

    #[test_case(57, 59, 52, 54; "snaps down to increments")]
    #[test_case(5, 5, 12, 14; "clamped up to min size")]
    #[test_case(500, 500, 102, 104; "clamped down to max size")]
    #[test_case(52, 54, 52, 54; "already aligned")]
    #[test]
    fn constrain_applies_base_and_increments(w: i32, h: i32, exp_w: u32, exp_h: u32) {
        // 57 - base 2 = 55, snapped to 50, restored to 52
        assert_eq!(hints().constrain(w, h), (exp_w, exp_h));
    }

    #[test_case(300, 100, 200, 100; "wider than max aspect")]
    #[test_case(100, 300, 100, 200; "taller than min aspect")]
    #[test_case(150, 100, 150, 100; "within bounds")]
    #[test]
    fn constrain_applies_aspect_bounds(w: i32, h: i32, exp_w: u32, exp_h: u32) {
        let hints = SizeHints {
            min_aspect: 0.5,
            max_aspect: 2.0,
            ..SizeHints::default()
        };

        assert_eq!(hints.constrain(w, h), (exp_w, exp_h));
    }

    #[test]
    fn constrain_never_returns_zero() {
        let hints = SizeHints {
            inc_w: 100,
            inc_h: 100,
            ..SizeHints::default()
        };

        let (w, h) = hints.constrain(50, 50);
        assert!(w >= 1 && h >= 1);
    }

    #[test_case(100, 100, 100, 100, true; "fixed when min eq max")]
    #[test_case(100, 100, 50, 50, false; "resizable range")]
    #[test_case(0, 0, 0, 0, false; "unset")]
    #[test]
    fn is_fixed(max_w: u32, max_h: u32, min_w: u32, min_h: u32, expected: bool) {
        let hints = SizeHints {
            max_w,
            max_h,
            min_w,
            min_h,
            ..SizeHints::default()
        };

        assert_eq!(hints.is_fixed(), expected);
    }

    #[test]
    fn set_name_falls_back_to_broken() {
        let mut c = Client::new(Xid(1), Rect::new(0, 0, 100, 100), 1, 2);

        c.set_name(Some("st".to_owned()));
        assert_eq!(c.name, "st");

        c.set_name(Some(String::new()));
        assert_eq!(c.name, BROKEN);

        c.set_name(None);
        assert_eq!(c.name, BROKEN);
    }

    #[test]
    fn resolve_resize_clamps_to_minimum_size() {
        let m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let c = Client::new(Xid(1), Rect::new(0, 0, 100, 100), 1, 1);

        let r = c.resolve_resize(Rect::new(10, 10, 0, 0), &m, 1000, 600, 0, false, false);

        assert_eq!((r.w, r.h), (1, 1));
    }

    #[test]
    fn resolve_resize_keeps_window_inside_usable_rect() {
        let m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let c = Client::new(Xid(1), Rect::new(0, 0, 100, 100), 1, 1);

        // Entirely off the right hand edge: pulled back on screen
        let r = c.resolve_resize(Rect::new(2000, 0, 100, 100), &m, 1000, 600, 0, false, false);
        assert_eq!(r.x, 1000 - (100 + 2));

        // Entirely off the left hand edge: snapped to the usable origin
        let r = c.resolve_resize(Rect::new(-500, 0, 100, 100), &m, 1000, 600, 0, false, false);
        assert_eq!(r.x, 0);
    }

    #[test]
    fn resolve_resize_interactive_allows_partial_overhang() {
        let m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let c = Client::new(Xid(1), Rect::new(0, 0, 100, 100), 1, 1);

        // Partially off screen is fine while dragging
        let r = c.resolve_resize(Rect::new(950, 0, 100, 100), &m, 1000, 600, 0, true, false);
        assert_eq!(r.x, 950);

        // Fully off the left is pulled back to the origin
        let r = c.resolve_resize(Rect::new(-500, 0, 100, 100), &m, 1000, 600, 0, true, false);
        assert_eq!(r.x, 0);
    }
}
