//! Per-monitor workspace state
use crate::{
    layout::LayoutKind,
    pure::{client::ClientMap, geometry::Rect},
    Xid,
};

/// The state of a single physical output.
///
/// A monitor owns two orderings over the same set of clients: `clients` is
/// insertion ordered (used for layout traversal and master / stack
/// partitioning) and `stack` is most-recently-used ordered (used for focus
/// fallback and z-ordering). The two always contain the same members.
///
/// Tag and layout selection are both double buffered: two slots plus a
/// selector bit, giving a one step "return to previous" for each.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    /// Ordinal number, stable for the lifetime of the monitor
    pub num: i32,
    /// Cached layout symbol for display in the bar
    pub ltsymbol: String,
    /// Proportion of the usable width given to the master column
    pub mfact: f32,
    /// Number of clients tiled into the master column
    pub nmaster: u32,
    /// y position of the bar window
    pub bar_y: i32,
    /// Whether space is reserved for the bar
    pub show_bar: bool,
    /// Whether the bar is at the top of the screen
    pub top_bar: bool,
    /// The bar window for this monitor
    pub bar_win: Xid,
    /// Full output bounds
    pub s_rect: Rect,
    /// Usable bounds (output minus the bar)
    pub w_rect: Rect,
    /// Gap between tiled windows in pixels
    pub gap: u32,
    /// Insertion ordered client collection (most recently attached first)
    pub clients: Vec<Xid>,
    /// Focus history over the same clients (most recently used first)
    pub stack: Vec<Xid>,
    /// The selected client, if any; always visible when set
    pub sel: Option<Xid>,
    sel_tags: usize,
    tagset: [u32; 2],
    sel_lt: usize,
    layouts: [LayoutKind; 2],
}

impl Monitor {
    /// Create a new monitor with the given defaults.
    ///
    /// Geometry is set separately when reconciling against the output
    /// topology.
    pub fn new(
        num: i32,
        layouts: [LayoutKind; 2],
        mfact: f32,
        nmaster: u32,
        gap: u32,
        show_bar: bool,
        top_bar: bool,
    ) -> Self {
        Self {
            num,
            ltsymbol: layouts[0].symbol().to_owned(),
            mfact,
            nmaster,
            bar_y: 0,
            show_bar,
            top_bar,
            bar_win: Xid(0),
            s_rect: Rect::default(),
            w_rect: Rect::default(),
            gap,
            clients: Vec::new(),
            stack: Vec::new(),
            sel: None,
            sel_tags: 0,
            tagset: [1, 1],
            sel_lt: 0,
            layouts,
        }
    }

    /// The currently viewed tag mask.
    pub fn active_tags(&self) -> u32 {
        self.tagset[self.sel_tags]
    }

    /// Flip to the other tag slot and, for a non zero mask, view it.
    ///
    /// A zero mask only flips the slot, giving "return to the previous
    /// view". Callers are responsible for masking to the valid tag range
    /// and for skipping the call when the mask already matches.
    pub fn view(&mut self, mask: u32) {
        self.sel_tags ^= 1;
        if mask != 0 {
            self.tagset[self.sel_tags] = mask;
        }
    }

    /// Replace the active tag mask in place (no slot flip).
    pub fn set_active_tags(&mut self, mask: u32) {
        self.tagset[self.sel_tags] = mask;
    }

    /// The currently active layout.
    pub fn layout(&self) -> LayoutKind {
        self.layouts[self.sel_lt]
    }

    /// Select a layout.
    ///
    /// `None` flips to the other layout slot without assigning ("toggle
    /// layout"); passing the layout that is already active refreshes the
    /// symbol without flipping.
    pub fn set_layout(&mut self, layout: Option<LayoutKind>) {
        match layout {
            Some(l) if l == self.layout() => (),
            Some(l) => {
                self.sel_lt ^= 1;
                self.layouts[self.sel_lt] = l;
            }
            None => self.sel_lt ^= 1,
        }

        self.ltsymbol = self.layout().symbol().to_owned();
    }

    /// Add a client to the head of the insertion order.
    ///
    /// The newest client becomes the first master candidate.
    pub fn attach(&mut self, id: Xid) {
        self.clients.insert(0, id);
    }

    /// Add a client to the head of the focus history.
    pub fn attach_stack(&mut self, id: Xid) {
        self.stack.insert(0, id);
    }

    /// Remove a client from the insertion order.
    pub fn detach(&mut self, id: Xid) {
        self.clients.retain(|&c| c != id);
    }

    /// Remove a client from the focus history. If it was the selected
    /// client, selection falls back to the most recently used client that
    /// is still visible.
    pub fn detach_stack(&mut self, id: Xid, clients: &ClientMap) {
        self.stack.retain(|&c| c != id);

        if self.sel == Some(id) {
            self.sel = self.first_visible_in_stack(clients);
        }
    }

    /// The most recently used client that is visible under the active tags.
    pub fn first_visible_in_stack(&self, clients: &ClientMap) -> Option<Xid> {
        self.stack
            .iter()
            .copied()
            .find(|id| clients.get(id).map(|c| c.is_visible_on(self)).unwrap_or(false))
    }

    /// Clients participating in the tiled layout, in insertion order.
    pub fn tiled_clients<'a>(&'a self, clients: &'a ClientMap) -> impl Iterator<Item = Xid> + 'a {
        self.clients
            .iter()
            .copied()
            .filter(move |id| clients.get(id).map(|c| c.is_tiled_on(self)).unwrap_or(false))
    }

    /// The number of clients participating in the tiled layout.
    pub fn n_tiled(&self, clients: &ClientMap) -> usize {
        self.tiled_clients(clients).count()
    }

    /// Reset both rects to the given output geometry.
    pub fn set_geometry(&mut self, r: Rect) {
        self.s_rect = r;
        self.w_rect = r;
    }

    /// Recompute the usable rect and bar position from the screen rect.
    pub fn update_bar_pos(&mut self, bar_h: u32) {
        self.w_rect.y = self.s_rect.y;
        self.w_rect.h = self.s_rect.h;

        if self.show_bar {
            self.w_rect.h -= bar_h;
            if self.top_bar {
                self.bar_y = self.w_rect.y;
                self.w_rect.y += bar_h as i32;
            } else {
                self.bar_y = self.w_rect.y + self.w_rect.h as i32;
            }
        } else {
            self.bar_y = -(bar_h as i32);
        }
    }

    #[cfg(test)]
    pub(crate) fn test_monitor(num: i32, r: Rect) -> Self {
        let mut m = Self::new(
            num,
            [LayoutKind::Tile, LayoutKind::Float],
            0.55,
            1,
            0,
            false,
            true,
        );
        m.set_geometry(r);

        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::client::Client;
    use simple_test_case::test_case;

    fn client(id: u32, tags: u32) -> Client {
        let mut c = Client::new(Xid(id), Rect::new(0, 0, 100, 100), 1, 1);
        c.tags = tags;
        c
    }

    #[test]
    fn attach_prepends() {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));

        for id in 1..=3 {
            m.attach(Xid(id));
        }

        assert_eq!(m.clients, vec![Xid(3), Xid(2), Xid(1)]);
    }

    #[test]
    fn view_round_trips_to_previous_tags() {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));

        m.view(0b10);
        assert_eq!(m.active_tags(), 0b10);

        m.view(0b100);
        assert_eq!(m.active_tags(), 0b100);

        // zero mask flips back to the previous view
        m.view(0);
        assert_eq!(m.active_tags(), 0b10);
    }

    #[test]
    fn set_layout_toggle_semantics() {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        assert_eq!(m.layout(), LayoutKind::Tile);

        // None flips to the secondary slot
        m.set_layout(None);
        assert_eq!(m.layout(), LayoutKind::Float);
        assert_eq!(m.ltsymbol, LayoutKind::Float.symbol());

        // selecting a new layout flips the slot and assigns
        m.set_layout(Some(LayoutKind::Monocle));
        assert_eq!(m.layout(), LayoutKind::Monocle);

        // re-selecting the active layout is a no-op flip wise
        m.set_layout(Some(LayoutKind::Monocle));
        assert_eq!(m.layout(), LayoutKind::Monocle);
        m.set_layout(None);
        assert_eq!(m.layout(), LayoutKind::Float);
    }

    #[test]
    fn detach_stack_falls_back_to_first_visible() {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let mut cm = ClientMap::new();

        // tag 1 is the active view; client 2 is on another tag
        for (id, tags) in [(1, 1), (2, 2), (3, 1)] {
            cm.insert(Xid(id), client(id, tags));
            m.attach(Xid(id));
            m.attach_stack(Xid(id));
        }
        m.sel = Some(Xid(3));

        // stack order is [3, 2, 1]: removing 3 skips invisible 2
        m.detach_stack(Xid(3), &cm);

        assert_eq!(m.sel, Some(Xid(1)));
        assert_eq!(m.stack, vec![Xid(2), Xid(1)]);
    }

    #[test]
    fn detach_stack_clears_selection_when_nothing_visible() {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let mut cm = ClientMap::new();

        cm.insert(Xid(1), client(1, 2));
        cm.insert(Xid(2), client(2, 1));
        m.attach(Xid(1));
        m.attach_stack(Xid(1));
        m.attach(Xid(2));
        m.attach_stack(Xid(2));
        m.sel = Some(Xid(2));

        m.detach_stack(Xid(2), &cm);

        assert_eq!(m.sel, None);
    }

    #[test_case(true, true, Rect::new(0, 0, 1000, 584), 0; "top bar")]
    #[test_case(true, false, Rect::new(0, 0, 1000, 584), 584; "bottom bar")]
    #[test_case(false, true, Rect::new(0, 0, 1000, 600), -16; "hidden bar")]
    #[test]
    fn update_bar_pos(show: bool, top: bool, expected_w_rect: Rect, expected_bar_y: i32) {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        m.show_bar = show;
        m.top_bar = top;

        m.update_bar_pos(16);

        assert_eq!(m.w_rect, expected_w_rect);
        assert_eq!(m.bar_y, expected_bar_y);
    }

    #[test]
    fn stack_and_clients_stay_permutations() {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let mut cm = ClientMap::new();

        for id in 1..=5 {
            cm.insert(Xid(id), client(id, 1));
            m.attach(Xid(id));
            m.attach_stack(Xid(id));
        }

        m.detach(Xid(3));
        m.detach_stack(Xid(3), &cm);

        let mut a = m.clients.clone();
        let mut b = m.stack.clone();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }
}
