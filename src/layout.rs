//! Layout algorithms for arranging tiled clients
//!
//! Layouts are pure: they read the tiled subset of a monitor's client
//! collection (insertion order) and return the final geometry for each
//! client. Geometry is resolved through the same size hint constraint path
//! as any other resize so that the running column offsets account for the
//! size a client will actually take.
use crate::{
    pure::{client::ClientMap, geometry::Rect, monitor::Monitor},
    Xid,
};

/// The available arrangement algorithms.
///
/// Dispatch is an explicit match: [LayoutKind::Float] simply has no arrange
/// step rather than being a null function pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Master / stack tiling in two columns
    Tile,
    /// Every tiled client fills the usable rect
    Monocle,
    /// No arrangement: clients position themselves
    Float,
}

impl LayoutKind {
    /// The symbol shown in the bar for this layout.
    pub fn symbol(&self) -> &'static str {
        match self {
            LayoutKind::Tile => "[]=",
            LayoutKind::Monocle => "[M]",
            LayoutKind::Float => "><>",
        }
    }

    /// Whether this layout imposes geometry on tiled clients.
    pub fn arranges(&self) -> bool {
        !matches!(self, LayoutKind::Float)
    }
}

/// Compute the final geometry for every tiled client on `m`.
///
/// `screen` is the full X screen size and `bar_h` the bar height, both of
/// which feed the defensive clamping in the resize path. `respect_hints`
/// applies WM_NORMAL_HINTS constraints to tiled clients.
pub fn layout_positions(
    kind: LayoutKind,
    m: &Monitor,
    clients: &ClientMap,
    screen: (u32, u32),
    bar_h: u32,
    respect_hints: bool,
) -> Vec<(Xid, Rect)> {
    match kind {
        LayoutKind::Tile => tile(m, clients, screen, bar_h, respect_hints),
        LayoutKind::Monocle => monocle(m, clients, screen, bar_h, respect_hints),
        LayoutKind::Float => Vec::new(),
    }
}

/// Master / stack tiling.
///
/// The first `nmaster` clients (insertion order) split the master column
/// vertically, the rest split the stack column to its right. At each step
/// the remaining vertical space is divided evenly between the remaining
/// members of the column, so rounding error accumulates on the last client
/// of each column.
fn tile(
    m: &Monitor,
    clients: &ClientMap,
    screen: (u32, u32),
    bar_h: u32,
    respect_hints: bool,
) -> Vec<(Xid, Rect)> {
    let tiled: Vec<Xid> = m.tiled_clients(clients).collect();
    let n = tiled.len();
    if n == 0 {
        return Vec::new();
    }

    let wr = m.w_rect;
    let gap = m.gap as i32;
    let nmaster = m.nmaster as usize;

    let mw: i32 = if n > nmaster {
        if nmaster > 0 {
            (wr.w as f32 * m.mfact) as i32
        } else {
            0
        }
    } else {
        wr.w as i32 - gap
    };

    let mut positions = Vec::with_capacity(n);
    let (mut my, mut ty) = (gap, gap);

    for (i, id) in tiled.into_iter().enumerate() {
        let c = &clients[&id];
        let bw = c.bw as i32;

        let req = if i < nmaster {
            let h = (wr.h as i32 - my) / (nmaster.min(n) - i) as i32 - gap;
            Rect::new(
                wr.x + gap,
                wr.y + my,
                (mw - 2 * bw - gap).max(1) as u32,
                (h - 2 * bw).max(1) as u32,
            )
        } else {
            let h = (wr.h as i32 - ty) / (n - i) as i32 - gap;
            Rect::new(
                wr.x + mw + gap,
                wr.y + ty,
                (wr.w as i32 - mw - 2 * bw - 2 * gap).max(1) as u32,
                (h - 2 * bw).max(1) as u32,
            )
        };

        let r = c.resolve_resize(req, m, screen.0, screen.1, bar_h, false, respect_hints);
        let outer_h = r.h as i32 + 2 * bw;

        // advance the column offset unless doing so would overflow the
        // usable rect (the final client in a column absorbs the remainder)
        if i < nmaster {
            if my + outer_h + gap < wr.h as i32 {
                my += outer_h + gap;
            }
        } else if ty + outer_h + gap < wr.h as i32 {
            ty += outer_h + gap;
        }

        positions.push((id, r));
    }

    positions
}

/// Monocle: every tiled client is sized to the full usable rect minus its
/// own borders.
fn monocle(
    m: &Monitor,
    clients: &ClientMap,
    screen: (u32, u32),
    bar_h: u32,
    respect_hints: bool,
) -> Vec<(Xid, Rect)> {
    let wr = m.w_rect;

    m.tiled_clients(clients)
        .map(|id| {
            let c = &clients[&id];
            let req = Rect::new(
                wr.x,
                wr.y,
                (wr.w as i32 - 2 * c.bw as i32).max(1) as u32,
                (wr.h as i32 - 2 * c.bw as i32).max(1) as u32,
            );

            (
                id,
                c.resolve_resize(req, m, screen.0, screen.1, bar_h, false, respect_hints),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::client::Client;
    use quickcheck_macros::quickcheck;
    use simple_test_case::test_case;

    const SCREEN: (u32, u32) = (1000, 600);

    fn monitor_with_clients(n: u32, nmaster: u32, gap: u32, bw: u32) -> (Monitor, ClientMap) {
        let mut m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        m.nmaster = nmaster;
        m.gap = gap;
        m.mfact = 0.5;

        let mut cm = ClientMap::new();
        for id in 1..=n {
            let mut c = Client::new(Xid(id), Rect::new(0, 0, 100, 100), bw, bw);
            c.tags = 1;
            cm.insert(Xid(id), c);
            m.attach(Xid(id));
            m.attach_stack(Xid(id));
        }

        (m, cm)
    }

    #[test]
    fn tile_three_clients_master_and_stack() {
        let (m, cm) = monitor_with_clients(3, 1, 5, 1);

        let positions = layout_positions(LayoutKind::Tile, &m, &cm, SCREEN, 0, false);

        // insertion order is newest first: 3 is the master
        assert_eq!(
            positions,
            vec![
                (Xid(3), Rect::new(5, 5, 493, 588)),
                (Xid(2), Rect::new(505, 5, 488, 290)),
                (Xid(1), Rect::new(505, 302, 488, 291)),
            ]
        );
    }

    #[test_case(1; "single client")]
    #[test_case(2; "master plus one")]
    #[test_case(5; "master plus several")]
    #[test]
    fn tile_is_idempotent(n: u32) {
        let (m, mut cm) = monitor_with_clients(n, 1, 5, 1);

        let first = layout_positions(LayoutKind::Tile, &m, &cm, SCREEN, 0, false);
        for &(id, r) in &first {
            cm.get_mut(&id).unwrap().rect = r;
        }
        let second = layout_positions(LayoutKind::Tile, &m, &cm, SCREEN, 0, false);

        assert_eq!(first, second);
    }

    #[test]
    fn tile_with_no_tiled_clients_is_a_no_op() {
        let (mut m, mut cm) = monitor_with_clients(2, 1, 5, 1);
        for c in cm.values_mut() {
            c.flags.insert(crate::pure::ClientFlags::FLOATING);
        }
        m.sel = None;

        assert!(layout_positions(LayoutKind::Tile, &m, &cm, SCREEN, 0, false).is_empty());
    }

    #[test]
    fn monocle_fills_usable_rect_per_client_border() {
        let (m, mut cm) = monitor_with_clients(2, 1, 5, 1);
        cm.get_mut(&Xid(2)).unwrap().bw = 4;

        let positions = layout_positions(LayoutKind::Monocle, &m, &cm, SCREEN, 0, false);

        assert_eq!(
            positions,
            vec![
                (Xid(2), Rect::new(0, 0, 992, 592)),
                (Xid(1), Rect::new(0, 0, 998, 598)),
            ]
        );
    }

    #[test]
    fn float_layout_imposes_nothing() {
        let (m, cm) = monitor_with_clients(3, 1, 5, 1);

        assert!(layout_positions(LayoutKind::Float, &m, &cm, SCREEN, 0, false).is_empty());
    }

    #[quickcheck]
    fn tile_conserves_master_and_stack_partition(n: u8, nmaster: u8) -> bool {
        let n = (n % 16) as usize;
        let nmaster = (nmaster % 5) as u32;
        let (m, cm) = monitor_with_clients(n as u32, nmaster, 0, 0);

        let positions = layout_positions(LayoutKind::Tile, &m, &cm, SCREEN, 0, false);
        if positions.len() != n {
            return false;
        }

        let wr = m.w_rect;
        let expected_masters = n.min(nmaster as usize);
        let in_master = positions.iter().filter(|(_, r)| r.x == wr.x).count();

        if n > nmaster as usize && nmaster > 0 {
            // two columns: masters at the left edge, stack to their right
            // with no horizontal overlap
            let master_right = positions
                .iter()
                .take(expected_masters)
                .map(|(_, r)| r.right())
                .max()
                .unwrap_or(wr.x);
            let stack_left = positions
                .iter()
                .skip(expected_masters)
                .map(|(_, r)| r.x)
                .min()
                .unwrap_or(wr.right());

            in_master == expected_masters && master_right <= stack_left
        } else {
            // single column: everything shares the left edge
            in_master == n
        }
    }

    #[quickcheck]
    fn tiled_geometry_is_always_at_least_one_pixel(n: u8, nmaster: u8, gap: u8) -> bool {
        let n = (n % 16) as u32;
        let (m, cm) = monitor_with_clients(n, (nmaster % 5) as u32, gap as u32, 2);

        layout_positions(LayoutKind::Tile, &m, &cm, SCREEN, 0, false)
            .iter()
            .all(|(_, r)| r.w >= 1 && r.h >= 1)
    }
}
