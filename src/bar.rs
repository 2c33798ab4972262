//! Status bar content assembly.
//!
//! Layout of the bar mirrors its click handling: tag cells on the left,
//! then the layout symbol, the focused window title filling the middle and
//! the status text on the right (selected monitor only). Both rendering
//! and click resolution derive the same cell widths from the [Draw]
//! surface so the two can never disagree.
use crate::{
    core::config::Config,
    draw::Draw,
    pure::{client::ClientMap, geometry::Rect, monitor::Monitor},
    Result,
};

/// The section of the bar a click landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarRegion {
    /// The tag cell at the given index
    Tag(usize),
    /// The layout symbol
    LayoutSymbol,
    /// The status text area
    Status,
    /// The window title area
    Title,
}

/// Render the bar for a single monitor.
pub(crate) fn draw_bar(
    draw: &mut dyn Draw,
    m: &Monitor,
    clients: &ClientMap,
    config: &Config,
    status: &str,
    bar_h: u32,
    is_sel_mon: bool,
) -> Result<()> {
    let lrpad = draw.font_height();
    let boxs = (draw.font_height() / 9) as i32;
    let boxw = draw.font_height() / 6 + 2;

    // status is drawn first so it can be overdrawn by tags later
    let mut tw = 0;
    if is_sel_mon {
        draw.set_scheme(config.normal);
        tw = draw.text_width(status)? + 2; // 2px right padding
        draw.text(
            Rect::new(m.w_rect.w as i32 - tw as i32, 0, tw, bar_h),
            0,
            status,
            false,
        )?;
    }

    let (mut occ, mut urg) = (0u32, 0u32);
    for id in &m.clients {
        if let Some(c) = clients.get(id) {
            occ |= c.tags;
            if c.is_urgent() {
                urg |= c.tags;
            }
        }
    }

    let mut x = 0i32;
    for (i, tag) in config.tags.iter().enumerate() {
        let w = draw.text_width(tag)? + lrpad;
        let bit = 1 << i;
        draw.set_scheme(if m.active_tags() & bit != 0 {
            config.selected
        } else {
            config.normal
        });
        draw.text(Rect::new(x, 0, w, bar_h), lrpad / 2, tag, urg & bit != 0)?;

        if occ & bit != 0 {
            let filled = is_sel_mon
                && m.sel
                    .and_then(|s| clients.get(&s))
                    .map(|c| c.tags & bit != 0)
                    .unwrap_or(false);
            draw.rect(Rect::new(x + boxs, boxs, boxw, boxw), filled, urg & bit != 0)?;
        }

        x += w as i32;
    }

    let blw = draw.text_width(&m.ltsymbol)? + lrpad;
    draw.set_scheme(config.normal);
    x = draw.text(Rect::new(x, 0, blw, bar_h), lrpad / 2, &m.ltsymbol, false)?;

    let rem = m.w_rect.w as i32 - tw as i32 - x;
    if rem > bar_h as i32 {
        match m.sel.and_then(|s| clients.get(&s)) {
            Some(c) => {
                draw.set_scheme(if is_sel_mon {
                    config.selected
                } else {
                    config.normal
                });
                draw.text(Rect::new(x, 0, rem as u32, bar_h), lrpad / 2, &c.name, false)?;
                if c.is_floating() {
                    let fixed = c.flags.contains(crate::pure::ClientFlags::FIXED);
                    draw.rect(Rect::new(x + boxs, boxs, boxw, boxw), fixed, false)?;
                }
            }
            None => {
                draw.set_scheme(config.normal);
                draw.rect(Rect::new(x, 0, rem as u32, bar_h), true, true)?;
            }
        }
    }

    draw.map(m.bar_win, Rect::new(0, 0, m.w_rect.w, bar_h))
}

/// Resolve a click at `click_x` (bar window relative) to a [BarRegion].
pub(crate) fn region_at(
    draw: &mut dyn Draw,
    m: &Monitor,
    config: &Config,
    status: &str,
    click_x: i32,
) -> Result<BarRegion> {
    let lrpad = draw.font_height();

    let mut x = 0i32;
    let mut i = 0;
    loop {
        x += (draw.text_width(&config.tags[i])? + lrpad) as i32;
        if click_x < x {
            break;
        }
        i += 1;
        if i >= config.tags.len() {
            break;
        }
    }

    if i < config.tags.len() {
        return Ok(BarRegion::Tag(i));
    }

    let blw = (draw.text_width(&m.ltsymbol)? + lrpad) as i32;
    if click_x < x + blw {
        Ok(BarRegion::LayoutSymbol)
    } else if click_x > m.w_rect.w as i32 - (draw.text_width(status)? + lrpad) as i32 {
        Ok(BarRegion::Status)
    } else {
        Ok(BarRegion::Title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::StubDraw;
    use simple_test_case::test_case;

    // With StubDraw each char is 7px and lrpad is 14: single char tag
    // cells are 21px wide, so the 9 default tags span 189px and the "[]="
    // layout symbol cell is 35px.
    #[test_case(0, BarRegion::Tag(0); "first tag")]
    #[test_case(20, BarRegion::Tag(0); "end of first tag")]
    #[test_case(21, BarRegion::Tag(1); "second tag")]
    #[test_case(188, BarRegion::Tag(8); "last tag")]
    #[test_case(189, BarRegion::LayoutSymbol; "layout symbol")]
    #[test_case(223, BarRegion::LayoutSymbol; "end of layout symbol")]
    #[test_case(224, BarRegion::Title; "title area")]
    #[test_case(999, BarRegion::Status; "status area")]
    #[test]
    fn click_regions(click_x: i32, expected: BarRegion) {
        let mut draw = StubDraw;
        let m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let config = Config::default();

        // status "esc" is 21px + lrpad: clicks past 1000 - 35 = 965 hit it
        let region = region_at(&mut draw, &m, &config, "esc", click_x).unwrap();

        assert_eq!(region, expected);
    }

    #[test]
    fn draw_bar_runs_against_the_stub_surface() {
        let mut draw = StubDraw;
        let m = Monitor::test_monitor(0, Rect::new(0, 0, 1000, 600));
        let config = Config::default();

        assert!(draw_bar(&mut draw, &m, &ClientMap::new(), &config, "status", 16, true).is_ok());
    }
}
