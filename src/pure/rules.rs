//! Placement rules for newly managed clients
use crate::pure::monitor::Monitor;

/// A single placement rule, matched by substring containment against a
/// window's class, instance and title. Any unset match field is a wildcard.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Substring required in the WM_CLASS class field
    pub class: Option<String>,
    /// Substring required in the WM_CLASS instance field
    pub instance: Option<String>,
    /// Substring required in the window title
    pub title: Option<String>,
    /// Tag mask ORed into the client's tags on match
    pub tags: u32,
    /// Whether the client should float
    pub floating: bool,
    /// Ordinal of the monitor to place the client on; `None` keeps the
    /// monitor the client started on
    pub monitor: Option<i32>,
}

impl Rule {
    fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        self.class.as_deref().map_or(true, |s| class.contains(s))
            && self.instance.as_deref().map_or(true, |s| instance.contains(s))
            && self.title.as_deref().map_or(true, |s| title.contains(s))
    }
}

/// The placement decided for a new client after rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the monitor the client should be attached to
    pub mon: usize,
    /// The client's initial tag mask; never zero
    pub tags: u32,
    /// Whether the client starts out floating
    pub floating: bool,
}

/// Evaluate every rule in order against a new client.
///
/// Later matches override the floating flag and target monitor while tag
/// masks accumulate. If no rule contributes a tag within the valid range
/// the client falls back to the target monitor's active tag set.
pub fn apply_rules(
    rules: &[Rule],
    class: &str,
    instance: &str,
    title: &str,
    monitors: &[Monitor],
    default_mon: usize,
    tag_mask: u32,
) -> Placement {
    let mut mon = default_mon;
    let mut tags = 0;
    let mut floating = false;

    for rule in rules {
        if !rule.matches(class, instance, title) {
            continue;
        }

        floating = rule.floating;
        tags |= rule.tags;

        if let Some(num) = rule.monitor {
            if let Some(ix) = monitors.iter().position(|m| m.num == num) {
                mon = ix;
            }
        }
    }

    let tags = if tags & tag_mask != 0 {
        tags & tag_mask
    } else {
        monitors[mon].active_tags()
    };

    Placement {
        mon,
        tags,
        floating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::geometry::Rect;
    use simple_test_case::test_case;

    fn monitors() -> Vec<Monitor> {
        (0..2)
            .map(|n| Monitor::test_monitor(n, Rect::new(n * 1000, 0, 1000, 600)))
            .collect()
    }

    fn rule(class: Option<&str>, tags: u32, floating: bool, monitor: Option<i32>) -> Rule {
        Rule {
            class: class.map(String::from),
            tags,
            floating,
            monitor,
            ..Rule::default()
        }
    }

    #[test_case("Gimp", true; "matching class")]
    #[test_case("gimp-2.10", false; "substring match is case sensitive")]
    #[test_case("xterm", false; "non matching class")]
    #[test]
    fn floating_rule(class: &str, expected: bool) {
        let rules = vec![rule(Some("Gimp"), 0, true, None)];
        let mons = monitors();

        let p = apply_rules(&rules, class, "gimp", "GNU Image", &mons, 0, 0b1_1111_1111);

        assert_eq!(p.floating, expected);
    }

    #[test]
    fn tags_accumulate_and_later_rules_override_flags() {
        let rules = vec![
            rule(Some("term"), 0b001, true, None),
            rule(Some("xterm"), 0b100, false, Some(1)),
        ];
        let mons = monitors();

        let p = apply_rules(&rules, "xterm", "xterm", "-", &mons, 0, 0b1111);

        assert_eq!(p.tags, 0b101);
        assert!(!p.floating);
        assert_eq!(p.mon, 1);
    }

    #[test]
    fn unmatched_client_falls_back_to_active_tags() {
        let rules = vec![rule(Some("Gimp"), 0b10, true, None)];
        let mut mons = monitors();
        mons[0].view(0b1000);

        let p = apply_rules(&rules, "xterm", "xterm", "-", &mons, 0, 0b1111);

        assert_eq!(p.tags, 0b1000);
        assert!(!p.floating);
    }

    #[test]
    fn out_of_range_tags_fall_back_to_active_tags() {
        // rule only sets tags outside of the valid mask
        let rules = vec![rule(Some("xterm"), 1 << 20, false, None)];
        let mons = monitors();

        let p = apply_rules(&rules, "xterm", "xterm", "-", &mons, 0, 0b1111);

        assert_eq!(p.tags, mons[0].active_tags());
    }

    #[test]
    fn unknown_monitor_ordinal_is_ignored() {
        let rules = vec![rule(Some("xterm"), 0, false, Some(9))];
        let mons = monitors();

        let p = apply_rules(&rules, "xterm", "xterm", "-", &mons, 0, 0b1111);

        assert_eq!(p.mon, 0);
    }
}
