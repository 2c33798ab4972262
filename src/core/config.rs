//! User facing configuration of the window manager
use crate::{layout::LayoutKind, pure::rules::Rule, Color, ColorScheme, Error, Result};

/// The main user facing configuration details.
///
/// Static tables (placement rules, tag names, colors) are supplied here;
/// key and mouse bindings are passed separately to
/// [WindowManager::run][crate::core::WindowManager::run].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The tag names shown in the bar; at most 31
    pub tags: Vec<String>,
    /// Window border width in pixels
    pub border_px: u32,
    /// Initial gap between tiled windows in pixels
    pub gap_px: u32,
    /// Snap distance in pixels for interactive moves
    pub snap: u32,
    /// Whether space is reserved for the bar
    pub show_bar: bool,
    /// Whether the bar sits at the top of the screen
    pub top_bar: bool,
    /// Initial master area factor
    pub mfact: f32,
    /// Initial number of clients in the master area
    pub nmaster: u32,
    /// Respect size hints in tiled resizals
    pub resize_hints: bool,
    /// Keep focus on fullscreen windows during stack navigation
    pub lock_fullscreen: bool,
    /// Colors for unfocused windows and bar sections
    pub normal: ColorScheme,
    /// Colors for the focused window and selected bar sections
    pub selected: ColorScheme,
    /// Available layouts; the first is the default and the second seeds
    /// the "previous layout" slot
    pub layouts: Vec<LayoutKind>,
    /// Placement rules applied to new clients
    pub rules: Vec<Rule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: (1..=9).map(|n| n.to_string()).collect(),
            border_px: 1,
            gap_px: 5,
            snap: 32,
            show_bar: true,
            top_bar: true,
            mfact: 0.55,
            nmaster: 1,
            resize_hints: true,
            lock_fullscreen: true,
            normal: ColorScheme {
                fg: Color::from(0xbbbbbb),
                bg: Color::from(0x222222),
                border: Color::from(0x444444),
            },
            selected: ColorScheme {
                fg: Color::from(0xeeeeee),
                bg: Color::from(0x005577),
                border: Color::from(0x005577),
            },
            layouts: vec![LayoutKind::Tile, LayoutKind::Float, LayoutKind::Monocle],
            rules: Vec::new(),
        }
    }
}

impl Config {
    /// The bitmask covering every configured tag.
    pub fn tag_mask(&self) -> u32 {
        (1 << self.tags.len()) - 1
    }

    /// The layout pair used to seed a new monitor's layout slots.
    pub(crate) fn initial_layouts(&self) -> [LayoutKind; 2] {
        [self.layouts[0], self.layouts[1 % self.layouts.len()]]
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.tags.is_empty() || self.tags.len() >= 32 {
            return Err(Error::InvalidConfig(
                "between 1 and 31 tags must be configured".to_owned(),
            ));
        }

        if self.layouts.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one layout must be configured".to_owned(),
            ));
        }

        if !(0.05..=0.95).contains(&self.mfact) {
            return Err(Error::InvalidConfig(
                "mfact must be in the range 0.05 -> 0.95".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_tag_mask_covers_nine_tags() {
        assert_eq!(Config::default().tag_mask(), 0b1_1111_1111);
    }

    #[test]
    fn too_many_tags_is_invalid() {
        let config = Config {
            tags: (1..=32).map(|n| n.to_string()).collect(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn single_layout_seeds_both_slots() {
        let config = Config {
            layouts: vec![LayoutKind::Monocle],
            ..Config::default()
        };

        assert_eq!(
            config.initial_layouts(),
            [LayoutKind::Monocle, LayoutKind::Monocle]
        );
    }
}
