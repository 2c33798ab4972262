//! Setting up and responding to user defined key / mouse bindings
use crate::{core::WindowManager, x::XConn, Result};
use std::collections::HashMap;
use strum::{EnumIter, IntoEnumIterator};

/// Some action to be run in response to a key binding.
pub type KeyAction<X> = Box<dyn FnMut(&mut WindowManager<X>) -> Result<()>>;

/// An action to be run in response to a mouse binding.
///
/// The second argument is the tag mask under the click for bindings
/// targetting the bar's tag cells, `None` otherwise.
pub type MouseAction<X> = Box<dyn FnMut(&mut WindowManager<X>, Option<u32>) -> Result<()>>;

/// User defined key bindings.
pub type KeyBindings<X> = HashMap<KeyPress, KeyAction<X>>;

/// User defined mouse bindings.
pub type MouseBindings<X> = HashMap<MouseBinding, MouseAction<X>>;

/// A keysym along with the held modifier mask.
///
/// Masks are stored and compared in cleaned form: see [clean_mask].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct KeyPress {
    /// The held modifier mask
    pub mask: u16,
    /// The X keysym that was pressed
    pub keysym: u32,
}

impl KeyPress {
    /// Create a new KeyPress from a keysym and set of modifiers.
    pub fn new(modifiers: &[ModifierKey], keysym: u32) -> Self {
        Self {
            mask: modifiers.iter().fold(0, |acc, &m| acc | u16::from(m)),
            keysym,
        }
    }
}

/// Known modifier keys for bindings
#[derive(Debug, EnumIter, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ModifierKey {
    /// Control
    Ctrl,
    /// Alt
    Alt,
    /// Shift
    Shift,
    /// Meta / super / windows
    Meta,
}

impl ModifierKey {
    /// Whether this modifier is part of the given mask.
    pub fn was_held(&self, mask: u16) -> bool {
        mask & u16::from(*self) > 0
    }
}

impl From<ModifierKey> for u16 {
    fn from(m: ModifierKey) -> u16 {
        match m {
            ModifierKey::Shift => MOD_SHIFT,
            ModifierKey::Ctrl => MOD_CTRL,
            ModifierKey::Alt => MOD_1,
            ModifierKey::Meta => MOD_4,
        }
    }
}

/// The modifiers held in the given mask, for diagnostics.
pub fn held_modifiers(mask: u16) -> Vec<ModifierKey> {
    ModifierKey::iter().filter(|m| m.was_held(mask)).collect()
}

/// Known mouse buttons for binding actions
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum MouseButton {
    /// 1
    Left,
    /// 2
    Middle,
    /// 3
    Right,
    /// 4
    ScrollUp,
    /// 5
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

impl MouseButton {
    /// Map an X button detail to a known button.
    pub fn from_detail(detail: u8) -> Option<Self> {
        match detail {
            1 => Some(Self::Left),
            2 => Some(Self::Middle),
            3 => Some(Self::Right),
            4 => Some(Self::ScrollUp),
            5 => Some(Self::ScrollDown),
            _ => None,
        }
    }
}

/// Where on the screen a button press landed.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ClickTarget {
    /// One of the tag cells in the bar
    TagBar,
    /// The layout symbol in the bar
    LayoutSymbol,
    /// The status text section of the bar
    StatusText,
    /// The window title section of the bar
    WinTitle,
    /// A managed client window
    ClientWin,
    /// The root window
    RootWin,
}

/// A mouse button press on a particular click target with a set of held
/// modifiers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct MouseBinding {
    /// Where the click must land
    pub target: ClickTarget,
    /// The button pressed
    pub button: MouseButton,
    /// Cleaned modifier mask that must be held
    pub mask: u16,
}

impl MouseBinding {
    /// Create a new MouseBinding from a target, button and modifiers.
    pub fn new(target: ClickTarget, button: MouseButton, modifiers: &[ModifierKey]) -> Self {
        Self {
            target,
            button,
            mask: modifiers.iter().fold(0, |acc, &m| acc | u16::from(m)),
        }
    }
}

/// A button / modifier pair that should be grabbed on client windows.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ButtonSpec {
    /// The button to grab
    pub button: MouseButton,
    /// The cleaned modifier mask to grab it with
    pub mask: u16,
}

pub(crate) const MOD_SHIFT: u16 = 1 << 0;
pub(crate) const MOD_LOCK: u16 = 1 << 1;
pub(crate) const MOD_CTRL: u16 = 1 << 2;
pub(crate) const MOD_1: u16 = 1 << 3;
pub(crate) const MOD_2: u16 = 1 << 4;
pub(crate) const MOD_3: u16 = 1 << 5;
pub(crate) const MOD_4: u16 = 1 << 6;
pub(crate) const MOD_5: u16 = 1 << 7;

/// Strip lock and numlock state from a modifier mask and restrict it to
/// the modifiers that can take part in a binding.
pub fn clean_mask(mask: u16, numlock: u16) -> u16 {
    mask & !(numlock | MOD_LOCK)
        & (MOD_SHIFT | MOD_CTRL | MOD_1 | MOD_2 | MOD_3 | MOD_4 | MOD_5)
}

/// X keysym values for the default key bindings.
///
/// Printable ascii keysyms are their ascii value; the function keys used
/// here live in the 0xff00 range.
pub mod keysym {
    #![allow(missing_docs)]
    pub const XK_RETURN: u32 = 0xff0d;
    pub const XK_TAB: u32 = 0xff09;
    pub const XK_SPACE: u32 = 0x0020;
    pub const XK_COMMA: u32 = 0x002c;
    pub const XK_MINUS: u32 = 0x002d;
    pub const XK_PERIOD: u32 = 0x002e;
    pub const XK_0: u32 = 0x0030;
    pub const XK_1: u32 = 0x0031;
    pub const XK_9: u32 = 0x0039;
    pub const XK_EQUAL: u32 = 0x003d;
    pub const XK_B: u32 = 0x0062;
    pub const XK_C: u32 = 0x0063;
    pub const XK_D: u32 = 0x0064;
    pub const XK_F: u32 = 0x0066;
    pub const XK_H: u32 = 0x0068;
    pub const XK_I: u32 = 0x0069;
    pub const XK_J: u32 = 0x006a;
    pub const XK_K: u32 = 0x006b;
    pub const XK_L: u32 = 0x006c;
    pub const XK_M: u32 = 0x006d;
    pub const XK_P: u32 = 0x0070;
    pub const XK_Q: u32 = 0x0071;
    pub const XK_T: u32 = 0x0074;
    pub const XK_NUM_LOCK: u32 = 0xff7f;
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    const NUMLOCK: u16 = MOD_2;

    #[test_case(MOD_1 | MOD_SHIFT, MOD_1 | MOD_SHIFT; "clean mask unchanged")]
    #[test_case(MOD_1 | MOD_LOCK, MOD_1; "caps lock stripped")]
    #[test_case(MOD_1 | NUMLOCK, MOD_1; "numlock stripped")]
    #[test_case(MOD_1 | MOD_LOCK | NUMLOCK, MOD_1; "both stripped")]
    #[test]
    fn clean_mask_strips_lock_state(mask: u16, expected: u16) {
        assert_eq!(clean_mask(mask, NUMLOCK), expected);
    }

    #[test]
    fn held_modifiers_decodes_mask() {
        let mods = held_modifiers(MOD_1 | MOD_SHIFT);

        assert!(mods.contains(&ModifierKey::Alt));
        assert!(mods.contains(&ModifierKey::Shift));
        assert_eq!(mods.len(), 2);
    }

    #[test]
    fn keypress_folds_modifiers() {
        let k = KeyPress::new(&[ModifierKey::Alt, ModifierKey::Shift], keysym::XK_Q);

        assert_eq!(k.mask, MOD_1 | MOD_SHIFT);
    }
}
