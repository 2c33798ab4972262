//! escher: a tag-based dynamic tiling window manager for X11.
//!
//! escher manages top level client windows for one or more monitors,
//! grouping them with a bitmask of tags rather than fixed workspaces and
//! arranging the visible clients with a small set of layout algorithms
//! (master/stack tiling, monocle and free floating). All window manager
//! state lives in memory for the lifetime of the process and every
//! mutation is driven by a single blocking X event loop.
//!
//! The crate is split along the protocol seam: everything under [pure] is
//! side effect free data and algorithms, [core] owns the event driven
//! state machine and [x11rb][crate::x11rb] provides the production
//! implementation of the [XConn][crate::x::XConn] trait.
use std::ops::Deref;

pub mod bar;
pub mod core;
pub mod draw;
pub mod layout;
pub mod pure;
pub mod util;
pub mod x;
pub mod x11rb;

#[doc(inline)]
pub use crate::core::{config::Config, WindowManager};
#[doc(inline)]
pub use layout::LayoutKind;

/// A Result where the error type is the crate level [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// Error variants from the core window manager and its X backends.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Unable to establish a connection to the X server
    #[error(transparent)]
    Connect(#[from] ::x11rb::errors::ConnectError),

    /// The X11 connection broke
    #[error(transparent)]
    Connection(#[from] ::x11rb::errors::ConnectionError),

    /// Could not get an X11 request reply
    #[error(transparent)]
    Reply(#[from] ::x11rb::errors::ReplyError),

    /// Could not get an X11 request reply or generate a new resource id
    #[error(transparent)]
    ReplyOrId(#[from] ::x11rb::errors::ReplyOrIdError),

    /// An attempt was made to take ownership of the root window redirect
    /// mask while another window manager holds it
    #[error("another window manager is already running")]
    WmAlreadyRunning,

    /// The X server reported no usable screens
    #[error("no screens detected from the X server")]
    NoScreens,

    /// The user supplied configuration is unusable
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A string could not be parsed as a '#RRGGBB' hex color
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// An error spawning a subprocess
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An X11 ID for a given resource
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A simple RGB color in 0xRRGGBB form.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Color(u32);

impl Color {
    /// The raw 0xRRGGBB pixel value of this color.
    pub fn rgb(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(Error::InvalidHexColor(s.to_owned()));
        }

        u32::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|_| Error::InvalidHexColor(s.to_owned()))
    }
}

/// The foreground, background and border colors used for rendering a
/// window border or a section of the status bar.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ColorScheme {
    /// Foreground (text) color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Window border color
    pub border: Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case("#000000", 0x000000; "black")]
    #[test_case("#ffffff", 0xffffff; "white lower")]
    #[test_case("#FFFFFF", 0xffffff; "white upper")]
    #[test_case("005577", 0x005577; "no hash prefix")]
    #[test]
    fn color_parsing(s: &str, expected: u32) {
        let c = Color::try_from(s).expect("valid hex color");
        assert_eq!(c.rgb(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("#fff"; "too short")]
    #[test_case("#ff00ff00"; "too long")]
    #[test_case("#zzzzzz"; "not hex")]
    #[test]
    fn invalid_colors_error(s: &str) {
        assert!(Color::try_from(s).is_err());
    }
}
