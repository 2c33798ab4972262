//! Side effect free management of internal window manager state
pub mod client;
pub mod geometry;
pub mod monitor;
pub mod rules;

#[doc(inline)]
pub use client::{Client, ClientFlags, ClientMap, SizeHints};
#[doc(inline)]
pub use geometry::{Point, Rect};
#[doc(inline)]
pub use monitor::Monitor;
#[doc(inline)]
pub use rules::Rule;
