//! The rendering surface used for drawing the status bar.
//!
//! Text and font handling (fontsets, glyph fallback) are deliberately kept
//! behind this trait: the window manager only needs pixel widths and a way
//! to push rendered content to a bar window. A basic X core font backed
//! implementation lives in [x11rb][crate::x11rb].
use crate::{pure::geometry::Rect, ColorScheme, Result, Xid};

/// A simple drawing abstraction for bar rendering.
///
/// Drawing happens against an internal pixmap which is blitted to a bar
/// window by [Draw::map].
pub trait Draw {
    /// Resize the backing pixmap, typically after a root geometry change.
    fn resize(&mut self, w: u32, h: u32) -> Result<()>;
    /// The pixel height of the font in use; drives the bar height.
    fn font_height(&self) -> u32;
    /// The rendered width of the given text in pixels.
    fn text_width(&mut self, text: &str) -> Result<u32>;
    /// Set the color scheme used by subsequent draw calls.
    fn set_scheme(&mut self, scheme: ColorScheme);
    /// Draw a rectangle, either filled or as an outline. `invert` swaps
    /// the foreground and background colors.
    fn rect(&mut self, r: Rect, filled: bool, invert: bool) -> Result<()>;
    /// Draw text with the given left padding, clipped to `r`, returning
    /// the x coordinate just past the drawn region.
    fn text(&mut self, r: Rect, lpad: u32, text: &str, invert: bool) -> Result<i32>;
    /// Copy the drawn region to the given window.
    fn map(&mut self, win: Xid, r: Rect) -> Result<()>;
}

/// A non-rendering [Draw] for driving the window manager in tests.
///
/// Text widths are derived from character counts so that bar click region
/// arithmetic stays deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubDraw;

impl Draw for StubDraw {
    fn resize(&mut self, _w: u32, _h: u32) -> Result<()> {
        Ok(())
    }

    fn font_height(&self) -> u32 {
        14
    }

    fn text_width(&mut self, text: &str) -> Result<u32> {
        Ok(7 * text.chars().count() as u32)
    }

    fn set_scheme(&mut self, _scheme: ColorScheme) {}

    fn rect(&mut self, _r: Rect, _filled: bool, _invert: bool) -> Result<()> {
        Ok(())
    }

    fn text(&mut self, r: Rect, _lpad: u32, _text: &str, _invert: bool) -> Result<i32> {
        Ok(r.x + r.w as i32)
    }

    fn map(&mut self, _win: Xid, _r: Rect) -> Result<()> {
        Ok(())
    }
}
