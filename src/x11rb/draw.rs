//! A [Draw] implementation using just the X core protocol.
//!
//! Rendering quality is limited to what core fonts can do; the trait
//! boundary exists so that a richer (Xft style) surface can be swapped in
//! without touching the window manager itself.
use crate::{draw::Draw, pure::geometry::Rect, Color, ColorScheme, Result, Xid};
use x11rb::{
    connection::Connection,
    protocol::xproto::{
        ChangeGCAux, Char2b, ConnectionExt as _, CreateGCAux, Rectangle,
    },
    rust_connection::RustConnection,
};

const FONT_NAME: &[u8] = b"fixed";

/// A core protocol [Draw] backed by its own X connection, rendering into
/// an off screen pixmap that is blitted to bar windows on [Draw::map].
pub struct CoreDraw {
    conn: RustConnection,
    root: u32,
    depth: u8,
    font: u32,
    ascent: i16,
    descent: i16,
    pixmap: u32,
    gc: u32,
    scheme: ColorScheme,
}

impl CoreDraw {
    /// Connect and allocate a drawing surface covering the whole screen.
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root = screen.root;
        let depth = screen.root_depth;
        let (w, h) = (
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        );

        let font = conn.generate_id()?;
        conn.open_font(font, FONT_NAME)?.check()?;
        let fq = conn.query_font(font)?.reply()?;
        let (ascent, descent) = (fq.font_ascent, fq.font_descent);

        let pixmap = conn.generate_id()?;
        conn.create_pixmap(depth, pixmap, root, w.max(1) as u16, h.max(1) as u16)?;

        let gc = conn.generate_id()?;
        conn.create_gc(
            gc,
            pixmap,
            &CreateGCAux::new().font(font).graphics_exposures(0),
        )?;

        Ok(Self {
            conn,
            root,
            depth,
            font,
            ascent,
            descent,
            pixmap,
            gc,
            scheme: ColorScheme::default(),
        })
    }

    fn colors(&self, invert: bool) -> (Color, Color) {
        if invert {
            (self.scheme.bg, self.scheme.fg)
        } else {
            (self.scheme.fg, self.scheme.bg)
        }
    }

    fn set_fg(&self, color: Color) -> Result<()> {
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(color.rgb()))?;

        Ok(())
    }
}

impl Draw for CoreDraw {
    fn resize(&mut self, w: u32, h: u32) -> Result<()> {
        self.conn.free_pixmap(self.pixmap)?;
        self.pixmap = self.conn.generate_id()?;
        self.conn.create_pixmap(
            self.depth,
            self.pixmap,
            self.root,
            w.max(1) as u16,
            h.max(1) as u16,
        )?;

        Ok(())
    }

    fn font_height(&self) -> u32 {
        (self.ascent + self.descent).max(1) as u32
    }

    fn text_width(&mut self, text: &str) -> Result<u32> {
        let chars: Vec<Char2b> = text
            .bytes()
            .map(|b| Char2b { byte1: 0, byte2: b })
            .collect();
        let reply = self.conn.query_text_extents(self.font, &chars)?.reply()?;

        Ok(reply.overall_width.max(0) as u32)
    }

    fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    fn rect(&mut self, r: Rect, filled: bool, invert: bool) -> Result<()> {
        let (fg, _) = self.colors(invert);
        self.set_fg(fg)?;

        let rect = Rectangle {
            x: r.x as i16,
            y: r.y as i16,
            width: r.w as u16,
            height: r.h as u16,
        };
        if filled {
            self.conn.poly_fill_rectangle(self.pixmap, self.gc, &[rect])?;
        } else {
            let outline = Rectangle {
                width: rect.width.saturating_sub(1),
                height: rect.height.saturating_sub(1),
                ..rect
            };
            self.conn.poly_rectangle(self.pixmap, self.gc, &[outline])?;
        }

        Ok(())
    }

    fn text(&mut self, r: Rect, lpad: u32, text: &str, invert: bool) -> Result<i32> {
        let (fg, bg) = self.colors(invert);

        // fill the cell background before drawing the string into it
        self.set_fg(bg)?;
        self.conn.poly_fill_rectangle(
            self.pixmap,
            self.gc,
            &[Rectangle {
                x: r.x as i16,
                y: r.y as i16,
                width: r.w as u16,
                height: r.h as u16,
            }],
        )?;

        self.conn.change_gc(
            self.gc,
            &ChangeGCAux::new().foreground(fg.rgb()).background(bg.rgb()),
        )?;

        let baseline =
            r.y + (r.h as i32 - (self.ascent + self.descent) as i32) / 2 + self.ascent as i32;
        // image_text8 is limited to 255 bytes per request
        let bytes: Vec<u8> = text.bytes().take(255).collect();
        self.conn.image_text8(
            self.pixmap,
            self.gc,
            (r.x + lpad as i32) as i16,
            baseline as i16,
            &bytes,
        )?;

        Ok(r.x + r.w as i32)
    }

    fn map(&mut self, win: Xid, r: Rect) -> Result<()> {
        self.conn.copy_area(
            self.pixmap,
            *win,
            self.gc,
            r.x as i16,
            r.y as i16,
            r.x as i16,
            r.y as i16,
            r.w as u16,
            r.h as u16,
        )?;
        let _ = self.conn.flush();

        Ok(())
    }
}
