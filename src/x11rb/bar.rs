//! [`BarConn`] implementation drawn with the core X font opened once in
//! [`X11rbConn::connect`] (named `"fixed"`), so the bar doesn't need a
//! second font-rendering stack pulled in just for itself.
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{self, Char2b, ConnectionExt as _, CreateWindowAux, EventMask, Rectangle, WindowClass};

use crate::bar::{BarConn, BarLayout, ClickArea};
use crate::error::Result;
use crate::x::Xid;

use super::xconn::{parse_hex_color, X11rbConn};

fn to_char2b(text: &str) -> Vec<Char2b> {
    text.chars().map(|c| Char2b { byte1: 0, byte2: (c as u32).min(255) as u8 }).collect()
}

impl X11rbConn {
    fn text_extent(&self, text: &str) -> Result<i32> {
        if text.is_empty() {
            return Ok(0);
        }
        let chars = to_char2b(text);
        let reply = self.conn.query_text_extents(self.font, &chars)?.reply()?;
        Ok(reply.overall_width)
    }

    fn fill(&self, win: Xid, x: i32, y: i32, w: i32, h: i32, color: u32) -> Result<()> {
        let aux = xproto::ChangeGCAux::new().foreground(color);
        self.conn.change_gc(self.gc, &aux)?;
        self.conn
            .poly_fill_rectangle(win, self.gc, &[Rectangle { x: x as i16, y: y as i16, width: w as u16, height: h as u16 }])?;
        Ok(())
    }

    fn text(&self, win: Xid, x: i32, y: i32, text: &str, fg: u32, bg: u32) -> Result<()> {
        let aux = xproto::ChangeGCAux::new().foreground(fg).background(bg);
        self.conn.change_gc(self.gc, &aux)?;
        self.conn.image_text16(win, self.gc, x as i16, y as i16, &to_char2b(text))?;
        Ok(())
    }
}

impl BarConn for X11rbConn {
    fn create_bar_window(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Xid> {
        let win = self.conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .override_redirect(1)
            .background_pixel(parse_hex_color(crate::config::COLOR_BAR_BG))
            .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE);
        self.conn
            .create_window(0, win, self.root, x as i16, y as i16, w as u16, h as u16, 0, WindowClass::INPUT_OUTPUT, 0, &aux)?;
        self.conn.map_window(win)?;
        Ok(win)
    }

    fn move_resize_bar(&self, win: Xid, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        let aux = xproto::ConfigureWindowAux::new().x(x).y(y).width(w as u32).height(h as u32);
        self.conn.configure_window(win, &aux)?;
        Ok(())
    }

    fn show_bar_window(&self, win: Xid, show: bool) -> Result<()> {
        if show {
            self.conn.map_window(win)?;
        } else {
            self.conn.unmap_window(win)?;
        }
        Ok(())
    }

    fn destroy_bar_window(&self, win: Xid) -> Result<()> {
        self.conn.destroy_window(win)?;
        Ok(())
    }

    fn text_width(&self, text: &str) -> Result<i32> {
        Ok(self.text_extent(text)? + self.font_height)
    }

    fn draw_bar(&self, win: Xid, width: i32, height: i32, layout: &BarLayout) -> Result<()> {
        let fg = parse_hex_color(crate::config::COLOR_BAR_FG);
        let bg = parse_hex_color(crate::config::COLOR_BAR_BG);
        let border = parse_hex_color(crate::config::COLOR_BORDER_FOCUS);
        let baseline = (height + self.font_ascent) / 2 - 1;

        self.fill(win, 0, 0, width, height, bg)?;

        let mut x = 0;
        for tag in layout.tags {
            let w = self.text_width(tag.label)?;
            let (tfg, tbg) = if tag.selected { (bg, fg) } else { (fg, bg) };
            self.fill(win, x, 0, w, height, tbg)?;
            self.text(win, x + self.font_height / 2, baseline, tag.label, tfg, tbg)?;
            if tag.occupied {
                self.fill(win, x + 1, 1, w / 6, w / 6, tfg)?;
            }
            if tag.urgent {
                self.fill(win, x, 0, w, 1, border)?;
            }
            x += w;
        }

        let sym_w = self.text_width(layout.layout_symbol)?;
        self.text(win, x + self.font_height / 2, baseline, layout.layout_symbol, fg, bg)?;
        x += sym_w;

        let status_w = self.text_width(layout.status)?;
        if layout.is_selected_monitor && !layout.status.is_empty() {
            self.text(win, width - status_w + self.font_height / 2, baseline, layout.status, fg, bg)?;
        }
        let title_limit = if layout.is_selected_monitor { width - status_w } else { width };

        if title_limit > x {
            let (tfg, tbg) = if layout.title_is_floating { (bg, fg) } else { (fg, bg) };
            self.fill(win, x, 0, title_limit - x, height, tbg)?;
            if !layout.title.is_empty() {
                self.text(win, x + self.font_height / 2, baseline, layout.title, tfg, tbg)?;
            }
        }

        Ok(())
    }

    fn click_area(&self, width: i32, layout: &BarLayout, x: i32) -> ClickArea {
        let mut cur = 0;
        for (i, tag) in layout.tags.iter().enumerate() {
            let w = self.text_width(tag.label).unwrap_or(0);
            if x < cur + w {
                return ClickArea::Tag(i);
            }
            cur += w;
        }

        let sym_w = self.text_width(layout.layout_symbol).unwrap_or(0);
        if x < cur + sym_w {
            return ClickArea::LayoutSymbol;
        }

        let status_w = self.text_width(layout.status).unwrap_or(0);
        if layout.is_selected_monitor && x >= width - status_w {
            return ClickArea::Status;
        }

        ClickArea::Title
    }
}
