//! The status bar's drawing surface, abstracted behind [`BarConn`].
//!
//! The font/graphics rasteriser itself is treated as an external collaborator
//! (dwm's `drw.c`): the core only needs to create one override-redirect
//! window per monitor, measure text, and paint the tag/layout/title/status
//! sections into it. [`crate::x11rb::X11rbConn`] implements this trait
//! directly on top of the core X font rather than pulling in a second
//! rendering stack.
use crate::error::Result;
use crate::x::Xid;

/// One tag cell's render state, as drawn left-to-right across the bar
/// (dwm's `drawbar` loop over `tagw[]`).
#[derive(Debug, Clone, Copy)]
pub struct TagCell<'a> {
    pub label: &'a str,
    pub occupied: bool,
    pub selected: bool,
    pub urgent: bool,
}

/// Everything `drawbar` needs to repaint one monitor's bar in a single call.
#[derive(Debug, Clone)]
pub struct BarLayout<'a> {
    pub tags: &'a [TagCell<'a>],
    pub layout_symbol: &'a str,
    pub title: &'a str,
    pub title_is_floating: bool,
    pub status: &'a str,
    pub is_selected_monitor: bool,
}

pub trait BarConn {
    /// Create an override-redirect, unmanaged bar window at the given
    /// geometry (dwm's `createmon`'s `XCreateWindow` for `m->barwin`).
    fn create_bar_window(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Xid>;
    fn move_resize_bar(&self, win: Xid, x: i32, y: i32, w: i32, h: i32) -> Result<()>;
    fn show_bar_window(&self, win: Xid, show: bool) -> Result<()>;
    fn destroy_bar_window(&self, win: Xid) -> Result<()>;

    /// Pixel width the given text would occupy if drawn, plus the
    /// configured horizontal padding (dwm's `TEXTW`).
    fn text_width(&self, text: &str) -> Result<i32>;

    /// Repaint the full width of the bar in one pass.
    fn draw_bar(&self, win: Xid, width: i32, height: i32, layout: &BarLayout) -> Result<()>;

    /// Which section of the bar a click at `x` landed in, used by
    /// `buttonpress` to resolve tag/layout/title/status clicks.
    fn click_area(&self, width: i32, layout: &BarLayout, x: i32) -> ClickArea;
}

/// `buttonpress`'s `if (ev->x < x)` ladder over the bar sections, collapsed
/// into a value the orchestration layer can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickArea {
    Tag(usize),
    LayoutSymbol,
    Title,
    Status,
}
