//! Built-in arrange functions. Grounded on `dwm.c`'s `tile()` and `monocle()`.
//!
//! These are pure functions over geometry: given a work area and the ordered
//! list of border widths of the tiled (visible, non-floating) clients on a
//! monitor, they return one [`Rect`] per client, in the same order. The
//! orchestration layer is responsible for actually resizing the windows.
use crate::pure::geometry::Rect;

/// The two built-in arrangements plus the floating escape hatch. A `None`
/// arrange function in `dwm.c` denotes floating mode; `Floating` plays that
/// role here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Tile,
    Monocle,
    Floating,
}

impl LayoutKind {
    /// The short label drawn in the bar's layout-symbol slot.
    pub fn symbol(&self) -> &'static str {
        match self {
            LayoutKind::Tile => "[]=",
            LayoutKind::Monocle => "[M]",
            LayoutKind::Floating => "><>",
        }
    }

    /// Whether this layout has an arrange function at all (`dwm.c`'s
    /// `layout->arrange` being non-null).
    pub fn arranges(&self) -> bool {
        !matches!(self, LayoutKind::Floating)
    }
}

/// Master/stack tiling split. `border_widths[i]` is the border width of the
/// i-th tiled client in attachment order; the returned `Rect`s are in the
/// same order and do not include the border (mirrors dwm's `resize`, which
/// receives content width/height and subtracts `2 * border_width` itself).
pub fn tile(work_area: Rect, nmaster: u32, mfact: f32, gap: i32, border_widths: &[i32]) -> Vec<Rect> {
    let n = border_widths.len();
    if n == 0 {
        return Vec::new();
    }

    let mw = if n as u32 > nmaster {
        if nmaster > 0 {
            (work_area.w as f32 * mfact) as i32
        } else {
            0
        }
    } else {
        work_area.w - gap
    };

    let mut out = Vec::with_capacity(n);
    let mut my = gap;
    let mut ty = gap;

    for (i, &bw) in border_widths.iter().enumerate() {
        if (i as u32) < nmaster {
            let remaining = (n as u32).min(nmaster) - i as u32;
            let h = (work_area.h - my) / remaining as i32 - gap;
            let rect = Rect::new(
                work_area.x + gap,
                work_area.y + my,
                mw - 2 * bw - gap,
                h - 2 * bw,
            );
            my += rect.outer_h(bw) + gap;
            out.push(rect);
        } else {
            let remaining = n as i32 - i as i32;
            let h = (work_area.h - ty) / remaining - gap;
            let rect = Rect::new(
                work_area.x + mw + gap,
                work_area.y + ty,
                work_area.w - mw - 2 * bw - 2 * gap,
                h - 2 * bw,
            );
            ty += rect.outer_h(bw) + gap;
            out.push(rect);
        }
    }

    out
}

/// Every tiled client gets the full work area minus its border.
pub fn monocle(work_area: Rect, border_widths: &[i32]) -> Vec<Rect> {
    border_widths
        .iter()
        .map(|&bw| Rect::new(work_area.x, work_area.y, work_area.w - 2 * bw, work_area.h - 2 * bw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario 1 from the testable-properties section: 1920x1080, no gaps,
    // one master, mfact=0.55, three tiled clients.
    #[test]
    fn tile_three_clients_one_master() {
        let work_area = Rect::new(0, 0, 1920, 1080);
        let rects = tile(work_area, 1, 0.55, 0, &[0, 0, 0]);

        assert_eq!(rects, vec![
            Rect::new(0, 0, 1056, 1080),
            Rect::new(1056, 0, 864, 540),
            Rect::new(1056, 540, 864, 540),
        ]);
    }

    #[test]
    fn tile_single_client_fills_work_area_minus_gap() {
        let work_area = Rect::new(0, 0, 1000, 800);
        let rects = tile(work_area, 1, 0.5, 10, &[2]);

        // mw = ww - gap = 990; rect w = mw - 2*bw - gap = 976; h = (wh-gap)/1 - gap - 2*bw = 776
        assert_eq!(rects, vec![Rect::new(10, 10, 976, 776)]);
    }

    #[test]
    fn monocle_gives_full_work_area() {
        let work_area = Rect::new(0, 0, 1920, 1080);
        let rects = monocle(work_area, &[2, 2]);

        assert_eq!(rects, vec![Rect::new(0, 0, 1916, 1076), Rect::new(0, 0, 1916, 1076)]);
    }
}
