//! The per-window [`Client`] record and ICCCM size-hint reconciliation.
//!
//! Grounded on `dwm.c`'s `struct Client` and `applysizehints`.
use crate::pure::geometry::Rect;
use crate::x::Xid;

/// ICCCM `WM_NORMAL_HINTS` fields, as read by `updatesizehints`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SizeHints {
    pub base_w: i32,
    pub base_h: i32,
    pub inc_w: i32,
    pub inc_h: i32,
    pub max_w: i32,
    pub max_h: i32,
    pub min_w: i32,
    pub min_h: i32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

/// One managed top-level window.
///
/// Invariants (enforced by the orchestration layer, not by this type):
/// `tags & TAG_MASK != 0`; `fullscreen ⇒ floating`; `fixed ⇒ floating`.
#[derive(Debug, Clone)]
pub struct Client {
    pub window: Xid,
    pub name: String,
    pub rect: Rect,
    pub old_rect: Rect,
    pub border_width: i32,
    pub old_border_width: i32,
    pub hints: SizeHints,
    pub tags: u32,
    pub fixed: bool,
    pub floating: bool,
    pub urgent: bool,
    pub never_focus: bool,
    /// Whether the client listed `WM_TAKE_FOCUS` in `WM_PROTOCOLS`, gating
    /// whether `setfocus` sends it the protocol message at all.
    pub accepts_take_focus: bool,
    /// Whether `WM_PROTOCOLS` lists `WM_DELETE_WINDOW` (dwm's `sendevent`
    /// return value, cached instead of re-queried on every `killclient`).
    pub supports_delete: bool,
    pub fullscreen: bool,
    /// Floating flag snapshotted before entering fullscreen, restored on exit.
    pub old_floating: bool,
}

/// `updatesizehints`'s fixed-size check: `c->maxw && c->maxh && c->maxw ==
/// c->minw && c->maxh == c->minh`.
pub fn is_fixed_size(hints: &SizeHints) -> bool {
    hints.max_w > 0 && hints.max_h > 0 && hints.max_w == hints.min_w && hints.max_h == hints.min_h
}

impl Client {
    pub fn new(window: Xid, rect: Rect, border_width: i32) -> Self {
        Self {
            window,
            name: String::new(),
            rect,
            old_rect: rect,
            border_width,
            old_border_width: border_width,
            hints: SizeHints::default(),
            tags: 0,
            fixed: false,
            floating: false,
            urgent: false,
            never_focus: false,
            accepts_take_focus: false,
            supports_delete: false,
            fullscreen: false,
            old_floating: false,
        }
    }

    pub fn outer_w(&self) -> i32 {
        self.rect.outer_w(self.border_width)
    }

    pub fn outer_h(&self) -> i32 {
        self.rect.outer_h(self.border_width)
    }
}

/// Parameters to [`apply_size_hints`] that stay constant across a single
/// resize call (as opposed to the candidate geometry being reconciled).
#[derive(Debug, Clone, Copy)]
pub struct SizeHintParams {
    pub border_width: i32,
    pub hints: SizeHints,
    pub floating: bool,
    pub layout_is_floating: bool,
}

/// Reconcile a candidate geometry against ICCCM size hints and monitor/display
/// bounds. Mirrors `dwm.c`'s `applysizehints` exactly, including its use of
/// the client's *current* (pre-resize) width/height — not the candidate one —
/// when clamping against screen/monitor edges.
///
/// Returns the reconciled rect and whether it differs from `current`.
pub fn apply_size_hints(
    params: &SizeHintParams,
    current: Rect,
    candidate: Rect,
    monitor_work_area: Rect,
    display_size: (i32, i32),
    bar_height: i32,
    respect_resize_hints: bool,
    interact: bool,
) -> (Rect, bool) {
    let Rect {
        mut x,
        mut y,
        mut w,
        mut h,
    } = candidate;
    let bw = params.border_width;

    w = w.max(1);
    h = h.max(1);

    if interact {
        let (sw, sh) = display_size;
        if x > sw {
            x = sw - current.outer_w(bw);
        }
        if y > sh {
            y = sh - current.outer_h(bw);
        }
        if x + w + 2 * bw < 0 {
            x = 0;
        }
        if y + h + 2 * bw < 0 {
            y = 0;
        }
    } else {
        let m = monitor_work_area;
        if x >= m.x + m.w {
            x = m.x + m.w - current.outer_w(bw);
        }
        if y >= m.y + m.h {
            y = m.y + m.h - current.outer_h(bw);
        }
        if x + w + 2 * bw <= m.x {
            x = m.x;
        }
        if y + h + 2 * bw <= m.y {
            y = m.y;
        }
    }

    if h < bar_height {
        h = bar_height;
    }
    if w < bar_height {
        w = bar_height;
    }

    if respect_resize_hints || params.floating || params.layout_is_floating {
        let hints = &params.hints;
        let base_is_min = hints.base_w == hints.min_w && hints.base_h == hints.min_h;

        if !base_is_min {
            w -= hints.base_w;
            h -= hints.base_h;
        }

        if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
            if hints.max_aspect < w as f32 / h as f32 {
                w = (h as f32 * hints.max_aspect + 0.5) as i32;
            } else if hints.min_aspect < h as f32 / w as f32 {
                h = (w as f32 * hints.min_aspect + 0.5) as i32;
            }
        }

        if base_is_min {
            w -= hints.base_w;
            h -= hints.base_h;
        }

        if hints.inc_w != 0 {
            w -= w % hints.inc_w;
        }
        if hints.inc_h != 0 {
            h -= h % hints.inc_h;
        }

        w = (w + hints.base_w).max(hints.min_w);
        h = (h + hints.base_h).max(hints.min_h);

        if hints.max_w != 0 {
            w = w.min(hints.max_w);
        }
        if hints.max_h != 0 {
            h = h.min(hints.max_h);
        }
    }

    let result = Rect { x, y, w, h };
    let changed = result != current;

    (result, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SizeHintParams {
        SizeHintParams {
            border_width: 2,
            hints: SizeHints::default(),
            floating: true,
            layout_is_floating: false,
        }
    }

    #[test]
    fn idempotent_when_applied_twice() {
        let work_area = Rect::new(0, 0, 1920, 1080);
        let current = Rect::new(100, 100, 400, 300);
        let candidate = Rect::new(110, 120, 420, 310);

        let (first, changed_first) = apply_size_hints(
            &params(),
            current,
            candidate,
            work_area,
            (1920, 1080),
            20,
            true,
            false,
        );
        assert!(changed_first);

        let (second, changed_second) = apply_size_hints(
            &params(),
            first,
            first,
            work_area,
            (1920, 1080),
            20,
            true,
            false,
        );

        assert_eq!(first, second);
        assert!(!changed_second);
    }

    #[test]
    fn enforces_minimum_of_bar_height() {
        let work_area = Rect::new(0, 0, 1920, 1080);
        let current = Rect::new(0, 0, 1, 1);
        let candidate = Rect::new(0, 0, 1, 1);

        let (rect, _) = apply_size_hints(
            &params(),
            current,
            candidate,
            work_area,
            (1920, 1080),
            20,
            true,
            false,
        );

        assert_eq!(rect.w, 20);
        assert_eq!(rect.h, 20);
    }

    #[test]
    fn snaps_to_increment() {
        let mut p = params();
        p.hints.inc_w = 10;
        p.hints.inc_h = 10;
        p.hints.base_w = 0;
        p.hints.base_h = 0;
        p.hints.min_w = 1;
        p.hints.min_h = 1;

        let work_area = Rect::new(0, 0, 1920, 1080);
        let current = Rect::new(0, 0, 100, 100);
        let candidate = Rect::new(0, 0, 107, 123);

        let (rect, _) = apply_size_hints(
            &p,
            current,
            candidate,
            work_area,
            (1920, 1080),
            0,
            true,
            false,
        );

        assert_eq!(rect.w, 100);
        assert_eq!(rect.h, 120);
    }
}
