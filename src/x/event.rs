//! The event set the core dispatches on, adapted from the teacher's
//! `src/x/event.rs` `XEvent` enum shape but retyped to this crate's `Xid`/
//! `Rect`/dwm-bitmask world and cut down to exactly the fourteen event kinds
//! `dwm.c`'s `handler[]` table reacts to.
use crate::pure::geometry::{Point, Rect};
use crate::x::{KeyPress, MouseButton, Xid};

/// One event off the X connection, already decoded into the fields the
/// dispatcher (`crate::wm::Wm::handle_event`) needs.
#[derive(Debug, Clone)]
pub enum XEvent {
    ButtonPress {
        window: Xid,
        subwindow: Xid,
        button: MouseButton,
        mods: crate::x::ModMask,
        root_pos: Point,
    },
    /// Not part of `dwm.c`'s `handler[]` table (it has no dedicated
    /// handler); consumed only by the interactive move/resize loop's own
    /// `XMaskEvent` wait, which is why [`crate::x::XConn::next_event`]
    /// still needs to surface it instead of swallowing it.
    ButtonRelease {
        window: Xid,
    },
    ClientMessage {
        window: Xid,
        kind: ClientMessageKind,
    },
    ConfigureNotify {
        window: Xid,
        r: Rect,
        is_root: bool,
    },
    ConfigureRequest {
        window: Xid,
        r: Rect,
        border_width: i32,
        value_mask: ConfigureValueMask,
        stack_sibling: Option<Xid>,
    },
    DestroyNotify {
        window: Xid,
    },
    EnterNotify {
        window: Xid,
        root_pos: Point,
        mode_normal: bool,
        detail_inferior: bool,
    },
    Expose {
        window: Xid,
        count: usize,
    },
    FocusIn {
        window: Xid,
    },
    KeyPress {
        window: Xid,
        key: KeyPress,
    },
    MappingNotify,
    MapRequest {
        window: Xid,
    },
    MotionNotify {
        root_pos: Point,
        /// X server timestamp in milliseconds, used by the pointer loop's
        /// `(now - last) <= 1000/150` rate limit (dwm's `ev.xmotion.time`).
        time: u32,
    },
    PropertyNotify {
        window: Xid,
        /// The raw X atom id. Not resolved to [`crate::atom::Atom`] here
        /// because several atoms the core reacts to (`WM_NAME`,
        /// `WM_NORMAL_HINTS`, `WM_HINTS`, `WM_TRANSIENT_FOR`) are predefined
        /// X atoms the core never interns itself.
        atom: Xid,
        is_root: bool,
    },
    UnmapNotify {
        window: Xid,
        send_event: bool,
    },
}

/// The `WM_PROTOCOLS`/`_NET_WM_STATE` client messages the core acts on
/// (`clientmessage` in `dwm.c`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessageKind {
    /// `_NET_ACTIVE_WINDOW`: another client asked to be focused.
    ActiveWindow,
    /// `_NET_WM_STATE` toggling `_NET_WM_STATE_FULLSCREEN`.
    FullscreenToggle { set: bool, toggle: bool },
    /// A client message the core has no opinion on.
    Other,
}

/// Which fields of a `ConfigureRequest` the client actually asked to change,
/// mirroring the `CWX`/`CWY`/`CWWidth`/`CWHeight`/`CWBorderWidth`/`CWSibling`/
/// `CWStackMode` value mask bits dwm checks before honouring each field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigureValueMask {
    pub x: bool,
    pub y: bool,
    pub width: bool,
    pub height: bool,
    pub border_width: bool,
    pub sibling: bool,
    pub stack_mode: bool,
}
