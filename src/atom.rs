//! X atoms interned at start-up.
//!
//! Grounded on `dwm.c`'s `setup()` (the `wmatom`/`netatom` arrays) and the
//! teacher's `strum`-driven atom enums.
use strum::{EnumIter, IntoEnumIterator};

/// ICCCM and EWMH atoms the core resolves once at start-up and then refers to
/// by name. Mirrors dwm's `WMAtom`/`NetAtom` indices, collapsed into a single
/// enum since both are just `Atom` values to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Atom {
    WmProtocols,
    WmDelete,
    WmState,
    WmTakeFocus,
    NetActiveWindow,
    NetSupported,
    NetWmName,
    NetWmState,
    NetWmCheck,
    NetWmFullscreen,
    NetWmWindowType,
    NetWmWindowTypeDialog,
    NetClientList,
    Utf8String,
}

impl Atom {
    /// The interned atom's name, exactly as it appears on the X server.
    pub fn name(&self) -> &'static str {
        match self {
            Atom::WmProtocols => "WM_PROTOCOLS",
            Atom::WmDelete => "WM_DELETE_WINDOW",
            Atom::WmState => "WM_STATE",
            Atom::WmTakeFocus => "WM_TAKE_FOCUS",
            Atom::NetActiveWindow => "_NET_ACTIVE_WINDOW",
            Atom::NetSupported => "_NET_SUPPORTED",
            Atom::NetWmName => "_NET_WM_NAME",
            Atom::NetWmState => "_NET_WM_STATE",
            Atom::NetWmCheck => "_NET_SUPPORTING_WM_CHECK",
            Atom::NetWmFullscreen => "_NET_WM_STATE_FULLSCREEN",
            Atom::NetWmWindowType => "_NET_WM_WINDOW_TYPE",
            Atom::NetWmWindowTypeDialog => "_NET_WM_WINDOW_TYPE_DIALOG",
            Atom::NetClientList => "_NET_CLIENT_LIST",
            Atom::Utf8String => "UTF8_STRING",
        }
    }

    /// Every atom the core needs interned, in a stable order.
    pub fn all() -> impl Iterator<Item = Atom> {
        Atom::iter()
    }
}
