//! Keysym-name to numeric-keysym table, standing in for dwm's direct call to
//! `XStringToKeysym`. `x11rb` has no such lookup itself (it only speaks
//! keycodes over the wire), so the table is keyed on the [`XKeySym`]
//! variants actually bound in [`crate::config`]; extend it if a binding adds
//! a keysym not listed here. Values are the numeric keysyms from
//! `X11/keysymdef.h`.
use penrose_keysyms::XKeySym;

pub fn to_numeric(key: XKeySym) -> Option<u32> {
    use XKeySym::*;
    Some(match key {
        XK_Tab => 0xff09,
        XK_Return => 0xff0d,
        XK_space => 0x0020,
        XK_comma => 0x002c,
        XK_period => 0x002e,
        XK_1 => 0x0031,
        XK_2 => 0x0032,
        XK_3 => 0x0033,
        XK_4 => 0x0034,
        XK_5 => 0x0035,
        XK_6 => 0x0036,
        XK_7 => 0x0037,
        XK_8 => 0x0038,
        XK_9 => 0x0039,
        XK_b => 0x0062,
        XK_c => 0x0063,
        XK_d => 0x0064,
        XK_f => 0x0066,
        XK_h => 0x0068,
        XK_i => 0x0069,
        XK_j => 0x006a,
        XK_k => 0x006b,
        XK_l => 0x006c,
        XK_m => 0x006d,
        XK_p => 0x0070,
        XK_q => 0x0071,
        XK_t => 0x0074,
        _ => return None,
    })
}

/// The inverse of [`to_numeric`], used to resolve a keycode's mapped keysym
/// back to a portable [`XKeySym`] for dispatch (dwm's `XLookupKeysym`).
pub fn from_numeric(value: u32) -> Option<XKeySym> {
    use XKeySym::*;
    Some(match value {
        0xff09 => XK_Tab,
        0xff0d => XK_Return,
        0x0020 => XK_space,
        0x002c => XK_comma,
        0x002e => XK_period,
        0x0031 => XK_1,
        0x0032 => XK_2,
        0x0033 => XK_3,
        0x0034 => XK_4,
        0x0035 => XK_5,
        0x0036 => XK_6,
        0x0037 => XK_7,
        0x0038 => XK_8,
        0x0039 => XK_9,
        0x0062 => XK_b,
        0x0063 => XK_c,
        0x0064 => XK_d,
        0x0066 => XK_f,
        0x0068 => XK_h,
        0x0069 => XK_i,
        0x006a => XK_j,
        0x006b => XK_k,
        0x006c => XK_l,
        0x006d => XK_m,
        0x0070 => XK_p,
        0x0071 => XK_q,
        0x0074 => XK_t,
        _ => return None,
    })
}
