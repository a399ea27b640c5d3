//! Compile-time tuning knobs and bindings, in the spirit of dwm's
//! `config.h`: everything a user would want to tweak lives here as `pub
//! const`s, rather than behind a runtime config file. Grounded on the
//! teacher's `src/config.rs` (same "just edit the constants" shape) and
//! `dwm.c`'s `setup()`/`grabkeys`/`grabbuttons`/`buttonpress` for what the
//! values mean.
use crate::pure::layout::LayoutKind;
use crate::pure::rules::Rule;
use crate::x::{ModMask, MouseButton};
use penrose_keysyms::XKeySym;

pub const BORDER_PX: i32 = 1;
pub const GAP_PX: i32 = 0;
pub const SNAP: i32 = 32;

pub const SHOW_BAR: bool = true;
pub const TOP_BAR: bool = true;
pub const BAR_HEIGHT: i32 = 20;

pub const COLOR_BORDER_NORMAL: &str = "#444444";
pub const COLOR_BORDER_FOCUS: &str = "#bbbbbb";
pub const COLOR_BAR_BG: &str = "#222222";
pub const COLOR_BAR_FG: &str = "#bbbbbb";

pub const FONTS: &[&str] = &["monospace:size=10"];

/// Tag names; `TAGS.len()` is also the number of bits `TAG_MASK` covers.
pub const TAGS: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// `TAGMASK`: every tag bit in play at once.
pub const TAG_MASK: u32 = (1 << TAGS.len()) - 1;

pub const MAIN_RATIO: f32 = 0.55;
pub const N_MASTER: u32 = 1;
pub const RESPECT_RESIZE_HINTS: bool = false;

/// Run once after the connection is established and the root window is
/// selected on, before the first `scan` (dwm's `autostart.sh` convention).
pub const STARTUP_SCRIPT_PATH: Option<&str> = None;

/// The layout table, indexed directly by tag number: `view(i)` switches to
/// `LAYOUTS[i]` as a side effect of switching to tag `i`. Keep this at least
/// as long as [`TAGS`].
pub const LAYOUTS: &[LayoutKind] = &[
    LayoutKind::Tile,
    LayoutKind::Monocle,
    LayoutKind::Tile,
    LayoutKind::Tile,
    LayoutKind::Tile,
    LayoutKind::Tile,
    LayoutKind::Tile,
    LayoutKind::Tile,
    LayoutKind::Tile,
];

pub const RULES: &[Rule] = &[
    Rule { class: Some("Gimp"), instance: None, title: None, tags: 0, floating: true, monitor: None },
    Rule { class: Some("firefox"), instance: None, title: None, tags: 1 << 8, floating: false, monitor: None },
];

pub const TERMINAL: &[&str] = &["st"];
pub const LAUNCHER: &[&str] = &["dmenu_run"];

pub const MODKEY: ModMask = ModMask::MOD4;

const fn mods(a: ModMask, b: ModMask) -> ModMask {
    ModMask::from_bits_truncate(a.bits() | b.bits())
}

/// A bound command, resolved from a key or button press. Mirrors dwm's
/// `void (*func)(const Arg *)` plus its `Arg` union, collapsed into one enum
/// since every binding in `config.h` picks exactly one of these shapes.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    Spawn(&'static [&'static str]),
    View(usize),
    ToggleView(usize),
    Tag(usize),
    ToggleTag(usize),
    FocusStack(i32),
    ChangeMasterCount(i32),
    SetMfact(f32),
    Zoom,
    ToggleFloating,
    ToggleFullscreen,
    ToggleBar,
    FocusMonitor(i32),
    TagMonitor(i32),
    SetLayout(usize),
    KillClient,
    MoveMouse,
    ResizeMouse,
    Quit,
}

pub struct KeyBinding {
    pub mods: ModMask,
    pub key: XKeySym,
    pub action: Action,
}

pub struct ButtonBinding {
    pub mods: ModMask,
    pub button: MouseButton,
    pub action: Action,
}

macro_rules! tag_bindings {
    ($($n:literal => $key:ident),+ $(,)?) => {
        &[
            $(
                KeyBinding { mods: MODKEY, key: XKeySym::$key, action: Action::View($n) },
                KeyBinding { mods: mods(MODKEY, ModMask::CONTROL), key: XKeySym::$key, action: Action::ToggleView($n) },
                KeyBinding { mods: mods(MODKEY, ModMask::SHIFT), key: XKeySym::$key, action: Action::Tag($n) },
                KeyBinding { mods: mods(mods(MODKEY, ModMask::SHIFT), ModMask::CONTROL), key: XKeySym::$key, action: Action::ToggleTag($n) },
            )+
        ]
    };
}

pub const TAG_KEYS: &[KeyBinding] = tag_bindings! {
    0 => XK_1, 1 => XK_2, 2 => XK_3, 3 => XK_4, 4 => XK_5,
    5 => XK_6, 6 => XK_7, 7 => XK_8, 8 => XK_9,
};

pub const KEYS: &[KeyBinding] = &[
    KeyBinding { mods: MODKEY, key: XKeySym::XK_p, action: Action::Spawn(LAUNCHER) },
    KeyBinding { mods: mods(MODKEY, ModMask::SHIFT), key: XKeySym::XK_Return, action: Action::Spawn(TERMINAL) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_j, action: Action::FocusStack(1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_k, action: Action::FocusStack(-1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_i, action: Action::ChangeMasterCount(1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_d, action: Action::ChangeMasterCount(-1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_h, action: Action::SetMfact(-0.05) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_l, action: Action::SetMfact(0.05) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_Return, action: Action::Zoom },
    KeyBinding { mods: mods(MODKEY, ModMask::SHIFT), key: XKeySym::XK_c, action: Action::KillClient },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_t, action: Action::SetLayout(0) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_m, action: Action::SetLayout(1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_f, action: Action::ToggleFullscreen },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_space, action: Action::ToggleFloating },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_b, action: Action::ToggleBar },
    KeyBinding { mods: mods(MODKEY, ModMask::SHIFT), key: XKeySym::XK_period, action: Action::TagMonitor(1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_period, action: Action::FocusMonitor(1) },
    KeyBinding { mods: MODKEY, key: XKeySym::XK_comma, action: Action::FocusMonitor(-1) },
    KeyBinding { mods: mods(MODKEY, ModMask::SHIFT), key: XKeySym::XK_q, action: Action::Quit },
];

pub const BUTTONS: &[ButtonBinding] = &[
    ButtonBinding { mods: MODKEY, button: MouseButton::Left, action: Action::MoveMouse },
    ButtonBinding { mods: MODKEY, button: MouseButton::Middle, action: Action::ToggleFloating },
    ButtonBinding { mods: MODKEY, button: MouseButton::Right, action: Action::ResizeMouse },
];
