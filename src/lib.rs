//! A dwm-style tiling window manager for X11.
pub mod atom;
pub mod bar;
pub mod config;
pub mod error;
pub mod pure;
pub mod spawn;
pub mod wm;
pub mod x;
pub mod x11rb;
