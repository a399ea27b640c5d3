//! Side-effect-free window manager state: geometry, client/size-hint math,
//! the arrange functions, the client/monitor arena, and the static rule
//! matcher. Nothing in this module talks to an X server — see
//! [`crate::wm`] for the layer that combines these with [`crate::x::XConn`].
pub mod client;
pub mod geometry;
pub mod layout;
pub mod monitor;
pub mod rules;
pub mod wm;

pub use client::{Client, SizeHintParams, SizeHints};
pub use geometry::{Point, Rect};
pub use layout::LayoutKind;
pub use monitor::{ClientId, Monitor, MonitorId, Store};
pub use rules::Rule;
