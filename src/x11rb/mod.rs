//! The `x11rb`-backed concrete [`crate::x::XConn`] implementation.
//!
//! Grounded on the teacher's `src/x11rb/xconn.rs` (same crate, same general
//! shape of "intern every atom up front, wrap every request in a thin
//! method"), adapted to the dwm-style operations this core actually needs.
mod bar;
mod keysym;
mod xconn;

pub use xconn::X11rbConn;

use crate::error::Error;

impl From<x11rb::errors::ConnectionError> for Error {
    fn from(e: x11rb::errors::ConnectionError) -> Self {
        Error::Connection(e.to_string())
    }
}

impl From<x11rb::errors::ReplyError> for Error {
    fn from(e: x11rb::errors::ReplyError) -> Self {
        Error::Protocol(e.to_string())
    }
}

impl From<x11rb::errors::ReplyOrIdError> for Error {
    fn from(e: x11rb::errors::ReplyOrIdError) -> Self {
        Error::ConnectionData(e.to_string())
    }
}

impl From<x11rb::errors::ConnectError> for Error {
    fn from(e: x11rb::errors::ConnectError) -> Self {
        Error::Connection(e.to_string())
    }
}
