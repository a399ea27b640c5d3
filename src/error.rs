//! Crate-wide error type. Grounded on the teacher's `X11rbError`
//! (`src/x11rb/mod.rs`): a thin `thiserror` wrapper around the handful of
//! ways talking to the X server or a spawned process can fail.
use crate::pure::geometry::Point;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to connect to the X server: {0}")]
    Connection(String),

    #[error("another window manager is already running")]
    OtherWmRunning,

    #[error("X protocol error: {0}")]
    Protocol(String),

    #[error("error requesting X connection data: {0}")]
    ConnectionData(String),

    #[error("randr is not supported by this X server")]
    RandrUnsupported,

    #[error("unable to spawn child process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("unable to install signal handler: {0}")]
    Signal(#[from] nix::errno::Errno),

    #[error("no monitor found under pointer at {0:?}")]
    NoMonitorUnderPoint(Point),

    #[error("no monitors are currently attached")]
    NoMonitors,
}
