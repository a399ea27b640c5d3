//! rwm :: A tiling window manager in the style of dwm
//!
//! Simple configuration can be done by modifying the contents of config.rs,
//! for anything not covered there you should be able to edit the source
//! code with minimal difficulty.
//! To follow the start-up logic and main loop, start with wm.rs.
use std::{env, process};

use nix::sys::signal::{self, SigHandler, Signal};
use rwm::wm::Wm;
use rwm::x11rb::X11rbConn;
use tracing::error;

/// Reap child processes (spawned terminals, launchers, ...) without an
/// explicit `waitpid` loop (dwm's `signal(SIGCHLD, SIG_IGN)`).
fn install_sigchld_handler() -> rwm::error::Result<()> {
    unsafe {
        signal::sigaction(
            Signal::SIGCHLD,
            &signal::SigAction::new(SigHandler::SigIgn, signal::SaFlags::SA_NOCLDWAIT, signal::SigSet::empty()),
        )?;
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() == 2 && args[1] == "-v" {
        println!("rwm-{}", env!("CARGO_PKG_VERSION"));
        process::exit(1);
    } else if args.len() > 1 {
        println!("usage: rwm [-v]");
        process::exit(1);
    }

    tracing_subscriber::fmt::init();

    if let Err(e) = install_sigchld_handler() {
        error!(error = %e, "failed to install SIGCHLD handler");
        process::exit(1);
    }

    let conn = match X11rbConn::connect() {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "failed to connect to the X server");
            process::exit(1);
        }
    };

    let mut wm = match Wm::new(conn) {
        Ok(wm) => wm,
        Err(e) => {
            error!(error = %e, "failed to initialise window manager");
            process::exit(1);
        }
    };

    if let Err(e) = wm.run() {
        error!(error = %e, "window manager exited with an error");
        process::exit(1);
    }
}
