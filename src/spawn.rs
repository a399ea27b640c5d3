//! Child-process spawn helper. Grounded on `dwm.c`'s `spawn()`: fork, close
//! the X connection in the child, start a new session, then `execvp`.
use std::ffi::CString;
use std::os::unix::io::RawFd;

use tracing::warn;

/// Fork and `execvp(cmd[0], cmd)` in the child. `x_fd` is the X connection's
/// file descriptor, closed in the child before `execvp` so the new process
/// doesn't inherit it. The parent returns immediately; a failing child
/// prints to stderr and exits without unwinding back into the event loop.
pub fn spawn(cmd: &[&str], x_fd: RawFd) {
    if cmd.is_empty() {
        return;
    }

    let argv: Vec<CString> = match cmd.iter().map(|s| CString::new(*s)).collect() {
        Ok(v) => v,
        Err(e) => {
            warn!(%e, "command contains a NUL byte, not spawning");
            return;
        }
    };

    // SAFETY: the child only calls async-signal-safe functions
    // (close/setsid/execvp) before either exec'ing or exiting.
    match unsafe { nix::unistd::fork() } {
        Ok(nix::unistd::ForkResult::Child) => {
            let _ = nix::unistd::close(x_fd);
            let _ = nix::unistd::setsid();
            let _ = nix::unistd::execvp(&argv[0], &argv);
            eprintln!("rwm: execvp {} failed", cmd[0]);
            std::process::exit(0);
        }
        Ok(nix::unistd::ForkResult::Parent { .. }) => {}
        Err(e) => warn!(%e, "fork failed, not spawning"),
    }
}
