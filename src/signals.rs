//! Signal handling for pucsh
//!
//! - SIGCHLD: a dedicated reaper thread collects terminated children
//! - SIGINT: the interactive shell survives Ctrl+C; children get the default
//!   action back when they exec

use crate::jobs::Supervisor;
use signal_hook::consts::{SIGCHLD, SIGINT};
use signal_hook::iterator::{Handle, Signals};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Set when SIGINT arrives while the shell is reading input
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Running reaper thread. Dropping it stops the thread.
pub struct Reaper {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

/// Start the SIGCHLD reaper for `supervisor`.
///
/// The signal handler itself only writes to signal-hook's self-pipe; all
/// `waitpid` calls happen on the reaper thread.
pub fn spawn_reaper(supervisor: Arc<Supervisor>) -> io::Result<Reaper> {
    let mut signals = Signals::new([SIGCHLD])?;
    let handle = signals.handle();

    let thread = thread::Builder::new()
        .name("reaper".into())
        .spawn(move || {
            // Children that exited before registration still need collecting
            supervisor.reap_all();
            for _ in signals.forever() {
                supervisor.reap_all();
            }
            tracing::debug!("reaper stopped");
        })?;

    Ok(Reaper {
        handle,
        thread: Some(thread),
    })
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Keep Ctrl+C from terminating the shell itself
pub fn shield_from_interrupts() -> io::Result<()> {
    unsafe {
        signal_hook::low_level::register(SIGINT, || {
            INTERRUPTED.store(true, Ordering::SeqCst);
        })?;
    }
    Ok(())
}

/// Check if SIGINT was received and clear the flag
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}
