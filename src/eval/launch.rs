//! Forking and exec'ing a single pipeline stage
//!
//! Everything the child needs is converted to C strings before the fork. The
//! child only makes raw system calls and then either execs or exits, so it
//! never allocates and never returns into the shell.

use super::EvalError;
use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{dup2, fork, ForkResult, Pid};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

const STDIN: RawFd = 0;
const STDOUT: RawFd = 1;
const STDERR: RawFd = 2;

/// A stage ready to run: argv and redirection paths as C strings
#[derive(Debug)]
pub(crate) struct Prepared {
    argv: Vec<CString>,
    /// Null-terminated pointers into `argv`, as `execvp` wants them
    argv_ptrs: Vec<*const c_char>,
    input: Option<CString>,
    output: Option<CString>,
}

impl Prepared {
    pub(crate) fn new(
        argv: &[String],
        input: Option<&str>,
        output: Option<&str>,
    ) -> Result<Self, EvalError> {
        let argv = argv
            .iter()
            .map(|arg| c_string(arg))
            .collect::<Result<Vec<_>, _>>()?;
        let argv_ptrs = argv
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(ptr::null()))
            .collect();
        Ok(Prepared {
            argv,
            argv_ptrs,
            input: input.map(c_string).transpose()?,
            output: output.map(c_string).transpose()?,
        })
    }

    fn program(&self) -> &CStr {
        &self.argv[0]
    }
}

fn c_string(s: &str) -> Result<CString, EvalError> {
    CString::new(s).map_err(|_| EvalError::InvalidArgument(s.to_string()))
}

/// Fork a child running `stage`.
///
/// `stdin` is the read end carried from the previous stage and `stdout` the
/// write end of the pipe to the next one. File redirections take precedence
/// over both. Every pipe descriptor is close-on-exec, so the child keeps only
/// the ones it dup'd onto 0 and 1.
pub(crate) fn spawn(
    stage: &Prepared,
    stdin: Option<&OwnedFd>,
    stdout: Option<&OwnedFd>,
) -> Result<Pid, Errno> {
    match unsafe { fork() }? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => run_child(stage, stdin, stdout),
    }
}

fn run_child(stage: &Prepared, stdin: Option<&OwnedFd>, stdout: Option<&OwnedFd>) -> ! {
    // The Rust runtime ignores SIGPIPE, and an ignored signal survives exec
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    if let Err(e) = unsafe { sigaction(Signal::SIGPIPE, &default) } {
        die_with(c"sigaction", e.desc(), 1);
    }

    if let Some(path) = &stage.input {
        match open(path.as_c_str(), OFlag::O_RDONLY | OFlag::O_CLOEXEC, Mode::empty()) {
            Ok(fd) => bind(fd, STDIN),
            Err(e) => die(path, e, 1),
        }
    } else if let Some(fd) = stdin {
        bind(fd.as_raw_fd(), STDIN);
    }

    if let Some(path) = &stage.output {
        let flags = OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC | OFlag::O_CLOEXEC;
        let mode = Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH;
        match open(path.as_c_str(), flags, mode) {
            Ok(fd) => bind(fd, STDOUT),
            Err(e) => die(path, e, 1),
        }
    } else if let Some(fd) = stdout {
        bind(fd.as_raw_fd(), STDOUT);
    }

    unsafe {
        libc::execvp(stage.program().as_ptr(), stage.argv_ptrs.as_ptr());
    }
    match Errno::last() {
        Errno::ENOENT => die_with(stage.program(), "command not found", 127),
        e => die(stage.program(), e, 126),
    }
}

fn bind(fd: RawFd, target: RawFd) {
    if let Err(e) = dup2(fd, target) {
        die_with(c"dup2", e.desc(), 1);
    }
}

fn die(context: &CStr, errno: Errno, code: i32) -> ! {
    die_with(context, errno.desc(), code)
}

/// Print `<context>: <message>` on stderr and leave the child
fn die_with(context: &CStr, message: &str, code: i32) -> ! {
    write_stderr(context.to_bytes());
    write_stderr(b": ");
    write_stderr(message.as_bytes());
    write_stderr(b"\n");
    unsafe { libc::_exit(code) }
}

fn write_stderr(bytes: &[u8]) {
    unsafe {
        libc::write(STDERR, bytes.as_ptr().cast(), bytes.len());
    }
}

