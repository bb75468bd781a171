//! Job table and child supervision
//!
//! The [`Supervisor`] owns everything the main loop and the reaper thread
//! share: the table of background jobs, and the foreground pids the main
//! loop is waiting on. All of it sits behind a single mutex.
//!
//! The main loop never calls `waitpid` itself. It registers the pid it cares
//! about while still holding the lock it forked under, then sleeps on a
//! condition variable until the reaper hands it the exit status. Holding the
//! lock across the fork means the reaper can never see a pid before it has
//! been registered.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::collections::HashMap;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("kill: no such job: {0}")]
    NoSuchJob(usize),
    #[error("jobs: job table full ({0} jobs)")]
    TableFull(usize),
    #[error("kill: job [{number}] {pid}: {source}")]
    Kill {
        number: usize,
        pid: Pid,
        #[source]
        source: Errno,
    },
}

/// A backgrounded pipeline, tracked by its terminal process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub command: String,
}

/// Bounded, ordered list of background jobs.
///
/// Job numbers are positions: the first job is `[1]`, and removing a job
/// renumbers every job after it.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    capacity: usize,
}

impl JobTable {
    pub fn new(capacity: usize) -> Self {
        JobTable {
            jobs: Vec::new(),
            capacity,
        }
    }

    /// Append a job, returning its display number
    pub fn register(&mut self, pid: Pid, command: impl Into<String>) -> Result<usize, JobError> {
        if self.jobs.len() >= self.capacity {
            return Err(JobError::TableFull(self.capacity));
        }
        self.jobs.push(Job {
            pid,
            command: command.into(),
        });
        Ok(self.jobs.len())
    }

    /// Remove the first job with this pid
    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        let index = self.jobs.iter().position(|j| j.pid == pid)?;
        Some(self.jobs.remove(index))
    }

    /// Look a job up by its current display number
    pub fn get(&self, number: usize) -> Option<&Job> {
        number.checked_sub(1).and_then(|i| self.jobs.get(i))
    }

    /// `(display number, job)` in table order
    pub fn list(&self) -> impl Iterator<Item = (usize, &Job)> + '_ {
        self.jobs.iter().enumerate().map(|(i, job)| (i + 1, job))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.jobs.iter().any(|j| j.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// State guarded by the supervisor lock
#[derive(Debug)]
pub struct Supervised {
    pub jobs: JobTable,
    /// Foreground pids being waited on, with their status once reaped
    awaited: HashMap<Pid, Option<WaitStatus>>,
}

impl Supervised {
    /// Mark a foreground pid as awaited by the main loop
    pub fn await_exit(&mut self, pid: Pid) {
        self.awaited.insert(pid, None);
    }
}

/// Shared job-control state, see the module docs
#[derive(Debug)]
pub struct Supervisor {
    state: Mutex<Supervised>,
    exited: Condvar,
}

impl Supervisor {
    pub fn new(max_jobs: usize) -> Self {
        Supervisor {
            state: Mutex::new(Supervised {
                jobs: JobTable::new(max_jobs),
                awaited: HashMap::new(),
            }),
            exited: Condvar::new(),
        }
    }

    /// Take the supervisor lock.
    ///
    /// A panic while holding the lock cannot leave the table half-edited, so
    /// poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Supervised> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the reaper reports the given foreground pid.
    ///
    /// The pid must have been registered with [`Supervised::await_exit`].
    pub fn wait_for(&self, pid: Pid) -> WaitStatus {
        let mut state = self.lock();
        loop {
            if let Some(Some(status)) = state.awaited.get(&pid) {
                let status = *status;
                state.awaited.remove(&pid);
                return status;
            }
            state = self
                .exited
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Record the termination of one child
    pub fn reap(&self, pid: Pid, status: WaitStatus) {
        let mut state = self.lock();
        if let Some(slot) = state.awaited.get_mut(&pid) {
            *slot = Some(status);
            self.exited.notify_all();
        } else if let Some(job) = state.jobs.remove(pid) {
            tracing::debug!(%pid, command = %job.command, ?status, "background job finished");
        } else {
            tracing::trace!(%pid, ?status, "reaped untracked child");
        }
    }

    /// Collect every child that has already terminated, without blocking
    pub fn reap_all(&self) {
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,
                Ok(status) => {
                    if let Some(pid) = status.pid() {
                        self.reap(pid, status);
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    tracing::warn!("waitpid: {}", e);
                    break;
                }
            }
        }
    }

    /// Kill the job currently shown as `[number]` and drop it from the table
    pub fn kill(&self, number: usize) -> Result<Pid, JobError> {
        let mut state = self.lock();
        let pid = state
            .jobs
            .get(number)
            .map(|j| j.pid)
            .ok_or(JobError::NoSuchJob(number))?;
        kill(pid, Signal::SIGKILL).map_err(|source| JobError::Kill {
            number,
            pid,
            source,
        })?;
        state.jobs.remove(pid);
        Ok(pid)
    }

    /// Render the table the way the `jobs` builtin prints it
    pub fn listing(&self) -> String {
        let state = self.lock();
        let mut out = String::new();
        for (number, job) in state.jobs.list() {
            out.push_str(&format!("[{}] {} {}\n", number, job.pid, job.command));
        }
        out
    }
}

/// Shell-style exit code for a terminated process
pub fn exit_code(status: WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
        _ => 0,
    }
}
