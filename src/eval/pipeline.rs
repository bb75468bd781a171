//! Pipeline orchestration: pipes, forks, and the foreground wait

use super::launch::{self, Prepared};
use super::{flush_stdout, EvalError, Shell};
use crate::ast::{Pipeline, Stage};
use crate::jobs::exit_code;
use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use std::os::fd::OwnedFd;

impl Shell {
    /// Launch every stage of `pipeline`, then wait for it or register it.
    ///
    /// The last stage's process stands for the whole pipeline. Interior
    /// stages are left to the reaper.
    pub(crate) fn run_pipeline(&mut self, pipeline: &Pipeline) -> Result<(), EvalError> {
        let prepared = pipeline
            .stages
            .iter()
            .map(|stage| self.prepare(stage))
            .collect::<Result<Vec<_>, _>>()?;
        let (last, interior) = match prepared.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        flush_stdout();
        tracing::debug!(
            stages = prepared.len(),
            background = pipeline.background,
            "running pipeline"
        );

        let mut carry: Option<OwnedFd> = None;
        for stage in interior {
            let (read, write) = pipe2(OFlag::O_CLOEXEC).map_err(EvalError::Pipe)?;
            let pid = launch::spawn(stage, carry.as_ref(), Some(&write)).map_err(EvalError::Fork)?;
            tracing::debug!(%pid, "started interior stage");
            // Our copy of the write end must go, or the reader never sees EOF
            drop(write);
            carry = Some(read);
        }

        // Register the last pid before the reaper can observe it
        let mut supervised = self.supervisor.lock();
        let pid = launch::spawn(last, carry.as_ref(), None).map_err(EvalError::Fork)?;
        drop(carry);

        if pipeline.background {
            let number = supervised.jobs.register(pid, pipeline.last().text.as_str())?;
            drop(supervised);
            tracing::debug!(%pid, number, "registered background job");
            println!("[{}] {}", number, pid);
            self.last_status = 0;
        } else {
            supervised.await_exit(pid);
            drop(supervised);
            let status = self.supervisor.wait_for(pid);
            tracing::debug!(%pid, ?status, "foreground pipeline finished");
            self.last_status = exit_code(status);
        }
        Ok(())
    }

    fn prepare(&self, stage: &Stage) -> Result<Prepared, EvalError> {
        let argv: Vec<String> = stage.argv.iter().map(|w| self.expand(w)).collect();
        let input = stage.input.as_deref().map(|w| self.expand(w));
        let output = stage.output.as_deref().map(|w| self.expand(w));
        Prepared::new(&argv, input.as_deref(), output.as_deref())
    }
}
