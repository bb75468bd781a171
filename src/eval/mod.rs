//! Command execution for pucsh
//!
//! A [`Shell`] takes one line at a time. Lines that start with a builtin or
//! consist only of assignments run inside the shell process; everything else
//! is parsed into a pipeline and run as child processes.

mod builtins;
mod launch;
mod pipeline;

pub use builtins::Builtin;

use crate::config::Config;
use crate::history::{History, HistoryError};
use crate::jobs::{JobError, Supervisor};
use crate::lexer::tokenize;
use crate::parser::ParseError;
use crate::signals::{spawn_reaper, Reaper};
use crate::state::{parse_assignment, ShellState};
use nix::errno::Errno;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error("pipe: {0}")]
    Pipe(#[source] Errno),
    #[error("fork: {0}")]
    Fork(#[source] Errno),
    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),
    #[error("{0}")]
    Builtin(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl EvalError {
    /// Value `$?` takes after this error
    pub fn status(&self) -> i32 {
        match self {
            EvalError::Parse(_) => 2,
            _ => 1,
        }
    }
}

/// What the caller should do after a line has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Interpreter state that persists between lines
pub struct Shell {
    config: Config,
    supervisor: Arc<Supervisor>,
    _reaper: Reaper,
    vars: ShellState,
    history: History,
    last_status: i32,
}

impl Shell {
    /// Create a shell and start its SIGCHLD reaper.
    ///
    /// The reaper collects every child of the process, so only one shell
    /// should exist at a time.
    pub fn new(config: Config) -> Result<Self, EvalError> {
        let supervisor = Arc::new(Supervisor::new(config.max_jobs));
        let reaper = spawn_reaper(Arc::clone(&supervisor))?;
        Ok(Shell {
            history: History::new(config.history_size),
            config,
            supervisor,
            _reaper: reaper,
            vars: ShellState::new(),
            last_status: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Exit status of the last command, as `$?` reports it
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn vars(&self) -> &ShellState {
        &self.vars
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current job table, formatted like the `jobs` builtin
    pub fn job_listing(&self) -> String {
        self.supervisor.listing()
    }

    pub fn job_count(&self) -> usize {
        self.supervisor.lock().jobs.len()
    }

    /// Run one line of input.
    ///
    /// On error `$?` is updated before the error is returned; the shell stays
    /// usable either way.
    pub fn execute_line(&mut self, line: &str) -> Result<Flow, EvalError> {
        let result = self.dispatch(line);
        if let Err(e) = &result {
            self.last_status = e.status();
        }
        result
    }

    fn dispatch(&mut self, line: &str) -> Result<Flow, EvalError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let line = match self.history.recall(line)? {
            Some(recalled) => {
                println!("{}", recalled);
                recalled
            }
            None => {
                self.history.push(line);
                line.to_string()
            }
        };

        let words = tokenize(&line);
        let Some(first) = words.first() else {
            return Ok(Flow::Continue);
        };

        if let Some(builtin) = Builtin::lookup(first) {
            let args: Vec<String> = words[1..].iter().map(|w| self.expand(w)).collect();
            let flow = self.run_builtin(builtin, &args)?;
            self.last_status = 0;
            return Ok(flow);
        }

        if words.iter().all(|w| parse_assignment(w).is_some()) {
            for word in &words {
                if let Some((name, value)) = parse_assignment(word) {
                    let value = self.expand(value);
                    self.vars.set(name, &value);
                }
            }
            self.last_status = 0;
            return Ok(Flow::Continue);
        }

        let pipeline = crate::parser::parse(&line)?;
        self.run_pipeline(&pipeline)?;
        Ok(Flow::Continue)
    }

    fn expand(&self, word: &str) -> String {
        self.vars.expand_word(word, self.last_status)
    }
}

/// Flush our own buffered output so it lands before a child's
fn flush_stdout() {
    if let Err(e) = io::stdout().flush() {
        tracing::warn!("flushing stdout: {}", e);
    }
}
