//! pucsh - the PUCIT shell
//!
//! # Overview
//!
//! pucsh is a small interactive Unix shell. A line is a pipeline of commands
//! joined by `|`, each with optional `<` and `>` redirections, optionally
//! ending in `&` to run it in the background.
//!
//! ```text
//! cat notes.txt | grep todo | wc -l > count.txt
//! sleep 30 &
//! jobs
//! kill 1
//! ```
//!
//! # Job control
//!
//! Background pipelines are tracked in a bounded job table, numbered by
//! position. A dedicated thread reaps terminated children as SIGCHLD arrives
//! and drops finished jobs from the table; the main loop never calls
//! `waitpid` itself. See [`jobs::Supervisor`].
//!
//! # Example
//!
//! ```no_run
//! use pucsh::{Config, Flow, Shell};
//!
//! let mut shell = Shell::new(Config::from_env()).unwrap();
//! shell.execute_line("echo hello | tr a-z A-Z").unwrap();
//! assert_eq!(shell.last_status(), 0);
//! assert_eq!(shell.execute_line("exit 3").unwrap(), Flow::Exit(3));
//! ```

pub mod ast;
pub mod config;
pub mod eval;
pub mod history;
pub mod jobs;
pub mod lexer;
pub mod parser;
pub mod signals;
pub mod state;

// Re-export commonly used items
pub use ast::{Pipeline, Stage};
pub use config::Config;
pub use eval::{Builtin, EvalError, Flow, Shell};
pub use history::{History, HistoryError};
pub use jobs::{Job, JobError, JobTable, Supervisor};
pub use lexer::tokenize;
pub use parser::{parse, ParseError};
pub use state::ShellState;
