//! pucsh - the PUCIT shell
//!
//! Usage:
//!   pucsh              Start interactive shell
//!   pucsh -c "cmd"     Execute a single command line
//!   pucsh script.sh    Execute a script file

mod cli;
mod prompt;
mod rcfile;
mod repl;
mod terminal;

use cli::{execute_command, execute_script, new_shell, parse_args, print_help, print_version};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("pucsh=debug")
    } else {
        EnvFilter::try_from_env("PUCSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.trace);

    if let Some(cmd) = cli.command {
        return execute_command(&cmd);
    }

    if let Some(script) = cli.script {
        return execute_script(&script);
    }

    let mut shell = match new_shell() {
        Ok(shell) => shell,
        Err(code) => return code,
    };

    match repl::run(&mut shell, !cli.norc) {
        Ok(code) => terminal::exit_code(code),
        Err(e) => {
            eprintln!("pucsh: {}", e);
            ExitCode::FAILURE
        }
    }
}
