use crate::terminal::{execute_line, exit_code, run_lines};
use pucsh::{Config, Shell};
use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CliArgs {
    pub(crate) command: Option<String>,
    pub(crate) script: Option<String>,
    pub(crate) norc: bool,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) trace: bool,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs::default();

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--norc" => {
                cli.norc = true;
            }
            "--trace" => {
                cli.trace = true;
            }
            "-c" => {
                // Everything after -c is the command
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                    break;
                }
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            path => {
                // Assume it's a script file if not a flag
                if !path.starts_with('-') && cli.script.is_none() {
                    cli.script = Some(path.to_string());
                }
            }
        }
        i += 1;
    }

    cli
}

pub(crate) fn print_help() {
    println!(
        r#"pucsh {} - the PUCIT shell

USAGE:
    pucsh                   Start interactive shell
    pucsh -c <command>      Execute a single command line
    pucsh <script>          Execute a script file, one command per line
    pucsh --norc            Do not read ~/.pucshrc
    pucsh --trace           Log pipeline and job activity to stderr
    pucsh --help            Show this help message
    pucsh --version         Show version

SYNTAX:
    cmd args                Run a program found on PATH
    cmd1 | cmd2             Pipe stdout of cmd1 into cmd2
    cmd < file              Read stdin from file
    cmd > file              Write stdout to file (truncates)
    cmd &                   Run in the background
    NAME=value              Set a shell variable
    !-1  !N                 Re-run a history entry

BUILTINS:
    cd exit jobs kill export set unset history help

ENVIRONMENT:
    PUCSH_PROMPT            Prompt (\u user, \h host, \w cwd, \t time)
    PUCSH_HISTSIZE          Entries kept for !N recall (default 10)
    PUCSH_MAX_JOBS          Background job limit (default 10)
    PUCSH_LOG               Log filter, e.g. pucsh=debug

FILES:
    ~/.pucshrc              Executed at interactive startup
    ~/.pucsh_history        Line-editor history"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("pucsh {}", VERSION);
}

/// Create the shell, reporting failure the way the other entry points do
pub(crate) fn new_shell() -> Result<Shell, ExitCode> {
    Shell::new(Config::from_env()).map_err(|e| {
        eprintln!("pucsh: {}", e);
        ExitCode::FAILURE
    })
}

/// Execute a single command line
pub(crate) fn execute_command(cmd: &str) -> ExitCode {
    let mut shell = match new_shell() {
        Ok(shell) => shell,
        Err(code) => return code,
    };

    match execute_line(&mut shell, cmd) {
        Some(code) => exit_code(code),
        None => exit_code(shell.last_status()),
    }
}

/// Execute a script file
pub(crate) fn execute_script(path: &str) -> ExitCode {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("pucsh: {}: {}", path, e);
            return ExitCode::from(127);
        }
    };

    let mut shell = match new_shell() {
        Ok(shell) => shell,
        Err(code) => return code,
    };

    match run_lines(&mut shell, BufReader::new(file), path) {
        Some(code) => exit_code(code),
        None => exit_code(shell.last_status()),
    }
}
