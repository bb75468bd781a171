use crate::prompt;
use crate::rcfile::load_rc;
use crate::terminal::{execute_line, run_lines};
use pucsh::signals::{shield_from_interrupts, take_interrupt};
use pucsh::Shell;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal};

/// Run the shell on standard input until `exit` or end of input.
///
/// A terminal gets line editing, a prompt, and the persistent history file.
/// Anything else is read line by line with no prompt.
pub(crate) fn run(shell: &mut Shell, load_rcfile: bool) -> rustyline::Result<i32> {
    if !io::stdin().is_terminal() {
        tracing::debug!("stdin is not a terminal, reading without a prompt");
        let code = run_lines(shell, io::stdin().lock(), "stdin");
        return Ok(code.unwrap_or_else(|| shell.last_status()));
    }

    if let Err(e) = shield_from_interrupts() {
        tracing::warn!("cannot install SIGINT handler: {}", e);
    }

    if load_rcfile {
        if let Some(path) = shell.config().rc_file.clone() {
            if let Some(code) = load_rc(shell, &path) {
                return Ok(code);
            }
        }
    }

    let mut rl = DefaultEditor::new()?;
    let history_file = shell.config().history_file.clone();
    if let Some(path) = &history_file {
        if let Err(e) = rl.load_history(path) {
            tracing::debug!("no history loaded from {}: {}", path.display(), e);
        }
    }

    let code = loop {
        let prompt = prompt::render(&shell.config().prompt);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                take_interrupt();
                if let Some(code) = execute_line(shell, trimmed) {
                    break code;
                }
                // A foreground child killed by Ctrl+C leaves the cursor mid-line
                if take_interrupt() {
                    println!();
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C abandons the current line
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                break shell.last_status();
            }
            Err(e) => return Err(e),
        }
    };

    if let Some(path) = &history_file {
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("cannot save history to {}: {}", path.display(), e);
        }
    }
    Ok(code)
}
