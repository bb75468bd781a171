use pucsh::{Flow, Shell};
use std::io::BufRead;
use std::process::ExitCode;

/// Execute a single line, reporting any error on stderr.
///
/// Returns the exit code when the line asked the shell to exit.
pub(crate) fn execute_line(shell: &mut Shell, line: &str) -> Option<i32> {
    match shell.execute_line(line) {
        Ok(Flow::Continue) => None,
        Ok(Flow::Exit(code)) => Some(code),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

/// Run every line from `reader`, skipping blank lines and `#` comments.
///
/// Stops early on `exit`. Errors are reported and execution continues.
pub(crate) fn run_lines<R: BufRead>(shell: &mut Shell, reader: R, source: &str) -> Option<i32> {
    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{}: line {}: {}", source, line_num + 1, e);
                return Some(1);
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        tracing::trace!(source, line = line_num + 1, "executing");
        if let Some(code) = execute_line(shell, trimmed) {
            return Some(code);
        }
    }
    None
}

/// Map a shell status onto a process exit code
pub(crate) fn exit_code(status: i32) -> ExitCode {
    ExitCode::from((status & 0xff) as u8)
}
