use crate::terminal::run_lines;
use pucsh::Shell;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Load and execute the rc file if it exists.
///
/// Returns the exit code if the rc file itself ran `exit`.
pub(crate) fn load_rc(shell: &mut Shell, path: &Path) -> Option<i32> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return None;
        }
    };

    tracing::debug!(path = %path.display(), "loading rc file");
    let source = path.display().to_string();
    run_lines(shell, BufReader::new(file), &source)
}
