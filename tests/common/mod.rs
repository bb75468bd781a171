//! Common test utilities for pucsh integration tests

#![allow(dead_code)]

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// A throwaway HOME that doubles as the working directory
pub fn sandbox() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// The shell binary, isolated from the user's rc file and settings
pub fn pucsh(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pucsh").unwrap();
    cmd.arg("--norc")
        .current_dir(home)
        .env("HOME", home)
        .env_remove("PUCSH_PROMPT")
        .env_remove("PUCSH_HISTSIZE")
        .env_remove("PUCSH_MAX_JOBS")
        .env_remove("PUCSH_LOG");
    cmd
}

/// Feed `script` to the shell on stdin, one command per line
pub fn run(home: &Path, script: &str) -> Assert {
    pucsh(home).write_stdin(script).assert()
}

/// Stdout of a script run, as a string
pub fn stdout_of(home: &Path, script: &str) -> String {
    let output = pucsh(home).write_stdin(script).output().unwrap();
    String::from_utf8(output.stdout).unwrap()
}

/// Pid printed in a `[n] pid` or `[n] pid text` line
pub fn job_pid(line: &str) -> &str {
    line.split_whitespace().nth(1).unwrap()
}
