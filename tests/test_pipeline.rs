//! Integration tests for pipelines and redirection

#[path = "common/mod.rs"]
mod common;
use common::{run, sandbox, stdout_of};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_single_command() {
    let home = sandbox();
    run(home.path(), "echo hello world\n")
        .success()
        .stdout("hello world\n");
}

#[test]
fn test_output_redirect_creates_file() {
    let home = sandbox();
    run(home.path(), "echo hi > x.txt\njobs\n")
        .success()
        .stdout("");
    assert_eq!(fs::read_to_string(home.path().join("x.txt")).unwrap(), "hi\n");
}

#[test]
fn test_output_redirect_truncates() {
    let home = sandbox();
    let target = home.path().join("out.txt");
    fs::write(&target, "a much longer line that must disappear\n").unwrap();
    run(home.path(), "echo short > out.txt\n").success();
    assert_eq!(fs::read_to_string(&target).unwrap(), "short\n");
}

#[test]
fn test_redirect_round_trip() {
    let home = sandbox();
    let script = "seq 1 5 > nums.txt\ncat < nums.txt | cat > copy.txt\n";
    run(home.path(), script).success();
    assert_eq!(
        fs::read(home.path().join("nums.txt")).unwrap(),
        fs::read(home.path().join("copy.txt")).unwrap()
    );
}

#[test]
fn test_three_stage_pipeline() {
    let home = sandbox();
    let out = stdout_of(home.path(), "seq 1 10 | grep 1 | wc -l\n");
    assert_eq!(out.trim(), "2");
}

#[test]
fn test_long_pipeline() {
    let home = sandbox();
    let out = stdout_of(home.path(), "echo abc | cat | cat | cat | cat | tr a-z A-Z\n");
    assert_eq!(out, "ABC\n");
}

#[test]
fn test_producer_stops_when_consumer_exits() {
    let home = sandbox();
    run(home.path(), "yes | head -n 1\necho $?\nseq 1 10000000 | head -n 1\n")
        .success()
        .stdout("y\n0\n1\n")
        .stderr("");
}

#[test]
fn test_input_redirect_overrides_pipe() {
    let home = sandbox();
    fs::write(home.path().join("file.txt"), "from file\n").unwrap();
    run(home.path(), "echo from pipe | cat < file.txt\n")
        .success()
        .stdout("from file\n");
}

#[test]
fn test_output_redirect_on_interior_stage() {
    let home = sandbox();
    let out = stdout_of(home.path(), "echo hi > a.txt | wc -c\n");
    assert_eq!(out.trim(), "0");
    assert_eq!(fs::read_to_string(home.path().join("a.txt")).unwrap(), "hi\n");
}

#[test]
fn test_failing_first_stage_does_not_stop_the_shell() {
    let home = sandbox();
    let out = pucsh_output(home.path(), "cat nonexistent.txt | wc -l\necho after\n");
    assert_eq!(out.0.split_whitespace().collect::<Vec<_>>(), ["0", "after"]);
    assert!(out.1.contains("nonexistent.txt"));
}

#[test]
fn test_command_not_found() {
    let home = sandbox();
    run(home.path(), "no-such-program-pucsh\necho $?\n")
        .success()
        .stdout("127\n")
        .stderr(predicate::str::contains(
            "no-such-program-pucsh: command not found",
        ));
}

#[test]
fn test_missing_input_file() {
    let home = sandbox();
    run(home.path(), "cat < missing.txt\necho $?\n")
        .stdout("1\n")
        .stderr(predicate::str::contains("missing.txt: No such file or directory"));
}

#[test]
fn test_exit_status_of_last_stage() {
    let home = sandbox();
    run(home.path(), "false | true\necho $?\ntrue | false\necho $?\n")
        .stdout("0\n1\n");
}

#[test]
fn test_missing_redirect_target() {
    let home = sandbox();
    run(home.path(), "cat <\necho $?\n")
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains(
            "syntax error: missing file name after '<'",
        ));
}

#[test]
fn test_empty_stage_creates_no_process() {
    let home = sandbox();
    run(home.path(), "echo leaked > leaked.txt |\n| wc\n")
        .stderr(predicate::str::contains("syntax error: empty command in pipeline").count(2));
    assert!(!home.path().join("leaked.txt").exists());
}

#[test]
fn test_variables_expand_in_redirect_targets() {
    let home = sandbox();
    run(home.path(), "OUT=target.txt\necho hi > $OUT\n").success();
    assert_eq!(
        fs::read_to_string(home.path().join("target.txt")).unwrap(),
        "hi\n"
    );
}

fn pucsh_output(home: &std::path::Path, script: &str) -> (String, String) {
    let output = common::pucsh(home).write_stdin(script).output().unwrap();
    (
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}
