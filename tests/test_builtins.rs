//! Integration tests for builtins, variables, history, and entry points

#[path = "common/mod.rs"]
mod common;
use common::{pucsh, run, sandbox, stdout_of};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_exit_code() {
    let home = sandbox();
    run(home.path(), "exit 3\necho unreachable\n")
        .code(3)
        .stdout("");
}

#[test]
fn test_exit_without_code() {
    let home = sandbox();
    run(home.path(), "false\nexit\n").code(0);
}

#[test]
fn test_exit_rejects_non_numeric() {
    let home = sandbox();
    run(home.path(), "exit soon\necho still here\n")
        .success()
        .stdout("still here\n")
        .stderr(predicate::str::contains("exit: soon: numeric argument required"));
}

#[test]
fn test_end_of_input_keeps_last_status() {
    let home = sandbox();
    run(home.path(), "false\n").code(1);
}

#[test]
fn test_command_flag() {
    let home = sandbox();
    pucsh(home.path())
        .args(["-c", "echo hi | tr a-z A-Z"])
        .assert()
        .success()
        .stdout("HI\n");
    pucsh(home.path()).args(["-c", "false"]).assert().code(1);
    pucsh(home.path()).args(["-c", "exit", "7"]).assert().code(7);
}

#[test]
fn test_script_file() {
    let home = sandbox();
    let script = home.path().join("script.pucsh");
    fs::write(
        &script,
        "# comments are skipped\nGREETING=hello\n\necho $GREETING > greeting.txt\ncat greeting.txt\n",
    )
    .unwrap();
    pucsh(home.path())
        .arg(&script)
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_missing_script_file() {
    let home = sandbox();
    pucsh(home.path())
        .arg("does-not-exist.pucsh")
        .assert()
        .code(127)
        .stderr(predicate::str::contains("does-not-exist.pucsh"));
}

#[test]
fn test_version_and_help_flags() {
    let home = sandbox();
    pucsh(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("pucsh "));
    pucsh(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE"));
}

#[test]
fn test_help_builtin() {
    let home = sandbox();
    run(home.path(), "help\n")
        .success()
        .stdout(predicate::str::contains("Builtins:").and(predicate::str::contains("kill <n>")));
}

#[test]
fn test_shell_variables() {
    let home = sandbox();
    run(home.path(), "NAME=world\necho hello $NAME\necho ${NAME}wide\n")
        .success()
        .stdout("hello world\nworldwide\n");
}

#[test]
fn test_last_status_variable() {
    let home = sandbox();
    run(home.path(), "false\necho $?\ntrue\necho $?\n").stdout("1\n0\n");
}

#[test]
fn test_export_reaches_children() {
    let home = sandbox();
    let out = stdout_of(
        home.path(),
        "PUCSH_T_LOCAL=1\nexport PUCSH_T_EXPORTED=yes\nenv | grep ^PUCSH_T_\n",
    );
    assert_eq!(out, "PUCSH_T_EXPORTED=yes\n");
}

#[test]
fn test_export_existing_variable() {
    let home = sandbox();
    let out = stdout_of(
        home.path(),
        "PUCSH_T_LATER=v\nexport PUCSH_T_LATER\nexport\nenv | grep ^PUCSH_T_\n",
    );
    assert_eq!(out, "export PUCSH_T_LATER=v\nPUCSH_T_LATER=v\n");
}

#[test]
fn test_export_invalid_name() {
    let home = sandbox();
    run(home.path(), "export 1abc=x\n")
        .stderr(predicate::str::contains("not a valid identifier"));
}

#[test]
fn test_set_lists_sorted_variables() {
    let home = sandbox();
    run(home.path(), "B=2\nA=1\nset\n").stdout("A=1\nB=2\n");
}

#[test]
fn test_unset() {
    let home = sandbox();
    run(home.path(), "PUCSH_T_X=1\nunset PUCSH_T_X\necho [$PUCSH_T_X]\nset\n").stdout("[]\n");
}

#[test]
fn test_history_and_recall() {
    let home = sandbox();
    run(home.path(), "echo one\necho two\nhistory\n!1\n!-1\n")
        .success()
        .stdout(
            "one\ntwo\n1 echo one\n2 echo two\n3 history\necho one\none\nhistory\n\
             1 echo one\n2 echo two\n3 history\n",
        );
}

#[test]
fn test_history_is_bounded() {
    let home = sandbox();
    pucsh(home.path())
        .env("PUCSH_HISTSIZE", "2")
        .write_stdin("echo a\necho b\necho c\nhistory\n")
        .assert()
        .stdout("a\nb\nc\n1 echo c\n2 history\n");
}

#[test]
fn test_history_errors() {
    let home = sandbox();
    run(home.path(), "!-1\n!9\n!x\n").stderr(
        predicate::str::contains("history: no such event: !-1")
            .and(predicate::str::contains("history: no such event: !9"))
            .and(predicate::str::contains("history: invalid event")),
    );
}

#[test]
fn test_cd() {
    let home = sandbox();
    fs::create_dir(home.path().join("sub")).unwrap();
    run(home.path(), "cd sub\npwd\necho inside > marker.txt\n")
        .success()
        .stdout(predicate::str::ends_with("/sub\n"));
    assert!(home.path().join("sub").join("marker.txt").exists());
}

#[test]
fn test_cd_without_argument_goes_home() {
    let home = sandbox();
    fs::create_dir(home.path().join("sub")).unwrap();
    let name = home.path().file_name().unwrap().to_str().unwrap().to_string();
    run(home.path(), "cd sub\ncd\npwd\n")
        .success()
        .stdout(predicate::str::ends_with(format!("{}\n", name)));
}

#[test]
fn test_cd_failure() {
    let home = sandbox();
    run(home.path(), "cd nowhere\necho $?\n")
        .stdout("1\n")
        .stderr(predicate::str::contains("cd: nowhere:"));
}

#[test]
fn test_rc_file_skipped_with_norc() {
    let home = sandbox();
    fs::write(home.path().join(".pucshrc"), "echo from rc\n").unwrap();
    run(home.path(), "echo main\n").stdout("main\n");
}
