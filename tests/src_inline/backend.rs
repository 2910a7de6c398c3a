use super::*;

fn shell(script: &str) -> BackendCommand {
    BackendCommand::new(
        "sh",
        vec!["-c".to_string(), script.to_string(), "backend".to_string()],
    )
}

#[cfg(unix)]
#[test]
fn test_run_appends_extra_args_and_captures_stdout() {
    let out = shell("echo \"$1-$2\"").run(["left", "right"]).unwrap();
    assert_eq!(out.trim(), "left-right");
}

#[cfg(unix)]
#[test]
fn test_nonzero_exit_reports_stderr() {
    let err = shell("echo boom >&2; exit 3")
        .run(std::iter::empty::<&str>())
        .unwrap_err();
    match err {
        BackendError::Failed {
            program, stderr, ..
        } => {
            assert_eq!(program, "sh");
            assert_eq!(stderr, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_program_is_spawn_error() {
    let err = BackendCommand::new("hwbench-no-such-program", Vec::new())
        .run(std::iter::empty::<&str>())
        .unwrap_err();
    assert!(matches!(err, BackendError::Spawn { .. }));
}
