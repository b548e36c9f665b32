use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "maze-runner"])
        .status()
        .expect("failed to invoke cargo check for maze-runner CLI binary");

    assert!(status.success(), "cargo check --bin maze-runner should succeed");
}

#[test]
fn help_lists_the_configuration_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_maze-runner"))
        .arg("--help")
        .output()
        .expect("failed to run maze-runner --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--width", "--height", "--seed", "--data-dir", "--config", "--grow", "--log-level"] {
        assert!(help.contains(flag), "help should mention {flag}");
    }
}
