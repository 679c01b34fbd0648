use std::process::Command;

#[test]
fn test_help_lists_every_command() {
    let bin = env!("CARGO_BIN_EXE_fabric-wall");

    let output = Command::new(bin).arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["validate", "provision", "setup", "sql-policy"] {
        assert!(
            stdout.contains(command),
            "help output should mention `{}`; got:\n{}",
            command,
            stdout
        );
    }
    assert!(stdout.contains("ACCESS_TOKEN"));
}

#[test]
fn test_subcommand_is_required() {
    let bin = env!("CARGO_BIN_EXE_fabric-wall");

    let output = Command::new(bin).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_version_matches_package() {
    let bin = env!("CARGO_BIN_EXE_fabric-wall");

    let output = Command::new(bin).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
