use assert_cmd::Command;
use tempfile::TempDir;

fn connref() -> Command {
    let mut cmd = Command::cargo_bin("connref").unwrap();
    cmd.env_remove("CONNREF_DATAVERSE_URL")
        .env_remove("CONNREF_CLIENT_SECRET")
        .env_remove("CONNREF_ACCESS_TOKEN");
    cmd
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_lists_subcommands() {
    let output = connref().arg("--help").assert().success().get_output().clone();
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in [
        "analyze",
        "create-refs",
        "update-flows",
        "process",
        "generate-deployment-settings",
        "cleanup",
        "add-existing-refs",
        "init",
    ] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn test_invalid_format_is_rejected() {
    let output = connref()
        .args(["analyze", "--solution", "Pkg", "--format", "xml"])
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(stderr(&output).contains("xml"));
}

#[test]
fn test_missing_solution_is_rejected() {
    let output = connref()
        .arg("create-refs")
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(stderr(&output).contains("--solution"));
}

#[test]
fn test_missing_config_file_fails_before_any_request() {
    let temp = TempDir::new().unwrap();
    let output = connref()
        .current_dir(temp.path())
        .args(["--plain", "analyze", "-s", "Pkg"])
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = stderr(&output);
    assert!(stderr.contains("failed to load configuration"), "{stderr}");
    assert!(stderr.contains(".connref.toml"), "{stderr}");
    assert!(stderr.contains("[E022]"), "{stderr}");
    assert!(stderr.contains("hint: run `connref init`"), "{stderr}");
}

#[test]
fn test_init_writes_config_once() {
    let temp = TempDir::new().unwrap();
    connref().current_dir(temp.path()).arg("init").assert().success();
    assert!(temp.path().join(".connref.toml").is_file());

    connref().current_dir(temp.path()).arg("init").assert().failure();
    connref()
        .current_dir(temp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
