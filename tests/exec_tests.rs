use assert_cmd::Command;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::str::from_utf8;

fn config_dir() -> PathBuf {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    base.join("assets").join("test-configs")
}

// The AZURE_* variables flip credential selection, so tests that expect
// failures must not inherit them from the developer's shell
fn scrubbed_command() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("AZURE_TENANT_ID")
        .env_remove("AZURE_CLIENT_ID")
        .env_remove("AZURE_CLIENT_SECRET");
    cmd
}

#[test]
fn no_arguments_name_every_missing_field() {
    let e = scrubbed_command().ok().unwrap_err();
    let output = e.as_output().unwrap();
    let stderr = from_utf8(&output.stderr).unwrap();
    for field in ["subscription-id", "resource-group", "zone", "record"] {
        assert!(stderr.contains(field), "missing {field} in: {stderr}");
    }
}

#[test]
fn missing_resource_group_fails_before_any_network_call() {
    let mut cmd = scrubbed_command();
    cmd.args([
        "--subscription-id",
        "sub-1",
        "--zone",
        "z.example.com",
        "--record",
        "home",
        "--tenant-id",
        "tenant-1",
        "--client-id",
        "client-1",
        "--client-secret",
        "secret-1",
    ]);

    let e = cmd.ok().unwrap_err();
    let output = e.as_output().unwrap();
    let stderr = from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("resource-group"));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_credentials_fail_before_any_network_call() {
    let mut cmd = scrubbed_command();
    cmd.args([
        "--subscription-id",
        "sub-1",
        "--resource-group",
        "rg-1",
        "--zone",
        "z.example.com",
        "--record",
        "home",
    ]);

    let e = cmd.ok().unwrap_err();
    let output = e.as_output().unwrap();
    let stderr = from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("credential"));
    assert!(output.stdout.is_empty());
}

#[test]
fn nonexistent_config_file_fails() {
    let mut cmd = scrubbed_command();
    cmd.arg("--config").arg("/nonexistent/dyndns.json");

    let e = cmd.ok().unwrap_err();
    let output = e.as_output().unwrap();
    let stderr = from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("could not read config file"));
}

#[test]
fn malformed_config_file_fails() {
    let mut cmd = scrubbed_command();
    cmd.arg("--config").arg(config_dir().join("malformed.json"));

    let e = cmd.ok().unwrap_err();
    let output = e.as_output().unwrap();
    let stderr = from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("could not parse config file"));
}

/// Runs a real update against Azure. Expects a .env with the AZURE_* service
/// principal variables and a config file pointing at a disposable record.
#[test]
#[ignore = "requires Azure credentials"]
fn azure_integration_test() {
    dotenv().unwrap();
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("--config").arg(config_dir().join("azure.json"));
    match cmd.ok() {
        Ok(output) => {
            let stdout = from_utf8(&output.stdout).unwrap();
            println!("stdout:\n{stdout}");
            eprintln!("stderr:\n{}", from_utf8(&output.stderr).unwrap());
            // fqdn - ip - provisioningState
            assert_eq!(stdout.trim().split(" - ").count(), 3);
        }
        Err(e) => {
            let output = e.as_output().unwrap();
            println!("stdout:\n{}", from_utf8(&output.stdout).unwrap());
            eprintln!("stderr:\n{}", from_utf8(&output.stderr).unwrap());
            panic!("failed with exit code {}", output.status);
        }
    }
}
