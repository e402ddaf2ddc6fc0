mod common;

use std::path::Path;

use common::{TestResult, WORKDIR, workspace_fs};
use invoicebot::config::{DependenciesSection, EnvironmentSection};
use invoicebot::deps::{install, parse_manifest, requirement_name};
use invoicebot::fs::mock::MockFileSystem;
use invoicebot::provision::{parse_version, provision, version_matches};
use invoicebot_test_utils::fake_runner::{FakeCommandRunner, FakeResponse, labels};
use invoicebot_test_utils::init_tracing;

fn pinned(version: &str) -> EnvironmentSection {
    EnvironmentSection {
        runtime_version: Some(version.to_string()),
        version_command: Some("python --version".to_string()),
        ..EnvironmentSection::default()
    }
}

#[test]
fn versions_are_extracted_from_command_output() {
    assert_eq!(parse_version("Python 3.10.12").as_deref(), Some("3.10.12"));
    assert_eq!(parse_version("node 20.11.1\n").as_deref(), Some("20.11.1"));
    assert_eq!(parse_version("ruby 3.3p0").as_deref(), Some("3.3"));
    assert_eq!(parse_version("no digits here"), None);
}

#[test]
fn version_pins_match_by_component() {
    assert!(version_matches("3.10", "3.10.12"));
    assert!(version_matches("3", "3.12.1"));
    assert!(version_matches("3.10.12", "3.10.12"));
    assert!(!version_matches("3.10", "3.1.0"));
    assert!(!version_matches("3.1", "3.10.0"));
    assert!(!version_matches("3.10", "3.11.2"));
    assert!(!version_matches("3.10.1", "3.10"));
}

#[tokio::test]
async fn provision_checks_out_then_checks_the_runtime() -> TestResult {
    init_tracing();

    let fs = workspace_fs();
    let runner = FakeCommandRunner::new();
    let executed = runner.executed();
    let env = EnvironmentSection {
        checkout: Some("git checkout --force abc123".to_string()),
        ..pinned("3.10")
    };

    let provisioned = provision(&fs, &runner, Path::new(WORKDIR), &env).await?;
    assert!(provisioned.checked_out);
    assert_eq!(provisioned.runtime_version.as_deref(), Some("3.10.12"));
    assert_eq!(labels(&executed), vec!["checkout", "runtime"]);
    Ok(())
}

#[tokio::test]
async fn version_output_on_stderr_is_accepted() -> TestResult {
    init_tracing();

    let fs = workspace_fs();
    let runner =
        FakeCommandRunner::new().on("runtime", FakeResponse::ok().stderr("Python 3.10.4"));

    let provisioned = provision(&fs, &runner, Path::new(WORKDIR), &pinned("3.10")).await?;
    assert_eq!(provisioned.runtime_version.as_deref(), Some("3.10.4"));
    Ok(())
}

#[tokio::test]
async fn missing_workdir_fails_before_any_command() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = FakeCommandRunner::new();
    let executed = runner.executed();

    let err = provision(&fs, &runner, Path::new("/missing"), &pinned("3.10"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(labels(&executed).is_empty());
}

#[tokio::test]
async fn unparseable_version_output_is_an_error() {
    init_tracing();

    let fs = workspace_fs();
    let runner = FakeCommandRunner::new().on("runtime", FakeResponse::ok().stdout("python"));

    let err = provision(&fs, &runner, Path::new(WORKDIR), &pinned("3.10"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no version found"));
}

#[tokio::test]
async fn without_a_pin_no_version_is_checked() -> TestResult {
    init_tracing();

    let fs = workspace_fs();
    let runner = FakeCommandRunner::new();
    let executed = runner.executed();

    let provisioned =
        provision(&fs, &runner, Path::new(WORKDIR), &EnvironmentSection::default()).await?;
    assert_eq!(provisioned.runtime_version, None);
    assert!(!provisioned.checked_out);
    assert!(labels(&executed).is_empty());
    Ok(())
}

#[test]
fn manifest_parsing_skips_comments_and_options() {
    let manifest = "\
# generator dependencies
python-docx==1.1.0
python-dateutil>=2.8  # relativedelta

-r extra.txt
--index-url https://pypi.example/simple
requests[socks] ; python_version > '3'
";
    assert_eq!(
        parse_manifest(manifest),
        vec![
            "python-docx==1.1.0",
            "python-dateutil>=2.8",
            "requests[socks] ; python_version > '3'",
        ]
    );
}

#[test]
fn requirement_names_drop_specifiers() {
    assert_eq!(requirement_name("python-docx==1.1.0"), "python-docx");
    assert_eq!(requirement_name("requests[socks]"), "requests");
    assert_eq!(requirement_name("zope.interface>=5"), "zope.interface");
    assert_eq!(requirement_name("plain"), "plain");
}

#[tokio::test]
async fn install_substitutes_the_manifest_path() -> TestResult {
    init_tracing();

    let fs = workspace_fs();
    let runner = FakeCommandRunner::new();
    let executed = runner.executed();
    let section = DependenciesSection {
        install: "python -m pip install -r {manifest}".to_string(),
        ..DependenciesSection::default()
    };

    let requirements = install(&fs, &runner, Path::new(WORKDIR), &section).await?;
    assert_eq!(
        requirements,
        vec!["python-docx==1.1.0", "python-dateutil>=2.8"]
    );

    let commands = executed.lock().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].label, "install");
    assert_eq!(commands[0].cmd, "python -m pip install -r requirements.txt");
    Ok(())
}

#[tokio::test]
async fn install_failure_reports_the_tail_of_stderr() {
    init_tracing();

    let fs = workspace_fs();
    let runner = FakeCommandRunner::new().on(
        "install",
        FakeResponse::exit(1)
            .stderr("Collecting python-docx")
            .stderr("ERROR: Could not find a version that satisfies the requirement"),
    );

    let err = install(&fs, &runner, Path::new(WORKDIR), &DependenciesSection::default())
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("exited with code 1"));
    assert!(msg.contains("Could not find a version"));
}

#[tokio::test]
async fn missing_manifest_is_reported_without_running_pip() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_dir(WORKDIR);
    let runner = FakeCommandRunner::new();
    let executed = runner.executed();

    let err = install(&fs, &runner, Path::new(WORKDIR), &DependenciesSection::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("requirements.txt"));
    assert!(labels(&executed).is_empty());
}
