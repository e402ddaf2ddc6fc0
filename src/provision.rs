// src/provision.rs

//! Environment provisioning: working directory, optional checkout and the
//! pinned runtime version check.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Result, anyhow, bail};
use regex::Regex;
use tracing::{info, warn};

use crate::config::EnvironmentSection;
use crate::exec::{CommandRunner, CommandSpec};
use crate::fs::FileSystem;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\.(\d+)(?:\.(\d+))?").expect("valid version regex"));

/// What the provisioner established.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provisioned {
    /// Runtime version reported by `version_command`, when checked.
    pub runtime_version: Option<String>,
    pub checked_out: bool,
}

/// Extract the first `N.N[.N]` version from a version command's output.
///
/// `"Python 3.10.14"` yields `"3.10.14"`.
pub fn parse_version(output: &str) -> Option<String> {
    VERSION_RE.find(output).map(|m| m.as_str().to_string())
}

/// True when every component of `pinned` equals the matching component of
/// `actual`. `"3.10"` matches `"3.10.14"` but not `"3.1.2"` or `"3.11.0"`.
pub fn version_matches(pinned: &str, actual: &str) -> bool {
    let pinned: Vec<&str> = pinned.split('.').collect();
    let actual: Vec<&str> = actual.split('.').collect();
    if pinned.len() > actual.len() {
        return false;
    }
    pinned
        .iter()
        .zip(actual.iter())
        .all(|(p, a)| p.parse::<u64>().ok() == a.parse::<u64>().ok())
}

/// Prepare the working directory for the run.
///
/// Fails if the workdir is missing, the checkout command fails, or the
/// runtime does not report the pinned version.
pub async fn provision(
    fs: &dyn FileSystem,
    runner: &dyn CommandRunner,
    workdir: &Path,
    env: &EnvironmentSection,
) -> Result<Provisioned> {
    if !fs.is_dir(workdir) {
        bail!("working directory {:?} does not exist or is not a directory", workdir);
    }

    let mut provisioned = Provisioned::default();

    if let Some(checkout) = &env.checkout {
        let spec = CommandSpec::new("checkout", checkout.as_str(), workdir);
        let output = runner.run(&spec).await?;
        if !output.success() {
            bail!(
                "checkout command exited with code {}: {}",
                output.exit_code,
                output.stderr_tail(5)
            );
        }
        provisioned.checked_out = true;
    }

    match (&env.runtime_version, &env.version_command) {
        (Some(pinned), Some(version_cmd)) => {
            let spec = CommandSpec::new("runtime", version_cmd.as_str(), workdir);
            let output = runner.run(&spec).await?;
            if !output.success() {
                bail!(
                    "runtime version command '{}' exited with code {}",
                    version_cmd,
                    output.exit_code
                );
            }

            let combined = output.combined();
            let actual = parse_version(&combined)
                .ok_or_else(|| anyhow!("no version found in output of '{}'", version_cmd))?;

            if !version_matches(pinned, &actual) {
                bail!("runtime version {actual} does not match pinned version {pinned}");
            }

            info!(pinned = %pinned, actual = %actual, "runtime version verified");
            provisioned.runtime_version = Some(actual);
        }
        (None, Some(_)) => {
            warn!("version_command set without runtime_version; skipping runtime check");
        }
        _ => {}
    }

    Ok(provisioned)
}
