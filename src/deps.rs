// src/deps.rs

//! Dependency manifest parsing and installation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::config::DependenciesSection;
use crate::exec::{CommandRunner, CommandSpec};
use crate::fs::FileSystem;

/// Requirement lines of a pip-style manifest.
///
/// Blank lines, `#` comments (whole-line or trailing) and option lines
/// starting with `-` (such as `-r other.txt` or `--index-url ...`) are
/// skipped.
pub fn parse_manifest(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| match line.find(" #").or_else(|| line.find("\t#")) {
            Some(idx) => &line[..idx],
            None => line,
        })
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

/// Package name of a requirement, without version specifiers, extras or
/// environment markers: `"python-docx>=0.8 ; python_version>'3'"` gives
/// `"python-docx"`.
pub fn requirement_name(requirement: &str) -> &str {
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(requirement.len());
    &requirement[..end]
}

/// Read the manifest, log its packages and run the install command.
///
/// Returns the parsed requirement lines.
pub async fn install(
    fs: &dyn FileSystem,
    runner: &dyn CommandRunner,
    workdir: &Path,
    section: &DependenciesSection,
) -> Result<Vec<String>> {
    let manifest_path = workdir.join(&section.manifest);
    if !fs.is_file(&manifest_path) {
        bail!("dependency manifest {:?} not found", manifest_path);
    }

    let contents = fs
        .read_to_string(&manifest_path)
        .with_context(|| format!("reading dependency manifest {:?}", manifest_path))?;
    let requirements = parse_manifest(&contents);

    let names: Vec<&str> = requirements.iter().map(|r| requirement_name(r)).collect();
    info!(
        manifest = %section.manifest,
        count = requirements.len(),
        packages = ?names,
        "installing dependencies"
    );

    let cmd = section.install.replace("{manifest}", &section.manifest);
    let spec = CommandSpec::new("install", cmd, workdir);
    let output = runner.run(&spec).await?;
    if !output.success() {
        bail!(
            "install command exited with code {}: {}",
            output.exit_code,
            output.stderr_tail(5)
        );
    }

    Ok(requirements)
}
