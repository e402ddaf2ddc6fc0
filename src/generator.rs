// src/generator.rs

//! Generator invocation with an explicit artifact contract.

use std::path::Path;

use anyhow::{Result, bail};
use tracing::info;

use crate::artifacts::{Artifact, ArtifactPattern, ArtifactSnapshot, verify_artifacts};
use crate::config::GeneratorConfig;
use crate::exec::{CommandRunner, CommandSpec};
use crate::fs::FileSystem;

/// Run the generator and return the artifacts it produced.
///
/// The command gets no arguments; `env` is passed through as environment
/// variables. A non-zero exit, or no fresh file matching the artifact
/// pattern, is an error.
pub async fn generate(
    fs: &dyn FileSystem,
    runner: &dyn CommandRunner,
    workdir: &Path,
    cfg: &GeneratorConfig,
    env: Vec<(String, String)>,
) -> Result<Vec<Artifact>> {
    let pattern = ArtifactPattern::new(&cfg.artifact)?;
    let before = ArtifactSnapshot::capture(fs, workdir, &pattern)?;
    info!(
        pattern = %pattern.as_str(),
        existing = before.len(),
        "running invoice generator"
    );

    let spec = CommandSpec::new("generator", cfg.command.as_str(), workdir).with_env(env);
    let output = runner.run(&spec).await?;
    if !output.success() {
        bail!(
            "generator exited with code {}: {}",
            output.exit_code,
            output.stderr_tail(5)
        );
    }

    let after = ArtifactSnapshot::capture(fs, workdir, &pattern)?;
    verify_artifacts(fs, &pattern, &before, &after, cfg.on_multiple)
}
