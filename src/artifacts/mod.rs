// src/artifacts/mod.rs

//! Discovery and verification of the files the generator produces.
//!
//! The pipeline takes an [`ArtifactSnapshot`] before the generator runs and
//! another one after it; only files that are new or were rewritten count as
//! this run's artifacts. Stale invoices from earlier months that live in the
//! same directory are therefore never attached.

pub mod digest;
pub mod patterns;
pub mod snapshot;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::fs::FileSystem;
use crate::types::MultipleArtifactPolicy;

pub use digest::compute_file_digest;
pub use patterns::{ArtifactPattern, collect_matching_files};
pub use snapshot::ArtifactSnapshot;

/// A file produced by the generator in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// File name used for the email attachment.
    pub file_name: String,
    pub size: u64,
    /// BLAKE3 digest, hex encoded.
    pub digest: String,
    pub modified: SystemTime,
}

impl Artifact {
    pub fn describe(fs: &dyn FileSystem, path: &Path, modified: SystemTime) -> Result<Self> {
        let (digest, size) = compute_file_digest(fs, path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size,
            digest,
            modified,
        })
    }
}

/// Turn the before/after snapshots into the verified list of artifacts.
///
/// Fails when nothing fresh matches, when the policy is `Error` and more
/// than one file is fresh, or when a file cannot be read.
pub fn verify_artifacts(
    fs: &dyn FileSystem,
    pattern: &ArtifactPattern,
    before: &ArtifactSnapshot,
    after: &ArtifactSnapshot,
    policy: MultipleArtifactPolicy,
) -> Result<Vec<Artifact>> {
    let mut fresh = after.fresh_since(before);

    if fresh.is_empty() {
        if !after.is_empty() {
            warn!(
                stale = after.len(),
                "only pre-existing files match the artifact pattern"
            );
        }
        bail!("generator produced no file matching '{}'", pattern.as_str());
    }

    if fresh.len() > 1 {
        match policy {
            MultipleArtifactPolicy::AttachAll => {}
            MultipleArtifactPolicy::Latest => {
                fresh.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
                fresh = fresh.split_off(fresh.len() - 1);
            }
            MultipleArtifactPolicy::Error => {
                let names: Vec<String> = fresh
                    .iter()
                    .map(|(p, _)| p.to_string_lossy().into_owned())
                    .collect();
                bail!(
                    "generator produced {} files matching '{}': {}",
                    names.len(),
                    pattern.as_str(),
                    names.join(", ")
                );
            }
        }
    }

    let mut artifacts = Vec::with_capacity(fresh.len());
    for (path, modified) in fresh {
        let artifact = Artifact::describe(fs, &path, modified)?;
        if artifact.size == 0 {
            bail!("artifact {:?} is empty", artifact.path);
        }
        info!(
            file = %artifact.file_name,
            size = artifact.size,
            blake3 = %artifact.digest,
            "artifact verified"
        );
        artifacts.push(artifact);
    }
    Ok(artifacts)
}
