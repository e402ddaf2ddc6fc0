// src/artifacts/snapshot.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;

use super::patterns::{ArtifactPattern, collect_matching_files};
use crate::fs::FileSystem;

/// Matching files and their modification times at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSnapshot {
    files: BTreeMap<PathBuf, SystemTime>,
}

impl ArtifactSnapshot {
    pub fn capture(fs: &dyn FileSystem, root: &Path, pattern: &ArtifactPattern) -> Result<Self> {
        let mut files = BTreeMap::new();
        for path in collect_matching_files(fs, root, pattern)? {
            let modified = fs.modified(&path)?;
            files.insert(path, modified);
        }
        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files present in `self` that are absent from `before` or whose
    /// modification time changed.
    pub fn fresh_since(&self, before: &ArtifactSnapshot) -> Vec<(PathBuf, SystemTime)> {
        self.files
            .iter()
            .filter(|(path, modified)| before.files.get(*path) != Some(*modified))
            .map(|(path, modified)| (path.clone(), *modified))
            .collect()
    }
}
