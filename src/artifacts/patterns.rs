// src/artifacts/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};

use crate::fs::FileSystem;

/// Compiled artifact glob, matched against paths relative to the workdir.
///
/// `*` and `?` never match `/`, so `invoice_*.docx` only matches files in
/// the workdir itself; use `**` to reach into subdirectories.
#[derive(Clone)]
pub struct ArtifactPattern {
    raw: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for ArtifactPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactPattern")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

impl ArtifactPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        Ok(Self {
            raw: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a `/`-separated path relative to the workdir.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }
}

/// Collect all files under `root` matching `pattern`.
///
/// Directories are walked recursively, so patterns such as `out/**/*.pdf`
/// work as well as the flat `invoice_*.docx`.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &ArtifactPattern,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if pattern.matches(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
