// src/artifacts/digest.rs

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::fs::FileSystem;

/// Compute the BLAKE3 hash and size of a single file.
///
/// Returns the hash as a lowercase hex string.
pub fn compute_file_digest(fs: &dyn FileSystem, path: &Path) -> Result<(String, u64)> {
    let mut reader = fs.open_read(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 8192];
    let mut size = 0u64;

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("reading file {:?} for hashing", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok((hasher.finalize().to_hex().to_string(), size))
}
