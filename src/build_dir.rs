use std::path::Path;

use anyhow::Context as _;

use crate::{
    error::{PlymgenError, PlymgenResult},
    extract::parse_frame_index,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildDirState {
    Existing,
    Created,
}

/// Make sure `path` is a usable output directory.
///
/// Existing contents are left alone; a non-directory at `path` is a conflict.
pub fn prepare_build_dir(path: &Path) -> PlymgenResult<BuildDirState> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PlymgenError::BuildPathConflict(path.to_path_buf()));
        }
        tracing::info!("Using existing output directory '{}'", path.display());
        return Ok(BuildDirState::Existing);
    }

    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create output directory '{}'", path.display()))?;
    tracing::info!("Created output directory '{}'", path.display());
    Ok(BuildDirState::Created)
}

/// Remove `animation_frame_<N>.png` files left by an earlier run. Returns how many were removed.
pub fn clear_stale_frames(dir: &Path) -> PlymgenResult<usize> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list output directory '{}'", dir.display()))?;

    let mut removed = 0usize;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list '{}'", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if parse_frame_index(name).is_none() || !entry.path().is_file() {
            continue;
        }
        std::fs::remove_file(entry.path())
            .with_context(|| format!("failed to remove stale frame '{}'", entry.path().display()))?;
        removed += 1;
    }

    if removed > 0 {
        tracing::info!(removed, "cleared stale animation frames");
    }
    Ok(removed)
}
