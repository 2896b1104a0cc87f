use std::path::Path;

use crate::{
    config::ThemeConfig,
    error::{PlymgenError, PlymgenResult},
};

/// Check that the source directory and every required asset exist.
///
/// Stops at the first missing input; nothing is written.
pub fn validate_assets(cfg: &ThemeConfig) -> PlymgenResult<()> {
    let source_dir = Path::new(&cfg.source);
    if !source_dir.is_dir() {
        return Err(PlymgenError::asset(format!(
            "invalid assets directory '{}'",
            cfg.source
        )));
    }

    for path in cfg.required_assets() {
        check_file_exists(&path)?;
    }
    Ok(())
}

pub fn check_file_exists(path: &Path) -> PlymgenResult<()> {
    if !path.is_file() {
        return Err(PlymgenError::asset(format!(
            "the file '{}' doesn't exist or is not a valid file",
            path.display()
        )));
    }
    tracing::info!("File '{}' available", path.display());
    Ok(())
}
