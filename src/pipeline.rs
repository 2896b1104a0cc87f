use std::path::PathBuf;

use crate::{
    assets::validate_assets,
    build_dir::{clear_stale_frames, prepare_build_dir},
    config::ThemeConfig,
    error::PlymgenResult,
    extract::{FrameReport, FrameTool, extract_frames},
    theme::{write_descriptor, write_script},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct BuildOptions {
    /// Delete `animation_frame_*.png` from a previous run before extracting.
    pub clean_stale_frames: bool,
}

#[derive(Clone, Debug)]
pub struct BuildSummary {
    pub build_dir: PathBuf,
    pub descriptor: PathBuf,
    pub script: PathBuf,
    pub frames: FrameReport,
}

/// Validate inputs, then write the descriptor, the extracted frames and the script.
///
/// Nothing is written until the configuration is valid and every input asset has been
/// found. Files written before a later failure are left in place.
#[tracing::instrument(skip(cfg, tool, opts), fields(theme = %cfg.name))]
pub fn build_theme(
    cfg: &ThemeConfig,
    tool: &dyn FrameTool,
    opts: BuildOptions,
) -> PlymgenResult<BuildSummary> {
    cfg.validate()?;
    validate_assets(cfg)?;

    let build_dir = cfg.build_path();
    prepare_build_dir(&build_dir)?;
    if opts.clean_stale_frames {
        clear_stale_frames(&build_dir)?;
    }

    let descriptor = write_descriptor(cfg)?;
    let frames = extract_frames(tool, &cfg.animation_path(), &build_dir, cfg.fps)?;
    let script = write_script(cfg, frames.estimated)?;

    Ok(BuildSummary {
        build_dir,
        descriptor,
        script,
        frames,
    })
}
