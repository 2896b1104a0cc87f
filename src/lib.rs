//! Plymouth boot-splash theme generator.
//!
//! Validates the theme's input assets, extracts the animation frames from a source video
//! with `ffmpeg`, and writes the `script`-module theme descriptor and animation script into
//! a build directory ready for installation.
#![forbid(unsafe_code)]

pub mod assets;
pub mod build_dir;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod theme;

pub use assets::validate_assets;
pub use build_dir::{BuildDirState, clear_stale_frames, prepare_build_dir};
pub use config::{
    ConfigSource, DEFAULT_CONFIG_FILE, DialogConfig, ProgressionConfig, ThemeConfig, load_config,
};
pub use error::{PlymgenError, PlymgenResult};
pub use extract::{
    FfmpegTool, FrameCount, FrameReport, FrameTool, VideoProbe, extract_frames, frame_file_name,
    is_ffmpeg_on_path,
};
pub use pipeline::{BuildOptions, BuildSummary, build_theme};
pub use theme::{render_descriptor, render_script, write_descriptor, write_script};
