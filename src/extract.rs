use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::error::{PlymgenError, PlymgenResult};

const FRAME_PREFIX: &str = "animation_frame_";
const FRAME_SUFFIX: &str = ".png";

/// File name of the `index`-th extracted frame (0-based).
pub fn frame_file_name(index: u64) -> String {
    format!("{FRAME_PREFIX}{index}{FRAME_SUFFIX}")
}

/// Inverse of [`frame_file_name`]: `Some(index)` for `animation_frame_<digits>.png`.
pub fn parse_frame_index(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(FRAME_PREFIX)?
        .strip_suffix(FRAME_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoProbe {
    pub width: u32,
    pub height: u32,
    pub duration_sec: f64,
    /// Encoded frame count, when the container records it.
    pub nb_frames: Option<u64>,
    pub fps_num: u32,
    pub fps_den: u32,
}

impl VideoProbe {
    /// Whole frames per second of the source.
    ///
    /// Derived from the encoded frame count over the duration; falls back to the stream's
    /// nominal rate when the count is unknown.
    pub fn source_fps(&self) -> u64 {
        match self.nb_frames {
            Some(n) if self.duration_sec > 0.0 => (n as f64 / self.duration_sec).floor() as u64,
            _ if self.fps_den != 0 => u64::from(self.fps_num) / u64::from(self.fps_den),
            _ => 0,
        }
    }

    /// Number of frames the resampler is expected to emit at `target_fps`.
    pub fn estimated_frame_count(&self, target_fps: u32) -> u64 {
        (self.duration_sec.floor() as u64) * u64::from(target_fps)
    }
}

/// Video introspection and frame-sequence export.
pub trait FrameTool {
    fn probe(&self, video: &Path) -> PlymgenResult<VideoProbe>;

    /// Scale to `width` (aspect preserved), retime to `fps` and write
    /// `animation_frame_<N>.png` files numbered from 0 into `out_dir`.
    fn extract(&self, video: &Path, out_dir: &Path, width: u32, fps: u32) -> PlymgenResult<()>;
}

/// [`FrameTool`] backed by the system `ffprobe`/`ffmpeg` binaries.
#[derive(Clone, Debug)]
pub struct FfmpegTool {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl FfmpegTool {
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    fn ensure_available(bin: &Path) -> PlymgenResult<()> {
        if !is_tool_on_path(bin) {
            return Err(PlymgenError::extraction(format!(
                "'{}' is required for frame extraction, but was not found on PATH",
                bin.display()
            )));
        }
        Ok(())
    }
}

pub fn is_tool_on_path(bin: &Path) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn is_ffmpeg_on_path() -> bool {
    is_tool_on_path(Path::new("ffmpeg")) && is_tool_on_path(Path::new("ffprobe"))
}

impl FrameTool for FfmpegTool {
    fn probe(&self, video: &Path) -> PlymgenResult<VideoProbe> {
        Self::ensure_available(&self.ffprobe)?;

        let out = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(video)
            .output()
            .map_err(|e| PlymgenError::extraction(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(PlymgenError::extraction(format!(
                "ffprobe failed for '{}': {}",
                video.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        parse_probe_json(&out.stdout)
    }

    fn extract(&self, video: &Path, out_dir: &Path, width: u32, fps: u32) -> PlymgenResult<()> {
        Self::ensure_available(&self.ffmpeg)?;

        let pattern = out_dir.join(format!("{FRAME_PREFIX}%d{FRAME_SUFFIX}"));
        let out = Command::new(&self.ffmpeg)
            .args(["-loglevel", "error", "-y", "-i"])
            .arg(video)
            .args([
                "-vf",
                &format!("scale={width}:-1,fps={fps}"),
                "-start_number",
                "0",
            ])
            .arg(&pattern)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                PlymgenError::extraction(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        if !out.status.success() {
            return Err(PlymgenError::extraction(format!(
                "ffmpeg exited with status {} for '{}': {}",
                out.status,
                video.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(())
    }
}

fn parse_probe_json(bytes: &[u8]) -> PlymgenResult<VideoProbe> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
        nb_frames: Option<String>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| PlymgenError::extraction(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref().is_none_or(|t| t == "video"))
        .ok_or_else(|| PlymgenError::extraction("no video stream found"))?;

    let width = stream
        .width
        .ok_or_else(|| PlymgenError::extraction("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| PlymgenError::extraction("missing video height from ffprobe"))?;

    // Matroska/WebM streams carry no per-stream duration; the container has it.
    let duration_sec = stream
        .duration
        .as_deref()
        .or_else(|| parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| PlymgenError::extraction("missing or invalid video duration"))?;

    let nb_frames = stream.nb_frames.as_deref().and_then(|s| s.parse().ok());
    let (fps_num, fps_den) =
        parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1")).unwrap_or((0, 1));

    Ok(VideoProbe {
        width,
        height,
        duration_sec,
        nb_frames,
        fps_num,
        fps_den,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

/// Outcome of a frame extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub probe: VideoProbe,
    /// floor(duration) * fps; the count the theme script is generated for.
    pub estimated: u64,
    /// Frame files present afterwards with an index below `estimated`.
    pub on_disk: u64,
    /// Frame files with an index at or past `estimated`: stale frames from an earlier run at
    /// a higher count, or extra frames from resampler rounding. The script never loads them.
    pub beyond: u64,
    /// Dimensions of `animation_frame_0.png`, if it could be read.
    pub first_frame_size: Option<(u32, u32)>,
}

/// Probe `video` and export its frames at `fps` into `out_dir`.
pub fn extract_frames(
    tool: &dyn FrameTool,
    video: &Path,
    out_dir: &Path,
    fps: u32,
) -> PlymgenResult<FrameReport> {
    if fps == 0 {
        return Err(PlymgenError::extraction("target fps must be non-zero"));
    }

    tracing::info!("Generate animation frames from video '{}'", video.display());
    let probe = tool.probe(video)?;
    tracing::info!(
        "Input video duration = {} seconds @ {} fps",
        probe.duration_sec,
        probe.source_fps()
    );
    tracing::info!("Input video size = {}x{}", probe.width, probe.height);
    let estimated = probe.estimated_frame_count(fps);
    tracing::info!("The result should be {estimated} images");

    tool.extract(video, out_dir, probe.width, fps)?;

    let FrameCount { below: on_disk, beyond } = count_frames_on_disk(out_dir, estimated)?;
    if on_disk < estimated {
        tracing::warn!(
            estimated,
            on_disk,
            "fewer frames than estimated were extracted; the script will reference missing files"
        );
    }
    if beyond > 0 {
        tracing::info!(
            beyond,
            "frame files past the script's range are present (stale or resampler rounding)"
        );
    }

    let first_frame_size = image::image_dimensions(out_dir.join(frame_file_name(0))).ok();
    if let Some((w, h)) = first_frame_size {
        tracing::debug!(width = w, height = h, "first frame size");
    }

    Ok(FrameReport {
        probe,
        estimated,
        on_disk,
        beyond,
        first_frame_size,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCount {
    pub below: u64,
    pub beyond: u64,
}

/// Count `animation_frame_<N>.png` files in `dir`, split at index `limit`.
pub fn count_frames_on_disk(dir: &Path, limit: u64) -> PlymgenResult<FrameCount> {
    use anyhow::Context as _;

    let mut count = FrameCount::default();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to list output directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed to list '{}'", dir.display()))?;
        match entry.file_name().to_str().and_then(parse_frame_index) {
            Some(i) if i < limit => count.below += 1,
            Some(_) => count.beyond += 1,
            None => {}
        }
    }
    Ok(count)
}
