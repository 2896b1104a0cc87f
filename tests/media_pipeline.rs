use std::{path::Path, process::Command};

use plymgen::{
    BuildOptions, FfmpegTool, FrameTool, PlymgenError, ThemeConfig, build_theme,
    is_ffmpeg_on_path,
};

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "plymgen_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn synth_video(path: &Path, seconds: u32) -> anyhow::Result<()> {
    let status = Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=64x48:rate=30",
            "-t",
            &seconds.to_string(),
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(path)
        .status()?;
    anyhow::ensure!(status.success(), "ffmpeg failed creating {}", path.display());
    Ok(())
}

fn fixture(name: &str) -> anyhow::Result<(std::path::PathBuf, ThemeConfig)> {
    let root = temp_dir(name);
    let source = root.join("source");
    std::fs::create_dir_all(&source)?;

    let cfg = ThemeConfig {
        source: source.to_string_lossy().into_owned(),
        build: root.join("build").to_string_lossy().into_owned(),
        fps: 5,
        ..ThemeConfig::default()
    };
    synth_video(&cfg.animation_path(), 2)?;
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 200, 200, 255]));
    for p in cfg.required_assets().into_iter().skip(1) {
        img.save(&p)?;
    }
    Ok((root, cfg))
}

#[test]
fn ffprobe_reports_synthetic_clip() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg/ffprobe not available");
        return;
    }
    let (root, cfg) = fixture("media_probe").unwrap();

    let probe = FfmpegTool::default().probe(&cfg.animation_path()).unwrap();
    assert_eq!((probe.width, probe.height), (64, 48));
    assert!((probe.duration_sec - 2.0).abs() < 0.1);
    assert_eq!(probe.source_fps(), 30);
    assert_eq!(probe.estimated_frame_count(5), 10);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn ffmpeg_extracts_zero_based_frames() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg/ffprobe not available");
        return;
    }
    let (root, cfg) = fixture("media_extract").unwrap();

    let summary = build_theme(&cfg, &FfmpegTool::default(), BuildOptions::default()).unwrap();
    assert_eq!(summary.frames.estimated, 10);
    assert!(summary.build_dir.join("animation_frame_0.png").is_file());
    assert!((9..=10).contains(&summary.frames.on_disk));
    assert!(summary.frames.beyond <= 1);
    assert_eq!(summary.frames.first_frame_size, Some((64, 48)));

    let script = std::fs::read_to_string(&summary.script).unwrap();
    assert!(script.starts_with("for (i = 0; i < 10; i++)"));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn corrupt_video_is_an_extraction_error() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg/ffprobe not available");
        return;
    }
    let (root, cfg) = fixture("media_corrupt").unwrap();
    std::fs::write(cfg.animation_path(), b"definitely not an mp4").unwrap();

    let err = build_theme(&cfg, &FfmpegTool::default(), BuildOptions::default()).unwrap_err();
    assert!(matches!(err, PlymgenError::Extraction(_)));
    assert!(cfg.build_path().join("custom.plymouth").is_file());

    std::fs::remove_dir_all(&root).ok();
}
