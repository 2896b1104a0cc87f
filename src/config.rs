use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{PlymgenError, PlymgenResult};

/// Configuration file looked up in the working directory when `-c` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Full theme configuration: built-in defaults overlaid with the user's JSON file.
///
/// Every asset path is relative to [`ThemeConfig::source`] and resolved by plain
/// concatenation (`<source>/<asset>`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
    pub description: String,
    /// Where the theme is installed on the target system.
    pub theme_directory: String,
    pub source: String,
    pub build: String,
    /// Source video, relative to `source`.
    pub animation: String,
    /// Target frames-per-second of the extracted animation.
    pub fps: u32,
    pub dialog: DialogConfig,
    pub progression: ProgressionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    #[serde(rename = "box")]
    pub box_image: String,
    pub entry: String,
    pub bullet: String,
    pub lock: String,
    pub ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub bar: String,
    #[serde(rename = "box")]
    pub box_image: String,
    pub ratio: f64,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "custom".to_string(),
            description: "A custom theme for Plymouth".to_string(),
            theme_directory: "/usr/share/plymouth/themes".to_string(),
            source: "./source".to_string(),
            build: "./build".to_string(),
            animation: "animation.mp4".to_string(),
            fps: 25,
            dialog: DialogConfig::default(),
            progression: ProgressionConfig::default(),
        }
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            box_image: "box.png".to_string(),
            entry: "entry.png".to_string(),
            bullet: "bullet.png".to_string(),
            lock: "lock.png".to_string(),
            ratio: 0.6,
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            bar: "progress_bar.png".to_string(),
            box_image: "progress_box.png".to_string(),
            ratio: 0.6,
        }
    }
}

impl ThemeConfig {
    /// Parse user overrides from JSON. Keys absent from the document keep their defaults.
    pub fn from_reader<R: Read>(r: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(r)
    }

    pub fn validate(&self) -> PlymgenResult<()> {
        if self.name.trim().is_empty() {
            return Err(PlymgenError::config_invalid("theme name must not be empty"));
        }
        if self.name.contains(['/', '\\']) || self.name == "." || self.name == ".." {
            return Err(PlymgenError::config_invalid(format!(
                "theme name '{}' must be a plain file name",
                self.name
            )));
        }
        if self.fps == 0 {
            return Err(PlymgenError::config_invalid("fps must be a positive integer"));
        }
        Ok(())
    }

    pub fn source_path(&self, rel: &str) -> PathBuf {
        PathBuf::from(format!("{}/{}", self.source, rel))
    }

    pub fn animation_path(&self) -> PathBuf {
        self.source_path(&self.animation)
    }

    pub fn build_path(&self) -> PathBuf {
        PathBuf::from(&self.build)
    }

    /// `<build>/<file_name>`, by concatenation like [`ThemeConfig::source_path`].
    pub fn build_file(&self, file_name: &str) -> PathBuf {
        PathBuf::from(format!("{}/{}", self.build, file_name))
    }

    /// Every input file the theme needs, in the order they are checked.
    pub fn required_assets(&self) -> Vec<PathBuf> {
        [
            self.animation.as_str(),
            self.dialog.box_image.as_str(),
            self.dialog.entry.as_str(),
            self.dialog.bullet.as_str(),
            self.dialog.lock.as_str(),
            self.progression.box_image.as_str(),
            self.progression.bar.as_str(),
        ]
        .into_iter()
        .map(|rel| self.source_path(rel))
        .collect()
    }

    /// Installed location of the theme's image directory.
    pub fn install_dir(&self) -> String {
        format!("{}/{}", self.theme_directory, self.name)
    }

    pub fn descriptor_file_name(&self) -> String {
        format!("{}.plymouth", self.name)
    }

    pub fn script_file_name(&self) -> String {
        format!("{}.script", self.name)
    }
}

/// Where the configuration comes from and whether the user asked for it explicitly.
#[derive(Clone, Debug)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub explicit: bool,
}

impl ConfigSource {
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            explicit: true,
        }
    }

    pub fn implicit_default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            explicit: false,
        }
    }
}

/// Load and validate the configuration.
///
/// A missing default file falls back to the built-in configuration; a missing file the
/// user named explicitly is an error.
pub fn load_config(src: &ConfigSource) -> PlymgenResult<ThemeConfig> {
    let cfg = match File::open(&src.path) {
        Ok(f) => read_config(&src.path, f)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if src.explicit {
                return Err(PlymgenError::ConfigMissing(src.path.clone()));
            }
            tracing::info!(
                "Default configuration file '{}' doesn't exist. Continue with default built-in configuration",
                src.path.display()
            );
            ThemeConfig::default()
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!(
                    "failed to open configuration file '{}'",
                    src.path.display()
                ))
                .into());
        }
    };

    cfg.validate()?;
    Ok(cfg)
}

fn read_config(path: &Path, f: File) -> PlymgenResult<ThemeConfig> {
    let cfg = ThemeConfig::from_reader(BufReader::new(f)).map_err(|e| {
        PlymgenError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;
    tracing::debug!(path = %path.display(), "loaded configuration overrides");
    Ok(cfg)
}
