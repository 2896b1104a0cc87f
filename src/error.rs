use std::path::PathBuf;

pub type PlymgenResult<T> = Result<T, PlymgenError>;

#[derive(thiserror::Error, Debug)]
pub enum PlymgenError {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("the provided configuration file '{}' doesn't exist", .0.display())]
    ConfigMissing(PathBuf),

    #[error("configuration file '{}' is not valid JSON: {message}", .path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("the specified build path '{}' is not a directory", .0.display())]
    BuildPathConflict(PathBuf),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlymgenError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::ConfigInvalid(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Process exit status reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigMissing(_) => 2,
            Self::Asset(_) | Self::BuildPathConflict(_) => -1,
            Self::Usage(_)
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid(_)
            | Self::Extraction(_)
            | Self::Other(_) => 1,
        }
    }
}
