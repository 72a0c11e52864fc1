//! Error handling for the cv-tailor pipeline

use thiserror::Error;

/// Pipeline stage, used to label failures for the caller without leaking
/// internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Analyze,
    Adapt,
    Compose,
    Render,
    Compile,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Analyze => write!(f, "analyze"),
            Stage::Adapt => write!(f, "adapt"),
            Stage::Compose => write!(f, "compose"),
            Stage::Render => write!(f, "render"),
            Stage::Compile => write!(f, "compile"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CvTailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Rendering error: {0}")]
    Rendering(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{stage} stage failed: {message}")]
    Stage { stage: Stage, message: String },
}

impl CvTailorError {
    /// Wrap any error with the pipeline stage it occurred in.
    pub fn at_stage(stage: Stage, err: impl std::fmt::Display) -> Self {
        CvTailorError::Stage {
            stage,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CvTailorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for CvTailorError {
    fn from(err: anyhow::Error) -> Self {
        CvTailorError::InvalidInput(err.to_string())
    }
}
