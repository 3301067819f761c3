use thiserror::Error;

/// Errors surfaced by worksheet generation and export.
#[derive(Debug, Error)]
pub enum WorksheetError {
    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("No problems were generated; widen the number range or lower the count")]
    NoProblems,

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Settings file error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorksheetError>;
