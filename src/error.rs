use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch rejected: {status} - {reason}")]
    Fetch { status: u16, reason: String },

    #[error("payload failed schema validation at '{pointer}': {message}")]
    Schema { pointer: String, message: String },

    #[error("could not parse field '{field}' from '{value}': {message}")]
    Parse {
        field: String,
        value: String,
        message: String,
    },

    #[error("unexpected record volume from {source_id}: {actual} rows, wanted {min}..={max}")]
    UnexpectedVolume {
        source_id: String,
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
