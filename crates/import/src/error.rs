use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no adapter registered for file: {0}")]
    UnsupportedFile(String),

    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Malformed(String),
}
