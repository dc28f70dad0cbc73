use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibdocError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A serialized data type is missing a key its `super` requires.
    #[error("malformed {kind} data type: missing or invalid key '{key}'")]
    MalformedType { kind: &'static str, key: String },

    #[error("invalid {what}: {value}")]
    UnknownValue { what: &'static str, value: String },

    #[error("unknown format: {0}. Use html or json")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, LibdocError>;
