use thiserror::Error;

#[derive(Error, Debug)]
pub enum TibebError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("Unsupported configuration format. Please use .toml or .json files")]
    UnsupportedConfigFormat,

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TibebError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TibebError>;
