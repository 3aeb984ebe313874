//! Error types for the tweet-media-dl application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("No session credential available (set csrf_token or a cookie containing ct0)")]
    CredentialMissing,

    #[error("No media found for record {0}")]
    NoMediaFound(String),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Archive creation failed: {0}")]
    Archive(String),

    #[error("Blob handle already released: {0}")]
    BlobRevoked(String),

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Archive errors
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const NO_MEDIA: i32 = 6;
}
