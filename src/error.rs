//! Error types for the befake downloader.

use thiserror::Error;

/// Failure reported by the transport for a non-success response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("rate limited")]
    RateLimited,

    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("server error (HTTP {status}): {body}")]
    ServerError { status: u16, body: String },

    #[error("connection failed: {0}")]
    Connection(String),
}

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // Session errors
    #[error("No saved session found. Run `befake login <phone number>` first.")]
    NoSession,

    #[error("Session expired and could not be refreshed, please log in again: {0}")]
    AuthExpired(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Invalid or expired one-time passcode: {0}")]
    InvalidOtp(String),

    #[error("Rate limited by the provider, try again later")]
    RateLimited,

    // Feed and download errors
    #[error("Failed to fetch {feed} feed: {source}")]
    FeedFetch {
        feed: String,
        #[source]
        source: TransportError,
    },

    #[error("Failed to download {url}: {reason}")]
    MediaDownload { url: String, reason: String },

    // Template errors
    #[error("Unknown placeholder '{{{name}}}' in template \"{template}\"")]
    UnknownPlaceholder { name: String, template: String },

    #[error("Invalid template \"{template}\": {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Unexpected API response: {0}")]
    Api(String),

    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),

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

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::UnknownPlaceholder { .. }
            | Error::InvalidTemplate { .. }
            | Error::TomlParse(_)
            | Error::UrlParse(_) => exit_codes::CONFIG_ERROR,
            Error::NoSession
            | Error::AuthExpired(_)
            | Error::InvalidPhone(_)
            | Error::InvalidOtp(_)
            | Error::RateLimited
            | Error::FeedFetch { .. }
            | Error::Api(_)
            | Error::Transport(_) => exit_codes::API_ERROR,
            Error::MediaDownload { .. } => exit_codes::DOWNLOAD_ERROR,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ITEMS_FAILED: i32 = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_placeholder_message() {
        let err = Error::UnknownPlaceholder {
            name: "usr".into(),
            template: "{usr}/x".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown placeholder '{usr}' in template \"{usr}/x\""
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::NoSession.exit_code(), exit_codes::API_ERROR);
        assert_eq!(
            Error::MediaDownload {
                url: "u".into(),
                reason: "r".into()
            }
            .exit_code(),
            exit_codes::DOWNLOAD_ERROR
        );
        assert_eq!(
            Error::Config("x".into()).exit_code(),
            exit_codes::CONFIG_ERROR
        );
    }
}
