use thiserror::Error;

/// The failure classes the error envelope knows how to absorb.
///
/// Anything outside these classes is considered unexpected and is allowed to
/// reach the top-level handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Unreachable host, timeout or a non-success HTTP status.
    Network,
    /// The response body was not in the expected shape.
    Parse,
    /// A store could not be read, written or had an unexpected layout.
    Storage,
}

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in Daily Dose.
/// It uses the `thiserror` crate for ergonomic error handling and automatic
/// conversion from underlying library errors.
///
/// # Error Conversion
///
/// Most errors automatically convert from their source types using the `#[from]` attribute:
/// - `serde_json::Error` → `AppError::SerializationError`
/// - `std::io::Error` → `AppError::StorageError`
/// - `csv::Error` → `AppError::CsvError`
///
/// HTTP errors are mapped by the client crate, which knows whether a failure
/// was a timeout, a refused connection or something else.
///
/// # Examples
///
/// ```
/// use dailydose_core::error::{AppError, FailureClass};
///
/// let err = AppError::Timeout(10);
/// assert_eq!(err.failure_class(), Some(FailureClass::Network));
///
/// let err = AppError::Generic("Something went wrong".to_string());
/// assert_eq!(err.failure_class(), None);
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP client request failed for a reason other than timeout or connect.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Network or connection error.
    ///
    /// This error occurs when a request fails due to connectivity issues,
    /// DNS resolution failures, or the remote server being unreachable.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The upstream answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// JSON serialization or deserialization failed.
    ///
    /// This error occurs when an upstream body is not valid JSON or does not
    /// match the shape expected for its category.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The body parsed, but its content signals a failed or unusable answer.
    #[error("Unexpected response: {0}")]
    UnexpectedPayload(String),

    /// API response contained no data.
    #[error("Empty response from API")]
    EmptyResponse,

    /// File system operation on a store or the log failed.
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// A store could not be read or written as CSV.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A store exists but does not carry the expected header.
    #[error("Corrupt store {path}: {reason}")]
    CorruptStore { path: String, reason: String },

    /// URL parsing failed.
    ///
    /// This error occurs when a configured endpoint is not a valid absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Classifies the error for the envelope. `None` means unexpected.
    pub fn failure_class(&self) -> Option<FailureClass> {
        match self {
            AppError::ClientError(_)
            | AppError::NetworkError(_)
            | AppError::Timeout(_)
            | AppError::HttpStatus { .. } => Some(FailureClass::Network),
            AppError::SerializationError(_)
            | AppError::UnexpectedPayload(_)
            | AppError::EmptyResponse => Some(FailureClass::Parse),
            AppError::StorageError(_) | AppError::CsvError(_) | AppError::CorruptStore { .. } => {
                Some(FailureClass::Storage)
            }
            AppError::InvalidUrl(_) | AppError::ConfigError(_) | AppError::Generic(_) => None,
        }
    }

    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check your internet connection.", msg)
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The service may be slow. Try again later.",
                    secs
                )
            }
            AppError::HttpStatus { status, .. } if *status == 429 => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            AppError::HttpStatus { status, url } => {
                format!("The service at {} answered with HTTP {}.", url, status)
            }
            AppError::EmptyResponse => {
                "The API returned no data. The service may be temporarily unavailable.".to_string()
            }
            AppError::StorageError(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Cannot write to the data directory: {}\n   Check its permissions or pass --data-dir.",
                    e
                )
            }
            AppError::CorruptStore { path, .. } => {
                format!(
                    "The store {} looks damaged.\n   Move it aside and a fresh one will be created.",
                    path
                )
            }
            AppError::InvalidUrl(url) => {
                format!(
                    "Invalid endpoint URL: {}\n   Example: https://api.adviceslip.com/advice",
                    url
                )
            }
            _ => self.to_string(),
        }
    }
}
