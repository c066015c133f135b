//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so API clients and log
//! searches can tell failures apart without parsing messages.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - INPUT_xxx: Bad resume / job input
//! - EMBED_xxx: Embedding provider errors
//! - IGNORE_xxx: Ignore-pattern errors
//! - BATCH_xxx: Batch scoring errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Input Errors (1xx)
    // ============================================
    /// Resume text is empty or whitespace
    InputEmptyResume,
    /// Job description is empty or whitespace
    InputEmptyJob,
    /// Keyword list is empty after trimming
    InputEmptyKeywords,
    /// Input file could not be read
    InputUnreadable,

    // ============================================
    // Embedding Errors (2xx)
    // ============================================
    /// Embedding endpoint unreachable
    EmbedConnectionFailed,
    /// Embedding request timed out
    EmbedTimeout,
    /// Embedding endpoint returned an error status
    EmbedError,
    /// Embedding response malformed or wrong size
    EmbedInvalidResponse,

    // ============================================
    // Ignore Pattern Errors (3xx)
    // ============================================
    /// A pattern line failed to compile as a glob
    IgnoreInvalidPattern,
    /// Directory walk failed
    IgnoreWalkFailed,

    // ============================================
    // Batch Errors (4xx)
    // ============================================
    /// Batch has no items
    BatchEmpty,
    /// Batch exceeds the maximum size
    BatchTooLarge,
    /// Batch directory missing or not a directory
    BatchInvalidDirectory,

    // ============================================
    // API Errors (5xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Unauthorized (invalid API key)
    ApiUnauthorized,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors (6xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Filesystem error
    Io,
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Input Errors
            Self::InputEmptyResume => "INPUT_EMPTY_RESUME",
            Self::InputEmptyJob => "INPUT_EMPTY_JOB",
            Self::InputEmptyKeywords => "INPUT_EMPTY_KEYWORDS",
            Self::InputUnreadable => "INPUT_UNREADABLE",

            // Embedding Errors
            Self::EmbedConnectionFailed => "EMBED_CONNECTION_FAILED",
            Self::EmbedTimeout => "EMBED_TIMEOUT",
            Self::EmbedError => "EMBED_ERROR",
            Self::EmbedInvalidResponse => "EMBED_INVALID_RESPONSE",

            // Ignore Pattern Errors
            Self::IgnoreInvalidPattern => "IGNORE_INVALID_PATTERN",
            Self::IgnoreWalkFailed => "IGNORE_WALK_FAILED",

            // Batch Errors
            Self::BatchEmpty => "BATCH_EMPTY",
            Self::BatchTooLarge => "BATCH_TOO_LARGE",
            Self::BatchInvalidDirectory => "BATCH_INVALID_DIRECTORY",

            // API Errors
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            // Configuration Errors
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            // Generic
            Self::Io => "IO_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest
            | Self::InputEmptyResume
            | Self::InputEmptyJob
            | Self::InputEmptyKeywords
            | Self::IgnoreInvalidPattern
            | Self::BatchEmpty
            | Self::BatchTooLarge
            | Self::ConfigInvalidValue => 400,
            Self::ApiUnauthorized => 401,
            Self::BatchInvalidDirectory => 404,
            Self::ApiRateLimited => 429,
            Self::EmbedConnectionFailed | Self::EmbedTimeout | Self::EmbedError => 502,
            _ => 500,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EmbedTimeout | Self::EmbedConnectionFailed | Self::ApiRateLimited
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Empty resume text
    pub fn empty_resume() -> Self {
        Self::new(ErrorCode::InputEmptyResume, "Resume text is empty")
    }

    /// Empty job description
    pub fn empty_job() -> Self {
        Self::new(ErrorCode::InputEmptyJob, "Job description is empty")
    }

    /// Empty keyword list
    pub fn empty_keywords() -> Self {
        Self::new(ErrorCode::InputEmptyKeywords, "Job keyword list is empty")
    }

    /// Embedding request failed
    pub fn embed_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmbedError, msg)
    }

    /// Embedding response malformed
    pub fn embed_invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmbedInvalidResponse, msg)
    }

    /// Invalid ignore pattern on a given line
    pub fn invalid_pattern(line: usize, pattern: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::IgnoreInvalidPattern,
            format!("line {}: invalid pattern '{}': {}", line, pattern, reason.into()),
        )
    }

    /// Batch directory invalid
    pub fn invalid_directory(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BatchInvalidDirectory, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: '{}'", key, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Io, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::EmbedTimeout, "Embedding request timeout")
        } else if err.is_connect() {
            Self::new(ErrorCode::EmbedConnectionFailed, "Embedding connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::EmbedInvalidResponse, err.to_string())
        } else {
            Self::new(ErrorCode::EmbedError, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "JSON error", err)
    }
}

impl From<ignore::Error> for AppError {
    fn from(err: ignore::Error) -> Self {
        Self::with_source(ErrorCode::IgnoreWalkFailed, "Directory walk failed", err)
    }
}
