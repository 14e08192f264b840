//! Error taxonomy for the image generation core.
//!
//! All variants except [`ConfigurationError`] are request-scoped: they are
//! reported back through the tool boundary as a structured failure and are
//! never fatal to the process. Configuration errors happen at construction
//! time and abort startup.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for image generation operations.
pub type ImageGenResult<T> = Result<T, ImageGenError>;

/// Number of reference images a single request may carry.
pub const REFERENCE_IMAGE_LIMIT: usize = 14;

/// Configuration-related errors, fatal at startup.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    /// No API key was supplied and none was found in the environment.
    #[error("Missing API key")]
    MissingApiKey,

    /// The base URL could not be parsed.
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The offending URL text or parse error.
        url: String,
    },

    /// The output directory could not be resolved to an absolute path.
    #[error("Invalid output directory: {message}")]
    InvalidOutputDirectory {
        /// Why resolution failed.
        message: String,
    },

    /// Some other setting prevented the client from being constructed.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What failed.
        message: String,
    },
}

/// Failures of the single upstream `generateContent` call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The service answered with a non-success status.
    #[error("upstream returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message surfaced verbatim from the upstream body.
        message: String,
    },

    /// The request timed out at the HTTP layer.
    #[error("upstream request timed out")]
    Timeout,

    /// The connection could not be established or was dropped.
    #[error("connection failed: {message}")]
    Connection {
        /// Underlying transport error text.
        message: String,
    },

    /// The response body did not match the expected candidate/part shape.
    #[error("malformed upstream response: {message}")]
    MalformedResponse {
        /// What failed to parse.
        message: String,
    },
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Connection {
                message: err.to_string(),
            }
        }
    }
}

/// Top-level error type for the image generation core.
#[derive(Error, Debug)]
pub enum ImageGenError {
    /// Settings could not be resolved at construction time.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The caller-supplied request was malformed at the boundary.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was missing or malformed.
        message: String,
    },

    /// More reference images than the upstream service accepts.
    #[error("Too many reference images: {count} supplied, limit is {limit}")]
    TooManyReferenceImages {
        /// Number of images the caller supplied.
        count: usize,
        /// Maximum the request may carry.
        limit: usize,
    },

    /// A reference image path does not exist on the filesystem.
    #[error("Reference image not found: {}", path.display())]
    SourceImageNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A reference image has an extension outside the supported set.
    #[error(
        "Unsupported reference image format \"{extension}\" (supported: png, jpg, jpeg, gif, webp)"
    )]
    UnsupportedImageFormat {
        /// The offending extension.
        extension: String,
    },

    /// The upstream call itself failed.
    #[error("Upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),

    /// No candidate part carried inline binary data.
    #[error("No image data found in response")]
    NoImageInResponse,

    /// Reading a reference image or writing the output file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ImageGenError {
    /// Returns true when the failure is attributable to the caller's request
    /// rather than the upstream service or the local filesystem.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ImageGenError::InvalidRequest { .. }
                | ImageGenError::TooManyReferenceImages { .. }
                | ImageGenError::SourceImageNotFound { .. }
                | ImageGenError::UnsupportedImageFormat { .. }
        )
    }
}

impl From<serde_json::Error> for ImageGenError {
    fn from(err: serde_json::Error) -> Self {
        ImageGenError::Upstream(UpstreamError::MalformedResponse {
            message: err.to_string(),
        })
    }
}
