//! # Gemini Image Generation Core
//!
//! Thin integration layer exposing Gemini image generation to a
//! tool-invocation protocol client: it accepts a text prompt plus generation
//! options, calls the `generateContent` endpoint with the image response
//! modality, persists the returned image to disk and hands back a structured
//! result record.
//!
//! The protocol/transport lifecycle and configuration-file parsing live in
//! the surrounding collaborators; this crate receives already-resolved
//! [`GeneratorSettings`] at construction and exposes a single operation,
//! [`ImageGenerator::generate`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_imagegen::{
//!     GeminiImageGenerator, GeneratorSettings, ImageGenerator, ImageRequest,
//! };
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = GeneratorSettings::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .output_directory("/tmp/gemini_images")
//!         .build()?;
//!
//!     let generator = GeminiImageGenerator::new(settings)?;
//!     let outcome = generator
//!         .generate(ImageRequest::new("a lighthouse at dusk"))
//!         .await?;
//!
//!     println!("saved to {}", outcome.image_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `config` - resolved settings and builder
//! - `auth` - API key placement (header or query param)
//! - `transport` - the single upstream HTTP call
//! - `error` - error taxonomy
//! - `types` - wire and caller-facing types
//! - `service` - Parameter Normalizer, Result Materializer, generator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod error;
pub mod service;
pub mod transport;
pub mod types;

// Always available so integration tests can run without network access.
pub mod mocks;

pub use auth::{ApiKeyAuth, AuthMethod};
pub use config::{
    GeneratorSettings, GeneratorSettingsBuilder, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_OUTPUT_DIR_NAME, DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    ConfigurationError, ImageGenError, ImageGenResult, UpstreamError, REFERENCE_IMAGE_LIMIT,
};
pub use service::{GeminiImageGenerator, ImageGenerator};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{
    AspectRatio, Blob, Candidate, Content, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, GenerationOutcome, ImageConfig, ImageModel, ImageRequest, ImageSize, Part,
    Resolution, ResponseModality, Role, ToolReport,
};
