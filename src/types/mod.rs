//! Core types for the image generation integration.
//!
//! Split between the wire shapes the upstream service speaks
//! ([`content`], [`generation`]) and the caller-facing request/result
//! records the tool boundary hands over ([`request`]).

pub mod content;
pub mod generation;
pub mod request;

pub use content::{Blob, Content, Part, Role};
pub use generation::{
    Candidate, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    Resolution, ResponseModality,
};
pub use request::{AspectRatio, GenerationOutcome, ImageModel, ImageRequest, ImageSize, ToolReport};
