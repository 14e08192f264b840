//! The image generation core: Parameter Normalizer, Result Materializer and
//! the generator orchestrating them around the single upstream call.

mod generator;
pub mod materialize;
pub mod normalize;

use async_trait::async_trait;

use crate::error::ImageGenResult;
use crate::types::{GenerationOutcome, ImageRequest};

pub use generator::GeminiImageGenerator;
pub use materialize::{first_inline_image, image_filename, sanitized_prompt_prefix};
pub use normalize::{instruction_text, normalize, NormalizedRequest, NEGATIVE_PROMPT_LABEL};

/// The single operation exposed to the tool-invocation collaborator.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image for the request and persists it to disk.
    async fn generate(&self, request: ImageRequest) -> ImageGenResult<GenerationOutcome>;
}
