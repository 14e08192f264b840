//! Caller-facing request and result types.
//!
//! These are the records the tool-invocation boundary hands over and gets
//! back. The loose JSON arguments of a tool call deserialize into
//! [`ImageRequest`] with explicit field presence; anything outside the
//! enumerated option sets is rejected at the boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::generation::Resolution;
use crate::error::{ImageGenError, ImageGenResult};

/// Aspect ratio of the generated image, as the fixed set of tokens the
/// upstream service accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 1:1 square.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 2:3 portrait.
    #[serde(rename = "2:3")]
    TwoByThree,
    /// 3:2 landscape.
    #[serde(rename = "3:2")]
    ThreeByTwo,
    /// 3:4 portrait.
    #[serde(rename = "3:4")]
    ThreeByFour,
    /// 4:3 landscape.
    #[serde(rename = "4:3")]
    FourByThree,
    /// 4:5 portrait.
    #[serde(rename = "4:5")]
    FourByFive,
    /// 5:4 landscape.
    #[serde(rename = "5:4")]
    FiveByFour,
    /// 9:16 tall.
    #[serde(rename = "9:16")]
    NineBySixteen,
    /// 16:9 wide.
    #[serde(rename = "16:9")]
    SixteenByNine,
    /// 21:9 ultra-wide.
    #[serde(rename = "21:9")]
    TwentyOneByNine,
}

impl AspectRatio {
    /// The literal token sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::TwoByThree => "2:3",
            AspectRatio::ThreeByTwo => "3:2",
            AspectRatio::ThreeByFour => "3:4",
            AspectRatio::FourByThree => "4:3",
            AspectRatio::FourByFive => "4:5",
            AspectRatio::FiveByFour => "5:4",
            AspectRatio::NineBySixteen => "9:16",
            AspectRatio::SixteenByNine => "16:9",
            AspectRatio::TwentyOneByNine => "21:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing size tier, distinct from the upstream resolution token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// Small (1K).
    Small,
    /// Medium (2K).
    Medium,
    /// Large (2K).
    #[default]
    Large,
    /// Extra large (4K).
    Xlarge,
}

impl ImageSize {
    /// Resolves the size tier to the upstream resolution token.
    ///
    /// `medium` and `large` both map to 2K. The flattening is part of the
    /// upstream contract, not an oversight.
    pub fn resolution(self) -> Resolution {
        match self {
            ImageSize::Small => Resolution::OneK,
            ImageSize::Medium | ImageSize::Large => Resolution::TwoK,
            ImageSize::Xlarge => Resolution::FourK,
        }
    }

    /// The lowercase tier name as callers spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Xlarge => "xlarge",
        }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The known upstream image generation models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ImageModel {
    /// `gemini-2.5-flash-image` (1K output only).
    #[serde(rename = "gemini-2.5-flash-image")]
    Flash25,
    /// `gemini-3-pro-image-preview`.
    #[default]
    #[serde(rename = "gemini-3-pro-image-preview")]
    Pro3Preview,
}

impl ImageModel {
    /// The model identifier used in the endpoint path and result record.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageModel::Flash25 => "gemini-2.5-flash-image",
            ImageModel::Pro3Preview => "gemini-3-pro-image-preview",
        }
    }
}

impl std::fmt::Display for ImageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single image generation request as handed over by the tool boundary.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    /// Text description of the image to generate. Required, non-empty.
    pub prompt: String,
    /// Aspect ratio; the configured default applies when absent.
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
    /// Size tier; the configured default applies when absent.
    #[serde(default)]
    pub image_size: Option<ImageSize>,
    /// What the image should NOT contain. Appended to the prompt as a
    /// second instruction line.
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Existing image files to condition the generation, in order.
    #[serde(default)]
    pub reference_images: Vec<PathBuf>,
}

impl ImageRequest {
    /// Creates a request with only a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: None,
            image_size: None,
            negative_prompt: None,
            reference_images: Vec::new(),
        }
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    /// Sets the size tier.
    pub fn with_image_size(mut self, image_size: ImageSize) -> Self {
        self.image_size = Some(image_size);
        self
    }

    /// Sets the negative prompt.
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    /// Sets the reference image paths.
    pub fn with_reference_images(mut self, reference_images: Vec<PathBuf>) -> Self {
        self.reference_images = reference_images;
        self
    }

    /// Parses the loose JSON arguments of a tool call into a request,
    /// rejecting malformed or missing fields at the boundary.
    pub fn from_args(args: serde_json::Value) -> ImageGenResult<Self> {
        serde_json::from_value(args).map_err(|e| ImageGenError::InvalidRequest {
            message: e.to_string(),
        })
    }
}

/// The result record returned to the caller after a successful generation.
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// Absolute path of the written image file.
    pub image_path: PathBuf,
    /// The original prompt.
    pub prompt: String,
    /// The model that produced the image.
    pub model: ImageModel,
    /// The resolved aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// The resolved size tier.
    pub image_size: ImageSize,
}

/// Structured success/failure record for the tool boundary.
///
/// The protocol collaborator serializes this into its own wire format; the
/// core never lets a request-scoped error escape as an unhandled fault.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolReport {
    /// Whether the generation succeeded.
    pub success: bool,
    /// Human-readable summary of the outcome.
    pub message: String,
    /// The result record, present on success.
    #[serde(flatten)]
    pub outcome: Option<GenerationOutcome>,
}

impl ToolReport {
    /// Builds a report from a generation result.
    pub fn from_result(result: Result<GenerationOutcome, &ImageGenError>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                message: format!(
                    "Image generated successfully and saved to: {}",
                    outcome.image_path.display()
                ),
                outcome: Some(outcome),
            },
            Err(error) => Self {
                success: false,
                message: error.to_string(),
                outcome: None,
            },
        }
    }
}
