//! Request and response wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use super::content::Content;
use super::request::AspectRatio;

/// Response modality requested from the model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseModality {
    /// Image output.
    Image,
    /// Text output.
    Text,
}

/// Upstream resolution token. The caller-facing size tiers collapse onto
/// these three values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Resolution {
    /// 1K resolution.
    #[serde(rename = "1K")]
    OneK,
    /// 2K resolution.
    #[serde(rename = "2K")]
    TwoK,
    /// 4K resolution.
    #[serde(rename = "4K")]
    FourK,
}

impl Resolution {
    /// The literal token sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::OneK => "1K",
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }
}

/// Image-specific generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Aspect ratio token for the generated image.
    pub aspect_ratio: AspectRatio,
    /// Resolution token for the generated image.
    pub image_size: Resolution,
}

/// Configuration for content generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// The modalities the response should carry.
    pub response_modalities: Vec<ResponseModality>,
    /// Image generation parameters.
    pub image_config: ImageConfig,
}

/// Request to generate content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The content to send to the model.
    pub contents: Vec<Content>,
    /// Generation configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A candidate response from the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate. Absent when the candidate was filtered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// The reason generation finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// The index of this candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}

/// Response from content generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// The candidate responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
    /// The version of the model used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}
