//! Orchestration of a single generation call: normalize, call upstream,
//! materialize.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::materialize::{materialize, unix_millis};
use super::normalize::normalize;
use super::ImageGenerator;
use crate::auth::ApiKeyAuth;
use crate::config::GeneratorSettings;
use crate::error::{ImageGenError, ImageGenResult};
use crate::transport::{
    build_generate_request, parse_generate_response, HttpTransport, ReqwestTransport,
};
use crate::types::{
    Content, GenerateContentRequest, GenerationConfig, GenerationOutcome, ImageConfig,
    ImageRequest, ResponseModality,
};

/// Image generator backed by the Gemini `generateContent` endpoint.
///
/// Requests are processed one at a time to completion; the upstream call is
/// the only await point. There are no internal retries, timeouts beyond the
/// HTTP client's, or shared mutable state between requests.
pub struct GeminiImageGenerator {
    settings: GeneratorSettings,
    auth: ApiKeyAuth,
    transport: Arc<dyn HttpTransport>,
}

impl GeminiImageGenerator {
    /// Creates a generator with the production HTTP transport.
    pub fn new(settings: GeneratorSettings) -> Result<Self, ImageGenError> {
        let transport = ReqwestTransport::new(settings.timeout, settings.connect_timeout)?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    /// Creates a generator over an explicit transport. Used by tests to
    /// substitute a mock.
    pub fn with_transport(settings: GeneratorSettings, transport: Arc<dyn HttpTransport>) -> Self {
        let auth = ApiKeyAuth::new(settings.api_key.clone(), settings.auth_method);
        Self {
            settings,
            auth,
            transport,
        }
    }

    /// Returns the resolved settings.
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, request: ImageRequest) -> ImageGenResult<GenerationOutcome> {
        let normalized = normalize(
            &request,
            self.settings.default_aspect_ratio,
            self.settings.default_image_size,
        )?;

        tracing::debug!(
            model = %self.settings.model,
            aspect_ratio = %normalized.aspect_ratio,
            image_size = %normalized.image_size,
            parts = normalized.parts.len(),
            "starting image generation"
        );

        let body = GenerateContentRequest {
            contents: vec![Content::user(normalized.parts)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![ResponseModality::Image],
                image_config: ImageConfig {
                    aspect_ratio: normalized.aspect_ratio,
                    image_size: normalized.image_size.resolution(),
                },
            }),
        };

        let http_request = build_generate_request(
            &self.settings.base_url,
            &self.settings.api_version,
            self.settings.model.as_str(),
            &self.auth,
            &body,
        )?;

        let start = Instant::now();
        let http_response = self.transport.send(http_request).await.map_err(|e| {
            tracing::warn!(model = %self.settings.model, error = %e, "upstream call failed");
            ImageGenError::Upstream(e)
        })?;

        let response = parse_generate_response(http_response)?;

        let outcome = materialize(
            &response,
            &request.prompt,
            self.settings.model,
            normalized.aspect_ratio,
            normalized.image_size,
            &self.settings.output_directory,
            unix_millis(),
        )?;

        tracing::info!(
            model = %self.settings.model,
            path = %outcome.image_path.display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "image generated"
        );

        Ok(outcome)
    }
}
