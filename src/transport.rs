//! HTTP seam for the single upstream endpoint.
//!
//! The core performs exactly one kind of call: a POST to
//! `/{version}/models/{model}:generateContent`. This module builds that
//! request, executes it through the [`HttpTransport`] trait (so tests can
//! substitute a mock), and parses the response, surfacing upstream error
//! messages verbatim.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::auth::ApiKeyAuth;
use crate::error::{ConfigurationError, ImageGenError, ImageGenResult, UpstreamError};
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// An outgoing upstream request. All calls are JSON POSTs.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Complete request URL, including any auth query parameter.
    pub url: String,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// JSON request body.
    pub body: Bytes,
}

/// An upstream response.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

/// HTTP transport abstraction for testability.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and returns the raw response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UpstreamError>;
}

/// Reqwest-based transport used in production.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given timeouts.
    pub fn new(
        timeout: std::time::Duration,
        connect_timeout: std::time::Duration,
    ) -> Result<Self, ImageGenError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ConfigurationError::InvalidConfiguration {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UpstreamError> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.body(request.body.to_vec()).send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| UpstreamError::Connection {
            message: format!("failed to read response body: {e}"),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Constructs the `generateContent` endpoint path for a model.
pub fn generate_content_path(api_version: &str, model: &str) -> String {
    format!("{api_version}/models/{model}:generateContent")
}

/// Builds the complete upstream request: URL with API version and auth,
/// JSON headers, serialized body.
pub fn build_generate_request(
    base_url: &Url,
    api_version: &str,
    model: &str,
    auth: &ApiKeyAuth,
    body: &GenerateContentRequest,
) -> ImageGenResult<HttpRequest> {
    let path = generate_content_path(api_version, model);
    let mut url = base_url
        .join(&path)
        .map_err(|e| ConfigurationError::InvalidBaseUrl {
            url: format!("{base_url}{path}: {e}"),
        })?;

    if let Some((name, value)) = auth.query_param() {
        url.query_pairs_mut().append_pair(name, &value);
    }

    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    if let Some((name, value)) = auth.header() {
        headers.push((name.to_string(), value));
    }

    let json = serde_json::to_vec(body).map_err(|e| ImageGenError::InvalidRequest {
        message: format!("failed to serialize request body: {e}"),
    })?;

    Ok(HttpRequest {
        url: url.to_string(),
        headers,
        body: Bytes::from(json),
    })
}

/// Error envelope the upstream service wraps failures in.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Parses the upstream response. Success bodies deserialize into the
/// candidate/part structure; failure bodies surface the upstream message
/// verbatim, falling back to the raw body text.
pub fn parse_generate_response(response: HttpResponse) -> ImageGenResult<GenerateContentResponse> {
    if (200..300).contains(&response.status) {
        let parsed: GenerateContentResponse = serde_json::from_slice(&response.body)?;
        return Ok(parsed);
    }

    let message = serde_json::from_slice::<ErrorEnvelope>(&response.body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|body| body.message)
        .unwrap_or_else(|| String::from_utf8_lossy(&response.body).into_owned());

    Err(ImageGenError::Upstream(UpstreamError::Status {
        status: response.status,
        message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthMethod;
    use crate::types::{Content, GenerationConfig, ImageConfig, Part, Resolution, ResponseModality};
    use crate::types::AspectRatio;
    use secrecy::SecretString;

    fn request_body() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("a fox")])],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![ResponseModality::Image],
                image_config: ImageConfig {
                    aspect_ratio: AspectRatio::Square,
                    image_size: Resolution::TwoK,
                },
            }),
        }
    }

    fn base_url() -> Url {
        Url::parse("https://generativelanguage.googleapis.com").unwrap()
    }

    #[test]
    fn test_generate_content_path() {
        assert_eq!(
            generate_content_path("v1beta", "gemini-3-pro-image-preview"),
            "v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
    }

    #[test]
    fn test_build_request_with_header_auth() {
        let auth = ApiKeyAuth::new(SecretString::new("test-key".into()), AuthMethod::Header);
        let request = build_generate_request(
            &base_url(),
            "v1beta",
            "gemini-3-pro-image-preview",
            &auth,
            &request_body(),
        )
        .unwrap();

        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
        assert!(request
            .headers
            .iter()
            .any(|(name, value)| name == "x-goog-api-key" && value == "test-key"));
        assert!(request
            .headers
            .iter()
            .any(|(name, value)| name == "Content-Type" && value == "application/json"));
    }

    #[test]
    fn test_build_request_with_query_auth() {
        let auth = ApiKeyAuth::new(SecretString::new("test-key".into()), AuthMethod::QueryParam);
        let request = build_generate_request(
            &base_url(),
            "v1beta",
            "gemini-2.5-flash-image",
            &auth,
            &request_body(),
        )
        .unwrap();

        assert!(request.url.contains("key=test-key"));
        assert!(!request
            .headers
            .iter()
            .any(|(name, _)| name == "x-goog-api-key"));
    }

    #[test]
    fn test_parse_success_response() {
        let response = HttpResponse {
            status: 200,
            body: Bytes::from(r#"{"candidates": [], "modelVersion": "m"}"#),
        };

        let parsed = parse_generate_response(response).unwrap();
        assert_eq!(parsed.model_version.as_deref(), Some("m"));
    }

    #[test]
    fn test_parse_error_surfaces_upstream_message() {
        let response = HttpResponse {
            status: 429,
            body: Bytes::from(
                r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#,
            ),
        };

        let err = parse_generate_response(response).unwrap_err();
        match err {
            ImageGenError::Upstream(UpstreamError::Status { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_falls_back_to_raw_body() {
        let response = HttpResponse {
            status: 502,
            body: Bytes::from("Bad Gateway"),
        };

        let err = parse_generate_response(response).unwrap_err();
        match err {
            ImageGenError::Upstream(UpstreamError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_success_body() {
        let response = HttpResponse {
            status: 200,
            body: Bytes::from("not json"),
        };

        let err = parse_generate_response(response).unwrap_err();
        assert!(matches!(
            err,
            ImageGenError::Upstream(UpstreamError::MalformedResponse { .. })
        ));
    }
}
