//! Resolved settings for the image generation core.
//!
//! The core never reads configuration files; it receives an already-resolved
//! [`GeneratorSettings`] value at construction time. The builder supplies the
//! documented defaults, and [`GeneratorSettings::from_env`] covers process
//! bootstrap, where a missing API key is fatal.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::AuthMethod;
use crate::error::{ConfigurationError, ImageGenError};
use crate::types::{AspectRatio, ImageModel, ImageSize};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default request timeout (120 seconds). Image generation is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default output directory name, under the user's home directory.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "gemini_images";

/// Resolved settings for the image generator.
#[derive(Clone)]
pub struct GeneratorSettings {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API.
    pub base_url: Url,
    /// API version segment.
    pub api_version: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Authentication placement.
    pub auth_method: AuthMethod,
    /// The upstream model to call.
    pub model: ImageModel,
    /// Aspect ratio applied when a request omits one.
    pub default_aspect_ratio: AspectRatio,
    /// Size tier applied when a request omits one.
    pub default_image_size: ImageSize,
    /// Absolute directory generated images are written under.
    pub output_directory: PathBuf,
}

impl GeneratorSettings {
    /// Creates a new settings builder.
    pub fn builder() -> GeneratorSettingsBuilder {
        GeneratorSettingsBuilder::default()
    }

    /// Creates settings from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) plus the optional
    /// `GEMINI_BASE_URL`, `GEMINI_API_VERSION` and `GEMINI_TIMEOUT_SECS`.
    /// A missing API key fails here, before any request is accepted.
    pub fn from_env() -> Result<Self, ImageGenError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| ConfigurationError::MissingApiKey)?;

        let mut builder = Self::builder().api_key(SecretString::new(api_key));

        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            builder = builder.base_url(&base_url)?;
        }
        if let Ok(api_version) = std::env::var("GEMINI_API_VERSION") {
            builder = builder.api_version(&api_version);
        }
        if let Ok(timeout) = std::env::var("GEMINI_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                builder = builder.timeout(Duration::from_secs(secs));
            }
        }

        builder.build()
    }
}

impl std::fmt::Debug for GeneratorSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("default_aspect_ratio", &self.default_aspect_ratio)
            .field("default_image_size", &self.default_image_size)
            .field("output_directory", &self.output_directory)
            .finish()
    }
}

/// Builder for [`GeneratorSettings`].
#[derive(Default)]
pub struct GeneratorSettingsBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    auth_method: Option<AuthMethod>,
    model: Option<ImageModel>,
    default_aspect_ratio: Option<AspectRatio>,
    default_image_size: Option<ImageSize>,
    output_directory: Option<PathBuf>,
}

impl GeneratorSettingsBuilder {
    /// Sets the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, ImageGenError> {
        let url = Url::parse(base_url).map_err(|e| ConfigurationError::InvalidBaseUrl {
            url: format!("{base_url}: {e}"),
        })?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the API version segment.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the authentication placement.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Sets the upstream model.
    pub fn model(mut self, model: ImageModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the default aspect ratio.
    pub fn default_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.default_aspect_ratio = Some(aspect_ratio);
        self
    }

    /// Sets the default size tier.
    pub fn default_image_size(mut self, image_size: ImageSize) -> Self {
        self.default_image_size = Some(image_size);
        self
    }

    /// Sets the output directory. Relative paths are resolved against the
    /// user's home directory at build time.
    pub fn output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(path.into());
        self
    }

    /// Builds the settings, applying defaults for everything unset.
    pub fn build(self) -> Result<GeneratorSettings, ImageGenError> {
        let api_key = self.api_key.ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| {
                ConfigurationError::InvalidBaseUrl {
                    url: format!("{DEFAULT_BASE_URL}: {e}"),
                }
            })?,
        };

        let output_directory = resolve_output_directory(
            self.output_directory
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR_NAME)),
        )?;

        Ok(GeneratorSettings {
            api_key,
            base_url,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self
                .connect_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            auth_method: self.auth_method.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            default_aspect_ratio: self.default_aspect_ratio.unwrap_or_default(),
            default_image_size: self.default_image_size.unwrap_or_default(),
            output_directory,
        })
    }
}

/// Resolves the output directory to an absolute path. Relative paths are
/// anchored at the user's home directory, matching how the settings file
/// collaborator documents them.
fn resolve_output_directory(path: PathBuf) -> Result<PathBuf, ConfigurationError> {
    if path.is_absolute() {
        return Ok(path);
    }

    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| ConfigurationError::InvalidOutputDirectory {
            message: format!(
                "relative path {} cannot be resolved: HOME is not set",
                path.display()
            ),
        })?;

    Ok(home.join(strip_leading_dot(&path)))
}

fn strip_leading_dot(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::new("test-key".into())
    }

    #[test]
    fn test_default_settings() {
        std::env::set_var("HOME", "/home/tester");

        let settings = GeneratorSettings::builder().api_key(key()).build().unwrap();

        assert_eq!(
            settings.base_url.as_str(),
            "https://generativelanguage.googleapis.com/"
        );
        assert_eq!(settings.api_version, "v1beta");
        assert_eq!(settings.timeout, Duration::from_secs(120));
        assert_eq!(settings.model, ImageModel::Pro3Preview);
        assert_eq!(settings.default_aspect_ratio, AspectRatio::Square);
        assert_eq!(settings.default_image_size, ImageSize::Large);
        assert_eq!(
            settings.output_directory,
            PathBuf::from("/home/tester/gemini_images")
        );
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = GeneratorSettings::builder().build();
        assert!(matches!(
            result,
            Err(ImageGenError::Configuration(
                ConfigurationError::MissingApiKey
            ))
        ));
    }

    #[test]
    fn test_absolute_output_directory_kept_verbatim() {
        let settings = GeneratorSettings::builder()
            .api_key(key())
            .output_directory("/var/images")
            .build()
            .unwrap();

        assert_eq!(settings.output_directory, PathBuf::from("/var/images"));
    }

    #[test]
    fn test_relative_output_directory_resolves_under_home() {
        std::env::set_var("HOME", "/home/tester");

        let settings = GeneratorSettings::builder()
            .api_key(key())
            .output_directory("./renders")
            .build()
            .unwrap();

        assert_eq!(
            settings.output_directory,
            PathBuf::from("/home/tester/renders")
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = GeneratorSettings::builder().base_url("not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_settings() {
        let settings = GeneratorSettings::builder()
            .api_key(key())
            .base_url("http://localhost:8080")
            .unwrap()
            .api_version("v1")
            .model(ImageModel::Flash25)
            .default_image_size(ImageSize::Small)
            .default_aspect_ratio(AspectRatio::SixteenByNine)
            .output_directory("/tmp/out")
            .build()
            .unwrap();

        assert_eq!(settings.api_version, "v1");
        assert_eq!(settings.model, ImageModel::Flash25);
        assert_eq!(settings.default_image_size, ImageSize::Small);
        assert_eq!(settings.default_aspect_ratio, AspectRatio::SixteenByNine);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let settings = GeneratorSettings::builder()
            .api_key(SecretString::new("super-secret".into()))
            .output_directory("/tmp/out")
            .build()
            .unwrap();

        let debug = format!("{settings:?}");
        assert!(!debug.contains("super-secret"));
    }
}
