//! API-key authentication for upstream calls.
//!
//! The key is held in a [`SecretString`] and is only exposed at the moment a
//! request is built; it never appears in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

/// Where the API key is placed on the outgoing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use the `x-goog-api-key` header (recommended).
    #[default]
    Header,
    /// Use the `?key=` query parameter.
    QueryParam,
}

/// API-key credential plus its placement method.
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: SecretString,
    method: AuthMethod,
}

impl ApiKeyAuth {
    /// Creates a new credential.
    pub fn new(api_key: SecretString, method: AuthMethod) -> Self {
        Self { api_key, method }
    }

    /// Returns the authentication header, if header placement is configured.
    pub fn header(&self) -> Option<(&'static str, String)> {
        match self.method {
            AuthMethod::Header => {
                Some(("x-goog-api-key", self.api_key.expose_secret().to_string()))
            }
            AuthMethod::QueryParam => None,
        }
    }

    /// Returns the authentication query parameter, if query placement is configured.
    pub fn query_param(&self) -> Option<(&'static str, String)> {
        match self.method {
            AuthMethod::QueryParam => Some(("key", self.api_key.expose_secret().to_string())),
            AuthMethod::Header => None,
        }
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"<redacted>")
            .field("method", &self.method)
            .finish()
    }
}
