//! Provider configuration.
//!
//! Environment variables supply the base values and explicit configuration
//! overrides them. Both the endpoint and the API key must end up non-empty.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema};

/// Environment variable holding the API base URL.
pub const ENV_ENDPOINT: &str = "QUICKNODE_ENDPOINT";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "QUICKNODE_API_KEY";

/// Raw provider configuration as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// API base URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// API key.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Configuration after environment fallback, ready to build a client.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// API base URL.
    pub endpoint: String,
    /// API key.
    pub api_key: String,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ProviderConfig {
    /// Schema of the provider configuration block.
    pub fn schema() -> Schema {
        Schema::v0()
            .with_description("Interact with QuickNode.")
            .with_attribute(
                "endpoint",
                Attribute::optional_string().with_description(format!(
                    "URI for QuickNode API. May also be provided via {ENV_ENDPOINT} environment variable."
                )),
            )
            .with_attribute(
                "api_key",
                Attribute::optional_string().sensitive().with_description(format!(
                    "API key for QuickNode API. May also be provided via {ENV_API_KEY} environment variable."
                )),
            )
    }

    /// Decode a configuration document. A null document is an empty config.
    pub fn from_value(value: &Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| ProviderError::Configuration(e.to_string()))
    }

    /// Resolve against an arbitrary environment lookup.
    pub fn resolve_with<F>(&self, env: F) -> Result<ResolvedConfig, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| env(ENV_ENDPOINT))
            .unwrap_or_default();
        let api_key = self
            .api_key
            .clone()
            .or_else(|| env(ENV_API_KEY))
            .unwrap_or_default();

        let mut diagnostics = Vec::new();
        if endpoint.is_empty() {
            diagnostics.push(
                Diagnostic::error("Missing QuickNode API Endpoint")
                    .with_detail(missing_detail("endpoint", "API endpoint", ENV_ENDPOINT))
                    .with_attribute("endpoint"),
            );
        }
        if api_key.is_empty() {
            diagnostics.push(
                Diagnostic::error("Missing QuickNode API Key")
                    .with_detail(missing_detail("api_key", "API key", ENV_API_KEY))
                    .with_attribute("api_key"),
            );
        }

        if diagnostics.is_empty() {
            Ok(ResolvedConfig { endpoint, api_key })
        } else {
            Err(diagnostics)
        }
    }
}

fn missing_detail(attribute: &str, what: &str, env_var: &str) -> String {
    format!(
        "The provider cannot create the QuickNode API client as there is a missing or empty value for the QuickNode {what}. \
         Set the {attribute} value in the configuration or use the {env_var} environment variable. \
         If either is already set, ensure the value is not empty."
    )
}
