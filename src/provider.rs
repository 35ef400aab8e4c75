//! The QuickNode provider.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::client::Client;
use crate::config::ProviderConfig;
use crate::data_sources::DataSourceKind;
use crate::error::ProviderError;
use crate::plan::plan_resource;
use crate::resources::ResourceKind;
use crate::schema::{Diagnostic, ProviderSchema};
use crate::service::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProviderMetadata};
use crate::validation::validate;

/// Provider type name; prefix of every resource and data source type.
pub const TYPE_NAME: &str = "quicknode";

type EnvLookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Provider for the QuickNode API.
///
/// Holds no state besides the client built by
/// [`configure`](ProviderService::configure). Every other operation needing
/// the API fails with [`ProviderError::NotConfigured`] until then.
pub struct QuickNodeProvider {
    version: String,
    client: RwLock<Option<Arc<Client>>>,
    env: Arc<EnvLookup>,
}

impl QuickNodeProvider {
    /// Create an unconfigured provider reading fallbacks from the process environment.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            client: RwLock::new(None),
            env: Arc::new(|key: &str| std::env::var(key).ok()),
        }
    }

    /// Replace the environment lookup used during configuration.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// The provider version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether [`configure`](ProviderService::configure) has succeeded.
    pub async fn is_configured(&self) -> bool {
        self.client.read().await.is_some()
    }

    async fn client(&self) -> Result<Arc<Client>, ProviderError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }
}

impl fmt::Debug for QuickNodeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickNodeProvider")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ProviderService for QuickNodeProvider {
    fn schema(&self) -> ProviderSchema {
        let schema = ProviderSchema::new().with_provider_config(ProviderConfig::schema());
        let schema = ResourceKind::ALL
            .into_iter()
            .fold(schema, |schema, kind| schema.with_resource(kind.as_str(), kind.schema()));
        DataSourceKind::ALL
            .into_iter()
            .fold(schema, |schema, kind| schema.with_data_source(kind.as_str(), kind.schema()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: TYPE_NAME.to_string(),
            version: self.version.clone(),
            resources: ResourceKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            data_sources: DataSourceKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
        }
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&ProviderConfig::schema(), &config))
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = ProviderConfig::from_value(&config)?;
        let resolved = match config.resolve_with(|key| (self.env)(key)) {
            Ok(resolved) => resolved,
            Err(diagnostics) => return Ok(diagnostics),
        };

        let client = match Client::new(Some(&resolved.endpoint), Some(&resolved.api_key)) {
            Ok(client) => client,
            Err(err) => {
                return Ok(vec![Diagnostic::error("Unable to Create QuickNode API Client")
                    .with_detail(format!(
                        "An unexpected error occurred when creating the QuickNode API client.\n\nQuickNode Client Error: {err}"
                    ))]);
            }
        };

        *self.client.write().await = Some(Arc::new(client));
        info!(endpoint = %resolved.endpoint, "Configured QuickNode provider");
        Ok(vec![])
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        self.client.write().await.take();
        info!("QuickNode provider stopped");
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        Ok(validate(&kind.schema(), &config))
    }

    #[instrument(skip(self, prior_state, proposed_state, _config))]
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        _config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        Ok(plan_resource(&kind.schema(), prior_state.as_ref(), proposed_state))
    }

    #[instrument(skip(self, planned_state))]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        kind.create(&*self.client().await?, planned_state).await
    }

    #[instrument(skip(self, current_state))]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        kind.read(&*self.client().await?, current_state).await
    }

    #[instrument(skip(self, prior_state, planned_state))]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        kind.update(&*self.client().await?, prior_state, planned_state).await
    }

    #[instrument(skip(self, current_state))]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        kind.delete(&*self.client().await?, current_state).await
    }

    #[instrument(skip(self))]
    async fn import_resource(&self, resource_type: &str, id: &str) -> Result<Vec<ImportedResource>, ProviderError> {
        let kind: ResourceKind = resource_type.parse()?;
        Ok(vec![ImportedResource::new(kind.as_str(), kind.import(id)?)])
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let kind: DataSourceKind = data_source_type.parse()?;
        Ok(validate(&kind.schema(), &config))
    }

    #[instrument(skip(self, config))]
    async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value, ProviderError> {
        let kind: DataSourceKind = data_source_type.parse()?;
        kind.read(&*self.client().await?, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::has_errors;
    use serde_json::json;

    fn provider() -> QuickNodeProvider {
        QuickNodeProvider::new("0.1.0").with_env_lookup(|_| None)
    }

    #[test]
    fn test_schema_registers_every_kind() {
        let schema = provider().schema();
        assert_eq!(schema.resources.len(), 2);
        assert_eq!(schema.data_sources.len(), 3);
        assert!(schema.resources.contains_key("quicknode_endpoint_whitelist_ip"));
        assert!(schema.data_sources.contains_key("quicknode_chains"));
        assert!(schema.provider.block.attributes["api_key"].flags.sensitive);
    }

    #[test]
    fn test_metadata() {
        let metadata = provider().metadata();
        assert_eq!(metadata.type_name, "quicknode");
        assert_eq!(metadata.version, "0.1.0");
        assert_eq!(
            metadata.resources,
            vec!["quicknode_endpoint", "quicknode_endpoint_whitelist_ip"]
        );
    }

    #[tokio::test]
    async fn test_configure_reports_missing_values() {
        let provider = provider();
        let diagnostics = provider.configure(json!({})).await.unwrap();
        assert!(has_errors(&diagnostics));
        assert_eq!(diagnostics.len(), 2);
        assert!(!provider.is_configured().await);
    }

    #[tokio::test]
    async fn test_configure_uses_environment() {
        let provider = QuickNodeProvider::new("0.1.0").with_env_lookup(|key| match key {
            "QUICKNODE_ENDPOINT" => Some("https://api.quicknode.com/v0".to_string()),
            "QUICKNODE_API_KEY" => Some("qn-test".to_string()),
            _ => None,
        });
        let diagnostics = provider.configure(Value::Null).await.unwrap();
        assert!(diagnostics.is_empty());
        assert!(provider.is_configured().await);

        provider.stop().await.unwrap();
        assert!(!provider.is_configured().await);
    }

    #[tokio::test]
    async fn test_operations_require_configuration() {
        let provider = provider();
        let err = provider
            .create("quicknode_endpoint", json!({"chain": "eth", "network": "mainnet"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured));

        let err = provider
            .read_data_source("quicknode_chains", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured));
    }

    #[tokio::test]
    async fn test_unknown_types_are_rejected() {
        let provider = provider();
        let err = provider.read("quicknode_bucket", json!({})).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));

        let err = provider
            .validate_data_source_config("quicknode_bucket", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_import_needs_no_configuration() {
        let imported = provider()
            .import_resource("quicknode_endpoint_whitelist_ip", "ep-1/ip-2")
            .await
            .unwrap();
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].resource_type, "quicknode_endpoint_whitelist_ip");
        assert_eq!(imported[0].state["endpoint_id"], "ep-1");
        assert_eq!(imported[0].state["id"], "ip-2");
    }

    #[tokio::test]
    async fn test_plan_endpoint_network_change_replaces() {
        let prior = json!({"id": "ep-1", "chain": "eth", "network": "mainnet", "label": "a"});
        let plan = provider()
            .plan(
                "quicknode_endpoint",
                Some(prior),
                json!({"chain": "eth", "network": "sepolia"}),
                Value::Null,
            )
            .await
            .unwrap();
        assert!(plan.requires_replace);
    }

    #[tokio::test]
    async fn test_validate_resource_config() {
        let diagnostics = provider()
            .validate_resource_config("quicknode_endpoint_whitelist_ip", json!({"ip": "10.0.0.1"}))
            .await
            .unwrap();
        assert!(has_errors(&diagnostics));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("endpoint_id"));
    }
}
