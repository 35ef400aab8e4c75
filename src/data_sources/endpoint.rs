use tracing::instrument;

use super::DataSource;
use crate::client::Client;
use crate::error::ProviderError;
use crate::models::EndpointState;
use crate::resources::require;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Block, NestedBlock, Schema};

/// The `quicknode_endpoint` data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointDataSource;

#[async_trait::async_trait]
impl DataSource for EndpointDataSource {
    type State = EndpointState;

    fn schema(&self) -> Schema {
        let security_options = [
            ("tokens", "Token-based authentication for the endpoint."),
            ("referrers", "Referrer-based access control for the endpoint."),
            ("jwts", "JWT-based authentication for the endpoint."),
            ("ips", "IP-based access control for the endpoint."),
            ("domain_masks", "Domain mask-based access control for the endpoint."),
            ("hsts", "HTTP Strict Transport Security for the endpoint."),
            ("cors", "Cross-Origin Resource Sharing for the endpoint."),
        ]
        .into_iter()
        .fold(
            Block::new().with_description("Security options for the endpoint."),
            |block, (name, description)| {
                block.with_attribute(name, Attribute::computed_bool().with_description(description))
            },
        );

        let rate_limits = ["rate_limit_by_ip"]
            .into_iter()
            .map(|name| (name, Attribute::computed_bool()))
            .chain(
                ["account", "rps", "rpd", "rpm"]
                    .into_iter()
                    .map(|name| (name, Attribute::computed_int64())),
            )
            .fold(
                Block::new().with_description("Rate limits applied to the endpoint."),
                |block, (name, attr)| block.with_attribute(name, attr),
            );

        Schema::v0()
            .with_description("Returns info for a specific endpoint.")
            .with_attribute(
                "id",
                Attribute::required_string().with_description("A unique identifier for the created endpoint."),
            )
            .with_attribute(
                "label",
                Attribute::computed_string().with_description("A descriptive label for the endpoint."),
            )
            .with_attribute(
                "chain",
                Attribute::computed_string().with_description("The blockchain the endpoint is associated with."),
            )
            .with_attribute(
                "network",
                Attribute::computed_string().with_description("The specific network of the blockchain."),
            )
            .with_attribute(
                "http_url",
                Attribute::computed_string()
                    .with_description("The HTTP URL to access the newly created endpoint."),
            )
            .with_attribute(
                "wss_url",
                Attribute::computed_string()
                    .with_description("The WebSocket URL to access the newly created endpoint."),
            )
            .with_attribute(
                "status",
                Attribute::computed_string().with_description("The status of the endpoint."),
            )
            .with_attribute(
                "multichain",
                Attribute::computed_bool().with_description("Whether the endpoint is multichain."),
            )
            .with_attribute(
                "tags",
                Attribute::new(AttributeType::list(AttributeType::String), AttributeFlags::computed())
                    .with_description("Tags attached to the endpoint."),
            )
            .with_block("security_options", NestedBlock::single(security_options).computed())
            .with_block("rate_limits", NestedBlock::single(rate_limits).computed())
    }

    #[instrument(skip(self, client, config), fields(id = ?config.id))]
    async fn read(&self, client: &Client, config: EndpointState) -> Result<EndpointState, ProviderError> {
        let endpoint = client.get_endpoint(require(&config.id, "id")?).await?;
        let mut state = EndpointState::from(&endpoint);
        state.rate_limits = Some(endpoint.rate_limits);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_only_id_is_configurable() {
        let schema = EndpointDataSource.schema();
        assert!(validate(&schema, &json!({"id": "ep-1"})).is_empty());
        assert_eq!(validate(&schema, &json!({})).len(), 1);
        assert!(schema.block.blocks["rate_limits"].computed);
    }
}
