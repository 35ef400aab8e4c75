use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::DataSource;
use crate::client::Client;
use crate::error::ProviderError;
use crate::models::EndpointSummary;
use crate::schema::{Attribute, Block, NestedBlock, Schema};

/// The `quicknode_endpoints` data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointsDataSource;

/// State of the `quicknode_endpoints` data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointsState {
    /// Page size; sent as `0` when unset.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Page offset; sent as `0` when unset.
    #[serde(default)]
    pub offset: Option<i64>,
    /// Endpoints of the requested page.
    #[serde(default)]
    pub endpoints: Vec<EndpointSummary>,
}

#[async_trait::async_trait]
impl DataSource for EndpointsDataSource {
    type State = EndpointsState;

    fn schema(&self) -> Schema {
        let endpoint = Block::new()
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("A unique identifier for the created endpoint."),
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
            );

        Schema::v0()
            .with_description("Lists info for all available endpoints.")
            .with_attribute(
                "limit",
                Attribute::optional_int64().with_description("The number of endpoints to return."),
            )
            .with_attribute(
                "offset",
                Attribute::optional_int64().with_description("The offset to start from."),
            )
            .with_block("endpoints", NestedBlock::list(endpoint).computed())
    }

    #[instrument(skip(self, client, config), fields(limit = ?config.limit, offset = ?config.offset))]
    async fn read(&self, client: &Client, config: EndpointsState) -> Result<EndpointsState, ProviderError> {
        let endpoints = client.list_endpoints(config.limit, config.offset).await?;
        debug!(count = endpoints.len(), "Listed endpoints");
        Ok(EndpointsState {
            endpoints: endpoints.iter().map(EndpointSummary::from).collect(),
            ..config
        })
    }
}
