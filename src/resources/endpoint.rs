use tracing::{debug, instrument};

use super::{require, Resource};
use crate::client::Client;
use crate::error::ProviderError;
use crate::mapper::{security_options_payload, security_options_state};
use crate::models::EndpointState;
use crate::schema::{Attribute, AttributeFlags, AttributeType, Block, NestedBlock, Schema};

/// The `quicknode_endpoint` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointResource;

/// Security toggles with their defaults, filled in by the schema layer.
pub(crate) fn security_options_block() -> Block {
    Block::new()
        .with_description("Security options for the endpoint.")
        .with_attribute(
            "tokens",
            Attribute::defaulted_bool(true)
                .with_description("Token-based authentication for the endpoint. (default: true)"),
        )
        .with_attribute(
            "referrers",
            Attribute::defaulted_bool(false)
                .with_description("Referrer-based access control for the endpoint. (default: false)"),
        )
        .with_attribute(
            "jwts",
            Attribute::defaulted_bool(false)
                .with_description("JWT-based authentication for the endpoint. (default: false)"),
        )
        .with_attribute(
            "ips",
            Attribute::defaulted_bool(false)
                .with_description("IP-based access control for the endpoint. (default: false)"),
        )
        .with_attribute(
            "domain_masks",
            Attribute::defaulted_bool(false)
                .with_description("Domain mask-based access control for the endpoint. (default: false)"),
        )
        .with_attribute(
            "hsts",
            Attribute::defaulted_bool(false)
                .with_description("HTTP Strict Transport Security for the endpoint. (default: false)"),
        )
        .with_attribute(
            "cors",
            Attribute::defaulted_bool(true)
                .with_description("Cross-Origin Resource Sharing for the endpoint. (default: true)"),
        )
}

#[async_trait::async_trait]
impl Resource for EndpointResource {
    type State = EndpointState;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Creates a new endpoint in the QuickNode API.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("A unique identifier for the created endpoint."),
            )
            .with_attribute(
                "label",
                Attribute::optional_string()
                    .computed()
                    .with_description("A descriptive label for the endpoint."),
            )
            .with_attribute(
                "chain",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("The blockchain the endpoint is associated with."),
            )
            .with_attribute(
                "network",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("The specific network of the blockchain."),
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
                Attribute::new(
                    AttributeType::list(AttributeType::String),
                    AttributeFlags::computed(),
                )
                .with_description("Tags attached to the endpoint."),
            )
            .with_block("security_options", NestedBlock::single(security_options_block()).computed())
    }

    /// POST, then label and security patches, then a read-back.
    ///
    /// A failure after the POST leaves the new endpoint in place remotely.
    #[instrument(skip(self, client, plan), fields(chain = ?plan.chain, network = ?plan.network))]
    async fn create(&self, client: &Client, plan: EndpointState) -> Result<EndpointState, ProviderError> {
        let chain = require(&plan.chain, "chain")?;
        let network = require(&plan.network, "network")?;

        let created = client.create_endpoint(chain, network).await?;
        let mut state = plan.clone();
        state.absorb_created(&created);

        match plan.label.as_deref().filter(|label| !label.is_empty()) {
            Some(label) => client.patch_endpoint_label(&created.id, label).await?,
            None => state.label = Some(created.label.clone()),
        }

        client
            .patch_endpoint_security(&created.id, &security_options_payload(plan.security_options.as_ref()))
            .await?;

        let endpoint = client.get_endpoint(&created.id).await?;
        state.security_options = Some(security_options_state(&endpoint));
        state.tags = Some(endpoint.tags);

        debug!(endpoint_id = %created.id, "Created endpoint");
        Ok(state)
    }

    #[instrument(skip(self, client, state), fields(id = ?state.id))]
    async fn read(&self, client: &Client, mut state: EndpointState) -> Result<EndpointState, ProviderError> {
        let id = require(&state.id, "id")?;
        let endpoint = client.get_endpoint(id).await?;
        state.refresh_from(&endpoint);
        Ok(state)
    }

    #[instrument(skip(self, client, prior, plan), fields(id = ?prior.id))]
    async fn update(
        &self,
        client: &Client,
        prior: EndpointState,
        mut plan: EndpointState,
    ) -> Result<EndpointState, ProviderError> {
        if plan.id.is_none() {
            plan.id = prior.id;
        }
        let id = require(&plan.id, "id")?.to_string();

        client
            .patch_endpoint_label(&id, plan.label.as_deref().unwrap_or_default())
            .await?;
        client
            .patch_endpoint_security(&id, &security_options_payload(plan.security_options.as_ref()))
            .await?;

        let endpoint = client.get_endpoint(&id).await?;
        plan.refresh_from(&endpoint);
        Ok(plan)
    }

    #[instrument(skip(self, client, state), fields(id = ?state.id))]
    async fn delete(&self, client: &Client, state: EndpointState) -> Result<(), ProviderError> {
        client.delete_endpoint(require(&state.id, "id")?).await
    }

    fn import(&self, id: &str) -> Result<EndpointState, ProviderError> {
        if id.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "Expected import ID format: endpoint_id, got an empty string".to_string(),
            ));
        }
        Ok(EndpointState {
            id: Some(id.to_string()),
            ..Default::default()
        })
    }
}
