use tracing::{instrument, warn};

use super::{require, Resource};
use crate::client::Client;
use crate::error::ProviderError;
use crate::models::WhitelistIpState;
use crate::schema::{Attribute, Schema};

/// The `quicknode_endpoint_whitelist_ip` resource.
///
/// Whitelisted IPs are never updated: both `ip` and `endpoint_id` force a
/// replacement, so reaching [`Resource::update`] is a provider bug.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitelistIpResource;

/// Split an `endpoint_id/ip_id` import identifier.
pub fn parse_import_id(id: &str) -> Result<(&str, &str), ProviderError> {
    match id.split_once('/') {
        Some((endpoint_id, ip_id)) if !endpoint_id.is_empty() && !ip_id.is_empty() => {
            Ok((endpoint_id, ip_id))
        }
        _ => Err(ProviderError::InvalidRequest(format!(
            "Expected import ID format: endpoint_id/ip_id, got: {id}"
        ))),
    }
}

#[async_trait::async_trait]
impl Resource for WhitelistIpResource {
    type State = WhitelistIpState;

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Whitelists an IP address on a QuickNode endpoint.")
            .with_attribute(
                "id",
                Attribute::computed_string().with_description("A unique identifier for the whitelisted IP."),
            )
            .with_attribute(
                "ip",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("The IP address to whitelist."),
            )
            .with_attribute(
                "endpoint_id",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("The ID of the endpoint to whitelist the IP address for."),
            )
    }

    #[instrument(skip(self, client, plan), fields(endpoint_id = ?plan.endpoint_id))]
    async fn create(&self, client: &Client, mut plan: WhitelistIpState) -> Result<WhitelistIpState, ProviderError> {
        let endpoint_id = require(&plan.endpoint_id, "endpoint_id")?;
        let ip = require(&plan.ip, "ip")?;

        let created = client.create_whitelist_ip(endpoint_id, ip).await?;
        plan.id = Some(created.id);
        Ok(plan)
    }

    /// Looks the IP up on its endpoint. An IP that is gone leaves the state as it was.
    #[instrument(skip(self, client, state), fields(id = ?state.id, endpoint_id = ?state.endpoint_id))]
    async fn read(&self, client: &Client, mut state: WhitelistIpState) -> Result<WhitelistIpState, ProviderError> {
        let endpoint_id = require(&state.endpoint_id, "endpoint_id")?;
        let endpoint = client.get_endpoint(endpoint_id).await?;

        let found = endpoint
            .security
            .ips
            .into_iter()
            .find(|entry| Some(&entry.id) == state.id.as_ref());
        match found {
            Some(entry) => state.ip = Some(entry.ip),
            None => warn!("Whitelisted IP not found on endpoint, keeping prior state"),
        }
        Ok(state)
    }

    async fn update(
        &self,
        _client: &Client,
        _prior: WhitelistIpState,
        _plan: WhitelistIpState,
    ) -> Result<WhitelistIpState, ProviderError> {
        Err(ProviderError::Internal(
            "Whitelisted IPs cannot be updated in-place. This is a bug in the provider.".to_string(),
        ))
    }

    #[instrument(skip(self, client, state), fields(id = ?state.id, endpoint_id = ?state.endpoint_id))]
    async fn delete(&self, client: &Client, state: WhitelistIpState) -> Result<(), ProviderError> {
        let endpoint_id = require(&state.endpoint_id, "endpoint_id")?;
        let ip_id = require(&state.id, "id")?;
        client.delete_whitelist_ip(endpoint_id, ip_id).await
    }

    fn import(&self, id: &str) -> Result<WhitelistIpState, ProviderError> {
        let (endpoint_id, ip_id) = parse_import_id(id)?;
        Ok(WhitelistIpState {
            id: Some(ip_id.to_string()),
            endpoint_id: Some(endpoint_id.to_string()),
            ip: None,
        })
    }
}
