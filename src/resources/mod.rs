//! Managed resources.
//!
//! Each resource kind implements [`Resource`] over its own state model.
//! [`ResourceKind`] is the registry the provider dispatches through: it maps
//! a type name to its implementation and moves states between JSON and the
//! typed model.

mod endpoint;
mod whitelist_ip;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::Client;
use crate::error::ProviderError;
use crate::schema::Schema;

pub use endpoint::EndpointResource;
pub use whitelist_ip::{parse_import_id, WhitelistIpResource};

/// The lifecycle of one managed resource kind.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    /// Typed state of the resource.
    type State: Serialize + DeserializeOwned + Send + 'static;

    /// Schema of the resource.
    fn schema(&self) -> Schema;

    /// Create the remote object described by `plan`.
    async fn create(&self, client: &Client, plan: Self::State) -> Result<Self::State, ProviderError>;

    /// Refresh `state` from the API.
    async fn read(&self, client: &Client, state: Self::State) -> Result<Self::State, ProviderError>;

    /// Apply `plan` to an existing object.
    async fn update(
        &self,
        client: &Client,
        prior: Self::State,
        plan: Self::State,
    ) -> Result<Self::State, ProviderError>;

    /// Delete the remote object.
    async fn delete(&self, client: &Client, state: Self::State) -> Result<(), ProviderError>;

    /// Build a partial state from an import identifier, without any API call.
    fn import(&self, id: &str) -> Result<Self::State, ProviderError>;
}

/// Registered resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `quicknode_endpoint`
    Endpoint,
    /// `quicknode_endpoint_whitelist_ip`
    EndpointWhitelistIp,
}

impl ResourceKind {
    /// Every registered kind.
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Endpoint, ResourceKind::EndpointWhitelistIp];

    /// Type name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Endpoint => "quicknode_endpoint",
            ResourceKind::EndpointWhitelistIp => "quicknode_endpoint_whitelist_ip",
        }
    }

    /// Schema of the kind.
    pub fn schema(&self) -> Schema {
        match self {
            ResourceKind::Endpoint => EndpointResource.schema(),
            ResourceKind::EndpointWhitelistIp => WhitelistIpResource.schema(),
        }
    }

    /// Create a resource from a planned state document.
    pub async fn create(&self, client: &Client, planned: Value) -> Result<Value, ProviderError> {
        match self {
            ResourceKind::Endpoint => create_with(&EndpointResource, client, planned).await,
            ResourceKind::EndpointWhitelistIp => create_with(&WhitelistIpResource, client, planned).await,
        }
    }

    /// Refresh a state document.
    pub async fn read(&self, client: &Client, state: Value) -> Result<Value, ProviderError> {
        match self {
            ResourceKind::Endpoint => read_with(&EndpointResource, client, state).await,
            ResourceKind::EndpointWhitelistIp => read_with(&WhitelistIpResource, client, state).await,
        }
    }

    /// Update a resource from its prior and planned state documents.
    pub async fn update(&self, client: &Client, prior: Value, planned: Value) -> Result<Value, ProviderError> {
        match self {
            ResourceKind::Endpoint => update_with(&EndpointResource, client, prior, planned).await,
            ResourceKind::EndpointWhitelistIp => {
                update_with(&WhitelistIpResource, client, prior, planned).await
            }
        }
    }

    /// Delete the resource a state document describes.
    pub async fn delete(&self, client: &Client, state: Value) -> Result<(), ProviderError> {
        match self {
            ResourceKind::Endpoint => EndpointResource.delete(client, decode(state)?).await,
            ResourceKind::EndpointWhitelistIp => WhitelistIpResource.delete(client, decode(state)?).await,
        }
    }

    /// Turn an import identifier into a partial state document.
    pub fn import(&self, id: &str) -> Result<Value, ProviderError> {
        match self {
            ResourceKind::Endpoint => encode(EndpointResource.import(id)?),
            ResourceKind::EndpointWhitelistIp => encode(WhitelistIpResource.import(id)?),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProviderError::UnknownResource(s.to_string()))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

async fn create_with<R: Resource>(resource: &R, client: &Client, planned: Value) -> Result<Value, ProviderError> {
    encode(resource.create(client, decode(planned)?).await?)
}

async fn read_with<R: Resource>(resource: &R, client: &Client, state: Value) -> Result<Value, ProviderError> {
    encode(resource.read(client, decode(state)?).await?)
}

async fn update_with<R: Resource>(
    resource: &R,
    client: &Client,
    prior: Value,
    planned: Value,
) -> Result<Value, ProviderError> {
    encode(resource.update(client, decode(prior)?, decode(planned)?).await?)
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ProviderError> {
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn encode<T: Serialize>(state: T) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(state)?)
}

/// Borrow a required attribute of a state, or explain which one is missing.
pub(crate) fn require<'a>(value: &'a Option<String>, attribute: &str) -> Result<&'a str, ProviderError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::InvalidRequest(format!("Missing required attribute: {attribute}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "quicknode_bucket".parse::<ResourceKind>().unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(ref name) if name == "quicknode_bucket"));
    }

    #[test]
    fn test_require() {
        assert_eq!(require(&Some("ep-1".into()), "id").unwrap(), "ep-1");
        assert!(matches!(
            require(&Some(String::new()), "id"),
            Err(ProviderError::InvalidRequest(_))
        ));
        let err = require(&None, "endpoint_id").unwrap_err();
        assert_eq!(err.message(), "Missing required attribute: endpoint_id");
    }
}
