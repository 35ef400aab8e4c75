//! Read-only data sources.

mod chains;
mod endpoint;
mod endpoints;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::Client;
use crate::error::ProviderError;
use crate::resources::{decode, encode};
use crate::schema::Schema;

pub use chains::{ChainsDataSource, ChainsState};
pub use endpoint::EndpointDataSource;
pub use endpoints::{EndpointsDataSource, EndpointsState};

/// A data source: a schema and a read.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Typed state; the configuration is decoded into it and the result encoded from it.
    type State: Serialize + DeserializeOwned + Send + 'static;

    /// Schema of the data source.
    fn schema(&self) -> Schema;

    /// Fetch the data described by `config`.
    async fn read(&self, client: &Client, config: Self::State) -> Result<Self::State, ProviderError>;
}

/// Registered data source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceKind {
    /// `quicknode_chains`
    Chains,
    /// `quicknode_endpoint`
    Endpoint,
    /// `quicknode_endpoints`
    Endpoints,
}

impl DataSourceKind {
    /// Every registered kind.
    pub const ALL: [DataSourceKind; 3] = [
        DataSourceKind::Chains,
        DataSourceKind::Endpoint,
        DataSourceKind::Endpoints,
    ];

    /// Type name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Chains => "quicknode_chains",
            DataSourceKind::Endpoint => "quicknode_endpoint",
            DataSourceKind::Endpoints => "quicknode_endpoints",
        }
    }

    /// Schema of the kind.
    pub fn schema(&self) -> Schema {
        match self {
            DataSourceKind::Chains => ChainsDataSource.schema(),
            DataSourceKind::Endpoint => EndpointDataSource.schema(),
            DataSourceKind::Endpoints => EndpointsDataSource.schema(),
        }
    }

    /// Read the data source for a configuration document.
    pub async fn read(&self, client: &Client, config: Value) -> Result<Value, ProviderError> {
        match self {
            DataSourceKind::Chains => read_with(&ChainsDataSource, client, config).await,
            DataSourceKind::Endpoint => read_with(&EndpointDataSource, client, config).await,
            DataSourceKind::Endpoints => read_with(&EndpointsDataSource, client, config).await,
        }
    }
}

impl FromStr for DataSourceKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataSourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProviderError::UnknownResource(s.to_string()))
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

async fn read_with<D: DataSource>(source: &D, client: &Client, config: Value) -> Result<Value, ProviderError> {
    // Computed attributes arrive as nulls; drop them so list defaults apply.
    let config = match config {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    encode(source.read(client, decode(config)?).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in DataSourceKind::ALL {
            assert_eq!(kind.as_str().parse::<DataSourceKind>().unwrap(), kind);
        }
        assert!("quicknode_endpoint_whitelist_ip".parse::<DataSourceKind>().is_err());
    }

    #[tokio::test]
    async fn test_null_computed_attributes_are_ignored() {
        // Port 1 refuses connections: a transport error means the config decoded.
        let client = Client::new(Some("http://127.0.0.1:1"), None).unwrap();
        let err = DataSourceKind::Endpoints
            .read(&client, serde_json::json!({"limit": 5, "endpoints": null}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
