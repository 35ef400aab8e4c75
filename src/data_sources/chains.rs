use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::DataSource;
use crate::client::Client;
use crate::error::ProviderError;
use crate::models::Chain;
use crate::schema::{Attribute, Block, NestedBlock, Schema};

/// The `quicknode_chains` data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainsDataSource;

/// State of the `quicknode_chains` data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChainsState {
    /// Every chain, fetched in full on each read.
    #[serde(default)]
    pub chains: Vec<Chain>,
}

#[async_trait::async_trait]
impl DataSource for ChainsDataSource {
    type State = ChainsState;

    fn schema(&self) -> Schema {
        let network = Block::new()
            .with_attribute(
                "slug",
                Attribute::computed_string().with_description("The slug of the network."),
            )
            .with_attribute(
                "name",
                Attribute::computed_string().with_description("The name of the network."),
            );
        let chain = Block::new()
            .with_attribute(
                "slug",
                Attribute::computed_string().with_description("The slug of the chain."),
            )
            .with_block(
                "networks",
                NestedBlock::list(network.with_description("The list of networks for the chain."))
                    .computed(),
            );

        Schema::v0()
            .with_description("Fetches the list of chains from the QuickNode API.")
            .with_block("chains", NestedBlock::list(chain).computed())
    }

    #[instrument(skip_all)]
    async fn read(&self, client: &Client, _config: ChainsState) -> Result<ChainsState, ProviderError> {
        let chains = client.get_chains().await?;
        debug!(count = chains.len(), "Fetched chains");
        Ok(ChainsState { chains })
    }
}
