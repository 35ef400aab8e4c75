use reqwest::Method;
use tracing::instrument;

use super::{Client, NoBody};
use crate::error::ProviderError;
use crate::models::Chain;

impl Client {
    /// List the supported chains and their networks.
    #[instrument(skip(self))]
    pub async fn get_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        self.request_data::<Vec<Chain>, NoBody>(Method::GET, "/chains", &[], None)
            .await
    }
}
