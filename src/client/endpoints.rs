use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{Client, NoBody};
use crate::error::ProviderError;
use crate::models::{Endpoint, WhitelistIp};

#[derive(Serialize)]
struct CreateEndpointRequest<'a> {
    chain: &'a str,
    network: &'a str,
}

#[derive(Serialize)]
struct LabelRequest<'a> {
    label: &'a str,
}

#[derive(Serialize)]
struct SecurityOptionsRequest<'a> {
    options: &'a BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize)]
struct WhitelistIpRequest<'a> {
    ip: &'a str,
}

#[derive(Deserialize)]
struct DeleteResponse {
    #[serde(default)]
    result: bool,
}

impl Client {
    /// Fetch one endpoint.
    #[instrument(skip(self))]
    pub async fn get_endpoint(&self, id: &str) -> Result<Endpoint, ProviderError> {
        self.request_data::<Endpoint, NoBody>(Method::GET, &format!("/endpoints/{id}"), &[], None)
            .await
    }

    /// Provision an endpoint on a chain and network.
    #[instrument(skip(self))]
    pub async fn create_endpoint(
        &self,
        chain: &str,
        network: &str,
    ) -> Result<Endpoint, ProviderError> {
        let body = CreateEndpointRequest { chain, network };
        self.request_data(Method::POST, "/endpoints", &[], Some(&body))
            .await
    }

    /// Set the label of an endpoint.
    #[instrument(skip(self))]
    pub async fn patch_endpoint_label(&self, id: &str, label: &str) -> Result<(), ProviderError> {
        let body = LabelRequest { label };
        self.request_data::<bool, _>(Method::PATCH, &format!("/endpoints/{id}"), &[], Some(&body))
            .await?;
        Ok(())
    }

    /// Replace the security options of an endpoint.
    ///
    /// `options` must carry all seven toggles; see
    /// [`crate::mapper::security_options_payload`].
    #[instrument(skip(self, options))]
    pub async fn patch_endpoint_security(
        &self,
        id: &str,
        options: &BTreeMap<&'static str, &'static str>,
    ) -> Result<(), ProviderError> {
        let body = SecurityOptionsRequest { options };
        self.request_data::<bool, _>(
            Method::PATCH,
            &format!("/endpoints/{id}/security_options"),
            &[],
            Some(&body),
        )
        .await?;
        Ok(())
    }

    /// Archive an endpoint.
    #[instrument(skip(self))]
    pub async fn delete_endpoint(&self, id: &str) -> Result<(), ProviderError> {
        let response: DeleteResponse = self
            .request::<_, NoBody>(Method::DELETE, &format!("/endpoints/{id}"), &[], None)
            .await?;
        info!(endpoint_id = id, result = response.result, "Deleted endpoint");
        Ok(())
    }

    /// List endpoints of the account, one page at a time.
    ///
    /// Unset `limit`/`offset` are sent as `0`, which the API treats as its
    /// own defaults.
    #[instrument(skip(self))]
    pub async fn list_endpoints(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Endpoint>, ProviderError> {
        let query = [
            ("limit", limit.unwrap_or(0).to_string()),
            ("offset", offset.unwrap_or(0).to_string()),
        ];
        self.request_data::<Vec<Endpoint>, NoBody>(Method::GET, "/endpoints", &query, None)
            .await
    }

    /// Allow an IP address to reach an endpoint.
    #[instrument(skip(self))]
    pub async fn create_whitelist_ip(
        &self,
        endpoint_id: &str,
        ip: &str,
    ) -> Result<WhitelistIp, ProviderError> {
        let body = WhitelistIpRequest { ip };
        self.request_data(
            Method::POST,
            &format!("/endpoints/{endpoint_id}/security/ips"),
            &[],
            Some(&body),
        )
        .await
    }

    /// Remove an allowed IP address from an endpoint.
    #[instrument(skip(self))]
    pub async fn delete_whitelist_ip(
        &self,
        endpoint_id: &str,
        ip_id: &str,
    ) -> Result<(), ProviderError> {
        self.request_data::<bool, NoBody>(
            Method::DELETE,
            &format!("/endpoints/{endpoint_id}/security/ips/{ip_id}"),
            &[],
            None,
        )
        .await?;
        Ok(())
    }
}
