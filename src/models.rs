//! Wire models of the QuickNode REST API and state models of the provider.
//!
//! Wire models mirror the JSON the API returns. State models mirror the
//! resource and data source schemas; every attribute is optional in state
//! because a state may be partially known (during import, or before the
//! provider has computed a value).

use serde::{Deserialize, Serialize};

// =========================================================================
// Wire models
// =========================================================================

/// A blockchain with the networks it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Chain {
    /// Chain slug, e.g. `eth`.
    pub slug: String,
    /// Networks offered on this chain.
    #[serde(default)]
    pub networks: Vec<Network>,
}

/// A network of a chain, e.g. `mainnet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Network {
    /// Network slug, e.g. `mainnet`.
    pub slug: String,
    /// Human-readable network name.
    #[serde(default)]
    pub name: String,
}

/// Security toggles of an endpoint, as booleans.
///
/// The API reports these as booleans but only accepts the strings
/// `"enabled"`/`"disabled"` when they are patched; see
/// [`crate::mapper::security_options_payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityOptions {
    /// Token authentication.
    #[serde(default)]
    pub tokens: bool,
    /// Referrer allow-listing.
    #[serde(default)]
    pub referrers: bool,
    /// JWT authentication.
    #[serde(default)]
    pub jwts: bool,
    /// IP allow-listing.
    #[serde(default)]
    pub ips: bool,
    /// Domain masking.
    #[serde(rename = "domainMasks", default)]
    pub domain_masks: bool,
    /// HTTP Strict Transport Security.
    #[serde(default)]
    pub hsts: bool,
    /// CORS headers.
    #[serde(default)]
    pub cors: bool,
}

impl Default for SecurityOptions {
    /// Token authentication and CORS on, everything else off.
    fn default() -> Self {
        Self {
            tokens: true,
            referrers: false,
            jwts: false,
            ips: false,
            domain_masks: false,
            hsts: false,
            cors: true,
        }
    }
}

/// An authentication token of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecurityToken {
    /// Token identifier.
    pub id: String,
    /// Token value.
    pub token: String,
}

/// An IP address allowed to reach an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WhitelistIp {
    /// Whitelist entry identifier.
    pub id: String,
    /// The allowed IP address.
    pub ip: String,
}

/// Security configuration of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointSecurity {
    /// `None` when the API omits the options object.
    #[serde(default)]
    pub options: Option<SecurityOptions>,
    /// Authentication tokens.
    #[serde(default)]
    pub tokens: Vec<SecurityToken>,
    /// Whitelisted IP addresses.
    #[serde(default)]
    pub ips: Vec<WhitelistIp>,
}

/// Rate limits applied to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RateLimits {
    /// Whether limits apply per client IP.
    #[serde(default)]
    pub rate_limit_by_ip: bool,
    /// Account-wide limit.
    #[serde(default)]
    pub account: i64,
    /// Requests per second.
    #[serde(default)]
    pub rps: i64,
    /// Requests per day.
    #[serde(default)]
    pub rpd: i64,
    /// Requests per minute.
    #[serde(default)]
    pub rpm: i64,
}

/// A provisioned RPC/WSS access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Endpoint {
    /// Endpoint identifier.
    pub id: String,
    /// User-facing label.
    #[serde(default)]
    pub label: String,
    /// Chain slug.
    #[serde(default)]
    pub chain: String,
    /// Network slug.
    #[serde(default)]
    pub network: String,
    /// HTTP RPC URL.
    #[serde(default)]
    pub http_url: String,
    /// WebSocket URL.
    #[serde(default)]
    pub wss_url: String,
    /// Security configuration.
    #[serde(default)]
    pub security: EndpointSecurity,
    /// Provisioning status.
    #[serde(default)]
    pub status: String,
    /// Rate limits.
    #[serde(default)]
    pub rate_limits: RateLimits,
    /// Tags attached to the endpoint.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the endpoint serves several chains.
    #[serde(default)]
    pub multichain: bool,
}

// =========================================================================
// State models
// =========================================================================

/// The `security_options` block of an endpoint.
///
/// Fields are `None` when the user left them unset and no schema default has
/// been applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecurityOptionsState {
    /// Token authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<bool>,
    /// Referrer allow-listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrers: Option<bool>,
    /// JWT authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwts: Option<bool>,
    /// IP allow-listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ips: Option<bool>,
    /// Domain masking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_masks: Option<bool>,
    /// HTTP Strict Transport Security.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsts: Option<bool>,
    /// CORS headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<bool>,
}

/// State of a `quicknode_endpoint` resource or data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointState {
    /// Endpoint identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// User-facing label.
    #[serde(default)]
    pub label: Option<String>,
    /// Chain slug.
    #[serde(default)]
    pub chain: Option<String>,
    /// Network slug.
    #[serde(default)]
    pub network: Option<String>,
    /// HTTP RPC URL.
    #[serde(default)]
    pub http_url: Option<String>,
    /// WebSocket URL.
    #[serde(default)]
    pub wss_url: Option<String>,
    /// Security toggles.
    #[serde(default)]
    pub security_options: Option<SecurityOptionsState>,
    /// Provisioning status.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the endpoint serves several chains.
    #[serde(default)]
    pub multichain: Option<bool>,
    /// Tags attached to the endpoint.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Only populated by the data source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limits: Option<RateLimits>,
}

/// State of a `quicknode_endpoint_whitelist_ip` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WhitelistIpState {
    /// Whitelist entry identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Identifier of the owning endpoint.
    #[serde(default)]
    pub endpoint_id: Option<String>,
    /// The allowed IP address.
    #[serde(default)]
    pub ip: Option<String>,
}

/// One entry of the `quicknode_endpoints` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointSummary {
    /// Endpoint identifier.
    pub id: String,
    /// User-facing label.
    pub label: String,
    /// Chain slug.
    pub chain: String,
    /// Network slug.
    pub network: String,
    /// HTTP RPC URL.
    pub http_url: String,
    /// WebSocket URL.
    pub wss_url: String,
}

impl From<&Endpoint> for EndpointSummary {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            id: endpoint.id.clone(),
            label: endpoint.label.clone(),
            chain: endpoint.chain.clone(),
            network: endpoint.network.clone(),
            http_url: endpoint.http_url.clone(),
            wss_url: endpoint.wss_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_decodes_full_record() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "id": "ep-1",
            "label": "primary",
            "chain": "eth",
            "network": "mainnet",
            "http_url": "https://a.quiknode.pro/k/",
            "wss_url": "wss://a.quiknode.pro/k/",
            "status": "active",
            "multichain": true,
            "tags": ["prod"],
            "rate_limits": {"rate_limit_by_ip": true, "account": 1, "rps": 25, "rpd": 0, "rpm": 0},
            "security": {
                "options": {
                    "tokens": true, "referrers": false, "jwts": true, "ips": false,
                    "domainMasks": true, "hsts": false, "cors": true
                },
                "tokens": [{"id": "t-1", "token": "abc"}],
                "ips": [{"id": "ip-1", "ip": "10.0.0.1"}]
            }
        }))
        .unwrap();

        let options = endpoint.security.options.unwrap();
        assert!(options.jwts);
        assert!(options.domain_masks);
        assert_eq!(endpoint.security.ips[0].ip, "10.0.0.1");
        assert_eq!(endpoint.rate_limits.rps, 25);
        assert_eq!(endpoint.tags, vec!["prod".to_string()]);
    }

    #[test]
    fn test_endpoint_tolerates_missing_fields() {
        let endpoint: Endpoint = serde_json::from_value(json!({"id": "ep-1"})).unwrap();
        assert!(endpoint.security.options.is_none());
        assert!(endpoint.security.ips.is_empty());
        assert!(!endpoint.multichain);
    }

    #[test]
    fn test_security_options_default() {
        let defaults = SecurityOptions::default();
        assert!(defaults.tokens && defaults.cors);
        assert!(!(defaults.referrers || defaults.jwts || defaults.ips));
        assert!(!(defaults.domain_masks || defaults.hsts));
    }

    #[test]
    fn test_security_options_state_skips_unset_fields() {
        let state = SecurityOptionsState {
            tokens: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(state).unwrap(), json!({"tokens": false}));
    }
}
