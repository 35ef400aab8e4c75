//! Translation between endpoint state and the API's wire shapes.
//!
//! Outbound, security options become a complete map of seven
//! `"enabled"`/`"disabled"` strings. Inbound, booleans are copied 1:1.
//!
//! Defaults are applied in two layers. The schema fills each unset field of
//! a present `security_options` block first (see
//! [`crate::schema::Block::apply_defaults`]); [`security_options_payload`]
//! only substitutes [`SecurityOptions::default`] when the block is absent as a
//! whole. A field still unset when it reaches the payload maps to
//! `"disabled"`.

use std::collections::BTreeMap;

use crate::models::{Endpoint, EndpointState, SecurityOptions, SecurityOptionsState};

/// Wire keys of the security options, in API spelling.
pub const SECURITY_OPTION_KEYS: [&str; 7] = [
    "tokens",
    "referrers",
    "jwts",
    "ips",
    "domainMasks",
    "hsts",
    "cors",
];

/// Encode a toggle the way the security options endpoint expects it.
pub fn security_string(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

/// Build the `options` payload of a security options patch.
pub fn security_options_payload(
    options: Option<&SecurityOptionsState>,
) -> BTreeMap<&'static str, &'static str> {
    let resolved = match options {
        None => SecurityOptions::default(),
        Some(state) => SecurityOptions {
            tokens: state.tokens.unwrap_or(false),
            referrers: state.referrers.unwrap_or(false),
            jwts: state.jwts.unwrap_or(false),
            ips: state.ips.unwrap_or(false),
            domain_masks: state.domain_masks.unwrap_or(false),
            hsts: state.hsts.unwrap_or(false),
            cors: state.cors.unwrap_or(false),
        },
    };

    let values = [
        resolved.tokens,
        resolved.referrers,
        resolved.jwts,
        resolved.ips,
        resolved.domain_masks,
        resolved.hsts,
        resolved.cors,
    ];
    SECURITY_OPTION_KEYS
        .into_iter()
        .zip(values)
        .map(|(key, enabled)| (key, security_string(enabled)))
        .collect()
}

impl From<&SecurityOptions> for SecurityOptionsState {
    fn from(options: &SecurityOptions) -> Self {
        Self {
            tokens: Some(options.tokens),
            referrers: Some(options.referrers),
            jwts: Some(options.jwts),
            ips: Some(options.ips),
            domain_masks: Some(options.domain_masks),
            hsts: Some(options.hsts),
            cors: Some(options.cors),
        }
    }
}

/// Security options as reported by the API, defaulted when it omits them.
pub fn security_options_state(endpoint: &Endpoint) -> SecurityOptionsState {
    let options = endpoint.security.options.unwrap_or_default();
    SecurityOptionsState::from(&options)
}

impl EndpointState {
    /// Overwrite every attribute with the API's view of the endpoint.
    pub fn refresh_from(&mut self, endpoint: &Endpoint) {
        self.id = Some(endpoint.id.clone());
        self.label = Some(endpoint.label.clone());
        self.chain = Some(endpoint.chain.clone());
        self.network = Some(endpoint.network.clone());
        self.http_url = Some(endpoint.http_url.clone());
        self.wss_url = Some(endpoint.wss_url.clone());
        self.security_options = Some(security_options_state(endpoint));
        self.status = Some(endpoint.status.clone());
        self.multichain = Some(endpoint.multichain);
        self.tags = Some(endpoint.tags.clone());
    }

    /// Copy the attributes known right after creation.
    ///
    /// Label and security options are settled by later calls and are left
    /// untouched here.
    pub fn absorb_created(&mut self, endpoint: &Endpoint) {
        self.id = Some(endpoint.id.clone());
        self.chain = Some(endpoint.chain.clone());
        self.network = Some(endpoint.network.clone());
        self.http_url = Some(endpoint.http_url.clone());
        self.wss_url = Some(endpoint.wss_url.clone());
        self.status = Some(endpoint.status.clone());
        self.multichain = Some(endpoint.multichain);
    }
}

impl From<&Endpoint> for EndpointState {
    fn from(endpoint: &Endpoint) -> Self {
        let mut state = Self::default();
        state.refresh_from(endpoint);
        state
    }
}
