//! HTTP client for the QuickNode REST API.
//!
//! Every call is one sequential round trip. The client carries immutable
//! configuration only (base URL, API key, user agent) and a transport with a
//! bounded timeout, so it can be shared freely. Dropping a request future
//! cancels the underlying HTTP call.

mod chains;
mod endpoints;

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;

/// Default QuickNode API base URL.
pub const DEFAULT_HOST_URL: &str = "https://api.quicknode.com/v0";

/// User agent sent with every request.
pub const USER_AGENT: &str = "terraform-provider-quicknode";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Timeout applied to every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum length of a response body written to logs.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Client for the QuickNode API.
#[derive(Clone)]
pub struct Client {
    host_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl Client {
    /// Create a client.
    ///
    /// `endpoint` defaults to [`DEFAULT_HOST_URL`]. Without an API key no
    /// `x-api-key` header is sent.
    pub fn new(endpoint: Option<&str>, api_key: Option<&str>) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            host_url: endpoint
                .unwrap_or(DEFAULT_HOST_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
            http,
        })
    }

    /// The API base URL.
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host_url, path)
    }

    /// Send a request and return the raw body of a 200 response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<String, ProviderError> {
        debug!(%method, path, "QuickNode API request");

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            debug!(
                %method,
                path,
                status = status.as_u16(),
                body = %truncate_for_log(&text),
                "QuickNode API request failed"
            );
            return Err(ProviderError::status(status.as_u16(), text));
        }

        Ok(text)
    }

    /// Send a request and decode the JSON body.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.send(method, path, query, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Send a request and unwrap the `{ "data": ..., "error": ... }` envelope.
    async fn request_data<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ProviderError>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        self.request::<Envelope<T>, B>(method, path, query, body)
            .await?
            .into_data()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("host_url", &self.host_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response envelope shared by most API calls.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T: Default> Envelope<T> {
    fn into_data(self) -> Result<T, ProviderError> {
        match self.error {
            Some(error) if !error.is_empty() => Err(ProviderError::Api(error)),
            _ => Ok(self.data.unwrap_or_default()),
        }
    }
}

/// Body-less requests still need a concrete body type.
type NoBody = serde_json::Value;

fn truncate_for_log(body: &str) -> String {
    if body.len() <= MAX_LOG_BODY_LENGTH {
        return body.to_string();
    }
    let cut = (0..=MAX_LOG_BODY_LENGTH)
        .rev()
        .find(|i| body.is_char_boundary(*i))
        .unwrap_or(0);
    format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
}
