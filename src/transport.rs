//! HTTP transport.
//!
//! The [`Transport`] trait is the seam between the operation layer and the
//! network: it sends one request and hands back the raw status and body without
//! interpreting either. [`HttpTransport`] is the reqwest-backed implementation.

use crate::client::OpenpayConfig;
use crate::errors::{OpenpayError, Result};
use crate::types::API_VERSION;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// A request ready to be sent: verb, merchant-relative path, query and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the merchant root (e.g. `customers/c1/subscriptions`)
    pub path: String,

    /// Query parameters, in order
    pub query: Vec<(String, String)>,

    /// JSON body, if the verb carries one
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Creates a request without query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Sets the query parameters.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Status and body exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body text (may be empty)
    pub body: String,
}

impl RawResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the service.
///
/// Implementations pass status codes through untouched; a failure to obtain any
/// response at all (connection refused, timeout) is an [`OpenpayError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request/response cycle.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// reqwest-backed [`Transport`] authenticating with the merchant's private key.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport rooted at `{endpoint}/v1/{merchant_id}/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use openpay_rs::client::OpenpayConfig;
    /// use openpay_rs::transport::HttpTransport;
    ///
    /// let config = OpenpayConfig::new(
    ///     "https://sandbox-api.openpay.mx",
    ///     "sk_e568c42a6c384b7ab02cd47d2e407cab",
    ///     "mzdtln0bmtms6o3kck8f",
    /// );
    /// let transport = HttpTransport::new(&config).unwrap();
    /// assert_eq!(
    ///     transport.url_for("customers").unwrap().as_str(),
    ///     "https://sandbox-api.openpay.mx/v1/mzdtln0bmtms6o3kck8f/customers"
    /// );
    /// ```
    pub fn new(config: &OpenpayConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(OpenpayError::Config("API key must not be empty".to_string()));
        }
        if config.merchant_id.trim().is_empty() {
            return Err(OpenpayError::Config("merchant id must not be empty".to_string()));
        }

        let mut endpoint = config.endpoint.trim().to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base_url = Url::parse(&endpoint)?.join(&format!(
            "{}/{}/",
            API_VERSION,
            config.merchant_id.trim()
        ))?;

        Ok(Self {
            client: config.http_client.clone(),
            base_url,
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    /// The merchant root every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a merchant-relative path to a full URL.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.url_for(&request.path)?;
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self
            .client
            .request(request.method, url)
            .basic_auth(&self.api_key, Some(""))
            .header(ACCEPT, "application/json")
            .timeout(self.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status, bytes = body.len(), "received response");
        Ok(RawResponse { status, body })
    }
}
