//! Client configuration and the resource facade.
//!
//! [`OpenpayConfig`] carries credentials and transport settings. [`OpenpayApi`]
//! builds the transport once and hands out a [`ResourceOperations`] per resource
//! family, all sharing that transport.

use crate::codec::ValueCodec;
use crate::errors::Result;
use crate::operations::ResourceOperations;
use crate::requests::ChargeRequest;
use crate::transport::{HttpTransport, Transport};
use crate::types::{Card, Charge, Customer, Plan, Subscription};
use chrono::FixedOffset;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Sandbox API root.
pub const SANDBOX_ENDPOINT: &str = "https://sandbox-api.openpay.mx";

/// Production API root.
pub const PRODUCTION_ENDPOINT: &str = "https://api.openpay.mx";

/// Per-request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const CUSTOMERS: &str = "customers";
const CARDS: &str = "cards";
const CUSTOMER_CARDS: &str = "customers/{customer_id}/cards";
const CHARGES: &str = "charges";
const CUSTOMER_CHARGES: &str = "customers/{customer_id}/charges";
const PLANS: &str = "plans";
const SUBSCRIPTIONS: &str = "customers/{customer_id}/subscriptions";

/// Configuration for API access.
#[derive(Clone)]
pub struct OpenpayConfig {
    /// API root (e.g. [`SANDBOX_ENDPOINT`])
    pub endpoint: String,

    /// Private API key, sent as the basic-auth user
    pub api_key: String,

    /// Merchant identifier
    pub merchant_id: String,

    /// HTTP client to use for requests
    pub http_client: Client,

    /// Per-request timeout
    pub timeout: Duration,

    /// Zone wall-clock date-times are exchanged in
    pub zone: FixedOffset,
}

impl OpenpayConfig {
    /// Creates a configuration with the default timeout and zone.
    ///
    /// # Examples
    ///
    /// ```
    /// use openpay_rs::client::{OpenpayConfig, SANDBOX_ENDPOINT};
    /// use std::time::Duration;
    ///
    /// let config = OpenpayConfig::new(
    ///     SANDBOX_ENDPOINT,
    ///     "sk_e568c42a6c384b7ab02cd47d2e407cab",
    ///     "mzdtln0bmtms6o3kck8f",
    /// )
    /// .with_timeout(Duration::from_secs(10));
    ///
    /// assert_eq!(config.zone.local_minus_utc(), -6 * 3600);
    /// ```
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        merchant_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            merchant_id: merchant_id.into(),
            http_client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
            zone: ValueCodec::default().zone(),
        }
    }

    /// Creates a configuration against the sandbox.
    pub fn sandbox(api_key: impl Into<String>, merchant_id: impl Into<String>) -> Self {
        Self::new(SANDBOX_ENDPOINT, api_key, merchant_id)
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the zone wall-clock date-times are exchanged in.
    pub fn with_time_zone(mut self, zone: FixedOffset) -> Self {
        self.zone = zone;
        self
    }

    /// Sets a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Codec for the configured zone.
    pub fn codec(&self) -> ValueCodec {
        ValueCodec::new(self.zone)
    }
}

/// Entry point to every resource family.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Examples
///
/// ```no_run
/// use openpay_rs::client::{OpenpayApi, OpenpayConfig};
/// use openpay_rs::params::ToParams;
/// use openpay_rs::requests::CreateSubscriptionParams;
///
/// # async fn example() -> openpay_rs::errors::Result<()> {
/// let config =
///     OpenpayConfig::sandbox("sk_e568c42a6c384b7ab02cd47d2e407cab", "mzdtln0bmtms6o3kck8f");
/// let api = OpenpayApi::new(&config)?;
///
/// let request =
///     CreateSubscriptionParams::new("pqycd8nndru5jeav5lh7").card_id("kso4st1ii1wr3bdhvxbx");
/// let subscription = api
///     .subscriptions()
///     .create(&["ag4nktpdzebjiye1tlze"], &request.to_params())
///     .await?;
/// println!("{} is {}", subscription.id, subscription.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenpayApi {
    transport: Arc<dyn Transport>,
    codec: ValueCodec,
}

impl OpenpayApi {
    /// Creates a facade talking HTTP to the configured endpoint.
    pub fn new(config: &OpenpayConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config.codec()))
    }

    /// Creates a facade over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, codec: ValueCodec) -> Self {
        Self { transport, codec }
    }

    /// The codec shared by all resource families.
    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    fn operations<T: DeserializeOwned>(&self, template: &str) -> ResourceOperations<T> {
        ResourceOperations::new(Arc::clone(&self.transport), template, self.codec)
    }

    /// Customers of the merchant.
    pub fn customers(&self) -> ResourceOperations<Customer> {
        self.operations(CUSTOMERS)
    }

    /// Cards stored at merchant level.
    pub fn cards(&self) -> ResourceOperations<Card> {
        self.operations(CARDS)
    }

    /// Cards of one customer; takes the customer id as parent.
    pub fn customer_cards(&self) -> ResourceOperations<Card> {
        self.operations(CUSTOMER_CARDS)
    }

    /// Charges at merchant level.
    pub fn charges(&self) -> ResourceOperations<Charge> {
        self.operations(CHARGES)
    }

    /// Charges of one customer; takes the customer id as parent.
    pub fn customer_charges(&self) -> ResourceOperations<Charge> {
        self.operations(CUSTOMER_CHARGES)
    }

    /// Recurring-charge plans.
    pub fn plans(&self) -> ResourceOperations<Plan> {
        self.operations(PLANS)
    }

    /// Subscriptions of one customer; takes the customer id as parent.
    pub fn subscriptions(&self) -> ResourceOperations<Subscription> {
        self.operations(SUBSCRIPTIONS)
    }

    /// Creates a charge under its customer, or at merchant level when it has none.
    pub async fn create_charge<R: ChargeRequest + ?Sized>(&self, request: &R) -> Result<Charge> {
        let params = request.to_params();
        tracing::debug!(
            method = %request.method(),
            customer = ?request.customer_id(),
            "creating charge"
        );
        match request.customer_id() {
            Some(customer_id) => self.customer_charges().create(&[customer_id], &params).await,
            None => self.charges().create(&[], &params).await,
        }
    }
}
