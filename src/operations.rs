//! Generic create/get/update/delete/list over any resource path.
//!
//! A [`ResourceOperations<T>`] binds a [`PathTemplate`] to a DTO type `T`. All five
//! operations run through one algorithm: compose the path, encode the body,
//! send, classify the response, decode. They differ only in verb, whether the
//! path names an item, and whether a body goes out or comes back.

use crate::codec::ValueCodec;
use crate::errors::{OpenpayError, Result};
use crate::mapper;
use crate::params::{ParamBuilder, ParamSet, ParamValue};
use crate::path::PathTemplate;
use crate::transport::{ApiRequest, RawResponse, Transport};
use chrono::NaiveDate;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// What one call does; selects verb, path shape and payload handling.
enum Action<'a> {
    Create(&'a ParamSet),
    Get(&'a str),
    Update(&'a str, &'a ParamSet),
    Delete(&'a str),
    List(Option<&'a SearchParams>),
}

impl Action<'_> {
    fn method(&self) -> Method {
        match self {
            Action::Create(_) => Method::POST,
            Action::Get(_) | Action::List(_) => Method::GET,
            Action::Update(..) => Method::PUT,
            Action::Delete(_) => Method::DELETE,
        }
    }

    fn item_id(&self) -> Option<&str> {
        match self {
            Action::Get(id) | Action::Update(id, _) | Action::Delete(id) => Some(*id),
            Action::Create(_) | Action::List(_) => None,
        }
    }

    fn body(&self) -> Option<&ParamSet> {
        match self {
            Action::Create(body) | Action::Update(_, body) => Some(*body),
            _ => None,
        }
    }
}

/// CRUD operations for one resource family.
///
/// Holds no per-call state; clones share the transport and can be used from
/// many tasks at once. Instances are handed out by [`crate::client::OpenpayApi`].
pub struct ResourceOperations<T> {
    transport: Arc<dyn Transport>,
    template: PathTemplate,
    codec: ValueCodec,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceOperations<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            template: self.template.clone(),
            codec: self.codec,
            _resource: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceOperations<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceOperations")
            .field("template", &self.template.to_string())
            .field("codec", &self.codec)
            .finish()
    }
}

impl<T: DeserializeOwned> ResourceOperations<T> {
    pub(crate) fn new(transport: Arc<dyn Transport>, template: &str, codec: ValueCodec) -> Self {
        Self {
            transport,
            template: PathTemplate::parse(template),
            codec,
            _resource: PhantomData,
        }
    }

    /// Path template of the collection.
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Creates a resource and returns it with server-assigned fields.
    pub async fn create(&self, parent_ids: &[&str], params: &ParamSet) -> Result<T> {
        let response = self.execute(parent_ids, Action::Create(params)).await?;
        self.codec.decode(&response.body)
    }

    /// Fetches one resource.
    pub async fn get(&self, parent_ids: &[&str], id: &str) -> Result<T> {
        let response = self.execute(parent_ids, Action::Get(id)).await?;
        self.codec.decode(&response.body)
    }

    /// Updates the fields bound in `params`; unbound fields stay as they are.
    pub async fn update(&self, parent_ids: &[&str], id: &str, params: &ParamSet) -> Result<T> {
        let response = self.execute(parent_ids, Action::Update(id, params)).await?;
        self.codec.decode(&response.body)
    }

    /// Deletes one resource.
    pub async fn delete(&self, parent_ids: &[&str], id: &str) -> Result<()> {
        self.execute(parent_ids, Action::Delete(id)).await?;
        Ok(())
    }

    /// Lists resources in the order the service returns them.
    pub async fn list(
        &self,
        parent_ids: &[&str],
        filters: Option<&SearchParams>,
    ) -> Result<Vec<T>> {
        let response = self.execute(parent_ids, Action::List(filters)).await?;
        if response.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.codec.decode(&response.body)
    }

    async fn execute(&self, parent_ids: &[&str], action: Action<'_>) -> Result<RawResponse> {
        let path = match action.item_id() {
            Some(id) => self.template.item(parent_ids, id)?,
            None => self.template.collection(parent_ids)?,
        };

        let mut request = ApiRequest::new(action.method(), path);
        if let Some(body) = action.body() {
            request = request.with_body(self.codec.encode_params(body)?);
        }
        if let Action::List(Some(filters)) = &action {
            request = request.with_query(filters.to_query(&self.codec)?);
        }

        tracing::debug!(method = %request.method, path = %request.path, "resource operation");
        mapper::check(self.transport.send(request).await?)
    }
}

/// Filters and paging for `list`.
///
/// # Examples
///
/// ```
/// use openpay_rs::codec::ValueCodec;
/// use openpay_rs::operations::SearchParams;
/// use chrono::NaiveDate;
///
/// let filters = SearchParams::new()
///     .creation_gte(NaiveDate::from_ymd_opt(2014, 8, 1).unwrap())
///     .offset(0)
///     .limit(25);
///
/// let query = filters.to_query(&ValueCodec::default()).unwrap();
/// assert_eq!(query[0], ("creation[gte]".to_string(), "2014-08-01".to_string()));
/// assert_eq!(query[2], ("limit".to_string(), "25".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    params: ParamBuilder,
}

impl SearchParams {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Created on this exact day.
    pub fn creation(self, date: NaiveDate) -> Self {
        self.with("creation", date)
    }

    /// Created on or after this day.
    pub fn creation_gte(self, date: NaiveDate) -> Self {
        self.with("creation[gte]", date)
    }

    /// Created on or before this day.
    pub fn creation_lte(self, date: NaiveDate) -> Self {
        self.with("creation[lte]", date)
    }

    /// Number of records to skip.
    pub fn offset(self, offset: u32) -> Self {
        self.with("offset", offset)
    }

    /// Maximum number of records to return.
    pub fn limit(self, limit: u32) -> Self {
        self.with("limit", limit)
    }

    /// Exact amount.
    pub fn amount(self, amount: Decimal) -> Self {
        self.with("amount", amount)
    }

    /// Amount at least this.
    pub fn amount_gte(self, amount: Decimal) -> Self {
        self.with("amount[gte]", amount)
    }

    /// Amount at most this.
    pub fn amount_lte(self, amount: Decimal) -> Self {
        self.with("amount[lte]", amount)
    }

    /// Status filter (e.g. `completed`).
    pub fn status(self, status: impl Into<String>) -> Self {
        self.with("status", status.into())
    }

    /// Merchant order identifier.
    pub fn order_id(self, order_id: impl Into<String>) -> Self {
        self.with("order_id", order_id.into())
    }

    /// Adds any other filter the service understands.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params = self.params.set(name, value);
        self
    }

    /// Renders the filters as query parameters using the codec's formats.
    pub fn to_query(&self, codec: &ValueCodec) -> Result<Vec<(String, String)>> {
        self.params
            .params()
            .iter()
            .map(|(name, value)| {
                let text = match codec.encode_value(value)? {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(OpenpayError::Codec(format!(
                            "filter '{}' cannot be sent as a query parameter: {}",
                            name, other
                        )))
                    }
                };
                Ok((name.to_string(), text))
            })
            .collect()
    }
}
