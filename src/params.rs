//! Fluent, type-erased request parameters.
//!
//! A [`ParamBuilder`] accumulates named [`ParamValue`]s and produces an immutable
//! [`ParamSet`], which the codec turns into the JSON request body. A name that was
//! never bound is absent from the body; [`ParamBuilder::clear`] binds an explicit
//! null to unset a field on the service side.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};
use rust_decimal::Decimal;
use serde_json::Value;

/// A single bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Plain string
    Str(String),
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Money amount, sent as an exact JSON number
    Decimal(Decimal),
    /// Wall-clock date-time, sent as `YYYY-MM-DD HH:MM:SS`
    DateTime(NaiveDateTime),
    /// Instant, converted into the codec's zone before formatting
    Zoned(DateTime<FixedOffset>),
    /// Calendar date, sent as `YYYY-MM-DD`
    Date(NaiveDate),
    /// Enumeration, sent lower-cased
    Enum(String),
    /// Nested object
    Nested(ParamSet),
    /// JSON array
    List(Vec<ParamValue>),
    /// Pre-built JSON, passed through untouched
    Json(Value),
    /// Explicit null, unsetting a previously stored value
    Clear,
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        ParamValue::Decimal(value)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ParamValue {
    fn from(value: DateTime<Tz>) -> Self {
        let offset = value.offset().fix();
        ParamValue::Zoned(value.with_timezone(&offset))
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        ParamValue::Date(value)
    }
}

impl From<ParamSet> for ParamValue {
    fn from(value: ParamSet) -> Self {
        ParamValue::Nested(value)
    }
}

impl From<ParamBuilder> for ParamValue {
    fn from(value: ParamBuilder) -> Self {
        ParamValue::Nested(value.params)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Json(value)
    }
}

/// Ordered, name-unique collection of bound parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParamSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, replacing an earlier binding in place.
    fn insert(&mut self, name: String, value: ParamValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes a binding.
    fn remove(&mut self, name: &str) {
        self.entries.retain(|(existing, _)| existing != name);
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Whether `name` is bound (a cleared name counts as bound).
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates bindings in the order they were first made.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tri-state field for partial updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Leave the stored value untouched
    Unset,
    /// Replace the stored value
    Set(T),
    /// Remove the stored value
    Clear,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> Field<T> {
    /// Whether this field leaves the stored value untouched.
    pub fn is_unset(&self) -> bool {
        matches!(self, Field::Unset)
    }

    /// The value to set, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Field::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Converts the value to set, keeping the state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Unset => Field::Unset,
            Field::Set(value) => Field::Set(f(value)),
            Field::Clear => Field::Clear,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Set(value),
            None => Field::Unset,
        }
    }
}

/// Types that serialize as a nested object of their own bindings.
pub trait ToParams {
    /// Field bindings of this object.
    fn to_params(&self) -> ParamSet;
}

/// Fluent builder for a [`ParamSet`].
///
/// # Examples
///
/// ```
/// use openpay_rs::params::ParamBuilder;
/// use rust_decimal::Decimal;
///
/// let description: Option<&str> = None;
/// let params = ParamBuilder::new()
///     .set("method", "bitcoin")
///     .set("amount", Decimal::new(10000, 2))
///     .set_if_present("description", description)
///     .build();
///
/// assert!(params.contains("amount"));
/// assert!(!params.contains("description"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamBuilder {
    params: ParamSet,
}

impl ParamBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Binds `name` only when `value` is present.
    pub fn set_if_present<V: Into<ParamValue>>(
        self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.set(name, value),
            None => self,
        }
    }

    /// Binds `name` to an explicit null.
    pub fn clear(mut self, name: impl Into<String>) -> Self {
        self.params.insert(name.into(), ParamValue::Clear);
        self
    }

    /// Applies a tri-state field; [`Field::Unset`] drops any earlier binding.
    pub fn apply<V: Into<ParamValue>>(mut self, name: impl Into<String>, field: Field<V>) -> Self {
        let name = name.into();
        match field {
            Field::Unset => {
                self.params.remove(&name);
                self
            }
            Field::Set(value) => self.set(name, value),
            Field::Clear => self.clear(name),
        }
    }

    /// Binds a nested object built from its own field bindings.
    pub fn nested(self, name: impl Into<String>, object: &impl ToParams) -> Self {
        self.set(name, object.to_params())
    }

    /// Read access to what has been bound so far.
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Snapshot of the current bindings.
    pub fn build(&self) -> ParamSet {
        self.params.clone()
    }
}

impl From<ParamBuilder> for ParamSet {
    fn from(builder: ParamBuilder) -> Self {
        builder.params
    }
}
