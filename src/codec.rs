//! Wire representation of domain values.
//!
//! [`ValueCodec`] turns a [`ParamSet`] into a JSON request body and decodes
//! response bodies. The `amount`, `datetime` and `option_*` submodules are
//! `serde(with = ...)` helpers applying the same rules to DTO fields, so that
//! outbound and inbound conversions never diverge.

use crate::errors::{OpenpayError, Result, TransportErrorKind};
use crate::params::{ParamSet, ParamValue};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::cell::Cell;
use std::str::FromStr;

/// Format used for date-times on the wire.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for dates on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Truncated timestamp forms the service may send back.
const TRUNCATED_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Default zone of the service: Mexico City standard time.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = -6 * 3600;

thread_local! {
    /// Zone of the codec currently decoding on this thread.
    static DECODE_ZONE: Cell<Option<FixedOffset>> = const { Cell::new(None) };
}

/// Encodes request values and decodes responses in a fixed time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCodec {
    zone: FixedOffset,
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self {
            zone: service_zone(),
        }
    }
}

fn service_zone() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

impl ValueCodec {
    /// Creates a codec that renders and localizes date-times in `zone`.
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    /// The configured zone.
    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Encodes a parameter set as a JSON object, preserving binding order.
    ///
    /// # Examples
    ///
    /// ```
    /// use openpay_rs::codec::ValueCodec;
    /// use openpay_rs::params::ParamBuilder;
    /// use rust_decimal::Decimal;
    ///
    /// let params = ParamBuilder::new()
    ///     .set("amount", Decimal::new(10000, 2))
    ///     .set("description", "Pago de boleto")
    ///     .build();
    ///
    /// let body = ValueCodec::default().encode_params(&params).unwrap();
    /// assert_eq!(body.to_string(), r#"{"amount":100.00,"description":"Pago de boleto"}"#);
    /// ```
    pub fn encode_params(&self, params: &ParamSet) -> Result<Value> {
        let mut object = Map::new();
        for (name, value) in params.iter() {
            object.insert(name.to_string(), self.encode_value(value)?);
        }
        Ok(Value::Object(object))
    }

    /// Encodes a single parameter value.
    pub fn encode_value(&self, value: &ParamValue) -> Result<Value> {
        Ok(match value {
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Decimal(d) => decimal_to_json(d)?,
            ParamValue::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
            ParamValue::Zoned(dt) => Value::String(self.format_zoned(dt)),
            ParamValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            ParamValue::Enum(name) => Value::String(name.to_lowercase()),
            ParamValue::Nested(set) => self.encode_params(set)?,
            ParamValue::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.encode_value(item))
                    .collect::<Result<Vec<_>>>()?,
            ),
            ParamValue::Json(v) => v.clone(),
            ParamValue::Clear => Value::Null,
        })
    }

    /// Renders an instant as wall-clock time in the configured zone.
    pub fn format_zoned<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> String {
        instant
            .with_timezone(&self.zone)
            .format(DATETIME_FORMAT)
            .to_string()
    }

    /// Attaches the configured zone to a decoded wall-clock value.
    pub fn localize(&self, local: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        self.zone
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| OpenpayError::Codec(format!("ambiguous local time: {}", local)))
    }

    /// Parses a wire date-time, converting offset-bearing input into the configured zone.
    pub fn parse_datetime(&self, text: &str) -> Result<NaiveDateTime> {
        parse_datetime_in(text, self.zone)
    }

    /// Decodes a response body into `T`.
    ///
    /// Date-time fields carrying an offset are converted into the configured zone.
    /// A body that is not valid JSON for `T` is a transport-level failure: the
    /// service answered, but with something this client cannot use.
    pub fn decode<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let previous = DECODE_ZONE.with(|zone| zone.replace(Some(self.zone)));
        let decoded = serde_json::from_str(body);
        DECODE_ZONE.with(|zone| zone.set(previous));

        decoded.map_err(|e| {
            OpenpayError::transport(
                TransportErrorKind::Body,
                format!("malformed response body: {}", e),
            )
        })
    }
}

/// Converts a decimal into a JSON number carrying its exact text.
pub fn decimal_to_json(amount: &Decimal) -> Result<Value> {
    let text = amount.to_string();
    match serde_json::from_str::<Value>(&text) {
        Ok(number @ Value::Number(_)) => Ok(number),
        _ => Err(OpenpayError::Codec(format!("cannot encode amount {}", text))),
    }
}

/// Parses decimal wire text (plain or scientific notation) without going through floats.
pub fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| OpenpayError::Codec(format!("invalid decimal amount: '{}'", text)))
}

/// Parses a wire date-time.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, RFC 3339, truncated timestamps and plain dates.
/// Missing time components read as zero. RFC 3339 input is converted into the zone
/// of the [`ValueCodec`] decoding on this thread, or into the default service zone
/// (UTC-06:00) outside of one.
///
/// # Examples
///
/// ```
/// use openpay_rs::codec::parse_datetime;
///
/// let full = parse_datetime("2015-03-16 01:12:55").unwrap();
/// assert_eq!(full.to_string(), "2015-03-16 01:12:55");
///
/// let day = parse_datetime("2015-03-16").unwrap();
/// assert_eq!(day.to_string(), "2015-03-16 00:00:00");
///
/// let offset = parse_datetime("2014-05-22T11:53:42-05:00").unwrap();
/// assert_eq!(offset.to_string(), "2014-05-22 10:53:42");
/// ```
pub fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    let zone = DECODE_ZONE.with(Cell::get).unwrap_or_else(service_zone);
    parse_datetime_in(text, zone)
}

fn parse_datetime_in(text: &str, zone: FixedOffset) -> Result<NaiveDateTime> {
    let trimmed = text.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&zone).naive_local());
    }
    for format in TRUNCATED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }
    if let Some((day, hour)) = trimmed.split_once([' ', 'T']) {
        if let (Ok(date), Ok(hour)) = (parse_date(day), hour.parse::<u32>()) {
            if let Some(dt) = date.and_hms_opt(hour, 0, 0) {
                return Ok(dt);
            }
        }
    }
    parse_date(trimmed)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| OpenpayError::Codec(format!("invalid date-time: '{}'", text)))
}

/// Parses a wire date (`YYYY-MM-DD`).
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| OpenpayError::Codec(format!("invalid date: '{}'", text)))
}

fn json_decimal_text<E: serde::de::Error>(value: Value) -> std::result::Result<String, E> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s),
        other => Err(E::custom(format!("expected a decimal amount, got {}", other))),
    }
}

/// `serde(with)` helper for [`Decimal`] money amounts.
pub mod amount {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes as an exact JSON number.
    pub fn serialize<S: Serializer>(
        amount: &Decimal,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        decimal_to_json(amount)
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }

    /// Deserializes from a JSON number or numeric string.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Decimal, D::Error> {
        let text = json_decimal_text::<D::Error>(Value::deserialize(deserializer)?)?;
        parse_decimal(&text).map_err(serde::de::Error::custom)
    }
}

/// `serde(with)` helper for optional [`Decimal`] amounts; pair with `default`.
pub mod option_amount {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `Some` as an exact JSON number and `None` as null.
    pub fn serialize<S: Serializer>(
        amount: &Option<Decimal>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match amount {
            Some(amount) => super::amount::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes null as `None`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<Decimal>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => {
                let text = json_decimal_text::<D::Error>(value)?;
                parse_decimal(&text).map(Some).map_err(serde::de::Error::custom)
            }
        }
    }
}

/// `serde(with)` helper for wall-clock date-times.
pub mod datetime {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as `YYYY-MM-DD HH:MM:SS`.
    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    /// Deserializes any form accepted by [`parse_datetime`].
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_datetime(&text).map_err(serde::de::Error::custom)
    }
}

/// `serde(with)` helper for optional date-times; pair with `default`.
pub mod option_datetime {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `Some` as `YYYY-MM-DD HH:MM:SS` and `None` as null.
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::datetime::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes null or an empty string as `None`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if !text.trim().is_empty() => {
                parse_datetime(&text).map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

/// Declares a lower-cased wire enumeration.
///
/// The generated type serializes as its canonical lower-case name, parses
/// case-insensitively and converts into a [`ParamValue`].
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Canonical wire name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::OpenpayError;

            fn from_str(s: &str) -> $crate::errors::Result<Self> {
                $(
                    if s.trim().eq_ignore_ascii_case($wire) {
                        return Ok($name::$variant);
                    }
                )+
                Err($crate::errors::OpenpayError::Codec(format!(
                    "unknown {} '{}'",
                    stringify!($name),
                    s
                )))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl From<$name> for $crate::params::ParamValue {
            fn from(value: $name) -> Self {
                $crate::params::ParamValue::Enum(value.as_str().to_string())
            }
        }
    };
}

pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamBuilder;
    use chrono::NaiveTime;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug)]
    struct Priced {
        #[serde(with = "amount")]
        amount: Decimal,
        #[serde(with = "option_amount", default)]
        fee: Option<Decimal>,
        #[serde(with = "option_datetime", default)]
        due: Option<NaiveDateTime>,
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        )
    }

    #[test]
    fn test_amount_keeps_exact_text() {
        let encoded = decimal_to_json(&Decimal::new(10000, 2)).unwrap();
        assert_eq!(encoded.to_string(), "100.00");

        let decoded: Priced = serde_json::from_str(r#"{"amount": 100.00}"#).unwrap();
        assert_eq!(decoded.amount, Decimal::new(10000, 2));
        assert_eq!(decoded.amount.to_string(), "100.00");
        assert_eq!(decoded.fee, None);
    }

    #[test]
    fn test_amount_two_fraction_digits_survive() {
        for text in ["0.01", "0.10", "19.99", "1234567.89", "-5.50", "100"] {
            let value = parse_decimal(text).unwrap();
            let wire = decimal_to_json(&value).unwrap().to_string();
            assert_eq!(parse_decimal(&wire).unwrap(), value, "amount {}", text);
        }
    }

    #[test]
    fn test_amount_accepts_strings_and_value_equality() {
        let decoded: Priced = serde_json::from_str(r#"{"amount": "100.00", "fee": 2.9}"#).unwrap();
        assert_eq!(decoded.amount, Decimal::new(100, 0));
        assert_eq!(decoded.fee, Some(Decimal::new(290, 2)));
    }

    #[test]
    fn test_amount_rejects_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"amount": "ten"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"amount": true}"#).is_err());
        assert!(matches!(parse_decimal("1,00"), Err(OpenpayError::Codec(_))));
    }

    #[test]
    fn test_parse_datetime_forms() {
        assert_eq!(parse_datetime("2013-12-26 10:53:04").unwrap(), at("2013-12-26", "10:53:04"));
        assert_eq!(parse_datetime("2015-03-16").unwrap(), at("2015-03-16", "00:00:00"));
        assert_eq!(parse_datetime("2015-03-16 01:12").unwrap(), at("2015-03-16", "01:12:00"));
        assert_eq!(parse_datetime("2015-03-16 07").unwrap(), at("2015-03-16", "07:00:00"));
        assert_eq!(
            parse_datetime("2014-05-22T11:53:42-05:00").unwrap(),
            at("2014-05-22", "10:53:42")
        );
        assert_eq!(parse_datetime("2014-05-22T11:53:42").unwrap(), at("2014-05-22", "11:53:42"));
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(matches!(parse_datetime("16/03/2015"), Err(OpenpayError::Codec(_))));
        assert!(matches!(parse_datetime(""), Err(OpenpayError::Codec(_))));
        assert!(parse_date("2015-02-30").is_err());
    }

    #[test]
    fn test_option_datetime_empty_is_none() {
        let decoded: Priced = serde_json::from_str(r#"{"amount": 1, "due": ""}"#).unwrap();
        assert_eq!(decoded.due, None);
        let decoded: Priced =
            serde_json::from_str(r#"{"amount": 1, "due": "2014-08-25"}"#).unwrap();
        assert_eq!(decoded.due, Some(at("2014-08-25", "00:00:00")));
        assert!(serde_json::from_str::<Priced>(r#"{"amount": 1, "due": "soon"}"#).is_err());
    }

    #[test]
    fn test_zone_applied_both_ways() {
        let codec = ValueCodec::new(FixedOffset::west_opt(6 * 3600).unwrap());
        let instant = Utc.with_ymd_and_hms(2015, 3, 16, 7, 12, 55).unwrap();
        assert_eq!(codec.format_zoned(&instant), "2015-03-16 01:12:55");

        let local = codec.localize(at("2015-03-16", "01:12:55")).unwrap();
        assert_eq!(local.with_timezone(&Utc), instant);
    }

    #[test]
    fn test_offset_timestamps_decode_into_codec_zone() {
        let wire = "2014-05-22T11:53:42-05:00";
        let instant = DateTime::parse_from_rfc3339(wire).unwrap();
        let body = format!(r#"{{"amount": 1, "due": "{}"}}"#, wire);

        let mexico = ValueCodec::default();
        let decoded: Priced = mexico.decode(&body).unwrap();
        let due = decoded.due.unwrap();
        assert_eq!(due, at("2014-05-22", "10:53:42"));
        assert_eq!(mexico.localize(due).unwrap(), instant);

        let utc = ValueCodec::new(FixedOffset::east_opt(0).unwrap());
        let decoded: Priced = utc.decode(&body).unwrap();
        let due = decoded.due.unwrap();
        assert_eq!(due, at("2014-05-22", "16:53:42"));
        assert_eq!(utc.localize(due).unwrap(), instant);
        assert_eq!(utc.parse_datetime(wire).unwrap(), due);

        // Wall-clock values are never shifted.
        assert_eq!(
            utc.parse_datetime("2014-05-22 11:53:42").unwrap(),
            at("2014-05-22", "11:53:42")
        );

        // The zone only applies while the codec decodes.
        assert_eq!(parse_datetime(wire).unwrap(), at("2014-05-22", "10:53:42"));
    }

    #[test]
    fn test_encode_params_nested_and_clear() {
        let address = ParamBuilder::new()
            .set("city", "Querétaro")
            .set("postal_code", "76090")
            .build();
        let params = ParamBuilder::new()
            .set("trial_end_date", at("2015-03-16", "01:12:55"))
            .set("cancel_at_period_end", true)
            .set("address", address)
            .clear("card")
            .build();

        let body = ValueCodec::default().encode_params(&params).unwrap();
        assert_eq!(
            body,
            json!({
                "trial_end_date": "2015-03-16 01:12:55",
                "cancel_at_period_end": true,
                "address": {"city": "Querétaro", "postal_code": "76090"},
                "card": null
            })
        );
    }

    #[test]
    fn test_decode_malformed_body_is_transport_error() {
        let err = ValueCodec::default().decode::<Priced>("<html>").unwrap_err();
        assert!(matches!(
            err,
            OpenpayError::Transport {
                kind: TransportErrorKind::Body,
                ..
            }
        ));
    }
}
