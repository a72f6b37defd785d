//! Resource representations exchanged with the service.
//!
//! Field names follow the wire's snake_case. Money amounts and dates go through
//! the [`codec`](crate::codec) helpers so they decode exactly and tolerate the
//! truncated timestamps the service sometimes returns.

use crate::codec::{self, wire_enum};
use crate::params::{ParamBuilder, ParamSet, ToParams};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// API version segment used in every request path.
pub const API_VERSION: &str = "v1";

wire_enum! {
    /// How a charge is paid.
    pub enum ChargeMethod {
        /// Credit or debit card
        Card => "card",
        /// Cash payment at a convenience store
        Store => "store",
        /// Bank transfer (SPEI)
        BankAccount => "bank_account",
        /// Bitcoin payment
        Bitcoin => "bitcoin",
    }
}

wire_enum! {
    /// Currency of an amount.
    pub enum Currency {
        /// Mexican peso
        Mxn => "mxn",
        /// US dollar
        Usd => "usd",
    }
}

/// Postal address.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Address {
    /// First address line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,

    /// Second address line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    /// Third address line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,

    /// Postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// State
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// City
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// ISO 3166 country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl Address {
    /// Creates an empty address.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first line.
    pub fn with_line1(mut self, line1: impl Into<String>) -> Self {
        self.line1 = Some(line1.into());
        self
    }

    /// Sets the second line.
    pub fn with_line2(mut self, line2: impl Into<String>) -> Self {
        self.line2 = Some(line2.into());
        self
    }

    /// Sets the postal code.
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Sets the state.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Sets the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the country code.
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }
}

impl ToParams for Address {
    fn to_params(&self) -> ParamSet {
        ParamBuilder::new()
            .set_if_present("line1", self.line1.as_ref())
            .set_if_present("line2", self.line2.as_ref())
            .set_if_present("line3", self.line3.as_ref())
            .set_if_present("postal_code", self.postal_code.as_ref())
            .set_if_present("state", self.state.as_ref())
            .set_if_present("city", self.city.as_ref())
            .set_if_present("country_code", self.country_code.as_ref())
            .build()
    }
}

/// Credit or debit card, stored or supplied inline.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Card {
    /// Identifier; absent for inline cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Card number (masked in responses, e.g. `524338XXXXXX2033`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,

    /// Name as printed on the card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,

    /// Two-digit expiration year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<String>,

    /// Two-digit expiration month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<String>,

    /// Security code; never returned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvv2: Option<String>,

    /// Billing address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// Brand (visa, mastercard, american_express)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Issuing bank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,

    /// Whether the card can be charged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_charges: Option<bool>,

    /// Owning customer, for stored cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// When the card was stored
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDateTime>,
}

impl Card {
    /// Creates an empty card.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the card number.
    pub fn with_card_number(mut self, card_number: impl Into<String>) -> Self {
        self.card_number = Some(card_number.into());
        self
    }

    /// Sets the holder name.
    pub fn with_holder_name(mut self, holder_name: impl Into<String>) -> Self {
        self.holder_name = Some(holder_name.into());
        self
    }

    /// Sets the expiration month and two-digit year.
    pub fn with_expiration(mut self, month: u32, year: u32) -> Self {
        self.expiration_month = Some(format!("{:02}", month));
        self.expiration_year = Some(format!("{:02}", year % 100));
        self
    }

    /// Sets the security code.
    pub fn with_cvv2(mut self, cvv2: impl Into<String>) -> Self {
        self.cvv2 = Some(cvv2.into());
        self
    }

    /// Sets the billing address.
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Last four digits of the card number.
    pub fn last_four(&self) -> Option<&str> {
        let number = self.card_number.as_deref()?;
        number.get(number.len().saturating_sub(4)..)
    }
}

impl ToParams for Card {
    fn to_params(&self) -> ParamSet {
        let mut params = ParamBuilder::new()
            .set_if_present("card_number", self.card_number.as_ref())
            .set_if_present("holder_name", self.holder_name.as_ref())
            .set_if_present("expiration_year", self.expiration_year.as_ref())
            .set_if_present("expiration_month", self.expiration_month.as_ref())
            .set_if_present("cvv2", self.cvv2.as_ref());
        if let Some(address) = &self.address {
            params = params.nested("address", address);
        }
        params.build()
    }
}

/// A customer of the merchant.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Customer {
    /// Identifier
    #[serde(default)]
    pub id: String,

    /// First name
    #[serde(default)]
    pub name: String,

    /// Last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    /// Account status (active, deleted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Account balance
    #[serde(
        default,
        with = "codec::option_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<Decimal>,

    /// When the customer was created
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDateTime>,
}

/// Commission charged by the service on a transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Fee {
    /// Commission amount
    #[serde(with = "codec::amount")]
    pub amount: Decimal,

    /// Tax on the commission
    #[serde(default, with = "codec::option_amount", skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Currency of the commission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

/// Instructions for completing a non-card payment.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PaymentMethod {
    /// Kind of instructions (store, bank_transfer, bitcoin)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub method_type: Option<String>,

    /// Receiving bank, for transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,

    /// Interbank account number, for transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clabe: Option<String>,

    /// Beneficiary name, for transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Payment reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Barcode image URL, for store payments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_url: Option<String>,

    /// Destination address, for bitcoin payments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_address: Option<String>,

    /// BIP 21 URI, for bitcoin payments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url_bip21: Option<String>,

    /// Amount due in bitcoins
    #[serde(
        default,
        with = "codec::option_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_bitcoins: Option<Decimal>,
}

/// A charge (card, store, bank transfer or bitcoin).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Charge {
    /// Identifier
    pub id: String,

    /// Charged amount
    #[serde(with = "codec::amount")]
    pub amount: Decimal,

    /// Payment method
    pub method: ChargeMethod,

    /// Transaction status (in_progress, completed, failed, ...)
    #[serde(default)]
    pub status: String,

    /// Currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Description given at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Merchant order identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Bank authorization number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,

    /// Failure message, for failed transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Owning customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// Card used, for card charges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,

    /// Commission; absent until the charge completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,

    /// Payment instructions, for non-card charges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,

    /// When the charge was created
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDateTime>,

    /// When the charge was applied
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_date: Option<NaiveDateTime>,
}

/// A recurring-charge plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Plan {
    /// Identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Amount charged each period
    #[serde(with = "codec::amount")]
    pub amount: Decimal,

    /// Currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Number of units per period
    #[serde(default)]
    pub repeat_every: u32,

    /// Period unit (week, month, year)
    #[serde(default)]
    pub repeat_unit: String,

    /// Free trial length in days
    #[serde(default)]
    pub trial_days: u32,

    /// Charge attempts before giving up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_times: Option<u32>,

    /// Subscription status after the retries fail (unpaid, cancelled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_after_retry: Option<String>,

    /// When the plan was created
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDateTime>,
}

/// A customer's subscription to a plan.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Subscription {
    /// Identifier
    #[serde(default)]
    pub id: String,

    /// Status (trial, active, past_due, unpaid, cancelled)
    #[serde(default)]
    pub status: String,

    /// Subscribed plan
    #[serde(default)]
    pub plan_id: String,

    /// Owning customer
    #[serde(default)]
    pub customer_id: String,

    /// Whether the subscription ends with the current period
    #[serde(default)]
    pub cancel_at_period_end: bool,

    /// Number of the current billing period; 0 during the trial
    #[serde(default)]
    pub current_period_number: i32,

    /// Stored card charged, when one was given by id
    #[serde(rename = "source_id", default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,

    /// Card charged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,

    /// End of the trial period, when the plan has one
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub trial_end_date: Option<NaiveDateTime>,

    /// Next charge date
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub charge_date: Option<NaiveDateTime>,

    /// End of the current period
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub period_end_date: Option<NaiveDateTime>,

    /// When the subscription was created
    #[serde(
        default,
        with = "codec::option_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<NaiveDateTime>,
}
