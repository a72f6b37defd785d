//! Typed charge requests.
//!
//! Each request wraps a [`ParamBuilder`] preloaded with its payment method and
//! amount. The customer identifier is held apart from the body: it only picks
//! the collection the charge is posted to.

use crate::params::{Field, ParamBuilder, ParamSet, ParamValue, ToParams};
use crate::types::{Card, ChargeMethod};
use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;

/// A request that creates a charge.
pub trait ChargeRequest: ToParams {
    /// Customer to charge, or `None` for a merchant-level charge.
    fn customer_id(&self) -> Option<&str>;

    /// Payment method sent in the body.
    fn method(&self) -> ChargeMethod;
}

macro_rules! charge_request {
    ($(#[$meta:meta])* $name:ident => $method:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            customer_id: Option<String>,
            params: ParamBuilder,
        }

        impl $name {
            /// Creates a request for `amount`.
            pub fn new(amount: Decimal) -> Self {
                Self {
                    customer_id: None,
                    params: ParamBuilder::new()
                        .set("method", $method)
                        .set("amount", amount),
                }
            }

            /// Charges this customer instead of the merchant account.
            pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
                self.customer_id = Some(customer_id.into());
                self
            }

            /// Sets the description shown to the payer.
            pub fn description(self, description: impl Into<String>) -> Self {
                self.with("description", description.into())
            }

            /// Sets the merchant's unique order identifier.
            pub fn order_id(self, order_id: impl Into<String>) -> Self {
                self.with("order_id", order_id.into())
            }

            /// Binds any other parameter the service accepts for this method.
            pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
                self.params = self.params.set(name, value);
                self
            }
        }

        impl ToParams for $name {
            fn to_params(&self) -> ParamSet {
                self.params.build()
            }
        }

        impl ChargeRequest for $name {
            fn customer_id(&self) -> Option<&str> {
                self.customer_id.as_deref()
            }

            fn method(&self) -> ChargeMethod {
                $method
            }
        }
    };
}

charge_request! {
    /// Charge to a card, given inline or by the id of a stored card.
    ///
    /// # Examples
    ///
    /// ```
    /// use openpay_rs::params::ToParams;
    /// use openpay_rs::requests::{ChargeRequest, CreateCardChargeParams};
    /// use rust_decimal::Decimal;
    ///
    /// let request = CreateCardChargeParams::new(Decimal::new(10000, 2))
    ///     .for_customer("ag4nktpdzebjiye1tlze")
    ///     .card_id("kso4st1ii1wr3bdhvxbx")
    ///     .description("Cargo inicial a mi cuenta")
    ///     .device_session_id("kR1MiQhz2otdIuUlQkbEyitIqVMiI16f");
    ///
    /// assert_eq!(request.customer_id(), Some("ag4nktpdzebjiye1tlze"));
    /// let params = request.to_params();
    /// assert!(params.contains("source_id"));
    /// assert!(!params.contains("customer_id"));
    /// ```
    CreateCardChargeParams => ChargeMethod::Card
}

impl CreateCardChargeParams {
    /// Charges a card given inline; replaces any stored card id.
    pub fn card(mut self, card: &Card) -> Self {
        self.params = self
            .params
            .nested("card", card)
            .apply("source_id", Field::<String>::Unset);
        self
    }

    /// Charges a stored card; replaces any inline card.
    pub fn card_id(mut self, card_id: impl Into<String>) -> Self {
        self.params = self
            .params
            .apply("card", Field::<ParamSet>::Unset)
            .set("source_id", card_id.into());
        self
    }

    /// Sets the anti-fraud device session.
    pub fn device_session_id(self, device_session_id: impl Into<String>) -> Self {
        self.with("device_session_id", device_session_id.into())
    }

    /// `false` only authorizes the amount, to be captured later.
    pub fn capture(self, capture: bool) -> Self {
        self.with("capture", capture)
    }
}

charge_request! {
    /// Cash payment at a convenience store, answered with a barcode reference.
    CreateStoreChargeParams => ChargeMethod::Store
}

impl CreateStoreChargeParams {
    /// Last moment the payment is accepted.
    pub fn due_date<Tz: TimeZone>(self, due_date: DateTime<Tz>) -> Self {
        self.with("due_date", due_date)
    }
}

charge_request! {
    /// Bank transfer, answered with the account and reference to pay to.
    CreateBankChargeParams => ChargeMethod::BankAccount
}

impl CreateBankChargeParams {
    /// Last moment the transfer is accepted.
    pub fn due_date<Tz: TimeZone>(self, due_date: DateTime<Tz>) -> Self {
        self.with("due_date", due_date)
    }
}

charge_request! {
    /// Bitcoin payment, answered with the address and amount due.
    CreateBitcoinChargeParams => ChargeMethod::Bitcoin
}
