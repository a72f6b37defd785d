//! # openpay-rs
//!
//! A Rust client for the Openpay REST payment API.
//!
//! Every resource family (customers, cards, charges, plans, subscriptions) is
//! reached through one generic [`ResourceOperations`] binding a path template to a
//! DTO type. Requests are described with a fluent [`ParamBuilder`] or the typed
//! wrappers in [`requests`], encoded by a [`ValueCodec`] and sent through a
//! pluggable [`Transport`]. Failures come back as a single [`OpenpayError`].
//!
//! ## Features
//!
//! - **Exact money**: amounts are [`rust_decimal::Decimal`] on both sides of the wire
//! - **Partial updates**: only bound fields are sent; [`params::Field`] distinguishes
//!   "leave as is" from "clear"
//! - **Nested resources**: `customers/{customer_id}/subscriptions` paths are composed
//!   and validated before any request goes out
//! - **Forgiving dates**: truncated timestamps returned by the service decode with
//!   missing components read as zero
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openpay_rs::{OpenpayApi, OpenpayConfig};
//! use openpay_rs::params::ToParams;
//! use openpay_rs::requests::CreateSubscriptionParams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config =
//!     OpenpayConfig::sandbox("sk_e568c42a6c384b7ab02cd47d2e407cab", "mzdtln0bmtms6o3kck8f");
//! let api = OpenpayApi::new(&config)?;
//!
//! let request = CreateSubscriptionParams::new("pqycd8nndru5jeav5lh7")
//!     .card_id("kso4st1ii1wr3bdhvxbx");
//! let subscription = api
//!     .subscriptions()
//!     .create(&["ag4nktpdzebjiye1tlze"], &request.to_params())
//!     .await?;
//!
//! println!("status: {}", subscription.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! ```rust,no_run
//! use openpay_rs::{OpenpayApi, OpenpayConfig, OpenpayError};
//!
//! # async fn example(api: OpenpayApi) {
//! match api.customers().get(&[], "does-not-exist").await {
//!     Err(OpenpayError::NotFound(err)) => println!("missing: {}", err.description),
//!     Err(err) if err.is_transient() => println!("try again later: {}", err),
//!     Err(err) => println!("failed: {}", err),
//!     Ok(customer) => println!("found {}", customer.name),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod codec;
pub mod errors;
pub mod mapper;
pub mod operations;
pub mod params;
pub mod path;
pub mod requests;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use client::{OpenpayApi, OpenpayConfig};
pub use codec::ValueCodec;
pub use errors::{ApiError, OpenpayError, Result};
pub use operations::{ResourceOperations, SearchParams};
pub use params::{Field, ParamBuilder, ParamSet, ParamValue, ToParams};
pub use transport::{HttpTransport, Transport};
pub use types::{
    Address, Card, Charge, ChargeMethod, Currency, Customer, Fee, PaymentMethod, Plan,
    Subscription,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_accessibility() {
        let config = OpenpayConfig::sandbox("sk_key", "m1");
        let api = OpenpayApi::new(&config).unwrap();
        let _ = api.customers();
        let _ = ParamBuilder::new().set("name", "Juan").build();
        let _ = SearchParams::new().limit(10);
    }
}
