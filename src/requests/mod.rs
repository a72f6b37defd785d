//! Typed request wrappers.
//!
//! Each wrapper composes a [`ParamBuilder`](crate::params::ParamBuilder) and
//! exposes setters for the fields one request accepts; the generic builder
//! remains available for anything else.

pub mod charges;
pub mod subscriptions;

pub use charges::{
    ChargeRequest, CreateBankChargeParams, CreateBitcoinChargeParams, CreateCardChargeParams,
    CreateStoreChargeParams,
};
pub use subscriptions::{CreateSubscriptionParams, UpdateSubscriptionParams};
