//! Example subscription lifecycle against the sandbox.
//!
//! Creates a customer, subscribes them to a plan with a test card, moves the
//! trial end date, switches the card and finally cancels the subscription.
//!
//! Run with:
//! ```bash
//! cargo run --example subscriptions
//! ```
//!
//! Environment variables (a `.env` file is read if present):
//! - OPENPAY_API_KEY: Private API key of the sandbox merchant
//! - OPENPAY_MERCHANT_ID: Sandbox merchant identifier
//! - OPENPAY_PLAN_ID: Plan to subscribe to
//! - OPENPAY_ENDPOINT: API root (defaults to the sandbox)

use anyhow::Context;
use openpay_rs::client::SANDBOX_ENDPOINT;
use openpay_rs::codec::parse_datetime;
use openpay_rs::requests::{CreateCardChargeParams, CreateSubscriptionParams};
use openpay_rs::utils::generate_order_id;
use openpay_rs::{
    Address, Card, Customer, OpenpayApi, OpenpayConfig, OpenpayError, ParamBuilder, SearchParams,
    ToParams,
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("OPENPAY_API_KEY").context("OPENPAY_API_KEY is not set")?;
    let merchant_id =
        std::env::var("OPENPAY_MERCHANT_ID").context("OPENPAY_MERCHANT_ID is not set")?;
    let plan_id =
        std::env::var("OPENPAY_PLAN_ID").unwrap_or_else(|_| "pqycd8nndru5jeav5lh7".to_string());
    let endpoint =
        std::env::var("OPENPAY_ENDPOINT").unwrap_or_else(|_| SANDBOX_ENDPOINT.to_string());

    let config = OpenpayConfig::new(&endpoint, api_key, merchant_id);
    let api = OpenpayApi::new(&config)?;

    println!("Openpay subscription demo");
    println!("   Endpoint: {}", endpoint);
    println!();

    let address = Address::new()
        .with_line1("Camino #11 - 01")
        .with_city("Querétaro")
        .with_state("Queretaro")
        .with_postal_code("76090")
        .with_country_code("MX");
    let customer: Customer = api
        .customers()
        .create(
            &[],
            &ParamBuilder::new()
                .set("name", "Juan")
                .set("last_name", "Pérez")
                .set("email", "juan.perez@example.com")
                .nested("address", &address)
                .build(),
        )
        .await?;
    println!("Created customer {}", customer.id);

    let card = Card::new()
        .with_card_number("5243385358972033")
        .with_holder_name("Juan Pérez")
        .with_expiration(12, 30)
        .with_cvv2("123")
        .with_address(address);
    let subscription = api
        .subscriptions()
        .create(
            &[customer.id.as_str()],
            &CreateSubscriptionParams::new(&plan_id).card(&card).to_params(),
        )
        .await?;
    println!(
        "Subscription {} is {} (period {}), trial ends {:?}",
        subscription.id,
        subscription.status,
        subscription.current_period_number,
        subscription.trial_end_date
    );

    let update = subscription
        .to_update()
        .trial_end_date(parse_datetime("2030-03-16 01:12:55")?);
    let subscription = api
        .subscriptions()
        .update(&[customer.id.as_str()], &subscription.id, &update.to_params())
        .await?;
    println!("Trial now ends {:?}", subscription.trial_end_date);

    let stored = api
        .customer_cards()
        .create(&[customer.id.as_str()], &card.with_card_number("4111111111111111").to_params())
        .await?;
    if let Some(card_id) = &stored.id {
        let update = subscription.to_update().card_id(card_id.clone());
        let subscription = api
            .subscriptions()
            .update(&[customer.id.as_str()], &subscription.id, &update.to_params())
            .await?;
        println!("Subscription now charges card {:?}", subscription.card_id);

        let charge = api
            .create_charge(
                &CreateCardChargeParams::new(Decimal::new(10000, 2))
                    .for_customer(&customer.id)
                    .card_id(card_id.clone())
                    .order_id(generate_order_id("demo"))
                    .description("Cargo de prueba"),
            )
            .await?;
        println!("Charged {} with status {}", charge.amount, charge.status);
    }

    let listed = api
        .subscriptions()
        .list(&[customer.id.as_str()], Some(&SearchParams::new().limit(10)))
        .await?;
    println!("Customer has {} subscription(s)", listed.len());

    api.subscriptions()
        .delete(&[customer.id.as_str()], &subscription.id)
        .await?;
    match api.subscriptions().get(&[customer.id.as_str()], &subscription.id).await {
        Err(OpenpayError::NotFound(err)) => println!("Cancelled: {}", err.description),
        Ok(remaining) => println!("Subscription is {}", remaining.status),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
