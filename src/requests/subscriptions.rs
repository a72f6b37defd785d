//! Typed subscription requests.

use crate::params::{Field, ParamBuilder, ParamSet, ToParams};
use crate::types::{Card, Subscription};
use chrono::NaiveDateTime;

/// Subscribes a customer to a plan.
///
/// # Examples
///
/// ```
/// use openpay_rs::params::ToParams;
/// use openpay_rs::requests::CreateSubscriptionParams;
///
/// let params = CreateSubscriptionParams::new("pqycd8nndru5jeav5lh7")
///     .card_id("kso4st1ii1wr3bdhvxbx")
///     .to_params();
///
/// let names: Vec<_> = params.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, vec!["plan_id", "source_id"]);
/// ```
#[derive(Debug, Clone)]
pub struct CreateSubscriptionParams {
    params: ParamBuilder,
}

impl CreateSubscriptionParams {
    /// Creates a request for `plan_id`.
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            params: ParamBuilder::new().set("plan_id", plan_id.into()),
        }
    }

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

    /// Overrides the end of the plan's trial period.
    pub fn trial_end_date(mut self, trial_end_date: NaiveDateTime) -> Self {
        self.params = self.params.set("trial_end_date", trial_end_date);
        self
    }
}

impl ToParams for CreateSubscriptionParams {
    fn to_params(&self) -> ParamSet {
        self.params.build()
    }
}

/// Partial update of a subscription.
///
/// Only fields that are not [`Field::Unset`] are sent; the service keeps the
/// rest as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSubscriptionParams {
    /// End of the trial period
    pub trial_end_date: Field<NaiveDateTime>,

    /// Whether the subscription ends with the current period
    pub cancel_at_period_end: Field<bool>,

    /// Card given inline
    pub card: Field<Card>,

    /// Stored card, sent as `source_id`
    pub card_id: Field<String>,
}

impl UpdateSubscriptionParams {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the end of the trial period.
    pub fn trial_end_date(mut self, trial_end_date: NaiveDateTime) -> Self {
        self.trial_end_date = Field::Set(trial_end_date);
        self
    }

    /// Sets whether the subscription ends with the current period.
    pub fn cancel_at_period_end(mut self, cancel: bool) -> Self {
        self.cancel_at_period_end = Field::Set(cancel);
        self
    }

    /// Switches to a card given inline.
    pub fn card(mut self, card: Card) -> Self {
        self.card = Field::Set(card);
        self.card_id = Field::Unset;
        self
    }

    /// Switches to a stored card and detaches the inline one.
    pub fn card_id(mut self, card_id: impl Into<String>) -> Self {
        self.card_id = Field::Set(card_id.into());
        self.card = Field::Clear;
        self
    }
}

impl ToParams for UpdateSubscriptionParams {
    fn to_params(&self) -> ParamSet {
        ParamBuilder::new()
            .apply("trial_end_date", self.trial_end_date.clone())
            .apply("cancel_at_period_end", self.cancel_at_period_end.clone())
            .apply("card", self.card.clone().map(|card| card.to_params()))
            .apply("source_id", self.card_id.clone())
            .build()
    }
}

impl Subscription {
    /// Starts an update from the fetched state.
    ///
    /// Carries the trial end and cancellation flag; the card is left untouched
    /// unless the caller switches it.
    pub fn to_update(&self) -> UpdateSubscriptionParams {
        UpdateSubscriptionParams {
            trial_end_date: self.trial_end_date.into(),
            cancel_at_period_end: Field::Set(self.cancel_at_period_end),
            ..UpdateSubscriptionParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{parse_datetime, ValueCodec};
    use serde_json::json;

    fn body(request: &impl ToParams) -> serde_json::Value {
        ValueCodec::default().encode_params(&request.to_params()).unwrap()
    }

    #[test]
    fn test_create_with_inline_card_and_trial() {
        let card = Card::new()
            .with_card_number("5243385358972033")
            .with_holder_name("Holder")
            .with_expiration(12, 15)
            .with_cvv2("123");
        let request = CreateSubscriptionParams::new("pqycd8nndru5jeav5lh7")
            .card(&card)
            .trial_end_date(parse_datetime("2015-03-16 01:12:55").unwrap());

        assert_eq!(
            body(&request),
            json!({
                "plan_id": "pqycd8nndru5jeav5lh7",
                "card": {
                    "card_number": "5243385358972033",
                    "holder_name": "Holder",
                    "expiration_year": "15",
                    "expiration_month": "12",
                    "cvv2": "123"
                },
                "trial_end_date": "2015-03-16 01:12:55"
            })
        );
    }

    #[test]
    fn test_update_sends_only_bound_fields() {
        let update = UpdateSubscriptionParams::new()
            .trial_end_date(parse_datetime("2015-03-16 01:12:55").unwrap());
        assert_eq!(body(&update), json!({"trial_end_date": "2015-03-16 01:12:55"}));

        assert_eq!(body(&UpdateSubscriptionParams::new()), json!({}));
    }

    #[test]
    fn test_card_id_detaches_inline_card() {
        let update = UpdateSubscriptionParams::new()
            .card(Card::new().with_card_number("4111111111111111"))
            .card_id("kerxkwvyldyzcw05pv7k");

        assert_eq!(update.card, Field::Clear);
        assert_eq!(
            body(&update),
            json!({"card": null, "source_id": "kerxkwvyldyzcw05pv7k"})
        );
    }

    #[test]
    fn test_to_update_from_fetched_subscription() {
        let fetched: Subscription = serde_json::from_value(json!({
            "id": "s0gmyor4yqtyv1miqwr0",
            "status": "active",
            "cancel_at_period_end": false,
            "trial_end_date": "2015-03-16",
            "plan_id": "pqycd8nndru5jeav5lh7",
            "customer_id": "ag4nktpdzebjiye1tlze",
            "card": {"card_number": "411111XXXXXX1111", "holder_name": "Holder"}
        }))
        .unwrap();

        let update = fetched.to_update().cancel_at_period_end(true);
        assert_eq!(
            body(&update),
            json!({"trial_end_date": "2015-03-16 00:00:00", "cancel_at_period_end": true})
        );
    }
}
