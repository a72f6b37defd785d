//! Tests for the reqwest-backed transport against a mock HTTP server.

use openpay_rs::{
    errors::TransportErrorKind,
    params::ToParams,
    requests::{CreateCardChargeParams, UpdateSubscriptionParams},
    HttpTransport, OpenpayApi, OpenpayConfig, OpenpayError, SearchParams, Transport,
};
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{basic_auth, body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const API_KEY: &str = "sk_e568c42a6c384b7ab02cd47d2e407cab";
const MERCHANT_ID: &str = "mzdtln0bmtms6o3kck8f";

fn api_for(server: &MockServer) -> OpenpayApi {
    let config = OpenpayConfig::new(server.uri(), API_KEY, MERCHANT_ID);
    OpenpayApi::new(&config).unwrap()
}

#[tokio::test]
async fn test_get_sends_credentials_and_decodes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v1/{}/customers/ag4nktpdzebjiye1tlze/subscriptions/s0gmyor4yqtyv1miqwr0",
            MERCHANT_ID
        )))
        .and(basic_auth(API_KEY, ""))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s0gmyor4yqtyv1miqwr0",
            "status": "trial",
            "current_period_number": 0,
            "trial_end_date": "2015-03-16",
            "plan_id": "pqycd8nndru5jeav5lh7",
            "customer_id": "ag4nktpdzebjiye1tlze"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let subscription = api_for(&mock_server)
        .subscriptions()
        .get(&["ag4nktpdzebjiye1tlze"], "s0gmyor4yqtyv1miqwr0")
        .await
        .unwrap();

    assert_eq!(subscription.status, "trial");
    assert_eq!(
        subscription.trial_end_date.unwrap().to_string(),
        "2015-03-16 00:00:00"
    );
}

#[tokio::test]
async fn test_error_status_passes_through_to_mapper() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/mzdtln0bmtms6o3kck8f/customers/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "category": "request",
            "description": "The requested resource doesn't exist",
            "http_code": 404,
            "error_code": 1005,
            "request_id": "1981cdb8-19cb-4bad-8256-e95d58bc035c"
        })))
        .mount(&mock_server)
        .await;

    let err = api_for(&mock_server)
        .customers()
        .get(&[], "missing")
        .await
        .unwrap_err();

    assert!(matches!(err, OpenpayError::NotFound(_)));
    assert_eq!(err.error_code(), Some(1005));
}

#[tokio::test]
async fn test_create_sends_exact_amount() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/mzdtln0bmtms6o3kck8f/customers/ag4nktpdzebjiye1tlze/charges"))
        .and(body_string_contains(r#""amount":100.00"#))
        .and(body_string_contains(r#""source_id":"kso4st1ii1wr3bdhvxbx""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id":"trzjaozcik8msyqshka4","amount":100.00,"method":"card","status":"completed"}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = CreateCardChargeParams::new(Decimal::new(10000, 2))
        .for_customer("ag4nktpdzebjiye1tlze")
        .card_id("kso4st1ii1wr3bdhvxbx");
    let charge = api_for(&mock_server).create_charge(&request).await.unwrap();

    assert_eq!(charge.amount, Decimal::new(10000, 2));
    assert_eq!(charge.status, "completed");
}

#[tokio::test]
async fn test_update_uses_put_with_partial_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/mzdtln0bmtms6o3kck8f/customers/c1/subscriptions/s1"))
        .and(body_string_contains(r#"{"cancel_at_period_end":true}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "s1",
            "status": "active",
            "cancel_at_period_end": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let update = UpdateSubscriptionParams::new().cancel_at_period_end(true);
    let updated = api_for(&mock_server)
        .subscriptions()
        .update(&["c1"], "s1", &update.to_params())
        .await
        .unwrap();

    assert!(updated.cancel_at_period_end);
}

#[tokio::test]
async fn test_list_sends_query_and_delete_accepts_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/mzdtln0bmtms6o3kck8f/charges"))
        .and(query_param("creation[gte]", "2014-08-01"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/mzdtln0bmtms6o3kck8f/customers/c1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server);
    let filters = SearchParams::new()
        .creation_gte(chrono::NaiveDate::from_ymd_opt(2014, 8, 1).unwrap())
        .limit(2);
    assert!(api.charges().list(&[], Some(&filters)).await.unwrap().is_empty());

    api.customers().delete(&[], "c1").await.unwrap();
}

#[tokio::test]
async fn test_malformed_success_body_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = api_for(&mock_server).plans().get(&[], "p1").await.unwrap_err();
    assert!(matches!(
        err,
        OpenpayError::Transport {
            kind: TransportErrorKind::Body,
            ..
        }
    ));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let config = OpenpayConfig::new(mock_server.uri(), API_KEY, MERCHANT_ID)
        .with_timeout(Duration::from_millis(50));
    let transport = HttpTransport::new(&config).unwrap();

    let err = transport
        .send(openpay_rs::transport::ApiRequest::new(Method::GET, "customers"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OpenpayError::Transport {
            kind: TransportErrorKind::Timeout,
            ..
        }
    ));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_connection_refused() {
    let config = OpenpayConfig::new("http://127.0.0.1:1", API_KEY, MERCHANT_ID);
    let err = OpenpayApi::new(&config)
        .unwrap()
        .customers()
        .list(&[], None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OpenpayError::Transport {
            kind: TransportErrorKind::Connect,
            ..
        }
    ));
}
