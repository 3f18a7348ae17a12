use reqwest::{Method, StatusCode};

use serde_json::json;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{contact_lead, json_body, spec_request, test_drive_request, TestApp};

#[tokio::test]
async fn contact_returns_created_for_valid_request() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let res = app.post("api/contact", &contact_lead(1)).await;
    assert_eq!(StatusCode::CREATED, res.status());

    let body = json_body(res).await;
    assert_eq!(json!(true), body["success"]);
    assert_eq!(json!("Customer 1"), body["data"]["name"]);
    assert_eq!(json!("general"), body["data"]["enquiryType"]);
    assert_eq!(json!("new"), body["data"]["status"]);
    assert!(body["data"]["createdAt"].is_string());

    let res = app
        .admin(Method::GET, "api/admin/leads/contact", &token, None)
        .await;
    let listing = json_body(res).await;
    assert_eq!(json!(1), listing["pagination"]["total"]);
    assert_eq!(body["data"]["id"], listing["data"][0]["id"]);
    assert_eq!(json!("customer1@example.com"), listing["data"][0]["email"]);
}

#[tokio::test]
async fn contact_returns_bad_request_for_invalid_data() {
    let app = TestApp::spawn().await;

    let test_cases = vec![
        ("missing name", json!({"email": "a@b.com", "message": "Hi"})),
        ("blank name", json!({"name": "  ", "email": "a@b.com", "message": "Hi"})),
        ("missing email", json!({"name": "Ada", "message": "Hi"})),
        ("malformed email", json!({"name": "Ada", "email": "not an email", "message": "Hi"})),
        ("missing message", json!({"name": "Ada", "email": "a@b.com"})),
        (
            "unknown enquiry type",
            json!({"name": "Ada", "email": "a@b.com", "message": "Hi", "enquiryType": "lunch"}),
        ),
    ];

    for (desc, body) in test_cases {
        let res = app.post("api/contact", &body).await;

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "The API did not fail with 400 Bad Request when the payload was {}",
            desc
        );
        let body = json_body(res).await;
        assert_eq!(json!(false), body["success"], "{}", desc);
        assert!(body["message"].is_string(), "{}", desc);
    }
}

#[tokio::test]
async fn malformed_json_is_rejected_with_an_envelope() {
    let app = TestApp::spawn().await;

    let res = app
        .request(Method::POST, "api/quote")
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!(json!(false), json_body(res).await["success"]);
}

#[tokio::test]
async fn quote_records_financing_flag() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            "api/quote",
            &json!({
                "name": "Ada",
                "email": "ada@example.com",
                "phone": "0123",
                "model": "EV6",
                "financing": true,
            }),
        )
        .await;

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(json!(true), json_body(res).await["data"]["financing"]);
}

#[tokio::test]
async fn service_booking_requires_an_iso_date() {
    let app = TestApp::spawn().await;
    let mut booking = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "0123",
        "vehicleModel": "EV6",
        "serviceType": "Annual service",
        "preferredDate": "30/06/2024",
    });

    let res = app.post("api/service-booking", &booking).await;
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    booking["preferredDate"] = json!("2024-06-30");
    let res = app.post("api/service-booking", &booking).await;
    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(json!("2024-06-30"), json_body(res).await["data"]["preferredDate"]);
}

#[tokio::test]
async fn test_drive_notifies_sales_and_crm() {
    let app = TestApp::spawn().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/leads"))
        .and(method("POST"))
        .and(header("X-Api-Key", "TestCrmKey"))
        .and(header("X-Lead-Source", "test-drive"))
        .and(header("X-Lead-Model", "EV6"))
        .and(header("X-Lead-Utm-Source", "google"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    let res = app.post("api/test-drive", &test_drive_request()).await;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = json_body(res).await;
    assert_eq!(json!("google"), body["data"]["attribution"]["utmSource"]);
}

#[tokio::test]
async fn test_drive_is_recorded_when_crm_fails() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.crm_server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.email_server)
        .await;

    let res = app.post("api/test-drive", &test_drive_request()).await;
    assert_eq!(StatusCode::CREATED, res.status());

    let res = app
        .admin(Method::GET, "api/admin/leads/test-drive", &token, None)
        .await;
    assert_eq!(json!(1), json_body(res).await["pagination"]["total"]);
}

#[tokio::test]
async fn spec_request_pushes_to_crm_only() {
    let app = TestApp::spawn().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/leads"))
        .and(header("X-Lead-Source", "spec-sheet"))
        .and(header("X-Lead-Email", "grace@example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    let res = app.post("api/specs", &spec_request()).await;

    assert_eq!(StatusCode::CREATED, res.status());
}
