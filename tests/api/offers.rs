use chrono::{Duration, Utc};

use reqwest::{Method, StatusCode};

use serde_json::{json, Value};

use crate::helpers::{json_body, TestApp};

fn day(offset: i64) -> String {
    (Utc::now().date_naive() + Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}

async fn create_offer(app: &TestApp, token: &str, offer: Value) -> Value {
    let res = app
        .admin(Method::POST, "api/admin/offers", token, Some(&offer))
        .await;
    assert_eq!(StatusCode::CREATED, res.status(), "Failed to create {}", offer);
    json_body(res).await["data"].clone()
}

#[tokio::test]
async fn only_current_offers_are_public() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let current = create_offer(
        &app,
        &token,
        json!({"title": "Current", "description": "Now", "validFrom": day(-1), "validUntil": day(1)}),
    )
    .await;
    create_offer(
        &app,
        &token,
        json!({"title": "Inactive", "description": "Off", "validFrom": day(-1), "active": false}),
    )
    .await;
    create_offer(
        &app,
        &token,
        json!({"title": "Expired", "description": "Past", "validFrom": day(-10), "validUntil": day(-2)}),
    )
    .await;
    create_offer(
        &app,
        &token,
        json!({"title": "Upcoming", "description": "Soon", "validFrom": day(3)}),
    )
    .await;

    let res = app.get("api/offers").await;
    assert_eq!(StatusCode::OK, res.status());
    let body = json_body(res).await;
    assert_eq!(json!([current]), body["data"]);

    let res = app
        .admin(Method::GET, "api/admin/offers?active=true", &token, None)
        .await;
    assert_eq!(json!(3), json_body(res).await["pagination"]["total"]);
}

#[tokio::test]
async fn invalid_offers_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let test_cases = vec![
        ("missing title", json!({"description": "x", "validFrom": day(0)})),
        ("missing validFrom", json!({"title": "x", "description": "x"})),
        ("bad date", json!({"title": "x", "description": "x", "validFrom": "tomorrow"})),
        (
            "window ends before it starts",
            json!({"title": "x", "description": "x", "validFrom": day(2), "validUntil": day(1)}),
        ),
    ];

    for (desc, offer) in test_cases {
        let res = app
            .admin(Method::POST, "api/admin/offers", &token, Some(&offer))
            .await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", desc);
    }
}

#[tokio::test]
async fn updates_are_partial() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let offer = create_offer(
        &app,
        &token,
        json!({"title": "Spring", "description": "0% APR", "validFrom": day(0), "terms": "T&Cs apply"}),
    )
    .await;
    let url = format!("api/admin/offers/{}", offer["id"].as_str().unwrap());

    let res = app
        .admin(Method::PUT, &url, &token, Some(&json!({"active": false})))
        .await;
    assert_eq!(StatusCode::OK, res.status());
    let updated = json_body(res).await["data"].clone();
    assert_eq!(json!(false), updated["active"]);
    assert_eq!(json!("Spring"), updated["title"]);
    assert_eq!(json!("T&Cs apply"), updated["terms"]);

    let res = app
        .admin(Method::PUT, &url, &token, Some(&json!({"validUntil": day(-5)})))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
}

#[tokio::test]
async fn deleting_a_missing_offer_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let url = format!("api/admin/offers/{}", uuid::Uuid::new_v4());
    let res = app.admin(Method::DELETE, &url, &token, None).await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
}
