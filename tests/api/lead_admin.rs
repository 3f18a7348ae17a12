use reqwest::{Method, StatusCode};

use serde_json::json;

use crate::helpers::{contact_lead, json_body, spec_request, TestApp};

#[tokio::test]
async fn listings_are_paginated() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    for n in 0..12 {
        let res = app.post("api/contact", &contact_lead(n)).await;
        assert_eq!(StatusCode::CREATED, res.status());
    }

    let test_cases = vec![
        ("page=1&limit=5", 5, json!({"total": 12, "page": 1, "limit": 5, "pages": 3})),
        ("page=3&limit=5", 2, json!({"total": 12, "page": 3, "limit": 5, "pages": 3})),
        ("page=4&limit=5", 0, json!({"total": 12, "page": 4, "limit": 5, "pages": 3})),
        ("", 10, json!({"total": 12, "page": 1, "limit": 10, "pages": 2})),
        ("limit=1000", 12, json!({"total": 12, "page": 1, "limit": 100, "pages": 1})),
    ];

    for (query, items, pagination) in test_cases {
        let url = format!("api/admin/leads/contact?{}", query);
        let res = app.admin(Method::GET, &url, &token, None).await;
        assert_eq!(StatusCode::OK, res.status(), "{}", query);

        let body = json_body(res).await;
        assert_eq!(items, body["data"].as_array().unwrap().len(), "{}", query);
        assert_eq!(pagination, body["pagination"], "{}", query);
    }
}

#[tokio::test]
async fn listings_are_newest_first() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    app.post("api/contact", &contact_lead(1)).await;
    app.post("api/contact", &contact_lead(2)).await;

    let res = app
        .admin(Method::GET, "api/admin/leads/contact", &token, None)
        .await;
    let body = json_body(res).await;
    assert_eq!(json!("Customer 2"), body["data"][0]["name"]);
    assert_eq!(json!("Customer 1"), body["data"][1]["name"]);
}

#[tokio::test]
async fn listings_filter_by_status() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;
    app.post("api/specs", &spec_request()).await;

    let test_cases = vec![("new", 1), ("closed", 0)];
    for (status, total) in test_cases {
        let url = format!("api/admin/leads/specs?status={}", status);
        let res = app.admin(Method::GET, &url, &token, None).await;
        assert_eq!(json!(total), json_body(res).await["pagination"]["total"]);
    }

    let res = app
        .admin(Method::GET, "api/admin/leads/specs?status=lost", &token, None)
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let res = app
        .admin(Method::GET, "api/admin/leads/specs?page=first", &token, None)
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
}

#[tokio::test]
async fn leads_can_be_read_and_deleted() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let res = app.post("api/contact", &contact_lead(1)).await;
    let id = json_body(res).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let url = format!("api/admin/leads/contact/{}", id);

    let res = app.admin(Method::GET, &url, &token, None).await;
    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(json!(id), json_body(res).await["data"]["id"]);

    let res = app.admin(Method::DELETE, &url, &token, None).await;
    assert_eq!(StatusCode::OK, res.status());

    let res = app.admin(Method::DELETE, &url, &token, None).await;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!(
        json!({"success": false, "message": "Contact lead not found"}),
        json_body(res).await
    );
}

#[tokio::test]
async fn ids_of_another_kind_are_not_found() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let res = app.post("api/contact", &contact_lead(1)).await;
    let id = json_body(res).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let url = format!("api/admin/leads/quote/{}", id);
    let res = app.admin(Method::GET, &url, &token, None).await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
}

#[tokio::test]
async fn lead_endpoints_require_a_token() {
    let app = TestApp::spawn().await;

    for kind in ["contact", "test-drive", "quote", "service-booking", "specs"] {
        let res = app.get(&format!("api/admin/leads/{}", kind)).await;
        assert_eq!(StatusCode::UNAUTHORIZED, res.status(), "{}", kind);
    }
}
