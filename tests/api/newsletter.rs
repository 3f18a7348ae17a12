use reqwest::{Method, StatusCode};

use serde_json::{json, Value};

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{json_body, TestApp};

fn subscriber(email: &str) -> Value {
    json!({"email": email, "name": "Reader", "source": "footer"})
}

#[tokio::test]
async fn subscribe_then_resubscribe_is_a_conflict() {
    let app = TestApp::spawn().await;

    let res = app.post("api/newsletter", &subscriber("Reader@Example.com")).await;
    assert_eq!(StatusCode::CREATED, res.status());
    let body = json_body(res).await;
    assert_eq!(json!("reader@example.com"), body["data"]["email"]);
    assert_eq!(json!("active"), body["data"]["status"]);

    let res = app.post("api/newsletter", &subscriber("reader@example.com")).await;
    assert_eq!(StatusCode::CONFLICT, res.status());
    assert_eq!(json!(false), json_body(res).await["success"]);
}

#[tokio::test]
async fn unsubscribed_readers_are_reactivated() {
    let app = TestApp::spawn().await;

    app.post("api/newsletter", &subscriber("reader@example.com")).await;
    let res = app
        .post("api/newsletter/unsubscribe", &json!({"email": "reader@example.com"}))
        .await;
    assert_eq!(StatusCode::OK, res.status());

    let res = app.post("api/newsletter", &subscriber("reader@example.com")).await;
    assert_eq!(StatusCode::OK, res.status());
    let body = json_body(res).await;
    assert_eq!(json!("active"), body["data"]["status"]);
    assert_eq!(Value::Null, body["data"]["unsubscribedAt"]);
}

#[tokio::test]
async fn unsubscribe_unknown_email_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .post("api/newsletter/unsubscribe", &json!({"email": "nobody@example.com"}))
        .await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
}

#[tokio::test]
async fn unsubscribing_twice_is_a_no_op() {
    let app = TestApp::spawn().await;
    app.post("api/newsletter", &subscriber("reader@example.com")).await;

    for _ in 0..2 {
        let res = app
            .post("api/newsletter/unsubscribe", &json!({"email": "reader@example.com"}))
            .await;
        assert_eq!(StatusCode::OK, res.status());
    }
}

#[tokio::test]
async fn subscribe_requires_a_valid_email() {
    let app = TestApp::spawn().await;

    for body in [json!({}), json!({"email": "reader"}), json!({"email": " "})] {
        let res = app.post("api/newsletter", &body).await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "{}", body);
    }
}

fn issue() -> Value {
    json!({
        "subject": "Spring range update",
        "html": "<p>New models are here</p>",
        "text": "New models are here",
    })
}

#[tokio::test]
async fn newsletters_are_delivered_to_active_subscribers_only() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    app.post("api/newsletter", &subscriber("one@example.com")).await;
    app.post("api/newsletter", &subscriber("two@example.com")).await;
    app.post("api/newsletter", &subscriber("gone@example.com")).await;
    app.post("api/newsletter/unsubscribe", &json!({"email": "gone@example.com"}))
        .await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let res = app
        .admin(Method::POST, "api/admin/newsletter/publish", &token, Some(&issue()))
        .await;
    assert_eq!(StatusCode::OK, res.status());
    let body = json_body(res).await;
    assert_eq!(json!({"sent": 2, "failed": 0}), body["data"]);

    let res = app
        .admin(Method::GET, "api/admin/newsletter?status=active", &token, None)
        .await;
    let listing = json_body(res).await;
    assert_eq!(json!(2), listing["pagination"]["total"]);
    for subscription in listing["data"].as_array().unwrap() {
        assert_eq!(json!(1), subscription["emailsSent"]);
        assert!(subscription["lastEmailSentAt"].is_string());
    }
}

#[tokio::test]
async fn failed_deliveries_are_counted() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;
    app.post("api/newsletter", &subscriber("one@example.com")).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let res = app
        .admin(Method::POST, "api/admin/newsletter/publish", &token, Some(&issue()))
        .await;

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(json!({"sent": 0, "failed": 1}), json_body(res).await["data"]);
}

#[tokio::test]
async fn incomplete_issues_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;
    app.post("api/newsletter", &subscriber("one@example.com")).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for field in ["subject", "html", "text"] {
        let mut body = issue();
        body.as_object_mut().unwrap().remove(field);

        let res = app
            .admin(Method::POST, "api/admin/newsletter/publish", &token, Some(&body))
            .await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "missing {}", field);
    }
}

#[tokio::test]
async fn publishing_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app.post("api/admin/newsletter/publish", &issue()).await;

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());
}
