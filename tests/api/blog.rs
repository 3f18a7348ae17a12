use reqwest::{Method, StatusCode};

use serde_json::{json, Value};

use crate::helpers::{json_body, TestApp};

async fn create_post(app: &TestApp, token: &str, post: Value) -> Value {
    let res = app
        .admin(Method::POST, "api/admin/blog", token, Some(&post))
        .await;
    assert_eq!(StatusCode::CREATED, res.status(), "Failed to create {}", post);
    json_body(res).await["data"].clone()
}

#[tokio::test]
async fn only_published_posts_are_public() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    create_post(
        &app,
        &token,
        json!({"title": "Charging at Home", "content": "Plug it in.", "status": "published"}),
    )
    .await;
    let draft = create_post(
        &app,
        &token,
        json!({"title": "Upcoming Launch", "content": "Secret."}),
    )
    .await;
    assert_eq!(json!("upcoming-launch"), draft["slug"]);
    assert_eq!(Value::Null, draft["publishedAt"]);

    let res = app.get("api/blog").await;
    assert_eq!(StatusCode::OK, res.status());
    let listing = json_body(res).await;
    assert_eq!(json!(1), listing["pagination"]["total"]);
    assert_eq!(json!("charging-at-home"), listing["data"][0]["slug"]);
    assert_eq!(json!("Site Admin"), listing["data"][0]["authorName"]);

    let res = app.get("api/blog/charging-at-home").await;
    assert_eq!(StatusCode::OK, res.status());

    let res = app.get("api/blog/upcoming-launch").await;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
}

#[tokio::test]
async fn public_listing_filters_by_tag() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    create_post(
        &app,
        &token,
        json!({"title": "Range Tips", "content": "Drive smooth.", "status": "published", "tags": ["Range", "tips"]}),
    )
    .await;
    create_post(
        &app,
        &token,
        json!({"title": "Fleet Offers", "content": "Save more.", "status": "published", "tags": ["fleet"]}),
    )
    .await;

    let listing = json_body(app.get("api/blog?tag=range").await).await;
    assert_eq!(json!(1), listing["pagination"]["total"]);
    assert_eq!(json!("range-tips"), listing["data"][0]["slug"]);
    assert_eq!(json!(["range", "tips"]), listing["data"][0]["tags"]);
}

#[tokio::test]
async fn duplicate_slugs_are_a_conflict() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    create_post(&app, &token, json!({"title": "Hello World", "content": "One"})).await;

    let res = app
        .admin(
            Method::POST,
            "api/admin/blog",
            &token,
            Some(&json!({"title": "Hello, world!", "content": "Two"})),
        )
        .await;

    assert_eq!(StatusCode::CONFLICT, res.status());
}

#[tokio::test]
async fn publishing_through_update_stamps_published_at() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let draft = create_post(&app, &token, json!({"title": "Draft", "content": "Body"})).await;
    let url = format!("api/admin/blog/{}", draft["id"].as_str().unwrap());

    let res = app
        .admin(
            Method::PUT,
            &url,
            &token,
            Some(&json!({"status": "published", "title": "Now Live"})),
        )
        .await;
    assert_eq!(StatusCode::OK, res.status());
    let post = json_body(res).await["data"].clone();
    assert_eq!(json!("Now Live"), post["title"]);
    assert_eq!(json!("draft"), post["slug"]);
    assert!(post["publishedAt"].is_string());

    let res = app.get("api/blog/draft").await;
    assert_eq!(StatusCode::OK, res.status());
}

#[tokio::test]
async fn admin_listing_filters_by_status() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    create_post(&app, &token, json!({"title": "A", "content": "Body"})).await;
    create_post(
        &app,
        &token,
        json!({"title": "B", "content": "Body", "status": "published"}),
    )
    .await;

    let res = app
        .admin(Method::GET, "api/admin/blog?status=draft", &token, None)
        .await;
    let listing = json_body(res).await;
    assert_eq!(json!(1), listing["pagination"]["total"]);
    assert_eq!(json!("a"), listing["data"][0]["slug"]);

    let res = app
        .admin(Method::GET, "api/admin/blog?status=archived", &token, None)
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
}

#[tokio::test]
async fn deleted_posts_are_gone() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let post = create_post(&app, &token, json!({"title": "Temp", "content": "Body"})).await;
    let url = format!("api/admin/blog/{}", post["id"].as_str().unwrap());

    let res = app.admin(Method::DELETE, &url, &token, None).await;
    assert_eq!(StatusCode::OK, res.status());

    let res = app.admin(Method::GET, &url, &token, None).await;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    let res = app.admin(Method::DELETE, &url, &token, None).await;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
}

#[tokio::test]
async fn non_uuid_ids_are_not_found() {
    let app = TestApp::spawn().await;
    let token = app.setup_admin().await;

    let res = app
        .admin(Method::GET, "api/admin/blog/not-a-uuid", &token, None)
        .await;

    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!(json!(false), json_body(res).await["success"]);
}
