//! Handler-level tests through the full router, one request at a time.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use api_adapters::{router, AppState};
use auth_adapters::CookieSessions;
use domains::{User, UserRepo};
use services::{credentials, identity, AccountPolicy, ContentService, UserDirectory};
use storage_adapters::{JsonEntryStore, JsonUserStore};

async fn app_with_seeded_author(dir: &tempfile::TempDir) -> Router {
    let users = Arc::new(JsonUserStore::new(dir.path().join("users.json")));
    let id = identity::content_id(&["konstantin"]);
    let author = User {
        username: "konstantin".into(),
        password_hash: credentials::hash_password("hunter2hunter2", id),
        id,
        session: String::new(),
        is_admin: true,
    };
    users.replace_all(std::slice::from_ref(&author)).await.unwrap();

    let directory = Arc::new(UserDirectory::new(
        users,
        AccountPolicy {
            min_username_len: 6,
            min_password_len: 8,
        },
    ));
    let state = AppState {
        sessions: Arc::new(CookieSessions::new(directory.clone(), 15)),
        directory,
        content: Arc::new(ContentService::new(Arc::new(JsonEntryStore::new(
            dir.path().join("entries.json"),
        )))),
        posts_per_page: 5,
    };
    router(state)
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Logs in through the router and returns the `Session=...` cookie pair.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(form_request(
            "/login",
            "username=konstantin&password=hunter2hunter2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set the session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert_eq!(body_string(response).await, "success");
    cookie
}

#[tokio::test]
async fn login_rejects_bad_credentials_without_a_cookie() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_seeded_author(&dir).await;

    let response = app
        .oneshot(form_request("/login", "username=konstantin&password=wrong"))
        .await
        .unwrap();
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_string(response).await, "failed to login");
}

#[tokio::test]
async fn unauthenticated_post_creation_returns_zero() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_seeded_author(&dir).await;

    let response = app
        .oneshot(form_request("/posts", "title=T&text=body&tags="))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "0");
}

#[tokio::test]
async fn login_create_and_list_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_seeded_author(&dir).await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/posts")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::COOKIE, &cookie)
                .body(Body::from("title=&text=hello+world&tags=rust+blog"))
                .unwrap(),
        )
        .await
        .unwrap();
    let id = body_string(response).await;
    assert_ne!(id, "0");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let index: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    let previews = index["previews"].as_array().unwrap();
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0]["id"], id.parse::<u32>().unwrap());
    assert_eq!(previews[0]["title"], "Post #1");
    assert_eq!(previews[0]["keywords"], serde_json::json!(["rust", "blog"]));
    // Unauthenticated index carries no user object.
    assert!(index.get("user").is_none());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let index: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(index["user"]["username"], "konstantin");
    assert_eq!(index["user"]["admin"], true);
    // The stored record's secrets stay on the server.
    assert!(index["user"].get("password").is_none());
    assert!(index["user"].get("session").is_none());
}

#[tokio::test]
async fn unknown_post_ids_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_seeded_author(&dir).await;

    let response = app
        .oneshot(Request::builder().uri("/posts/12345").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn account_creation_needs_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_seeded_author(&dir).await;

    let response = app
        .oneshot(form_request(
            "/account",
            "name=newwriter&password=password1&password-confirmation=password1",
        ))
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "#Something went wrong.");
}

#[tokio::test]
async fn account_creation_reports_validation_messages_in_band() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_seeded_author(&dir).await;
    let cookie = login(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/account")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(header::COOKIE, &cookie)
                .body(Body::from(
                    "name=newwriter&password=password1&password-confirmation=different",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "#Passwords don't match.\n");
}
