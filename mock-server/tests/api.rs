use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{
    app, Breach, Paste, ACCOUNT_EXISTS, API_KEY_HEADER, DEFAULT_API_KEY, MULTIPLE_BREACHES,
    PADDING_ENTRIES, PADDING_HEADER, PASTE_ACCOUNT,
};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::USER_AGENT, "mock-server-tests")
        .body(String::new())
        .unwrap()
}

fn get_with_key(uri: &str, key: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::USER_AGENT, "mock-server-tests")
        .header(API_KEY_HEADER, key)
        .body(String::new())
        .unwrap()
}

// --- user agent ---

#[tokio::test]
async fn missing_user_agent_returns_403() {
    let resp = app()
        .oneshot(Request::builder().uri("/breaches").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- breaches ---

#[tokio::test]
async fn breaches_lists_everything() {
    let resp = app().oneshot(get("/breaches")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let breaches: Vec<Breach> = body_json(resp).await;
    assert_eq!(breaches.len(), 4);
    assert_eq!(breaches[0].name, "000webhost");
}

#[tokio::test]
async fn breaches_filters_by_domain() {
    let resp = app().oneshot(get("/breaches?domain=adobe.com")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let breaches: Vec<Breach> = body_json(resp).await;
    assert_eq!(breaches.len(), 1);
    assert_eq!(breaches[0].name, "Adobe");
}

// --- breach ---

#[tokio::test]
async fn breach_by_name() {
    let resp = app().oneshot(get("/breach/Adobe")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let breach: Breach = body_json(resp).await;
    assert_eq!(breach.domain, "adobe.com");
}

#[tokio::test]
async fn unknown_breach_returns_404() {
    let resp = app().oneshot(get("/breach/NoSuchBreach")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- breachedaccount ---

#[tokio::test]
async fn breached_account_requires_key() {
    let uri = format!("/breachedaccount/{ACCOUNT_EXISTS}");
    let resp = app().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app().oneshot(get_with_key(&uri, "wrong-key")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn breached_account_is_truncated_by_default() {
    let uri = format!("/breachedaccount/{ACCOUNT_EXISTS}");
    let resp = app().oneshot(get_with_key(&uri, DEFAULT_API_KEY)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let value: serde_json::Value = body_json(resp).await;
    assert_eq!(value, serde_json::json!([{"Name": "Adobe"}]));
}

#[tokio::test]
async fn breached_account_full_records_when_untruncated() {
    let uri = format!("/breachedaccount/{ACCOUNT_EXISTS}?truncateResponse=false");
    let resp = app().oneshot(get_with_key(&uri, DEFAULT_API_KEY)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let breaches: Vec<Breach> = body_json(resp).await;
    assert_eq!(breaches[0].pwn_count, 152_445_165);
}

#[tokio::test]
async fn breached_account_hides_unverified_unless_asked() {
    let uri = format!("/breachedaccount/{MULTIPLE_BREACHES}");
    let resp = app().oneshot(get_with_key(&uri, DEFAULT_API_KEY)).await.unwrap();
    let names: Vec<serde_json::Value> = body_json(resp).await;
    assert_eq!(names.len(), 2);

    let uri = format!("/breachedaccount/{MULTIPLE_BREACHES}?includeUnverified=true");
    let resp = app().oneshot(get_with_key(&uri, DEFAULT_API_KEY)).await.unwrap();
    let names: Vec<serde_json::Value> = body_json(resp).await;
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn breached_account_unknown_returns_404() {
    let resp = app()
        .oneshot(get_with_key(
            "/breachedaccount/not-active-breach@hibp-integration-tests.com",
            DEFAULT_API_KEY,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn breached_account_percent_encoded_path_is_decoded() {
    let resp = app()
        .oneshot(get_with_key(
            "/breachedaccount/reserved%2F..%2Fchars%3Fx=1%23frag%20+@hibp-integration-tests.com",
            DEFAULT_API_KEY,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- dataclasses ---

#[tokio::test]
async fn data_classes_in_fixture_order() {
    let resp = app().oneshot(get("/dataclasses")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let classes: Vec<String> = body_json(resp).await;
    assert_eq!(classes[0], "Account balances");
    assert_eq!(classes[1], "Age groups");
}

// --- pasteaccount ---

#[tokio::test]
async fn paste_account_returns_pastes() {
    let uri = format!("/pasteaccount/{PASTE_ACCOUNT}");
    let resp = app().oneshot(get_with_key(&uri, DEFAULT_API_KEY)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pastes: Vec<Paste> = body_json(resp).await;
    assert_eq!(pastes.len(), 1);
    assert_eq!(pastes[0].id, "uQNGpAxp");
}

// --- range ---

#[tokio::test]
async fn range_returns_crlf_lines() {
    let resp = app().oneshot(get("/range/21BD1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"2DC183F740EE76F27B78EB39C8AD972A757:83129"));
}

#[tokio::test]
async fn range_with_padding_adds_zero_counts() {
    let request = Request::builder()
        .uri("/range/21bd1")
        .header(PADDING_HEADER, "true")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    let zero_lines = text.split("\r\n").filter(|l| l.ends_with(":0")).count();
    assert_eq!(zero_lines, PADDING_ENTRIES);
}

#[tokio::test]
async fn range_rejects_non_hex_prefix() {
    let resp = app().oneshot(get("/range/1234G")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
