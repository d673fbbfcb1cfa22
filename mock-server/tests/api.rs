use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_db, new_db, Db, Payment};
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {KEY}"))
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {KEY}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn stateful() -> (Db, Router) {
    let db = new_db(KEY, 1);
    (db.clone(), app_with_db(db))
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_is_unauthorized() {
    let resp = app(KEY)
        .oneshot(Request::builder().uri("/v1/dash/businesses").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Unauthorized");
}

#[tokio::test]
async fn wrong_bearer_is_unauthorized() {
    let resp = app("other-key")
        .oneshot(authed("GET", "/v1/dash/businesses"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_are_recorded() {
    let (db, app) = stateful();
    app.oneshot(json_request("POST", "/v1/businesses/1/payments", r#"{"currency":"USD","amount":5}"#))
        .await
        .unwrap();

    let store = db.read().await;
    assert_eq!(store.requests.len(), 1);
    let recorded = &store.requests[0];
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.path, "/v1/businesses/1/payments");
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer test-key"));
    assert_eq!(recorded.body, r#"{"currency":"USD","amount":5}"#);
}

// --- payments ---

#[tokio::test]
async fn list_payments_empty_has_message() {
    let resp = app(KEY)
        .oneshot(authed("GET", "/v1/businesses/1/payments?paymentMethod=DIRECT_CRYPTO"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "no payments found");
}

#[tokio::test]
async fn unknown_business_is_not_found() {
    let resp = app(KEY)
        .oneshot(authed("GET", "/v1/businesses/99/payments"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_payment_returns_201() {
    let resp = app(KEY)
        .oneshot(json_request(
            "POST",
            "/v1/businesses/1/payments",
            r#"{"currency":"USD","amount":12.5,"description":"Coffee"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"]["id"], 1);
}

#[tokio::test]
async fn create_payment_malformed_json_returns_422() {
    let resp = app(KEY)
        .oneshot(json_request("POST", "/v1/businesses/1/payments", r#"{"amount":5}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_payment_not_found() {
    let resp = app(KEY)
        .oneshot(authed("GET", "/v1/businesses/1/payments/12345"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Payment not found");
}

#[tokio::test]
async fn hosted_page_does_not_need_bearer() {
    let (db, app) = stateful();
    app.clone()
        .oneshot(json_request("POST", "/v1/businesses/1/payments", r#"{"currency":"USD","amount":3}"#))
        .await
        .unwrap();

    let resp = app
        .oneshot(Request::builder().method("POST").uri("/v1/public/payments/hosted-page/1/cancel").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(db.read().await.payments[0].status, "CANCELLED");
}

// --- full payment lifecycle ---

#[tokio::test]
async fn payment_lifecycle() {
    let (_db, app) = stateful();

    // create
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/businesses/1/payments",
            r#"{"currency":"EUR","amount":20,"name":"Order 7"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // not listed until a method is selected
    let resp = app
        .clone()
        .oneshot(authed("GET", "/v1/businesses/1/payments?paymentMethod=DIRECT_CRYPTO"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // select method
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/public/payments/hosted-page/1/select-payment-method",
            r#"{"direct_Crypto":"BITCOIN"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // fill email
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/public/payments/hosted-page/1/customer_email",
            r#"{"email":"buyer@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // list now has it
    let resp = app
        .clone()
        .oneshot(authed("GET", "/v1/businesses/1/payments?paymentMethod=DIRECT_CRYPTO"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    let listed: Vec<Payment> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].customer_email.as_deref(), Some("buyer@example.com"));
    assert_eq!(listed[0].direct_crypto_charge.as_ref().unwrap().currency, "BITCOIN");

    // cancel, then cancelling again is rejected
    let resp = app
        .clone()
        .oneshot(authed("POST", "/v1/public/payments/hosted-page/1/cancel"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app
        .clone()
        .oneshot(authed("POST", "/v1/public/payments/hosted-page/1/cancel"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // get reflects the cancellation
    let resp = app
        .oneshot(authed("GET", "/v1/businesses/1/payments/1"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"]["status"], "CANCELLED");
}

// --- webhooks ---

#[tokio::test]
async fn webhook_lifecycle() {
    let (_db, app) = stateful();
    let base = "/v1/dash/businesses/1/settings/developer/webhooks";

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            base,
            r#"{"url":"https://shop.example/hook","events":["PAYMENT_COMPLETED"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    assert_eq!(created["data"]["id"], 1);

    let resp = app.clone().oneshot(authed("GET", base)).await.unwrap();
    let settings: Value = body_json(resp).await;
    assert_eq!(settings["data"]["webhooks"][0]["events"][0], "PAYMENT_COMPLETED");
    let old_secret = settings["data"]["secret"].clone();

    let resp = app
        .clone()
        .oneshot(authed("POST", &format!("{base}/reset-secret")))
        .await
        .unwrap();
    let reset: Value = body_json(resp).await;
    assert_ne!(reset["data"]["secret"], old_secret);

    let resp = app
        .clone()
        .oneshot(authed("DELETE", &format!("{base}/1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(authed("DELETE", &format!("{base}/1"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_bytes(resp).await;
    assert!(!body.is_empty());
}

#[tokio::test]
async fn list_businesses_returns_configured_business() {
    let resp = app(KEY).oneshot(authed("GET", "/v1/dash/businesses")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"][0]["id"], 1);
}

#[tokio::test]
async fn huge_page_values_return_empty_page() {
    let (_db, app) = stateful();
    app.clone()
        .oneshot(json_request("POST", "/v1/businesses/1/payments", r#"{"currency":"USD","amount":3}"#))
        .await
        .unwrap();

    let max = usize::MAX;
    let resp = app
        .oneshot(authed("GET", &format!("/v1/businesses/1/payments?pageNumber={max}&pageSize={max}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
