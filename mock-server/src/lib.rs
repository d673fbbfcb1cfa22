use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectCryptoCharge {
    pub amount: f64,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    pub name: Option<String>,
    pub end_amount: f64,
    pub currency: String,
    pub description: Option<String>,
    pub customer_email: Option<String>,
    pub customer_ip: Option<String>,
    pub customer_user_agent: Option<String>,
    pub redirect_url: Option<String>,
    pub notify_url: Option<String>,
    pub created_at: i64,
    pub status: String,
    pub selected_payment_method: Option<String>,
    pub direct_crypto_charge: Option<DirectCryptoCharge>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: u64,
    pub url: Option<String>,
    pub description: Option<String>,
    pub events: Vec<String>,
    pub created_at: i64,
}

/// One request as it arrived on the wire.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug)]
pub struct Store {
    pub api_key: String,
    pub business_id: u64,
    pub payments: Vec<Payment>,
    pub webhooks: Vec<Webhook>,
    pub webhook_secret: String,
    pub requests: Vec<RecordedRequest>,
    next_payment_id: u64,
    next_webhook_id: u64,
    secret_generation: u64,
}

impl Store {
    pub fn new(api_key: &str, business_id: u64) -> Self {
        Self {
            api_key: api_key.to_string(),
            business_id,
            payments: Vec::new(),
            webhooks: Vec::new(),
            webhook_secret: "whsec_1".to_string(),
            requests: Vec::new(),
            next_payment_id: 1,
            next_webhook_id: 1,
            secret_generation: 1,
        }
    }

    /// Add a payment with a fresh id and return that id.
    pub fn insert_payment(&mut self, mut payment: Payment) -> u64 {
        payment.id = self.next_payment_id;
        self.next_payment_id += 1;
        self.payments.push(payment);
        self.next_payment_id - 1
    }

    fn payment_mut(&mut self, raw_id: &str) -> Result<&mut Payment, Failure> {
        let id: u64 = raw_id
            .parse()
            .map_err(|_| failure(StatusCode::NOT_FOUND, "Payment not found"))?;
        self.payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Payment not found"))
    }

    fn check_business(&self, business_id: u64) -> Result<(), Failure> {
        if business_id == self.business_id {
            Ok(())
        } else {
            Err(failure(StatusCode::NOT_FOUND, "Business not found"))
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);
type Reply = Result<Json<Value>, Failure>;

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "message": message })))
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn new_db(api_key: &str, business_id: u64) -> Db {
    Arc::new(RwLock::new(Store::new(api_key, business_id)))
}

/// Router for a fresh store that accepts `api_key` for business `1`.
pub fn app(api_key: &str) -> Router {
    app_with_db(new_db(api_key, 1))
}

pub fn app_with_db(db: Db) -> Router {
    let api = Router::new()
        .route("/businesses/{business_id}/payments", get(list_payments).post(create_payment))
        .route("/businesses/{business_id}/payments/{payment_id}", get(get_payment))
        .route(
            "/public/payments/hosted-page/{payment_id}/select-payment-method",
            post(select_payment_method),
        )
        .route(
            "/public/payments/hosted-page/{payment_id}/customer_email",
            post(fill_customer_email),
        )
        .route("/public/payments/hosted-page/{payment_id}/cancel", post(cancel_payment))
        .route(
            "/dash/businesses/{business_id}/settings/developer/webhooks",
            get(get_webhooks).post(create_webhook),
        )
        .route(
            "/dash/businesses/{business_id}/settings/developer/webhooks/reset-secret",
            post(reset_webhook_secret),
        )
        .route(
            "/dash/businesses/{business_id}/settings/developer/webhooks/{webhook_id}",
            delete(delete_webhook),
        )
        .route("/dash/businesses", get(list_businesses));

    Router::new()
        .nest("/v1", api)
        .layer(middleware::from_fn_with_state(db.clone(), record_and_authorize))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

/// Record every request, then reject non-public calls without the bearer key.
async fn record_and_authorize(State(db): State<Db>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return failure(StatusCode::PAYLOAD_TOO_LARGE, "Body too large").into_response(),
    };
    let header_value = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_owned),
        authorization: header_value(header::AUTHORIZATION),
        accept: header_value(header::ACCEPT),
        content_type: header_value(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    debug!("{} {}", recorded.method, recorded.path);

    let authorized = {
        let mut store = db.write().await;
        let expected = format!("Bearer {}", store.api_key);
        let authorized = recorded.path.starts_with("/v1/public/")
            || recorded.authorization.as_deref() == Some(expected.as_str());
        store.requests.push(recorded);
        authorized
    };
    if !authorized {
        return failure(StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_number: Option<usize>,
    pub page_size: Option<usize>,
    pub from_time: Option<i64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub from_amount: Option<f64>,
    pub to_amount: Option<f64>,
    pub search_string: Option<String>,
}

impl ListQuery {
    fn matches(&self, payment: &Payment) -> bool {
        let contains = |field: &Option<String>, needle: &str| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
        };
        self.from_time.map_or(true, |t| payment.created_at >= t)
            && self.status.as_ref().map_or(true, |s| &payment.status == s)
            && self
                .payment_method
                .as_ref()
                .map_or(true, |m| payment.selected_payment_method.as_ref() == Some(m))
            && self.from_amount.map_or(true, |a| payment.end_amount >= a)
            && self.to_amount.map_or(true, |a| payment.end_amount <= a)
            && self.search_string.as_ref().map_or(true, |needle| {
                contains(&payment.description, needle)
                    || contains(&payment.customer_email, needle)
                    || contains(&payment.name, needle)
            })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentBody {
    pub currency: String,
    pub amount: f64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub customer_email: Option<String>,
    pub customer_ip: Option<String>,
    pub customer_user_agent: Option<String>,
    pub redirect_url: Option<String>,
    pub notify_url: Option<String>,
}

async fn list_payments(
    State(db): State<Db>,
    Path(business_id): Path<u64>,
    Query(query): Query<ListQuery>,
) -> Reply {
    let store = db.read().await;
    store.check_business(business_id)?;

    let page_size = query.page_size.unwrap_or(20).max(1);
    let skip = query.page_number.unwrap_or(1).saturating_sub(1).saturating_mul(page_size);
    let page: Vec<&Payment> = store
        .payments
        .iter()
        .filter(|p| query.matches(p))
        .skip(skip)
        .take(page_size)
        .collect();

    if page.is_empty() {
        return Ok(Json(json!({ "data": [], "message": "no payments found" })));
    }
    Ok(Json(json!({ "data": page })))
}

async fn create_payment(
    State(db): State<Db>,
    Path(business_id): Path<u64>,
    Json(input): Json<CreatePaymentBody>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut store = db.write().await;
    store.check_business(business_id)?;
    if input.amount <= 0.0 {
        return Err(failure(StatusCode::BAD_REQUEST, "Amount must be positive"));
    }

    let id = store.insert_payment(Payment {
        id: 0,
        name: input.name,
        end_amount: input.amount,
        currency: input.currency,
        description: input.description,
        customer_email: input.customer_email,
        customer_ip: input.customer_ip,
        customer_user_agent: input.customer_user_agent,
        redirect_url: input.redirect_url,
        notify_url: input.notify_url,
        created_at: now(),
        status: "PENDING".to_string(),
        selected_payment_method: None,
        direct_crypto_charge: None,
    });
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": { "id": id, "url": format!("https://pay.hoodpay.io/{id}") },
            "message": "Payment created"
        })),
    ))
}

async fn get_payment(State(db): State<Db>, Path((business_id, payment_id)): Path<(u64, String)>) -> Reply {
    let mut store = db.write().await;
    store.check_business(business_id)?;
    let payment = store.payment_mut(&payment_id)?;
    Ok(Json(json!({ "data": payment })))
}

// ---------------------------------------------------------------------------
// Hosted page
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SelectMethodBody {
    #[serde(rename = "direct_Crypto")]
    pub coin: String,
}

#[derive(Deserialize)]
pub struct CustomerEmailBody {
    pub email: String,
}

async fn select_payment_method(
    State(db): State<Db>,
    Path(payment_id): Path<String>,
    Json(input): Json<SelectMethodBody>,
) -> Reply {
    let mut store = db.write().await;
    let payment = store.payment_mut(&payment_id)?;
    if payment.status != "PENDING" {
        return Err(failure(StatusCode::BAD_REQUEST, "Payment is not pending"));
    }
    payment.selected_payment_method = Some("DIRECT_CRYPTO".to_string());
    payment.direct_crypto_charge = Some(DirectCryptoCharge {
        amount: payment.end_amount,
        currency: input.coin,
    });
    Ok(Json(json!({ "data": payment, "message": "Payment method selected" })))
}

async fn fill_customer_email(
    State(db): State<Db>,
    Path(payment_id): Path<String>,
    Json(input): Json<CustomerEmailBody>,
) -> Reply {
    if !input.email.contains('@') {
        return Err(failure(StatusCode::BAD_REQUEST, "Invalid email"));
    }
    let mut store = db.write().await;
    let payment = store.payment_mut(&payment_id)?;
    payment.customer_email = Some(input.email);
    Ok(Json(json!({ "data": payment, "message": "Customer email saved" })))
}

async fn cancel_payment(State(db): State<Db>, Path(payment_id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let payment = store.payment_mut(&payment_id)?;
    if payment.status != "PENDING" {
        return Err(failure(StatusCode::BAD_REQUEST, "Payment cannot be cancelled"));
    }
    payment.status = "CANCELLED".to_string();
    Ok(Json(json!({ "data": payment, "message": "Payment cancelled" })))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateWebhookBody {
    pub url: Option<String>,
    pub description: Option<String>,
    pub events: Option<Vec<String>>,
}

async fn get_webhooks(State(db): State<Db>, Path(business_id): Path<u64>) -> Reply {
    let store = db.read().await;
    store.check_business(business_id)?;
    Ok(Json(json!({
        "data": { "secret": store.webhook_secret, "webhooks": store.webhooks }
    })))
}

async fn create_webhook(
    State(db): State<Db>,
    Path(business_id): Path<u64>,
    Json(input): Json<CreateWebhookBody>,
) -> Reply {
    let mut store = db.write().await;
    store.check_business(business_id)?;
    let webhook = Webhook {
        id: store.next_webhook_id,
        url: input.url,
        description: input.description,
        events: input.events.unwrap_or_default(),
        created_at: now(),
    };
    store.next_webhook_id += 1;
    store.webhooks.push(webhook.clone());
    Ok(Json(json!({ "data": webhook, "message": "Webhook created" })))
}

async fn reset_webhook_secret(State(db): State<Db>, Path(business_id): Path<u64>) -> Reply {
    let mut store = db.write().await;
    store.check_business(business_id)?;
    store.secret_generation += 1;
    store.webhook_secret = format!("whsec_{}", store.secret_generation);
    Ok(Json(json!({ "data": { "secret": store.webhook_secret } })))
}

async fn delete_webhook(State(db): State<Db>, Path((business_id, webhook_id)): Path<(u64, u64)>) -> Reply {
    let mut store = db.write().await;
    store.check_business(business_id)?;
    let before = store.webhooks.len();
    store.webhooks.retain(|w| w.id != webhook_id);
    if store.webhooks.len() == before {
        return Err(failure(StatusCode::NOT_FOUND, "Webhook not found"));
    }
    Ok(Json(json!({ "message": "Webhook deleted" })))
}

async fn list_businesses(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    Json(json!({
        "data": [{ "id": store.business_id, "name": "Mock Business" }]
    }))
}
