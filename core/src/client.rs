//! Stateless HTTP request builder and response parser for the HoodPay API.
//!
//! # Design
//! `HoodPayClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. Each remote operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The transports run the round-trip in between, so the
//! request/response contract is defined exactly once for both the blocking
//! and the non-blocking API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{CreatePayment, CreateWebhook, FillCustomerEmail, ListPaymentsParams, SelectPaymentMethod};
use crate::types::{Document, Payment};

/// Shown when a payment list response is not JSON at all.
const UNPARSABLE_BODY: &str = "could not parse response body";

/// Sans-IO client for the HoodPay API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct HoodPayClient {
    config: ClientConfig,
}

impl HoodPayClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    pub fn build_list_payments(&self, params: &ListPaymentsParams) -> HttpRequest {
        let mut url = self.business_url("/payments");
        let pairs = params.query_pairs();
        if !pairs.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_create_payment(&self, input: &CreatePayment) -> Result<HttpRequest, ApiError> {
        let body = to_body(input)?;
        Ok(self.request(HttpMethod::Post, self.business_url("/payments"), Some(body)))
    }

    pub fn build_get_payment(&self, payment_id: u64) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            self.business_url(&format!("/payments/{payment_id}")),
            None,
        )
    }

    // -----------------------------------------------------------------------
    // Hosted checkout page
    // -----------------------------------------------------------------------

    pub fn build_select_payment_method(
        &self,
        payment_id: &str,
        payment_method: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_body(&SelectPaymentMethod { payment_method })?;
        Ok(self.request(
            HttpMethod::Post,
            self.hosted_page_url(payment_id, "/select-payment-method"),
            Some(body),
        ))
    }

    pub fn build_fill_customer_email(&self, payment_id: &str, email: &str) -> Result<HttpRequest, ApiError> {
        let body = to_body(&FillCustomerEmail { email })?;
        Ok(self.request(
            HttpMethod::Post,
            self.hosted_page_url(payment_id, "/customer_email"),
            Some(body),
        ))
    }

    pub fn build_cancel_payment(&self, payment_id: &str) -> HttpRequest {
        self.request(HttpMethod::Post, self.hosted_page_url(payment_id, "/cancel"), None)
    }

    // -----------------------------------------------------------------------
    // Dashboard: webhooks and businesses
    // -----------------------------------------------------------------------

    pub fn build_get_webhook_settings(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.webhooks_url(""), None)
    }

    pub fn build_create_webhook(&self, input: &CreateWebhook) -> Result<HttpRequest, ApiError> {
        let body = to_body(input)?;
        Ok(self.request(HttpMethod::Post, self.webhooks_url(""), Some(body)))
    }

    pub fn build_reset_webhook_secret(&self) -> HttpRequest {
        self.request(HttpMethod::Post, self.webhooks_url("/reset-secret"), None)
    }

    pub fn build_delete_webhook(&self, webhook_id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, self.webhooks_url(&format!("/{webhook_id}")), None)
    }

    pub fn build_list_businesses(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/dash/businesses", self.config.base_url()), None)
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    /// Decode a payment list.
    ///
    /// Anything other than a JSON body with a non-empty `data` array whose
    /// first entry has an `id` is a `RequestError`, carrying the server's
    /// `message` when it sent one.
    pub fn parse_list_payments(&self, response: HttpResponse) -> Result<Vec<Payment>, ApiError> {
        let body: Value = serde_json::from_str(&response.body).map_err(|_| ApiError::RequestError {
            message: UNPARSABLE_BODY.to_string(),
        })?;
        let fail = |fallback: String| ApiError::RequestError {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or(fallback),
        };

        if !response.is_success() {
            return Err(fail(format!("HTTP {}", response.status)));
        }
        let items = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| fail("response has no data array".to_string()))?;
        match items.first() {
            Some(first) if first.get("id").is_some() => {}
            Some(_) => return Err(fail("first payment has no id".to_string())),
            None => return Err(fail("no payments returned".to_string())),
        }

        items
            .iter()
            .map(Payment::deserialize)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| fail(format!("malformed payment: {e}")))
    }

    /// Return a successful response body verbatim. Every operation except
    /// `list_payments` is parsed this way.
    pub fn parse_document(&self, response: HttpResponse) -> Result<Document, ApiError> {
        if !response.is_success() {
            return Err(ApiError::HttpError {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Document::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn business_url(&self, path: &str) -> String {
        format!(
            "{}/businesses/{}{path}",
            self.config.base_url(),
            self.config.business_id()
        )
    }

    fn hosted_page_url(&self, payment_id: &str, action: &str) -> String {
        format!(
            "{}/public/payments/hosted-page/{}{action}",
            self.config.base_url(),
            encode_segment(payment_id)
        )
    }

    fn webhooks_url(&self, path: &str) -> String {
        format!(
            "{}/dash/businesses/{}/settings/developer/webhooks{path}",
            self.config.base_url(),
            self.config.business_id()
        )
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            (
                "authorization".to_string(),
                format!("Bearer {}", self.config.api_key()),
            ),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn to_body<T: Serialize>(input: &T) -> Result<String, ApiError> {
    serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Percent-encode a caller-supplied path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
