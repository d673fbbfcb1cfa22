//! Non-blocking HoodPay client on top of `reqwest`.
//!
//! Every method builds its request with `HoodPayClient`, performs one
//! round-trip and hands the response back to the matching parser. Calls share
//! nothing but reqwest's connection pool, so any number of them can be in
//! flight on one (cloned) client.

use log::{debug, trace};

use crate::client::HoodPayClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{CreatePayment, CreateWebhook, ListPaymentsParams};
use crate::types::{Document, Payment};

/// Async HoodPay API client.
#[derive(Debug, Clone)]
pub struct HoodPay {
    api: HoodPayClient,
    http: reqwest::Client,
}

impl HoodPay {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured reqwest client, e.g. one with timeouts or a proxy.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self {
            api: HoodPayClient::new(config),
            http,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub async fn list_payments(&self, params: &ListPaymentsParams) -> Result<Vec<Payment>, ApiError> {
        let response = self.execute(self.api.build_list_payments(params)).await?;
        self.api.parse_list_payments(response)
    }

    pub async fn create_payment(&self, input: &CreatePayment) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_create_payment(input)?).await?;
        self.api.parse_document(response)
    }

    pub async fn get_payment(&self, payment_id: u64) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_get_payment(payment_id)).await?;
        self.api.parse_document(response)
    }

    pub async fn select_payment_method(&self, payment_id: &str, payment_method: &str) -> Result<Document, ApiError> {
        let request = self.api.build_select_payment_method(payment_id, payment_method)?;
        let response = self.execute(request).await?;
        self.api.parse_document(response)
    }

    pub async fn fill_customer_email(&self, payment_id: &str, email: &str) -> Result<Document, ApiError> {
        let request = self.api.build_fill_customer_email(payment_id, email)?;
        let response = self.execute(request).await?;
        self.api.parse_document(response)
    }

    pub async fn cancel_payment(&self, payment_id: &str) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_cancel_payment(payment_id)).await?;
        self.api.parse_document(response)
    }

    pub async fn get_webhook_settings(&self) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_get_webhook_settings()).await?;
        self.api.parse_document(response)
    }

    pub async fn create_webhook(&self, input: &CreateWebhook) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_create_webhook(input)?).await?;
        self.api.parse_document(response)
    }

    pub async fn reset_webhook_secret(&self) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_reset_webhook_secret()).await?;
        self.api.parse_document(response)
    }

    pub async fn delete_webhook(&self, webhook_id: u64) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_delete_webhook(webhook_id)).await?;
        self.api.parse_document(response)
    }

    pub async fn list_businesses(&self) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_list_businesses()).await?;
        self.api.parse_document(response)
    }

    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", req.method, req.url);
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, req.url.as_str());
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ApiError::transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::transport)?;
        trace!("{} {} -> {status}", req.method, req.url);

        Ok(HttpResponse { status, body })
    }
}
