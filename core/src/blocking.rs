//! Blocking HoodPay client on top of `ureq`.
//!
//! Same operations and semantics as the async [`crate::HoodPay`]; each call
//! blocks the current thread for one round-trip.

use std::fmt;

use log::{debug, trace};

use crate::client::HoodPayClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{CreatePayment, CreateWebhook, ListPaymentsParams};
use crate::types::{Document, Payment};

/// Blocking HoodPay API client.
#[derive(Clone)]
pub struct HoodPay {
    api: HoodPayClient,
    agent: ureq::Agent,
}

impl HoodPay {
    pub fn new(config: ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(config, agent)
    }

    /// Use a preconfigured agent, e.g. one with timeouts.
    pub fn with_agent(config: ClientConfig, agent: ureq::Agent) -> Self {
        Self {
            api: HoodPayClient::new(config),
            agent,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub fn list_payments(&self, params: &ListPaymentsParams) -> Result<Vec<Payment>, ApiError> {
        let response = self.execute(self.api.build_list_payments(params))?;
        self.api.parse_list_payments(response)
    }

    pub fn create_payment(&self, input: &CreatePayment) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_create_payment(input)?)?;
        self.api.parse_document(response)
    }

    pub fn get_payment(&self, payment_id: u64) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_get_payment(payment_id))?;
        self.api.parse_document(response)
    }

    pub fn select_payment_method(&self, payment_id: &str, payment_method: &str) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_select_payment_method(payment_id, payment_method)?)?;
        self.api.parse_document(response)
    }

    pub fn fill_customer_email(&self, payment_id: &str, email: &str) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_fill_customer_email(payment_id, email)?)?;
        self.api.parse_document(response)
    }

    pub fn cancel_payment(&self, payment_id: &str) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_cancel_payment(payment_id))?;
        self.api.parse_document(response)
    }

    pub fn get_webhook_settings(&self) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_get_webhook_settings())?;
        self.api.parse_document(response)
    }

    pub fn create_webhook(&self, input: &CreateWebhook) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_create_webhook(input)?)?;
        self.api.parse_document(response)
    }

    pub fn reset_webhook_secret(&self) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_reset_webhook_secret())?;
        self.api.parse_document(response)
    }

    pub fn delete_webhook(&self, webhook_id: u64) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_delete_webhook(webhook_id))?;
        self.api.parse_document(response)
    }

    pub fn list_businesses(&self) -> Result<Document, ApiError> {
        let response = self.execute(self.api.build_list_businesses())?;
        self.api.parse_document(response)
    }

    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", req.method, req.url);
        let url = req.url.as_str();

        let result = match req.method {
            HttpMethod::Get => prepare(self.agent.get(url), &req.headers).call(),
            HttpMethod::Delete => prepare(self.agent.delete(url), &req.headers).call(),
            HttpMethod::Post => {
                let builder = prepare(self.agent.post(url), &req.headers);
                match &req.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(ApiError::transport)?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().map_err(ApiError::transport)?;
        trace!("{} {} -> {status}", req.method, req.url);

        Ok(HttpResponse { status, body })
    }
}

impl fmt::Debug for HoodPay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoodPay").field("api", &self.api).finish_non_exhaustive()
    }
}

/// Status codes always reach the parser, whatever the agent was built with.
fn prepare<B>(builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    let mut builder = builder.config().http_status_as_error(false).build();
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
