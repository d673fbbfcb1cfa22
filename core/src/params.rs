//! Request inputs for the HoodPay API.
//!
//! # Design
//! One struct per operation with optional inputs. Unset fields never reach
//! the wire: JSON bodies skip `None` fields and the list query only emits
//! pairs that are set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payment method filter `list_payments` sends unless told otherwise.
pub const DEFAULT_PAYMENT_METHOD: &str = "DIRECT_CRYPTO";

/// Filters and paging for `list_payments`.
///
/// `Default` filters on [`DEFAULT_PAYMENT_METHOD`]; call
/// [`ListPaymentsParams::any_payment_method`] to drop that filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPaymentsParams {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    /// Epoch seconds.
    pub from_time: Option<i64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub from_amount: Option<f64>,
    pub to_amount: Option<f64>,
    pub search_string: Option<String>,
}

impl Default for ListPaymentsParams {
    fn default() -> Self {
        Self {
            page_number: None,
            page_size: None,
            from_time: None,
            status: None,
            payment_method: Some(DEFAULT_PAYMENT_METHOD.to_string()),
            from_amount: None,
            to_amount: None,
            search_string: None,
        }
    }
}

impl ListPaymentsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn from_time(mut self, from_time: DateTime<Utc>) -> Self {
        self.from_time = Some(from_time.timestamp());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    pub fn any_payment_method(mut self) -> Self {
        self.payment_method = None;
        self
    }

    pub fn from_amount(mut self, from_amount: f64) -> Self {
        self.from_amount = Some(from_amount);
        self
    }

    pub fn to_amount(mut self, to_amount: f64) -> Self {
        self.to_amount = Some(to_amount);
        self
    }

    pub fn search_string(mut self, search_string: impl Into<String>) -> Self {
        self.search_string = Some(search_string.into());
        self
    }

    /// Query pairs for the set fields, camelCase keys, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(value) = self.page_number {
            pairs.push(("pageNumber", value.to_string()));
        }
        if let Some(value) = self.page_size {
            pairs.push(("pageSize", value.to_string()));
        }
        if let Some(value) = self.from_time {
            pairs.push(("fromTime", value.to_string()));
        }
        if let Some(value) = &self.status {
            pairs.push(("status", value.clone()));
        }
        if let Some(value) = &self.payment_method {
            pairs.push(("paymentMethod", value.clone()));
        }
        if let Some(value) = self.from_amount {
            pairs.push(("fromAmount", value.to_string()));
        }
        if let Some(value) = self.to_amount {
            pairs.push(("toAmount", value.to_string()));
        }
        if let Some(value) = &self.search_string {
            pairs.push(("searchString", value.clone()));
        }
        pairs
    }
}

/// Body of `create_payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub currency: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
}

impl CreatePayment {
    pub fn new(currency: impl Into<String>, amount: f64) -> Self {
        Self {
            currency: currency.into(),
            amount,
            name: None,
            description: None,
            customer_email: None,
            customer_ip: None,
            customer_user_agent: None,
            redirect_url: None,
            notify_url: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn customer_email(mut self, customer_email: impl Into<String>) -> Self {
        self.customer_email = Some(customer_email.into());
        self
    }

    pub fn customer_ip(mut self, customer_ip: impl Into<String>) -> Self {
        self.customer_ip = Some(customer_ip.into());
        self
    }

    pub fn customer_user_agent(mut self, customer_user_agent: impl Into<String>) -> Self {
        self.customer_user_agent = Some(customer_user_agent.into());
        self
    }

    pub fn redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = Some(redirect_url.into());
        self
    }

    pub fn notify_url(mut self, notify_url: impl Into<String>) -> Self {
        self.notify_url = Some(notify_url.into());
        self
    }
}

/// Body of `create_webhook`. Every field is optional; event names are passed
/// through unchecked and in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateWebhook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
}

impl CreateWebhook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = Some(events.into_iter().map(Into::into).collect());
        self
    }
}

/// Body of the hosted-page `select-payment-method` call. The service keys the
/// chosen method under `direct_Crypto`.
#[derive(Debug, Serialize)]
pub(crate) struct SelectPaymentMethod<'a> {
    #[serde(rename = "direct_Crypto")]
    pub payment_method: &'a str,
}

/// Body of the hosted-page `customer_email` call.
#[derive(Debug, Serialize)]
pub(crate) struct FillCustomerEmail<'a> {
    pub email: &'a str,
}
