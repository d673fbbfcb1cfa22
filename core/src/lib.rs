//! Client for the HoodPay payment API.
//!
//! # Overview
//! `HoodPay` (async, reqwest) and `blocking::HoodPay` (ureq) expose one
//! method per remote operation. Both are thin shells around
//! `HoodPayClient`, which builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network.
//!
//! # Design
//! - `HoodPayClient` is stateless: it holds only a `ClientConfig`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   wire contract is written once for both transports.
//! - `Payment` and `DirectCryptoCharge` are typed; every other response is
//!   an open `Document`.
//! - No retries, no timeouts of its own; configure those on the reqwest
//!   client or ureq agent handed to the constructors.

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod nonblocking;
pub mod params;
pub mod types;

pub use client::HoodPayClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use nonblocking::HoodPay;
pub use params::{CreatePayment, CreateWebhook, ListPaymentsParams, DEFAULT_PAYMENT_METHOD};
pub use types::{DirectCryptoCharge, Document, Payment, PaymentStatus};
