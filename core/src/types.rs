//! Response models for the HoodPay API.
//!
//! # Design
//! Only the payment list has a documented shape, so `Payment` and
//! `DirectCryptoCharge` are the only typed records. Every other operation
//! returns a `Document`, an open JSON value, until the service publishes a
//! schema worth committing to.
//!
//! Required keys are enforced at decode time. Nullable fields use
//! `deserialize_with` so that `null` is accepted but an absent key is not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Untyped server response body.
pub type Document = serde_json::Value;

/// Crypto-denominated amount attached to a payment paid with `DIRECT_CRYPTO`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectCryptoCharge {
    pub amount: f64,
    pub currency: String,
}

/// Snapshot of a payment as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    pub end_amount: f64,
    pub currency: String,
    #[serde(deserialize_with = "nullable")]
    pub description: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub customer_email: Option<String>,
    #[serde(with = "unix_seconds")]
    pub created_at: DateTime<Utc>,
    pub status: PaymentStatus,
    #[serde(deserialize_with = "nullable")]
    pub selected_payment_method: Option<String>,
    #[serde(default)]
    pub direct_crypto_charge: Option<DirectCryptoCharge>,
}

/// Lifecycle state of a payment. The set is owned by the service; anything
/// unrecognised is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
    Expired,
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Cancelled => "CANCELLED",
            PaymentStatus::Expired => "EXPIRED",
            PaymentStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => PaymentStatus::Pending,
            "COMPLETED" => PaymentStatus::Completed,
            "CANCELLED" => PaymentStatus::Cancelled,
            "EXPIRED" => PaymentStatus::Expired,
            _ => PaymentStatus::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer)
}

/// Unix timestamps in seconds. The service sends integers, but fractional
/// seconds are accepted too.
mod unix_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        match value.timestamp_subsec_nanos() {
            0 => serializer.serialize_i64(value.timestamp()),
            nanos => serializer.serialize_f64(value.timestamp() as f64 + f64::from(nanos) / 1e9),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = serde_json::Number::deserialize(deserializer)?;
        let decoded = match raw.as_i64() {
            Some(secs) => DateTime::from_timestamp(secs, 0),
            None => raw.as_f64().and_then(|secs| {
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1e9).round() as u32;
                DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            }),
        };
        decoded.ok_or_else(|| D::Error::custom(format!("timestamp out of range: {raw}")))
    }
}
