//! Payment provider abstraction layer
//!
//! This module defines the `PaymentProvider` trait which abstracts PIX charge creation across
//! gateways. The rest of the service only ever asks for "a PIX code for this customer".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::config::PaymentConfig;

pub mod dummy;
pub mod onexpay;

/// Create a payment provider from configuration
///
/// This is the single point where we convert config into provider instances.
/// Adding a new provider requires adding a match arm here.
pub fn create_provider(config: PaymentConfig) -> Result<Box<dyn PaymentProvider>> {
    Ok(match config {
        PaymentConfig::Onexpay(onexpay_config) => Box::new(onexpay::OnexpayProvider::try_from(onexpay_config)?),
        PaymentConfig::Dummy(dummy_config) => Box::new(dummy::DummyProvider::from(dummy_config)),
    })
}

/// Result type for payment provider operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors that can occur while creating a PIX charge
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider API error: {0}")]
    ProviderApi(String),

    #[error("HTTP error talking to payment provider: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid payment data: {0}")]
    InvalidData(String),

    #[error("Payment provider returned no PIX code")]
    MissingPixCode,
}

/// Identity document attached to the customer, when the gateway requires one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

/// The payer as sent to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub name: String,
    pub email: String,
    /// Digits only
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<CustomerDocument>,
}

/// Everything a provider needs to create one PIX charge
#[derive(Debug, Clone)]
pub struct PixChargeRequest {
    pub amount_cents: i64,
    pub item_title: String,
    pub expires_in_secs: u64,
    pub customer: Customer,
}

/// A created PIX charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PixCharge {
    /// QR code image, either an `http(s)` URL or a `data:image/png;base64,` URI
    pub qrcode: Option<String>,
    /// The copy-and-paste PIX code
    pub qrcode_text: String,
}

/// Abstract payment provider interface
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a PIX charge and return its QR image and copy-and-paste code
    async fn create_pix_charge(&self, request: &PixChargeRequest) -> Result<PixCharge>;
}

/// Gateways disagree on where the PIX fields live; take the first non-empty string among `paths`.
fn first_string<'a>(body: &'a Value, paths: &[&str]) -> Option<&'a str> {
    paths
        .iter()
        .filter_map(|path| body.pointer(path).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Read a gateway response into a [`PixCharge`].
///
/// The image is looked up at `pix.qrcode`, `qrcode` then `qrCodeImage`; the copy-and-paste code at
/// `pix.qrcode_text`, `qrcode_text` then `emv`. A missing code is an error, a missing image is not.
pub fn extract_pix_charge(body: &Value) -> Result<PixCharge> {
    let qrcode_text = first_string(body, &["/pix/qrcode_text", "/qrcode_text", "/emv"]).ok_or(PaymentError::MissingPixCode)?;
    let qrcode = first_string(body, &["/pix/qrcode", "/qrcode", "/qrCodeImage"]).map(normalize_qr_image);

    Ok(PixCharge {
        qrcode,
        qrcode_text: qrcode_text.to_string(),
    })
}

/// URLs are kept as they are, anything else is taken to be base64 PNG data.
pub fn normalize_qr_image(image: &str) -> String {
    if image.starts_with("http") {
        image.to_string()
    } else {
        format!("data:image/png;base64,{image}")
    }
}
