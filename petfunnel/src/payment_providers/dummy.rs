//! Dummy payment provider implementation
//!
//! Produces a deterministic, obviously fake PIX code without any network access. Meant for local
//! development and tests.

use async_trait::async_trait;

use crate::{
    config::DummyConfig,
    payment_providers::{PaymentError, PaymentProvider, PixCharge, PixChargeRequest, Result},
};

/// Dummy payment provider
pub struct DummyProvider {
    qrcode_url: Option<String>,
}

impl From<DummyConfig> for DummyProvider {
    fn from(config: DummyConfig) -> Self {
        Self {
            qrcode_url: config.qrcode_url,
        }
    }
}

#[async_trait]
impl PaymentProvider for DummyProvider {
    async fn create_pix_charge(&self, request: &PixChargeRequest) -> Result<PixCharge> {
        if request.amount_cents <= 0 {
            return Err(PaymentError::InvalidData(format!("amount must be positive, got {}", request.amount_cents)));
        }

        tracing::info!(amount_cents = request.amount_cents, "Dummy provider created PIX charge");

        Ok(PixCharge {
            qrcode: self.qrcode_url.clone(),
            qrcode_text: format!("DUMMY-PIX-{}-{}", request.amount_cents, request.customer.phone),
        })
    }
}
