//! OnexPay PIX gateway client.
//!
//! One call, `POST {base_url}/v1/transactions`, authenticated with HTTP Basic where the API key is
//! the username and `x` the password.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Serialize;
use url::Url;

use crate::{
    config::OnexpayConfig,
    payment_providers::{Customer, PaymentError, PaymentProvider, PixCharge, PixChargeRequest, Result, extract_pix_charge},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionItem<'a> {
    title: &'a str,
    unit_price: i64,
    quantity: u32,
    tangible: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PixOptions {
    expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransaction<'a> {
    amount: i64,
    payment_method: &'static str,
    customer: &'a Customer,
    items: Vec<TransactionItem<'a>>,
    pix: PixOptions,
}

impl<'a> From<&'a PixChargeRequest> for CreateTransaction<'a> {
    fn from(request: &'a PixChargeRequest) -> Self {
        Self {
            amount: request.amount_cents,
            payment_method: "pix",
            customer: &request.customer,
            items: vec![TransactionItem {
                title: &request.item_title,
                unit_price: request.amount_cents,
                quantity: 1,
                tangible: false,
            }],
            pix: PixOptions {
                expires_in: request.expires_in_secs,
            },
        }
    }
}

pub struct OnexpayProvider {
    client: reqwest::Client,
    transactions_url: Url,
    authorization: HeaderValue,
}

impl TryFrom<OnexpayConfig> for OnexpayProvider {
    type Error = PaymentError;

    fn try_from(config: OnexpayConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let transactions_url = config
            .base_url
            .join("v1/transactions")
            .map_err(|e| PaymentError::InvalidData(format!("invalid gateway base url: {e}")))?;

        let credentials = general_purpose::STANDARD.encode(format!("{}:x", config.api_key));
        let mut authorization = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| PaymentError::InvalidData(format!("invalid gateway api key: {e}")))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            transactions_url,
            authorization,
        })
    }
}

#[async_trait]
impl PaymentProvider for OnexpayProvider {
    #[tracing::instrument(skip_all, fields(amount_cents = request.amount_cents))]
    async fn create_pix_charge(&self, request: &PixChargeRequest) -> Result<PixCharge> {
        let response = self
            .client
            .post(self.transactions_url.clone())
            .header(AUTHORIZATION, self.authorization.clone())
            .json(&CreateTransaction::from(request))
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        if !status.is_success() {
            tracing::error!(%status, gateway_response = %body, "PIX gateway rejected transaction");
            return Err(PaymentError::ProviderApi(format!("gateway returned {status}")));
        }

        let charge = extract_pix_charge(&body)?;
        tracing::info!("PIX charge created");
        Ok(charge)
    }
}
