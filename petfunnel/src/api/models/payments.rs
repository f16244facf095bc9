//! API request/response models for PIX payments.

use crate::types::RegistrationId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PixRequest {
    /// Registration to take the payer's details from
    #[schema(value_type = Option<String>, format = "uuid")]
    pub registration_id: Option<RegistrationId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PixResponse {
    /// QR code image, an `http(s)` URL or a `data:` URI
    pub qrcode: Option<String>,
    /// The copy-and-paste PIX code
    pub qrcode_text: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PixCopiedRequest {
    pub session_id: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub registration_id: Option<RegistrationId>,
}
