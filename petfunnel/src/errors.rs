use crate::db::errors::DbError;
use crate::payment_providers::PaymentError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Shown when a registration collides with an existing email address
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Este email já está cadastrado. Por favor, use outro.";
/// Shown for every other registration failure
pub const REGISTRATION_FAILED_MESSAGE: &str = "Erro no sistema ao cadastrar. Tente novamente.";
/// Shown when the payment gateway could not produce a PIX code
pub const PIX_FAILED_MESSAGE: &str = "Ocorreu um erro ao gerar o PIX. Atualize a página para tentar novamente.";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Invalid request data
    #[error("{message}")]
    BadRequest { message: String },

    /// One or more form fields failed validation, keyed by field name
    #[error("Validation failed for {}", fields.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation { fields: BTreeMap<String, String> },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// An operation failed and the user gets a fixed, friendly message
    #[error("{message}")]
    Unavailable { message: String },

    /// Payment gateway failure
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::BadRequest { .. } | Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } | Error::Unavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Payment(_) => StatusCode::BAD_GATEWAY,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Autenticação necessária".to_string()),
            Error::BadRequest { message } | Error::Unavailable { message } => message.clone(),
            Error::Validation { .. } => "Verifique os campos destacados".to_string(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Internal { .. } | Error::Other(_) => "Erro interno do servidor".to_string(),
            Error::Payment(_) => PIX_FAILED_MESSAGE.to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Registro não encontrado".to_string(),
                DbError::UniqueViolation { .. } if db_err.is_duplicate_email() => DUPLICATE_EMAIL_MESSAGE.to_string(),
                DbError::UniqueViolation { .. } => "Registro já existe".to_string(),
                DbError::ForeignKeyViolation { .. } => "Referência inválida a um registro relacionado".to_string(),
                DbError::CheckViolation { .. } => "Dados inválidos".to_string(),
                DbError::Other(_) => "Erro no banco de dados".to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } | Error::Other(_) | Error::Unavailable { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Payment(_) => {
                tracing::error!("Payment gateway error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::Validation { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = match &self {
            Error::Validation { fields } => json!({
                "message": self.user_message(),
                "fields": fields,
            }),
            _ => json!({ "message": self.user_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert from String errors (e.g., from external functions)
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Internal { operation: msg }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_email_is_conflict_with_specific_message() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("registrations_email_key".to_string()),
            table: Some("registrations".to_string()),
            message: "duplicate key".to_string(),
        });

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), DUPLICATE_EMAIL_MESSAGE);
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = Error::Database(DbError::Other(anyhow::anyhow!("password authentication failed for user postgres")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("postgres"));

        let err = Error::Internal {
            operation: "hash admin password".to_string(),
        };
        assert!(!err.user_message().contains("hash"));
    }

    #[test]
    fn test_payment_errors_are_bad_gateway() {
        let err = Error::Payment(PaymentError::MissingPixCode);
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.user_message(), PIX_FAILED_MESSAGE);
    }

    #[test]
    fn test_validation_error_names_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), "Por favor, insira um email válido".to_string());
        fields.insert("whatsapp".to_string(), "Por favor, insira um número válido".to_string());
        let err = Error::Validation { fields };

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Validation failed for email, whatsapp");
    }
}
