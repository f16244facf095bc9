//! Dashboard authentication.
//!
//! There is exactly one admin account, defined in configuration. Logging in checks the submitted
//! email and password against it and hands back a JWT in an HttpOnly cookie; admin routes take a
//! [`current_admin::CurrentAdmin`] argument to require that cookie.
//!
//! # Modules
//!
//! - [`current_admin`]: Extractor for the authenticated admin, plus cookie helpers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: JWT session token creation and verification

pub mod current_admin;
pub mod password;
pub mod session;

use crate::{config::AdminConfig, errors::Error};
use current_admin::CurrentAdmin;
use tracing::info;

/// The configured admin account, with its password always held as an argon2 hash.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    email: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Build credentials from config, hashing a plaintext password if that is what was given.
    pub async fn from_config(config: &AdminConfig) -> Result<Self, Error> {
        let password_hash = match (&config.password_hash, &config.password) {
            (Some(hash), _) => hash.clone(),
            (None, Some(password)) => {
                info!("Hashing configured admin password");
                let password = password.clone();
                let params = config.argon2_params();
                tokio::task::spawn_blocking(move || password::hash_string_with_params(&password, params))
                    .await
                    .map_err(|e| Error::Internal {
                        operation: format!("spawn password hashing task: {e}"),
                    })??
            }
            (None, None) => {
                return Err(Error::Internal {
                    operation: "configure admin credentials: no password or password_hash".to_string(),
                });
            }
        };

        Ok(Self {
            email: config.email.trim().to_lowercase(),
            password_hash,
        })
    }

    /// Check a login attempt. Inputs are trimmed and the email compared case-insensitively.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Option<CurrentAdmin>, Error> {
        if email.trim().to_lowercase() != self.email {
            return Ok(None);
        }

        // Verify password on a blocking thread to avoid blocking async runtime
        let password = password.trim().to_string();
        let hash = self.password_hash.clone();
        let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password verification task: {e}"),
            })??;

        Ok(is_valid.then(|| CurrentAdmin { email: self.email.clone() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;

    #[tokio::test]
    async fn test_plaintext_password_is_hashed_and_verified() {
        let config = create_test_config();
        let credentials = AdminCredentials::from_config(&config.admin).await.unwrap();
        assert!(credentials.password_hash.starts_with("$argon2id$"));

        let admin = credentials.verify("  ADMIN@Example.com ", " correct-horse ").await.unwrap();
        assert_eq!(admin.map(|a| a.email).as_deref(), Some("admin@example.com"));
    }

    #[tokio::test]
    async fn test_wrong_email_or_password_is_none() {
        let config = create_test_config();
        let credentials = AdminCredentials::from_config(&config.admin).await.unwrap();

        assert!(credentials.verify("other@example.com", "correct-horse").await.unwrap().is_none());
        assert!(credentials.verify("admin@example.com", "wrong").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_precomputed_hash_is_used_as_is() {
        let mut config = create_test_config();
        let hash = password::hash_string_with_params("from-a-hash", config.admin.argon2_params()).unwrap();
        config.admin.password = Some("ignored".to_string());
        config.admin.password_hash = Some(hash);

        let credentials = AdminCredentials::from_config(&config.admin).await.unwrap();
        assert!(credentials.verify("admin@example.com", "from-a-hash").await.unwrap().is_some());
        assert!(credentials.verify("admin@example.com", "ignored").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_password_is_an_error() {
        let mut config = create_test_config();
        config.admin.password = None;
        config.admin.password_hash = None;

        assert!(AdminCredentials::from_config(&config.admin).await.is_err());
    }
}
