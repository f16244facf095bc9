//! Test utilities: a ready-made config, app constructors and a store that fails on demand.

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

use crate::{
    Application,
    config::{AdminConfig, Config, DatabaseConfig, PaymentConfig},
    db::{
        ClearSummary, MemoryStore, PetFilter, QuestionnaireFilter, RegistrationFilter, Store, UserEventFilter,
        errors::{DbError, Result},
        models::{
            events::{UserEventCreateDBRequest, UserEventDBResponse},
            pets::{PetCreateDBRequest, PetDBResponse},
            questionnaires::{QuestionnaireCreateDBRequest, QuestionnaireDBResponse},
            registrations::{RegistrationCreateDBRequest, RegistrationDBResponse},
        },
    },
    types::RegistrationId,
};

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse";

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        admin: AdminConfig {
            email: TEST_ADMIN_EMAIL.to_string(),
            password: Some(TEST_ADMIN_PASSWORD.to_string()),
            password_hash: None,
            // Cheap parameters keep hashing fast in tests
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
        },
        payment: PaymentConfig::Dummy(Default::default()),
        ..Default::default()
    }
}

/// Install the rustls provider the HTTP client needs. Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

pub async fn create_test_app() -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let server = create_test_app_with_store(store.clone()).await;
    (server, store)
}

pub async fn create_test_app_with_store(store: Arc<dyn Store>) -> TestServer {
    create_test_app_with(create_test_config(), store).await
}

pub async fn create_test_app_with(config: Config, store: Arc<dyn Store>) -> TestServer {
    install_crypto_provider();
    Application::new_with_store(config, store)
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// Log in as the test admin and return the `name=token` pair to send as a `Cookie` header
pub async fn login(server: &TestServer) -> String {
    let response = server
        .post("/admin/api/login")
        .json(&serde_json::json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();

    let set_cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .expect("login sets a cookie")
        .to_str()
        .expect("cookie is ascii");
    set_cookie.split(';').next().unwrap_or_default().to_string()
}

pub async fn create_test_registration(store: &dyn Store) -> RegistrationDBResponse {
    store
        .create_registration(&RegistrationCreateDBRequest {
            full_name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            whatsapp: "(11) 98765-4321".to_string(),
            ip_address: Some("203.0.113.9".to_string()),
            selfie_url: None,
            pet_photos: None,
            session_id: Some("test-session".to_string()),
        })
        .await
        .expect("Failed to create test registration")
}

/// Which [`Store`] operation a [`FailingStore`] breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    RegistrationInsert,
    Questionnaires,
    Pets,
    Events,
    Clear,
}

/// A [`MemoryStore`] whose chosen operation always fails with a generic database error
pub struct FailingStore {
    inner: MemoryStore,
    fault: Fault,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self { inner, fault }
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, operation: Fault) -> Result<()> {
        if self.fault == operation {
            Err(DbError::Other(anyhow::anyhow!("injected failure: {operation:?}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn create_registration(&self, request: &RegistrationCreateDBRequest) -> Result<RegistrationDBResponse> {
        self.check(Fault::RegistrationInsert)?;
        self.inner.create_registration(request).await
    }

    async fn get_registration(&self, id: RegistrationId) -> Result<Option<RegistrationDBResponse>> {
        self.inner.get_registration(id).await
    }

    async fn list_registrations(&self, filter: &RegistrationFilter) -> Result<Vec<RegistrationDBResponse>> {
        self.inner.list_registrations(filter).await
    }

    async fn create_questionnaire(&self, request: &QuestionnaireCreateDBRequest) -> Result<QuestionnaireDBResponse> {
        self.check(Fault::Questionnaires)?;
        self.inner.create_questionnaire(request).await
    }

    async fn list_questionnaires(&self, filter: &QuestionnaireFilter) -> Result<Vec<QuestionnaireDBResponse>> {
        self.inner.list_questionnaires(filter).await
    }

    async fn create_pet(&self, request: &PetCreateDBRequest) -> Result<PetDBResponse> {
        self.check(Fault::Pets)?;
        self.inner.create_pet(request).await
    }

    async fn list_pets(&self, filter: &PetFilter) -> Result<Vec<PetDBResponse>> {
        self.inner.list_pets(filter).await
    }

    async fn create_event(&self, request: &UserEventCreateDBRequest) -> Result<UserEventDBResponse> {
        self.check(Fault::Events)?;
        self.inner.create_event(request).await
    }

    async fn list_events(&self, filter: &UserEventFilter) -> Result<Vec<UserEventDBResponse>> {
        self.inner.list_events(filter).await
    }

    async fn clear_all(&self) -> Result<ClearSummary> {
        self.check(Fault::Clear)?;
        self.inner.clear_all().await
    }
}
