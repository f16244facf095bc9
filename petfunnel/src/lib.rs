//! # petfunnel: pet-care survey service
//!
//! A JSON API behind a small single-page site: people register, answer a short questionnaire
//! about their pets in a chat-style dialog, and may then make an optional PIX donation. Every step
//! is recorded as an analytics event, and an admin can browse the results on two dashboards.
//!
//! ## Architecture
//!
//! - **API layer** ([`api`]): Axum handlers for the public funnel and the admin dashboards
//! - **Questionnaire** ([`questionnaire`]): The fixed step sequence and in-memory dialog sessions
//! - **Storage** ([`db`]): The [`db::Store`] trait, backed by PostgreSQL or process memory
//! - **Payments** ([`payment_providers`]): PIX charge creation behind a provider trait
//! - **Analytics** ([`analytics`]): Fire-and-forget event recording
//! - **Auth** ([`auth`]): One configured admin, argon2 password, JWT session cookie
//!
//! ## Request Flow
//!
//! ```text
//! landing ─> POST /api/registrations ─> POST /api/questionnaire ─> .../answers (x13)
//!                                                                       │
//!                                       answers stored on completion <──┘
//!                                                                       │
//!                                          POST /api/payments/pix <─────┘
//! ```
//!
//! ## Configuration
//!
//! See [`config`] for the YAML layout and environment overrides.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod errors;
mod openapi;
pub mod payment_providers;
pub mod questionnaire;
pub mod telemetry;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::{self, HeaderValue, Method},
    routing::{get, post},
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    analytics::Analytics,
    api::handlers::{admin, events, landing, payments, questionnaire as questionnaire_handlers, registrations},
    auth::AdminCredentials,
    config::{CorsOrigin, DatabaseConfig},
    db::{MemoryStore, PgStore, Store},
    openapi::ApiDoc,
    payment_providers::PaymentProvider,
    questionnaire::session::SessionRegistry,
};
pub use config::Config;

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .store(store.clone())
///     .analytics(Analytics::new(store))
///     .payment(payment)
///     .sessions(sessions)
///     .admin(admin)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub payment: Arc<dyn PaymentProvider>,
    /// Open questionnaire dialogs
    pub sessions: Arc<SessionRegistry>,
    pub analytics: Analytics,
    pub admin: Arc<AdminCredentials>,
}

/// Get the database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Open the configured store, running migrations for PostgreSQL.
async fn setup_store(config: &Config) -> anyhow::Result<(Arc<dyn Store>, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::Memory => {
            info!("Using in-memory store: data will be lost on shutdown");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        DatabaseConfig::Postgres { url, pool } => {
            info!("Using PostgreSQL store");
            let pg = PgPoolOptions::new()
                .max_connections(pool.max_connections)
                .min_connections(pool.min_connections)
                .acquire_timeout(pool.acquire_timeout)
                .idle_timeout(pool.idle_timeout)
                .connect(url)
                .await?;
            migrator().run(&pg).await?;
            Ok((Arc::new(PgStore::new(pg.clone())), Some(pg)))
        }
    }
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = &config.cors.allowed_origins;
    let allow_origin = if origins.contains(&CorsOrigin::Wildcard) {
        if config.cors.allow_credentials {
            anyhow::bail!("cors.allow_credentials cannot be combined with a '*' origin");
        }
        AllowOrigin::any()
    } else {
        let mut values = Vec::new();
        for origin in origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send the origin without a trailing slash
                values.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(values)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(config.cors.allow_credentials)
        .expose_headers(vec![http::header::CONTENT_DISPOSITION]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the router: public funnel routes under `/api`, dashboards under `/admin/api`, docs at `/docs`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/landing", get(landing::get_landing))
        .route("/registrations", post(registrations::create_registration))
        .route("/questionnaire", post(questionnaire_handlers::start_questionnaire))
        .route("/questionnaire/{id}", get(questionnaire_handlers::get_questionnaire))
        .route("/questionnaire/{id}/answers", post(questionnaire_handlers::answer_questionnaire))
        .route("/payments/pix", post(payments::create_pix))
        .route("/payments/pix/copied", post(payments::pix_copied))
        .route("/events", post(events::track_event));

    let admin_routes = Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/me", get(admin::me))
        .route("/overview", get(admin::overview))
        .route("/registrations", get(admin::list_registrations))
        .route("/registrations/export", get(admin::export_registrations))
        .route("/pets", get(admin::list_pets))
        .route("/questionnaires", get(admin::list_questionnaires))
        .route("/clear", post(admin::clear_database))
        .route("/events/stats", get(admin::event_stats))
        .route("/users/{id}", get(admin::user_journey));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", public_routes)
        .nest("/admin/api", admin_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance, opening the configured store
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let (store, pool) = setup_store(&config).await?;
        let mut app = Self::new_with_store(config, store).await?;
        app.pool = pool;
        Ok(app)
    }

    /// Create a new application instance over an existing store
    pub async fn new_with_store(config: Config, store: Arc<dyn Store>) -> anyhow::Result<Self> {
        let payment: Arc<dyn PaymentProvider> = Arc::from(payment_providers::create_provider(config.payment.clone())?);
        let admin = Arc::new(AdminCredentials::from_config(&config.admin).await?);
        let sessions = Arc::new(SessionRegistry::new(config.questionnaire.session_ttl));

        let state = AppState::builder()
            .analytics(Analytics::new(store.clone()))
            .store(store)
            .payment(payment)
            .sessions(sessions)
            .admin(admin)
            .config(config.clone())
            .build();

        let router = build_router(state)?;

        Ok(Self {
            router,
            config,
            pool: None,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "petfunnel listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
