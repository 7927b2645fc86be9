//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{TripService, TripServiceImpl};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::mail::build_mailer;
use crate::infrastructure::repositories::{
    PgNotificationRepository, PgTripRepository, PgUserRepository,
};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub trips: Arc<dyn TripService>,
    pub settings: Arc<Settings>,
}

/// Wire the PostgreSQL stores and the configured mailer into a trip service.
pub fn build_trip_service(db: &PgPool, settings: &Settings) -> Result<Arc<dyn TripService>> {
    let mailer = build_mailer(&settings.mail).context("Failed to build mailer")?;

    Ok(Arc::new(TripServiceImpl::new(
        Arc::new(PgUserRepository::new(db.clone())),
        Arc::new(PgTripRepository::new(db.clone())),
        Arc::new(PgNotificationRepository::new(db.clone())),
        Arc::new(mailer),
        settings.app.frontend_url.clone(),
    )))
}

/// Build the router with the HTTP-wide layers applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let db = database::create_pool(&settings.database)
            .await
            .context("Failed to connect to PostgreSQL")?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");
        }

        let trips = build_trip_service(&db, &settings)?;
        tracing::info!(driver = ?settings.mail.driver, "Trip service ready");

        let state = AppState {
            db,
            trips,
            settings: Arc::new(settings.clone()),
        };

        let router = build_router(state);

        let listener = TcpListener::bind(settings.server_addr())
            .await
            .with_context(|| format!("Failed to bind {}", settings.server_addr()))?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
