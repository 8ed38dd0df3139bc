//! event-gateway server entry point.
//!
//! Wires configuration, the PostgreSQL pool, the Kafka producer, and the
//! Axum HTTP server together, and owns the shutdown sequence: stop
//! accepting requests, let in-flight requests drain, then release the
//! store and bus resources.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use event_gateway::api;
use event_gateway::app_state::AppState;
use event_gateway::bus::{AnnouncementBus, KafkaAnnouncementBus};
use event_gateway::config::GatewayConfig;
use event_gateway::persistence::PostgresEventStore;
use event_gateway::service::RegistrationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting event-gateway");

    // Connect to the store and apply pending migrations
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(config.database_connect_timeout())
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database ready");

    // Connect to the bus and provision the announce topic; without it
    // the service must not start.
    let bus = KafkaAnnouncementBus::new(
        &config.kafka_brokers,
        config.request_timeout(),
        config.announce_topic_partitions,
        config.announce_topic_replication,
    )?;
    bus.ensure_topics(std::slice::from_ref(&config.announce_topic))
        .await?;
    tracing::info!(topic = %config.announce_topic, "announce topic ready");

    // Build service layer and application state
    let store = PostgresEventStore::new(pool.clone());
    let registration_service = Arc::new(RegistrationService::new(
        store,
        bus.clone(),
        config.announce_topic.clone(),
        config.request_timeout(),
    ));
    let app_state = AppState {
        registration_service,
    };

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(
            "/api-docs/openapi.json",
            <api::ApiDoc as utoipa::OpenApi>::openapi(),
        ),
    );

    let app = app
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout().saturating_mul(3)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server, draining in-flight requests on SIGINT/SIGTERM
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight requests are done; release shared resources in reverse
    // acquisition order.
    tracing::info!("shutting down");
    if let Err(e) = bus.flush(config.request_timeout()) {
        tracing::warn!(error = %e, "bus flush incomplete at shutdown");
    }
    pool.close().await;

    Ok(())
}

/// Resolves when the process receives SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
