use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use guau_core::behavior::EventStore;
use guau_db::PgEventStore;
use guau_events::{AlertBus, AlertNotifier, EmailConfig, EmailDelivery};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guau_api::config::ServerConfig;
use guau_api::router::build_app_router;
use guau_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guau_api=debug,guau_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        stress_threshold = config.alerts.thresholds.stress_threshold,
        chronic_threshold = config.alerts.thresholds.chronic_threshold,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = guau_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    guau_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    guau_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Alert notifications ---
    let alert_bus = Arc::new(AlertBus::default());
    let email = EmailConfig::from_env().map(EmailDelivery::new);
    if email.is_none() {
        tracing::warn!("SMTP_HOST not set, behavior alert emails are disabled");
    }
    let notifier_handle = tokio::spawn(
        AlertNotifier::new(pool.clone(), email).run(alert_bus.subscribe()),
    );

    // --- App state ---
    let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool.clone()));
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(pool, config, store, Arc::clone(&alert_bus))
        .unwrap_or_else(|e| panic!("Invalid alert configuration: {e}"));

    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, draining notifications");

    // The router (and its state) is gone; dropping the last bus handle closes
    // the channel so the notifier finishes its backlog and exits.
    drop(alert_bus);
    if tokio::time::timeout(shutdown_timeout, notifier_handle)
        .await
        .is_err()
    {
        tracing::warn!("Alert notifier did not finish before shutdown timeout");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
