use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use opencircle_core::sensitive::SensitiveFilter;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opencircle_api::background::view_flush;
use opencircle_api::config::ServerConfig;
use opencircle_api::logic::{self, Logic, ObjectRegistry};
use opencircle_api::render::renderer_for;
use opencircle_api::router::build_app_router;
use opencircle_api::state::AppState;
use opencircle_api::tracking::{ViewCounter, ViewRecorder};

/// How long shutdown waits for each background task to finish.
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        render_mode = ?config.render_mode,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = opencircle_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    opencircle_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    opencircle_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object registry ---
    let mut registry = ObjectRegistry::new();
    logic::project::register_objects(&mut registry);
    let logic = Logic::postgres(pool, Arc::new(registry));

    // --- View tracking ---
    let cancel = CancellationToken::new();
    let view_counter = Arc::new(ViewCounter::new(config.site_domain.clone()));
    let (view_recorder, recorder_handles) = ViewRecorder::start(
        Arc::clone(&logic.views),
        config.view_record_queue,
        config.view_record_workers,
        cancel.clone(),
    );
    let flush_handle = tokio::spawn(view_flush::run(
        Arc::clone(&view_counter),
        Arc::clone(&logic.views),
        Duration::from_secs(config.view_flush_interval_secs),
        cancel.clone(),
    ));

    // --- App state ---
    let sensitive = SensitiveFilter::new(&config.sensitive_words);
    tracing::info!(words = config.sensitive_words.len(), "Sensitive-word filter loaded");

    let state = AppState {
        config: Arc::new(config.clone()),
        logic,
        renderer: renderer_for(config.render_mode),
        view_counter,
        view_recorder,
        sensitive: Arc::new(sensitive),
    };

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, flush_handle).await.is_err() {
        tracing::warn!("View flush did not finish in time");
    }
    for handle in recorder_handles {
        let _ = tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, handle).await;
    }
    tracing::info!("View tracking stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "opencircle_api=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
