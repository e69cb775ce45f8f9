use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use blink_core::UrlStore;
use blink_gateway::cli::{StorageBackend, BUILD_COMMIT, BUILD_TIME, CLI};
use blink_gateway::{App, AppState};
use blink_generator::{RandomGenerator, RandomGeneratorSettings};
use blink_shortener::ShortenerService;
use blink_storage::{InMemoryRepository, PgRepository};
use blink_telemetry::TelemetryConfig;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let mut telemetry = TelemetryConfig::builder()
        .service_name("blink-gateway")
        .log_format(config.log_format.into())
        .build();
    telemetry.otlp_endpoint = config.otlp_endpoint.clone();
    let _telemetry = blink_telemetry::init(&telemetry).context("failed to initialise telemetry")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        build_commit = BUILD_COMMIT,
        build_time = BUILD_TIME,
        listen_addr = %config.listen_addr,
        storage_backend = %config.dsn,
        code_length = config.code_length,
        max_attempts = config.max_attempts,
        "starting gateway"
    );

    let settings = RandomGeneratorSettings::builder()
        .alphabet(config.code_alphabet.clone())
        .length(config.code_length)
        .build();
    let generator = RandomGenerator::new(settings).context("invalid short code settings")?;
    if generator.keyspace() < 1_000_000 {
        warn!(
            keyspace = generator.keyspace() as u64,
            "short code keyspace is small; creates will start failing as it fills up"
        );
    }

    let store = build_store(&config, generator).await?;
    let state = AppState::new(store, config.base_url());
    let app = App::router_with_timeout(state, Duration::from_secs(config.request_timeout_secs));

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("gateway stopped");
    Ok(())
}

async fn build_store(
    config: &CLI,
    generator: RandomGenerator,
) -> anyhow::Result<Arc<dyn UrlStore>> {
    let store: Arc<dyn UrlStore> = match &config.dsn {
        StorageBackend::InMemory => Arc::new(
            ShortenerService::new(InMemoryRepository::new(), generator)
                .with_max_attempts(config.max_attempts),
        ),
        StorageBackend::Postgres(dsn) => {
            let repository = PgRepository::connect(dsn, config.max_connections)
                .await
                .context("failed to connect to postgres")?;
            repository
                .migrate()
                .await
                .context("failed to apply postgres schema")?;
            Arc::new(
                ShortenerService::new(repository, generator)
                    .with_max_attempts(config.max_attempts),
            )
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
