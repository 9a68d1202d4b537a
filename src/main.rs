use std::{future::IntoFuture, net::SocketAddr, process, time::Duration};

use gazzetta::{
    application::error::AppError,
    config,
    infra::{
        db::{self, SqliteRepositories},
        error::InfraError,
        http::{ApiRateLimiter, ApiState, build_router},
        telemetry,
    },
};
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
    }
}

async fn init_repositories(settings: &config::Settings) -> Result<SqliteRepositories, AppError> {
    let pool = SqliteRepositories::connect(
        &settings.database.url,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(SqliteRepositories::new(pool))
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let rate_limiter = ApiRateLimiter::new(
        settings.rate_limit.window(),
        settings.rate_limit.max_requests.get(),
        settings.rate_limit.enabled,
    );
    let state = ApiState::new(repositories, rate_limiter);
    let router = build_router(state);

    let listener = TcpListener::bind(settings.server.listen_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "gazzetta::server",
        addr = %settings.server.listen_addr,
        rate_limit_enabled = settings.rate_limit.enabled,
        "listening"
    );

    serve_http(listener, router, settings.server.graceful_shutdown).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "gazzetta::migrate", "migrations applied");
    Ok(())
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    db::seed_canonical(repositories.pool()).await?;
    info!(target = "gazzetta::seed", "demo dataset loaded");
    Ok(())
}

/// Serves until a shutdown signal arrives, then drains open connections
/// within the configured grace window.
async fn serve_http(
    listener: TcpListener,
    router: axum::Router,
    grace: Duration,
) -> Result<(), AppError> {
    let (signal_tx, signal_rx) = watch::channel(());

    tokio::spawn(async move {
        shutdown_signal().await;
        info!(target = "gazzetta::server", "shutdown signal received");
        let _ = signal_tx.send(());
    });

    let mut drain_rx = signal_rx.clone();
    let server = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = drain_rx.changed().await;
    })
    .into_future();

    let mut deadline_rx = signal_rx;
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            let _ = deadline_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            error!(
                target = "gazzetta::server",
                grace_seconds = grace.as_secs(),
                "open connections did not drain before the grace window elapsed"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            error!(error = %error, "failed to install interrupt handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                error!(error = %error, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
