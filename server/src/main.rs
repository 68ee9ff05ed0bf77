mod app;
mod config;
mod figure;
mod routes;
mod state;

use tokio::signal;
use tracing_subscriber::EnvFilter;
use worldcup_shared::Dashboard;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load is all-or-nothing: no partial dataset is ever served.
    let table = match worldcup_shared::load(config::DATA_FILE) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!(error = %e, path = config::DATA_FILE, "failed to load dataset");
            return;
        }
    };
    let dashboard = match Dashboard::build(table) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            tracing::error!(error = %e, "failed to aggregate dataset");
            return;
        }
    };
    tracing::info!(
        records = dashboard.table.len(),
        countries = dashboard.countries.len(),
        first_year = ?dashboard.years.first(),
        last_year = ?dashboard.years.last(),
        "Dataset loaded"
    );

    let state = match AppState::new(dashboard) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize year selection");
            return;
        }
    };

    let app = app::build_app(state);

    let addr = config::bind_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    tracing::info!("World Cup dashboard listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
