use dotenvy::dotenv;
use reunion_hub::{
    api::{self, AppState},
    auth::seed_superadmin,
    config::load_default_config,
    errors::Result,
    repository::open_repository,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment directly
    dotenv().ok();

    // 3. Load config.toml (or defaults)
    let config = load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(event = %config.event.name, "Configuration loaded");

    // 4. Open the storage backend
    let repo = open_repository(&config)
        .await
        .inspect_err(|e| error!("Failed to open storage: {}", e))?;

    // 5. Seed categories and the initial superadmin
    repo.seed_categories(&config.event.budget_categories).await?;
    let state = AppState::new(repo, config);
    let admin_password = std::env::var("ADMIN_PASSWORD").ok();
    seed_superadmin(
        state.repo.as_ref(),
        &state.passwords,
        &state.config.admin.username,
        admin_password.as_deref(),
    )
    .await?;

    // 6. Sweep expired sessions in the background
    let sweep_every =
        std::time::Duration::from_secs(state.config.session.cleanup_interval_minutes * 60);
    let sweeper = state.sessions.spawn_cleanup(sweep_every);

    // 7. Serve until interrupted
    let address = state.config.server.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal as unix_signal};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
