use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use hangman_core::StatsPort;
use hangman_persistence::{connection::connect_and_migrate, repositories::PlayerRepository};
use hangman_server::{
    config::Config,
    create_routes,
    session_manager::SessionManager,
    stats_port::{HttpStatsPort, RepositoryStatsPort},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Hangman server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Playing with {} words and {} stages ({:?} selection)",
        config.game.words.len(),
        config.game.stage_count(),
        config.game.selection
    );

    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let player_repository = Arc::new(PlayerRepository::new(db));

    let stats_port: Arc<dyn StatsPort> = match &config.stats_api_url {
        Some(url) => {
            info!("Syncing player stats through {}", url);
            Arc::new(HttpStatsPort::new(url.clone()))
        }
        None => Arc::new(RepositoryStatsPort::new(player_repository.clone())),
    };

    let session_manager = Arc::new(SessionManager::new(config.game.clone(), stats_port));
    let routes = create_routes(player_repository, session_manager.clone());

    // Start cleanup task
    let cleanup_session_manager = session_manager.clone();
    let session_timeout = config.session_timeout();
    let cleanup_interval = config.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            cleanup_session_manager
                .cleanup_idle_sessions(session_timeout)
                .await;
        }
    });

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            error!("Invalid HOST {:?}: {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
                return;
            }
            _ => error!("Failed to install signal handlers, falling back to Ctrl+C"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully..."),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}
