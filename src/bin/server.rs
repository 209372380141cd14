use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use gatehouse::config::ServerConfig;
use gatehouse::handlers::routes;
use gatehouse::server::AppState;
use gatehouse::storage::{MemoryUserStorage, SharedUserStorage};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Initialize env
    match dotenvy::dotenv() {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Load config from env
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    let storage: SharedUserStorage = Arc::new(MemoryUserStorage::new());

    let state = match AppState::from_config(&config, storage) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(admin) = &config.admin {
        match state.identity.ensure_admin(admin).await {
            Ok(Some(user)) => info!("Bootstrap admin created with id {}", user.id),
            Ok(None) => info!("Bootstrap admin already present"),
            Err(e) => {
                error!("Failed to create bootstrap admin: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    match warp::serve(routes::api(state)).try_bind_with_graceful_shutdown(addr, shutdown) {
        Ok((bound, server)) => {
            info!("Starting Gatehouse server on {}", bound);
            server.await;
            info!("Server stopped");
        }
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}
