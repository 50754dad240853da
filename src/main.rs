mod analyzer;
mod auth;
mod catalog;
mod config;
mod model;
mod parser;
mod provider;
mod scraper;
mod server;
mod service;
mod utils;

use auth::{AuthEvent, IdentityProvider};
use config::{AppConfig, DEFAULT_CONFIG_PATH, load_config};
use server::AppState;
use service::SearchService;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const CONFIG_PATH_ENV: &str = "CARD_SAVER_CONFIG";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("card_saver=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("😱 Panic occurred: {}", panic_info);
    }));

    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load error ({}): {}, using defaults", path, e);
            let mut cfg = AppConfig::default();
            cfg.apply_env(|key| std::env::var(key).ok());
            cfg
        }
    };

    let service = match SearchService::from_config(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to initialize search service: {}", e);
            return;
        }
    };

    let identity = match auth::from_config(&config) {
        Ok(identity) => identity,
        Err(e) => {
            error!("Failed to initialize identity provider: {}", e);
            return;
        }
    };
    spawn_auth_listener(identity.as_ref());

    info!(
        "🚀 Starting card-saver on {} (live fetch: {}, demo mode: {})",
        config.bind_addr,
        config.live_fetch,
        identity.is_demo()
    );

    let state = AppState { service, identity };
    if let Err(e) = server::serve(&config.bind_addr, state).await {
        error!("Server error: {}", e);
    }
}

fn spawn_auth_listener(identity: &dyn IdentityProvider) {
    let mut events = identity.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(AuthEvent::SignedIn { user_id }) => info!("👤 User signed in: {}", user_id),
                Ok(AuthEvent::SignedOut) => info!("👋 User signed out"),
                Err(RecvError::Lagged(skipped)) => warn!("Auth listener skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}
