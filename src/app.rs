/*
 * Responsibility
 * - Config -> dependencies -> Router
 * - Middleware order: http (outermost) -> bearer auth -> handlers
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::middleware::http::HttpLimits;
use crate::services::auth::{ExemptPathSet, TokenCodec};
use crate::services::users::InMemoryUserDirectory;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,todo_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, HttpLimits::from(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState> {
    let tokens = Arc::new(TokenCodec::new(&config.jwt_secret)?);

    let users = InMemoryUserDirectory::new(config.users.iter().cloned());
    if users.is_empty() {
        tracing::warn!("AUTH_USERS is empty; every bearer token will be rejected as USER_NOT_FOUND");
    }

    let exempt_paths = ExemptPathSet::new(&config.exempt_paths);
    tracing::debug!(patterns = ?exempt_paths.patterns().collect::<Vec<_>>(), "exempt paths");

    Ok(AppState::new(tokens, Arc::new(users), exempt_paths))
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes());

    // Whole router, so root-level exempt paths are matched on their full path.
    let router = middleware::auth::access::apply(router, state.clone()).with_state(state);

    middleware::http::apply(router, limits)
}
