/*
 * Responsibility
 * - tracing + panic hook
 * - Config -> dependencies (store, token services, metrics) -> AppState
 * - Router assembly with the HTTP middleware stack
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, headers::AlertHeaders};
use crate::config::Config;
use crate::middleware;
use crate::repos::memory::{MemoryProduitRepo, MemoryUserRepo};
use crate::repos::{PgProduitRepo, PgUserRepo, ProduitRepo, UserRepo};
use crate::services::auth::build_token_services;
use crate::services::metrics::SecurityMeters;
use crate::services::{ProduitService, UserService};
use crate::state::AppState;

const DB_MAX_CONNECTIONS: u32 = 10;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,produit_api=debug,tower_http=debug
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

        // Development fails fast; production keeps serving.
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

    tracing::info!(?config, "starting API in {:?} mode on {}", config.app_env, config.addr);

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Wire the stores and services. Without `DATABASE_URL` everything lives in memory.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let (produit_repo, user_repo): (Arc<dyn ProduitRepo>, Arc<dyn UserRepo>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(DB_MAX_CONNECTIONS)
                    .connect(url)
                    .await
                    .context("failed to connect to DATABASE_URL")?;
                tracing::info!("using postgres store");
                (
                    Arc::new(PgProduitRepo::new(db.clone())),
                    Arc::new(PgUserRepo::new(db)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                (
                    Arc::new(MemoryProduitRepo::new()),
                    Arc::new(MemoryUserRepo::new()),
                )
            }
        };

    let meters = Arc::new(SecurityMeters::new());
    let (issuer, validator) = build_token_services(config, meters.clone())?;
    let alerts = AlertHeaders::new(&config.app_name).context("invalid APP_NAME")?;

    let users = UserService::new(user_repo);
    if let Some(admin) = &config.initial_admin {
        users
            .ensure_initial_admin(&admin.login, &admin.password)
            .await
            .context("failed to seed initial admin")?;
    }

    Ok(AppState::new(
        ProduitService::new(produit_repo),
        users,
        issuer,
        validator,
        meters,
        alerts,
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let alerts = state.alerts.clone();
    let router = api::routes(state.clone()).with_state(state);

    let router = middleware::http::apply(router);
    let router = middleware::cors::apply(router, config, &alerts);
    middleware::security_headers::apply(router)
}
