// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server assembly and lifecycle.
//!
//! [`build_state`] opens the database, seeds it, and wires the
//! authentication service. [`serve`] runs the router over plain TCP or, when
//! a certificate pair is configured, over rustls until Ctrl-C or SIGTERM.

use std::{fs, path::Path, sync::Arc, time::Duration};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    api::router,
    auth::{AuthError, AuthService, PasswordHasher, TokenIssuer},
    config::{ServerConfig, TlsPaths},
    state::AppState,
    storage::{DocumentStore, NewService, ServiceRepository, StorageError},
};

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("auth setup error: {0}")]
    Auth(#[from] AuthError),

    #[error("invalid services seed file {path}: {reason}")]
    SeedFile { path: String, reason: String },

    #[error("TLS setup error: {0}")]
    Tls(std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the database, apply seeds, and build the shared state.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let store = Arc::new(DocumentStore::open(&config.database_path())?);
    tracing::info!(path = %config.database_path().display(), "Opened database");

    let issuer = TokenIssuer::new(&config.jwt_secret, config.token_ttl)?;
    let auth = AuthService::new(store.clone(), PasswordHasher::new()?, issuer);

    if let Some(seed) = &config.seed_user {
        if auth.ensure_account(&seed.email, &seed.password)? {
            tracing::info!("Seed account created");
        }
    }

    if let Some(path) = &config.services_seed_file {
        let services = read_services_seed(path)?;
        let inserted = ServiceRepository::new(&store).seed(services)?;
        tracing::info!(inserted, "Seeded services catalogue");
    }

    Ok(AppState::new(store, auth))
}

fn read_services_seed(path: &Path) -> Result<Vec<NewService>, ServerError> {
    let seed_error = |reason: String| ServerError::SeedFile {
        path: path.display().to_string(),
        reason,
    };
    let raw = fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| seed_error(e.to_string()))
}

/// Build state from `config` and serve until a shutdown signal arrives.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config)?;

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    match &config.tls {
        Some(tls) => serve_tls(&config, tls, state, shutdown).await,
        None => {
            let listener = TcpListener::bind(config.bind_addr).await?;
            tracing::info!(
                addr = %listener.local_addr()?,
                "BIC server listening on http (docs at /docs)"
            );
            serve_listener(listener, state, shutdown).await
        }
    }
}

/// Serve plain HTTP on an already-bound listener until `shutdown` fires.
pub async fn serve_listener(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn serve_tls(
    config: &ServerConfig,
    tls: &TlsPaths,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
        .await
        .map_err(ServerError::Tls)?;

    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown.cancelled().await;
        shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    tracing::info!(
        addr = %config.bind_addr,
        "BIC server listening on https (docs at /docs)"
    );
    axum_server::bind_rustls(config.bind_addr, tls_config)
        .handle(handle)
        .serve(router(state).into_make_service())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
