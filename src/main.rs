// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::process::ExitCode;

use tripko_server::api::router;
use tripko_server::config::{AuthSettings, ServerSettings};
use tripko_server::state::AppState;
use tripko_server::telemetry::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let server = match ServerSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(server.log_format) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let auth = match AuthSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid authentication configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        access_token_ttl_secs = auth.access_token_ttl.as_secs(),
        refresh_token_ttl_secs = auth.refresh_token_ttl.as_secs(),
        "Token settings loaded"
    );

    if cfg!(feature = "dev") {
        tracing::warn!("Built with the `dev` feature: /v1/auth/dev/token issues tokens without credentials");
    }

    let state = match AppState::from_settings(&auth, &server) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open member store");
            return ExitCode::FAILURE;
        }
    };

    let addr: SocketAddr = match format!("{}:{}", server.host, server.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(host = %server.host, error = %e, "Failed to parse bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "TripKo server listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
