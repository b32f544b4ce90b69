#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    config::RuntimeConfiguration,
    error::{BindListenerSnafu, RosterError, ServeSnafu},
    routes::router,
    state::RosterState,
};
use snafu::ResultExt;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod client;
mod config;
mod data;
mod error;
mod maud_conveniences;
mod render;
mod routes;
mod state;
mod view;

async fn shutdown_signal(state: RosterState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    state.sensible_shutdown().await;
    warn!("signal received, starting graceful shutdown");
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), RosterError> {
    //a missing .env is fine, everything has a default
    let dotenv = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv {
        debug!(?e, "No .env loaded");
    }

    let config = RuntimeConfiguration::new()?;
    let state = RosterState::new(config.clone())?;
    state.probe_backend().await;

    let app = router(state.clone());

    let server_ip = config.server_ip().to_string();
    let listener = TcpListener::bind(&server_ip)
        .await
        .context(BindListenerSnafu {
            address: server_ip.clone(),
        })?;

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .context(ServeSnafu)
}
