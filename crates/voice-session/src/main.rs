//! Voice Session: console driver for the real-time voice session controller.

mod app;
mod config;
mod console_command;
mod console_surface;
mod error;
mod simulated;

pub(crate) use {
    app::App,
    console_command::{ConsoleCommand, HELP},
    console_surface::ConsoleSurface,
    error::{AppError, Result as AppResult},
};

use crate::{
    config::{Config, DEFAULT_LOG_FILTER},
    simulated::{SimulatedCapture, SimulatedPlayback, SimulatedTransport},
};

use std::time::Duration;

use tokio::{io::BufReader, sync::watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_session_core::{
    ControlBinder, SessionContext, SessionCoordinator, WatchStateMirror, spawn_state_mirror,
};

/// Application entry point.
#[tokio::main]
async fn main() {
    let config = Config::load();

    let filter = match &config {
        Ok(c) => c.logging.filter.clone(),
        Err(_) => DEFAULT_LOG_FILTER.to_string(),
    };
    init_tracing(&filter);

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let context = SessionContext::new(config.client_id());
    let bus = context.bus().clone();
    let sim = &config.simulation;

    let coordinator = SessionCoordinator::new(
        context.clone(),
        Box::new(SimulatedCapture::new(
            bus.clone(),
            Duration::from_millis(sim.capture_ms),
        )),
        Box::new(SimulatedTransport::new(
            bus.clone(),
            Duration::from_millis(sim.response_delay_ms),
            sim.produce_audio,
            sim.fail_interrupt_send,
        )),
        Box::new(SimulatedPlayback::new(
            bus.clone(),
            Duration::from_millis(sim.playback_ms),
        )),
        config.session.coordinator(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // State flows out to the mirror, never back in.
    let (mirror, mirror_rx) = WatchStateMirror::new();
    let mirror_handle = spawn_state_mirror(bus.subscribe(), mirror, shutdown_rx.clone());

    let events = bus.subscribe();
    let binder = ControlBinder::new(
        context.clone(),
        config.session.scenario,
        &coordinator.state_reader(),
        ConsoleSurface::new(std::io::stdout()),
    );

    let coordinator_handle = tokio::spawn(coordinator.run(shutdown_rx));

    let app = App {
        context,
        binder,
        events,
        mirror_rx,
        shutdown_tx,
    };

    if let Err(e) = app.run(BufReader::new(tokio::io::stdin())).await {
        error!(error = ?e, "App error");
    }

    match tokio::time::timeout(Duration::from_secs(1), coordinator_handle).await {
        Ok(Ok(())) => info!("Coordinator stopped cleanly"),
        Ok(Err(e)) => error!(error = ?e, "Coordinator task panicked"),
        Err(_) => info!("Coordinator did not stop within timeout, will be cleaned up on exit"),
    }

    if let Err(e) = mirror_handle.await {
        error!(error = ?e, "State mirror task panicked");
    }
}

fn init_tracing(filter: &str) {
    // RUST_LOG wins over the configured filter.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
