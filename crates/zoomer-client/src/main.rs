//! Zoomer client entry point.
//!
//! Loads the configuration, wires the option store, zoom instance and notice
//! sink into the session controller, then runs the Tokio event loop.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()              -- TOML, defaults when absent
//!  └─ ClientConnection::start()  -- TCP reconnect loop, decodes frames
//!  └─ event loop (single consumer, owns the restriction state)
//!       ├─ Connected    -> SessionLifecycleController::on_connect
//!       ├─ Restriction  -> SessionLifecycleController::handle_message
//!       └─ Disconnected -> SessionLifecycleController::on_disconnect
//! ```
//!
//! On Ctrl-C the loop stops and a session that is still open is closed
//! through the same disconnect path, so every override is reverted.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zoomer_client::application::{
    apply_policy::{OverrideStore, PolicyApplicator},
    notify::NotificationGate,
    session::SessionLifecycleController,
};
use zoomer_client::infrastructure::{
    config::{config_file_path, load_config},
    network::{ClientConnection, NetworkEvent},
    notifier::LogToastNotifier,
    override_store::InMemoryOverrideStore,
    zoom_instance::ZoomInstanceConfigurator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load client config")?;

    // Initialise structured logging; RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    match config_file_path() {
        Ok(path) => info!("Zoomer client starting (config: {})", path.display()),
        Err(_) => info!("Zoomer client starting with default config"),
    }
    config.validate().context("invalid client config")?;

    // ── Option store & zoom instance ──────────────────────────────────────────
    let store: Arc<dyn OverrideStore> = Arc::new(
        InMemoryOverrideStore::with_user_values(config.user_values())
            .context("failed to seed option store")?,
    );
    let zoom = Arc::new(ZoomInstanceConfigurator::new(
        Arc::clone(&store),
        config.user_divisor_bounds()?,
    ));

    let mut controller = SessionLifecycleController::new(
        PolicyApplicator::new(Arc::clone(&store), zoom.clone()),
        NotificationGate::new(
            Arc::new(LogToastNotifier::new()),
            config.client.show_restriction_toasts,
        ),
    );

    // ── Network connection ────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let connection = Arc::new(ClientConnection::new(config.connection_config()?));
    let mut network_rx = connection.start(Arc::clone(&running));

    info!("Zoomer client ready. Connecting to server…");

    // ── Main event loop ───────────────────────────────────────────────────────
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            event = network_rx.recv() => match event {
                Some(NetworkEvent::Connected { server_addr }) => {
                    info!("connected to {server_addr}");
                    controller.on_connect();
                }
                Some(NetworkEvent::Restriction(message)) => controller.handle_message(message),
                Some(NetworkEvent::Disconnected) => {
                    warn!("server connection lost; reconnect in progress");
                    controller.on_disconnect();
                    info!(zoom = ?zoom.current(), "zoom instance after disconnect");
                }
                None => break,
            },
        }
    }

    running.store(false, Ordering::Relaxed);
    controller.on_disconnect();

    info!("Zoomer client stopped");
    Ok(())
}
