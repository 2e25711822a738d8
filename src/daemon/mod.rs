//! Daemon module for the eye-rest reminder.
//!
//! This module contains the core daemon functionality:
//! - `timer`: phase state machine with persistence and catch-up
//! - `dispatch`: cues, notifications and tips on phase entry
//! - `ipc`: Unix socket server driving the timer

pub mod dispatch;
pub mod ipc;
pub mod timer;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, MissedTickBehavior};

use crate::clock::SystemClock;
use crate::config::DaemonConfig;
use crate::notification::{DesktopNotifier, Notifier};
use crate::sound::{self, CuePlayer, SilentCuePlayer};
use crate::store::{SessionStore, SettingsStore};
use crate::tip::GeminiTipSource;

pub use dispatch::PhaseDispatcher;
pub use ipc::{IpcError, IpcServer, RequestHandler};
pub use timer::{PhaseTimer, TimerError, TimerEvent, TIP_PLACEHOLDER};

/// Runs the daemon until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub async fn run_daemon(config: DaemonConfig) -> Result<()> {
    tracing::info!("Data directory: {:?}", config.data_dir);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let timer = Arc::new(Mutex::new(PhaseTimer::restore(
        SettingsStore::in_dir(&config.data_dir),
        SessionStore::in_dir(&config.data_dir),
        Arc::new(SystemClock),
        event_tx,
    )));

    let player: Arc<dyn CuePlayer> = if config.sound {
        sound::try_create_player()
    } else {
        Arc::new(SilentCuePlayer)
    };

    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new(config.notifications));
    {
        // Ask once up front, without holding up the timer.
        let notifier = notifier.clone();
        tokio::task::spawn_blocking(move || notifier.request_permission());
    }

    let tips = Arc::new(GeminiTipSource::new(&config.tip));
    if !tips.has_api_key() {
        tracing::info!("No tip API key configured, using local tips");
    }

    let dispatcher = PhaseDispatcher::new(timer.clone(), player, notifier, tips);
    let dispatch_task = tokio::spawn(dispatcher.run(event_rx));

    let server = IpcServer::new(&config.socket_path())?;
    let handler = RequestHandler::new(timer.clone());
    tracing::info!("Listening on {:?}", server.socket_path());

    let mut ticker = interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                timer.lock().await.resync();
            }
            accepted = server.accept() => match accepted {
                Ok(stream) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = IpcServer::serve(stream, &handler).await {
                            tracing::debug!("Client error: {:#}", e);
                        }
                    });
                }
                Err(e) => tracing::warn!("{:#}", e),
            },
            () = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    dispatch_task.abort();
    // Dropping the server removes the socket file.
    drop(server);
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
