//! Integration tests for Daemon-CLI IPC communication.
//!
//! These tests drive the phase timer through the real socket server and the
//! CLI client:
//! - Start, pause, toggle and reset via IPC
//! - Status after the deadline passed (resync on request)
//! - Settings queries and updates
//! - Error handling without a daemon

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::Duration;

use ocular_rest::cli::client::IpcClient;
use ocular_rest::clock::ManualClock;
use ocular_rest::daemon::ipc::{IpcServer, RequestHandler};
use ocular_rest::daemon::timer::{PhaseTimer, TimerEvent};
use ocular_rest::store::{SessionStore, SettingsStore};
use ocular_rest::types::{Phase, Settings, SettingsPatch};

const T0: i64 = 1_700_000_000_000;

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a temporary socket path for testing.
fn create_temp_socket_path() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("integration_test.sock");
    // Keep the directory so it's not deleted
    std::mem::forget(dir);
    path
}

/// Creates a timer with 25-minute work and 20-second breaks.
fn create_timer() -> (
    Arc<Mutex<PhaseTimer>>,
    ManualClock,
    mpsc::UnboundedReceiver<TimerEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let clock = ManualClock::new(T0);
    let timer = PhaseTimer::new(
        SettingsStore::in_memory(Settings {
            work_duration: 1500,
            break_duration: 20,
            ..Settings::default()
        }),
        SessionStore::in_memory(),
        Arc::new(clock.clone()),
        tx,
    );
    (Arc::new(Mutex::new(timer)), clock, rx)
}

/// Serves connections in the background until the test ends.
async fn spawn_server(socket_path: &PathBuf, timer: Arc<Mutex<PhaseTimer>>) -> IpcClient {
    let server = IpcServer::new(socket_path).unwrap();
    let handler = RequestHandler::new(timer);

    tokio::spawn(async move {
        loop {
            let Ok(stream) = server.accept().await else {
                break;
            };
            let _ = IpcServer::serve(stream, &handler).await;
        }
    });

    // Small delay for server to be ready
    tokio::time::sleep(Duration::from_millis(20)).await;
    IpcClient::with_socket_path(socket_path.clone()).without_retry()
}

// ============================================================================
// Intents via IPC
// ============================================================================

#[tokio::test]
async fn test_start_via_ipc() {
    let socket_path = create_temp_socket_path();
    let (timer, _clock, _rx) = create_timer();
    let client = spawn_server(&socket_path, timer.clone()).await;

    let response = client.start().await.unwrap();

    assert_eq!(response.status, "success");
    assert_eq!(response.message, "Focus session started");
    let data = response.data.expect("Response should contain data");
    assert_eq!(data.phase, Phase::Working);
    assert_eq!(data.time_left, 1500);

    assert_eq!(timer.lock().await.snapshot().phase, Phase::Working);
}

#[tokio::test]
async fn test_start_twice_is_an_error() {
    let socket_path = create_temp_socket_path();
    let (timer, _clock, _rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    client.start().await.unwrap();
    let err = client.start().await.unwrap_err();

    assert_eq!(err.to_string(), "Timer is already running");
}

#[tokio::test]
async fn test_pause_freezes_time_left() {
    let socket_path = create_temp_socket_path();
    let (timer, clock, _rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    client.start().await.unwrap();
    clock.advance_secs(100);
    let paused = client.pause().await.unwrap().data.unwrap();
    assert_eq!(paused.phase, Phase::Paused);
    assert_eq!(paused.time_left, 1400);

    clock.advance_secs(3600);
    let later = client.status().await.unwrap().data.unwrap();
    assert_eq!(later.phase, Phase::Paused);
    assert_eq!(later.time_left, 1400);
}

#[tokio::test]
async fn test_toggle_and_reset_via_ipc() {
    let socket_path = create_temp_socket_path();
    let (timer, clock, _rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    assert_eq!(client.toggle().await.unwrap().data.unwrap().phase, Phase::Working);
    clock.advance_secs(60);
    assert_eq!(client.toggle().await.unwrap().data.unwrap().phase, Phase::Paused);

    let reset = client.reset().await.unwrap().data.unwrap();
    assert_eq!(reset.phase, Phase::Paused);
    assert_eq!(reset.time_left, 1500);
    assert_eq!(reset.progress, 0.0);
}

// ============================================================================
// Resync on request
// ============================================================================

#[tokio::test]
async fn test_status_after_deadline_enters_break() {
    let socket_path = create_temp_socket_path();
    let (timer, clock, mut rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    client.start().await.unwrap();
    // Nobody polled while the machine slept past the deadline.
    clock.advance_secs(1500 + 45);

    let data = client.status().await.unwrap().data.unwrap();
    assert_eq!(data.phase, Phase::Break);
    assert_eq!(data.time_left, 20);

    let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(events.len(), 2, "start and one break entry: {:?}", events);
}

#[tokio::test]
async fn test_repeated_status_does_not_double_transition() {
    let socket_path = create_temp_socket_path();
    let (timer, clock, mut rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    client.start().await.unwrap();
    clock.advance_secs(1500);

    for _ in 0..3 {
        assert_eq!(client.status().await.unwrap().data.unwrap().phase, Phase::Break);
    }

    let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(events.len(), 2);
}

// ============================================================================
// Settings via IPC
// ============================================================================

#[tokio::test]
async fn test_settings_update_via_ipc() {
    let socket_path = create_temp_socket_path();
    let (timer, _clock, _rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    let response = client
        .update(SettingsPatch {
            break_duration: Some(45),
            is_muted: Some(true),
            ..SettingsPatch::default()
        })
        .await
        .unwrap();
    assert_eq!(response.message, "Settings updated");

    let settings = client.settings().await.unwrap().data.unwrap().settings;
    assert_eq!(settings.break_duration, 45);
    assert!(settings.is_muted);
    assert_eq!(settings.work_duration, 1500);
    assert!(settings.show_coach);
}

#[tokio::test]
async fn test_settings_change_applies_at_next_phase() {
    let socket_path = create_temp_socket_path();
    let (timer, clock, _rx) = create_timer();
    let client = spawn_server(&socket_path, timer).await;

    client.start().await.unwrap();
    clock.advance_secs(500);
    client
        .update(SettingsPatch {
            work_duration: Some(60),
            ..SettingsPatch::default()
        })
        .await
        .unwrap();

    // The running interval keeps its deadline.
    assert_eq!(client.status().await.unwrap().data.unwrap().time_left, 1000);
}

// ============================================================================
// Connection errors
// ============================================================================

#[tokio::test]
async fn test_no_daemon() {
    let socket_path = create_temp_socket_path();
    let client = IpcClient::with_socket_path(socket_path).without_retry();

    let err = client.status().await.unwrap_err();
    assert!(format!("{:#}", err).contains("Cannot reach the daemon"));
}
