//! IPC server for the reminder daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for timer intents
//! - A resync before every request, so a client that comes back after a
//!   suspension always sees a caught-up timer

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

use crate::types::{IpcRequest, IpcResponse, Phase, SettingsPatch};

use super::timer::PhaseTimer;

/// Largest request body accepted from a client.
const MAX_REQUEST_SIZE: usize = 4096;

/// How long a client gets to send its request.
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures while reading a client's request.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    #[error("Failed to read request: {0}")]
    ReadError(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Request too large (max {MAX_REQUEST_SIZE} bytes)")]
    RequestTooLarge,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Listens on the daemon socket. The socket file is removed on drop.
pub struct IpcServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl IpcServer {
    /// Binds the daemon socket, replacing a leftover file from a dead daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory or the socket cannot be created.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if let Some(dir) = socket_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory {:?}", dir))?;
        }
        match std::fs::remove_file(socket_path) {
            Ok(()) => tracing::debug!("Removed stale socket {:?}", socket_path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to remove stale socket {:?}", socket_path));
            }
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Waits for the next client.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _) = self
            .listener
            .accept()
            .await
            .context("Failed to accept client")?;
        Ok(stream)
    }

    /// Reads the single JSON request a client sends per connection.
    ///
    /// # Errors
    ///
    /// Fails on timeout, on a body over [`MAX_REQUEST_SIZE`], on an empty read
    /// and on JSON that is not a known command.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        // One spare byte tells an oversized body apart from one that fits.
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE + 1];

        let n = timeout(READ_TIMEOUT, stream.read(&mut buffer))
            .await
            .map_err(|_| IpcError::Timeout)?
            .map_err(|e| IpcError::ReadError(e.to_string()))?;

        match n {
            0 => anyhow::bail!("Client disconnected before sending a request"),
            n if n > MAX_REQUEST_SIZE => Err(IpcError::RequestTooLarge.into()),
            n => serde_json::from_slice(&buffer[..n]).context("Unrecognized request"),
        }
    }

    /// Writes `response` as JSON and flushes it.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let body = serde_json::to_vec(response).context("Failed to encode response")?;
        stream.write_all(&body).await.context("Failed to write response")?;
        stream.flush().await.context("Failed to flush response")
    }

    /// Answers one connection. Unreadable requests get an error response.
    pub async fn serve(mut stream: UnixStream, handler: &RequestHandler) -> Result<()> {
        let response = match Self::receive_request(&mut stream).await {
            Ok(request) => handler.handle(request).await,
            Err(e) => {
                tracing::debug!("Rejecting request: {:#}", e);
                IpcResponse::error(format!("Invalid request: {e}"))
            }
        };
        Self::send_response(&mut stream, &response).await
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the phase timer.
#[derive(Clone)]
pub struct RequestHandler {
    timer: Arc<Mutex<PhaseTimer>>,
}

impl RequestHandler {
    pub fn new(timer: Arc<Mutex<PhaseTimer>>) -> Self {
        Self { timer }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        let mut timer = self.timer.lock().await;
        // A request is also a resume trigger.
        timer.resync();

        match request {
            IpcRequest::Start => match timer.start() {
                Ok(()) => IpcResponse::success("Focus session started", Some(timer.snapshot())),
                Err(e) => IpcResponse::error(e.to_string()),
            },
            IpcRequest::Pause => match timer.pause() {
                Ok(()) => IpcResponse::success("Timer paused", Some(timer.snapshot())),
                Err(e) => IpcResponse::error(e.to_string()),
            },
            IpcRequest::Toggle => {
                let message = match timer.toggle() {
                    Phase::Paused => "Timer paused",
                    _ => "Focus session started",
                };
                IpcResponse::success(message, Some(timer.snapshot()))
            }
            IpcRequest::Reset => {
                timer.reset();
                IpcResponse::success("Timer reset", Some(timer.snapshot()))
            }
            IpcRequest::Status | IpcRequest::Resync | IpcRequest::Settings => {
                IpcResponse::success("", Some(timer.snapshot()))
            }
            IpcRequest::Update { patch } => Self::handle_update(&mut timer, &patch),
        }
    }

    fn handle_update(timer: &mut PhaseTimer, patch: &SettingsPatch) -> IpcResponse {
        if patch.is_empty() {
            return IpcResponse::error("No settings to update");
        }
        timer.update_settings(patch);
        IpcResponse::success("Settings updated", Some(timer.snapshot()))
    }
}

// ============================================================================
// Tests
// ============================================================================
