//! Side effects of phase changes.
//!
//! The timer only emits events. This dispatcher turns them into cues,
//! notifications and tip fetches without ever holding the timer lock across a
//! call into a collaborator.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::notification::{self, Notification, Notifier, Permission};
use crate::sound::CuePlayer;
use crate::tip::TipSource;
use crate::types::ActivePhase;

use super::timer::{PhaseTimer, TimerEvent};

/// Consumes timer events and drives the collaborators.
pub struct PhaseDispatcher<T: TipSource> {
    timer: Arc<Mutex<PhaseTimer>>,
    player: Arc<dyn CuePlayer>,
    notifier: Arc<dyn Notifier>,
    tips: Arc<T>,
}

impl<T: TipSource> PhaseDispatcher<T> {
    pub fn new(
        timer: Arc<Mutex<PhaseTimer>>,
        player: Arc<dyn CuePlayer>,
        notifier: Arc<dyn Notifier>,
        tips: Arc<T>,
    ) -> Self {
        Self {
            timer,
            player,
            notifier,
            tips,
        }
    }

    /// Handles events until every sender is gone.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<TimerEvent>) {
        while let Some(event) = rx.recv().await {
            // The tip task is detached; the generation guard drops late results.
            let _ = self.handle_event(event).await;
        }
        tracing::debug!("Timer event channel closed");
    }

    /// Handles a single event.
    ///
    /// Entering a break returns the handle of the spawned tip task, which
    /// finishes once the tip is attached and the break notification is sent.
    pub async fn handle_event(&self, event: TimerEvent) -> Option<JoinHandle<()>> {
        let TimerEvent::PhaseEntered {
            phase,
            duration_secs,
            muted,
            generation,
        } = event
        else {
            tracing::debug!("Ignoring {:?}", event);
            return None;
        };

        if !muted {
            match phase {
                ActivePhase::Break => self.player.play_break_start(),
                ActivePhase::Working => self.player.play_break_end(),
            }
        }

        match phase {
            ActivePhase::Break => Some(self.spawn_tip_fetch(duration_secs, muted, generation)),
            ActivePhase::Working => {
                deliver(
                    self.notifier.clone(),
                    notification::focus_started(duration_secs, muted),
                )
                .await;
                None
            }
        }
    }

    fn spawn_tip_fetch(&self, break_secs: u32, muted: bool, generation: u64) -> JoinHandle<()> {
        let timer = self.timer.clone();
        let notifier = self.notifier.clone();
        let tips = self.tips.clone();

        tokio::spawn(async move {
            let tip = tips.fetch_tip().await;

            // A stale tip is neither shown nor announced.
            if !timer.lock().await.attach_tip(generation, tip.clone()) {
                return;
            }

            deliver(notifier, notification::break_started(break_secs, &tip, muted)).await;
        })
    }
}

/// Sends a notification off the runtime thread if permission allows it.
async fn deliver(notifier: Arc<dyn Notifier>, notification: Notification) {
    let result = tokio::task::spawn_blocking(move || {
        if notifier.request_permission() != Permission::Granted {
            return Ok(false);
        }
        notifier.notify(&notification).map(|()| true)
    })
    .await;

    match result {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => tracing::debug!("Notification skipped, permission not granted"),
        Ok(Err(e)) if e.is_permission_error() => {
            tracing::debug!("Notification skipped: {}", e)
        }
        Ok(Err(e)) => tracing::warn!("Failed to send notification: {}", e),
        Err(e) => tracing::warn!("Notification task failed: {}", e),
    }
}

// ============================================================================
// Tests
// ============================================================================
