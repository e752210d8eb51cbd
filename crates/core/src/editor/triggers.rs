//! Deferred saves: the debounce timer driven by editor events, and the
//! periodic fallback save.
//!
//! The debounce timer saves the pages that were edited, the periodic timer
//! saves the selected page; both end in [`PageEditor::save`]. Cancelling the
//! handle stops the timers; a write already in flight runs to completion.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::EditorError;
use crate::events::EditorEvent;
use crate::surface::SurfaceError;

use super::save::SaveTrigger;
use super::PageEditor;

/// Running save triggers of one session. Dropping the handle stops them.
pub struct TriggerHandle {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl TriggerHandle {
    /// Stop both timers and wait for their loops to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "Save trigger task ended abnormally");
            }
        }
    }
}

impl Drop for TriggerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl PageEditor {
    /// Start the debounce and periodic save loops on the current runtime.
    pub fn spawn_triggers(&self) -> TriggerHandle {
        let cancel = CancellationToken::new();
        // Subscribe before spawning so no early event is missed.
        let events = self.inner.surface.subscribe();

        let debounced = tokio::spawn(self.clone().run_event_loop(events, cancel.clone()));
        let periodic = tokio::spawn(self.clone().run_periodic(cancel.clone()));

        tracing::info!(
            owner = %self.inner.owner.id,
            debounce_ms = self.inner.config.save_debounce.as_millis() as u64,
            interval_ms = self.inner.config.autosave_interval.as_millis() as u64,
            "Save triggers started"
        );

        TriggerHandle {
            cancel,
            tasks: vec![debounced, periodic],
        }
    }

    async fn run_event_loop(self, mut events: broadcast::Receiver<EditorEvent>, cancel: CancellationToken) {
        let debounce = self.inner.config.save_debounce;
        let mut deadline: Option<Instant> = None;

        loop {
            let quiet = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now));

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = quiet, if deadline.is_some() => {
                    deadline = None;
                    self.flush_edited().await;
                }
                received = events.recv() => match received {
                    Ok(event) if event.is_content_change() => {
                        self.mark_dirty().await;
                        deadline = Some(Instant::now() + debounce);
                    }
                    Ok(EditorEvent::PageSelected { page_id }) => {
                        self.inner.state.lock().await.current_page_id = Some(page_id);
                        self.reapply_selected_style();
                    }
                    Ok(EditorEvent::CanvasReloaded) => {
                        self.reapply_selected_style();
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Editor events lagged; scheduling a save");
                        self.mark_dirty().await;
                        deadline = Some(Instant::now() + debounce);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        tracing::debug!("Debounced save loop stopped");
    }

    async fn run_periodic(self, cancel: CancellationToken) {
        let period = self.inner.config.autosave_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if self.inner.state.lock().await.pages.is_empty() {
                        tracing::debug!("Periodic save skipped: no pages loaded");
                        continue;
                    }
                    self.flush(SaveTrigger::Periodic).await;
                }
            }
        }

        tracing::debug!("Periodic save loop stopped");
    }

    /// Save every page edited since its last write, falling back to the
    /// selected page when edits could not be attributed.
    async fn flush_edited(&self) {
        let dirty = self.inner.state.lock().await.dirty_pages.clone();
        if dirty.is_empty() {
            self.flush(SaveTrigger::Debounced).await;
            return;
        }

        for page_id in dirty {
            match self.save_page(&page_id, SaveTrigger::Debounced).await {
                Ok(outcome) => {
                    tracing::debug!(page = %outcome.record.name, "Debounced save completed");
                }
                Err(EditorError::Surface(SurfaceError::PageNotFound(_))) => {
                    tracing::debug!(page_id = %page_id, "Edited page left the editor; dropping it");
                    let mut state = self.inner.state.lock().await;
                    state.forget_dirty(&page_id);
                    if state.dirty_pages.is_empty() {
                        state.unsaved_changes = false;
                    }
                }
                Err(_) => {}
            }
        }
    }

    async fn flush(&self, trigger: SaveTrigger) {
        match self.save_selected(trigger).await {
            Ok(outcome) => {
                tracing::debug!(
                    page = %outcome.record.name,
                    trigger = trigger.as_str(),
                    "Deferred save completed"
                );
            }
            Err(EditorError::NoSelectedPage) => {
                tracing::debug!(trigger = trigger.as_str(), "Deferred save skipped: no page selected");
            }
            // Already logged and reported by `save`; the next trigger retries.
            Err(_) => {}
        }
    }
}
