//! Runs the scan state machine as a single task.
//!
//! The task owns the [`ScanController`] and reads events from one channel.
//! Acquisition and transfer each run in their own spawned task and post
//! their completion back to that channel, so the controller is never
//! blocked and Reset can be handled while a transfer is in flight. Every
//! transition is published on a `watch` channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::controller::{Effect, ScanController, ScanEvent};
use super::session::ScanSession;
use crate::acquisition::ImageSource;
use crate::identification::IdentificationApi;

/// Front door to a running scan workflow.
pub struct ScanHandle {
    events: mpsc::UnboundedSender<ScanEvent>,
    snapshots: watch::Receiver<ScanSession>,
    task: JoinHandle<()>,
}

/// Spawns the workflow task. Needs a Tokio runtime.
pub struct ScanWorkflow;

impl ScanWorkflow {
    pub fn spawn<S, C>(source: Arc<S>, client: Arc<C>) -> ScanHandle
    where
        S: ImageSource + 'static,
        C: IdentificationApi + 'static,
    {
        let (events, inbox) = mpsc::unbounded_channel();
        let controller = ScanController::new();
        let (publisher, snapshots) = watch::channel(controller.session().clone());

        let runner = Runner {
            controller,
            source,
            client,
            // Weak so dropping the handle lets the loop finish
            events: events.downgrade(),
            publisher,
        };
        let task = tokio::spawn(runner.run(inbox));

        ScanHandle {
            events,
            snapshots,
            task,
        }
    }
}

impl ScanHandle {
    /// Ask for a scan. Ignored while one is in flight.
    pub fn start_scan(&self) {
        self.send(ScanEvent::StartScan);
    }

    /// Clear the session back to Idle.
    ///
    /// For interactive front ends that keep one handle across scans; the
    /// one-shot CLI commands never need it.
    pub fn reset(&self) {
        self.send(ScanEvent::Reset);
    }

    fn send(&self, event: ScanEvent) {
        if self.events.send(event).is_err() {
            warn!("Scan workflow has stopped, dropping trigger");
        }
    }

    /// Latest published session.
    pub fn snapshot(&self) -> ScanSession {
        self.snapshots.borrow().clone()
    }

    /// Receiver that sees every published session (latest wins).
    pub fn subscribe(&self) -> watch::Receiver<ScanSession> {
        self.snapshots.clone()
    }

    /// Start a scan and wait for it to settle (Idle, Succeeded or Failed).
    ///
    /// `on_update` sees each snapshot observed on the way. If a scan is
    /// already in flight, this waits for that one instead.
    pub async fn scan(&self, mut on_update: impl FnMut(&ScanSession)) -> ScanSession {
        let mut updates = self.subscribe();
        let current = updates.borrow_and_update().clone();
        let target = if current.is_busy() {
            current.generation()
        } else {
            current.generation() + 1
        };

        self.start_scan();

        loop {
            if updates.changed().await.is_err() {
                // Workflow task is gone; nothing more will be published
                return updates.borrow().clone();
            }
            let session = updates.borrow_and_update().clone();
            on_update(&session);
            if session.generation() >= target && session.is_settled() {
                return session;
            }
        }
    }

    /// Stop accepting triggers and wait for in-flight work to drain.
    pub async fn shutdown(self) {
        drop(self.events);
        if let Err(e) = self.task.await {
            warn!("Scan workflow task ended abnormally: {}", e);
        }
    }
}

struct Runner<S, C> {
    controller: ScanController,
    source: Arc<S>,
    client: Arc<C>,
    events: mpsc::WeakUnboundedSender<ScanEvent>,
    publisher: watch::Sender<ScanSession>,
}

impl<S, C> Runner<S, C>
where
    S: ImageSource + 'static,
    C: IdentificationApi + 'static,
{
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<ScanEvent>) {
        while let Some(event) = inbox.recv().await {
            let Some(effect) = self.controller.update(event) else {
                continue;
            };
            self.publisher.send_replace(self.controller.session().clone());
            self.perform(effect);
        }
        debug!("Scan workflow stopped");
    }

    fn perform(&self, effect: Effect) {
        let Some(events) = self.events.upgrade() else {
            return;
        };

        match effect {
            Effect::Nothing => {}
            Effect::Acquire { generation } => {
                let source = Arc::clone(&self.source);
                tokio::spawn(async move {
                    let outcome = source.request_image().await;
                    // The workflow may have shut down meanwhile
                    let _ = events.send(ScanEvent::AcquisitionFinished {
                        generation,
                        outcome,
                    });
                });
            }
            Effect::Transfer {
                generation,
                payload,
            } => {
                let client = Arc::clone(&self.client);
                tokio::spawn(async move {
                    let outcome = client.identify(&payload).await;
                    let _ = events.send(ScanEvent::TransferFinished {
                        generation,
                        outcome,
                    });
                });
            }
        }
    }
}
