// ─── Download Orchestrator ───
// Submits transfer plans and consumes the transport's event stream for one
// install attempt. Single consumer: the job table has exactly one writer.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::plan::TransferPlan;
use super::transport::{BatchEvent, BatchId, PathExists, TransferEvent, Transport, CANCELED_SENTINEL};
use crate::core::error::{LauncherError, LauncherResult};

/// Live state of one transfer as last reported by the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferJob {
    pub id: String,
    pub destination: PathBuf,
    pub progress_percent: f64,
    pub transfer_rate_bytes_per_second: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Transfer even when the destination already exists.
    pub overwrite_existing: bool,
    /// Keep the job table after `Finished` so the next batch continues the same scope.
    pub hold_open_for_next_batch: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Everything was already present; nothing was submitted.
    NothingToDo,
    Completed { files: usize },
}

pub struct DownloadOrchestrator<T, P> {
    transport: T,
    paths: P,
    jobs: BTreeMap<String, TransferJob>,
    last_batch: BatchId,
    cancel: CancellationToken,
    observer: watch::Sender<Vec<TransferJob>>,
}

impl<T: Transport, P: PathExists> DownloadOrchestrator<T, P> {
    pub fn new(transport: T, paths: P) -> Self {
        let (observer, _) = watch::channel(Vec::new());
        Self {
            transport,
            paths,
            jobs: BTreeMap::new(),
            last_batch: 0,
            cancel: CancellationToken::new(),
            observer,
        }
    }

    pub fn paths(&self) -> &P {
        &self.paths
    }

    /// Token that aborts the current install scope when cancelled.
    ///
    /// A cancelled token is replaced once its scope is torn down, so fetch it
    /// again for every install attempt.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Snapshot stream of the job table for UI observers.
    pub fn subscribe(&self) -> watch::Receiver<Vec<TransferJob>> {
        self.observer.subscribe()
    }

    pub fn jobs(&self) -> impl Iterator<Item = &TransferJob> {
        self.jobs.values()
    }

    /// Submit one batch and drive its event stream to completion.
    pub async fn submit(&mut self, mut plan: TransferPlan, options: SubmitOptions) -> LauncherResult<SubmitOutcome> {
        if !options.overwrite_existing {
            let mut present = HashSet::new();
            for (_, dest) in plan.iter() {
                if self.paths.exists(dest).await {
                    present.insert(dest.clone());
                }
            }
            if !present.is_empty() {
                debug!("Skipping {} files already on disk", present.len());
                plan.retain(|_, dest| !present.contains(dest));
            }
        }

        if plan.is_empty() {
            debug!("Nothing to transfer");
            if !options.hold_open_for_next_batch {
                self.close_scope();
            }
            return Ok(SubmitOutcome::NothingToDo);
        }

        self.last_batch += 1;
        let batch = self.last_batch;
        let files = plan.len();
        info!("Submitting batch {} ({} files)", batch, files);

        let mut events = match self.transport.submit(batch, &plan).await {
            Ok(rx) => rx,
            Err(e) => {
                self.abort_scope().await;
                return Err(e);
            }
        };

        let cancel = self.cancel.clone();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Install scope cancelled during batch {}", batch);
                    self.abort_scope().await;
                    return Err(LauncherError::Canceled);
                }
                next = events.recv() => next,
            };

            let Some(BatchEvent { batch: tag, event }) = next else {
                self.abort_scope().await;
                return Err(LauncherError::Transfer(format!(
                    "event stream of batch {batch} closed before finishing"
                )));
            };

            if tag != batch {
                debug!("Ignoring event of batch {} while consuming batch {}", tag, batch);
                continue;
            }

            match event {
                TransferEvent::Progress {
                    id,
                    destination,
                    percent,
                    rate,
                } => {
                    self.jobs.insert(
                        id.clone(),
                        TransferJob {
                            id,
                            destination,
                            progress_percent: percent.clamp(0.0, 100.0),
                            transfer_rate_bytes_per_second: rate.max(0.0),
                        },
                    );
                    self.publish();
                }
                TransferEvent::Error { message } => {
                    self.abort_scope().await;
                    if message == CANCELED_SENTINEL {
                        debug!("Batch {} canceled", batch);
                        return Err(LauncherError::Canceled);
                    }
                    warn!("Batch {} failed: {}", batch, message);
                    return Err(LauncherError::Transfer(message));
                }
                TransferEvent::Finished => {
                    if !options.hold_open_for_next_batch {
                        self.close_scope();
                    }
                    info!("Batch {} finished ({} files)", batch, files);
                    return Ok(SubmitOutcome::Completed { files });
                }
            }
        }
    }

    /// Tear down a scope left open by `hold_open_for_next_batch`.
    pub fn close_scope(&mut self) {
        self.jobs.clear();
        self.renew_token();
        self.publish();
    }

    /// Cancel every known job, then clear the table.
    async fn abort_scope(&mut self) {
        for id in self.jobs.keys() {
            self.transport.cancel(id).await;
        }
        self.jobs.clear();
        self.renew_token();
        self.publish();
    }

    /// The next attempt starts with a live token once a cancelled scope ends.
    fn renew_token(&mut self) {
        if self.cancel.is_cancelled() {
            debug!("Renewing cancelled install scope token");
            self.cancel = CancellationToken::new();
        }
    }

    fn publish(&self) {
        self.observer
            .send_replace(self.jobs.values().cloned().collect());
    }
}
