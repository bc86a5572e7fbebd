// ─── Transport boundary ───
// What the orchestrator needs from whatever moves the bytes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use super::plan::TransferPlan;
use crate::core::error::LauncherResult;

/// Error message a transport reports for a job that was canceled.
pub const CANCELED_SENTINEL: &str = "canceled";

/// Identifies one submission; events from other submissions are ignored.
pub type BatchId = u64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum TransferEvent {
    Progress {
        id: String,
        destination: PathBuf,
        /// 0..=100
        percent: f64,
        /// Bytes per second.
        rate: f64,
    },
    Error {
        message: String,
    },
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvent {
    pub batch: BatchId,
    pub event: TransferEvent,
}

impl BatchEvent {
    pub fn new(batch: BatchId, event: TransferEvent) -> Self {
        Self { batch, event }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Start transferring `plan`. Events arrive in order on the returned channel.
    async fn submit(&self, batch: BatchId, plan: &TransferPlan) -> LauncherResult<mpsc::Receiver<BatchEvent>>;

    /// Ask a job to stop. Unknown or already finished jobs are ignored.
    async fn cancel(&self, job_id: &str);
}

/// Existence check used for skip-if-present.
#[async_trait]
pub trait PathExists: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
}

/// `PathExists` over the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl PathExists for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
