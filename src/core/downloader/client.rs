use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::plan::TransferPlan;
use super::transport::{BatchEvent, BatchId, TransferEvent, Transport, CANCELED_SENTINEL};
use crate::core::error::{LauncherError, LauncherResult};

const DEFAULT_CONCURRENCY: usize = 8;
const EVENT_BUFFER: usize = 256;

/// Concurrent, cancellable HTTP transport.
///
/// Each planned file becomes a job with its own id and cancellation token.
/// Bodies are streamed into `<dest>.part` and renamed on completion so an
/// interrupted transfer never looks present on disk.
pub struct HttpTransport {
    client: Client,
    /// Maximum number of parallel downloads.
    concurrency: usize,
    jobs: Arc<Mutex<HashMap<String, CancellationToken>>>,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, batch: BatchId, plan: &TransferPlan) -> LauncherResult<mpsc::Receiver<BatchEvent>> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let entries: Vec<(String, PathBuf)> = plan
            .iter()
            .map(|(url, dest)| (url.clone(), dest.clone()))
            .collect();

        info!(
            "Starting batch {}: {} files, concurrency={}",
            batch,
            entries.len(),
            self.concurrency
        );

        let client = self.client.clone();
        let jobs = Arc::clone(&self.jobs);
        let concurrency = self.concurrency;

        tokio::spawn(async move {
            let failures = stream::iter(entries)
                .map(|(url, dest)| {
                    let client = &client;
                    let jobs = &jobs;
                    let tx = &tx;
                    async move { run_job(client, jobs, batch, &url, &dest, tx).await }
                })
                .buffer_unordered(concurrency)
                .filter(|result| futures_util::future::ready(result.is_err()))
                .count()
                .await;

            if failures == 0 {
                let _ = tx.send(BatchEvent::new(batch, TransferEvent::Finished)).await;
            } else {
                warn!("Batch {} finished with {} failed transfers", batch, failures);
            }
        });

        Ok(rx)
    }

    async fn cancel(&self, job_id: &str) {
        if let Some(token) = self.jobs.lock().await.remove(job_id) {
            debug!("Canceling transfer {}", job_id);
            token.cancel();
        }
    }
}

async fn run_job(
    client: &Client,
    jobs: &Mutex<HashMap<String, CancellationToken>>,
    batch: BatchId,
    url: &str,
    dest: &Path,
    tx: &mpsc::Sender<BatchEvent>,
) -> LauncherResult<()> {
    // Nobody is listening any more: the batch was abandoned.
    if tx.is_closed() {
        debug!("Skipping {} (batch {} abandoned)", url, batch);
        return Ok(());
    }

    let id = Uuid::new_v4().to_string();
    let token = CancellationToken::new();
    jobs.lock().await.insert(id.clone(), token.clone());

    let result = transfer(client, batch, &id, url, dest, tx, &token).await;
    jobs.lock().await.remove(&id);

    if let Err(e) = &result {
        let message = match e {
            LauncherError::Canceled => CANCELED_SENTINEL.to_string(),
            other => other.to_string(),
        };
        let _ = tx
            .send(BatchEvent::new(batch, TransferEvent::Error { message }))
            .await;
    }

    result
}

async fn transfer(
    client: &Client,
    batch: BatchId,
    id: &str,
    url: &str,
    dest: &Path,
    tx: &mpsc::Sender<BatchEvent>,
    token: &CancellationToken,
) -> LauncherResult<()> {
    // Ensure parent dir exists
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LauncherError::DownloadFailed {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let total_bytes = response.content_length();
    let part = part_path(dest);
    let started = Instant::now();
    let mut downloaded: u64 = 0;

    let progress = |downloaded: u64, percent: f64| {
        let elapsed = started.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            downloaded as f64 / elapsed
        } else {
            0.0
        };
        BatchEvent::new(
            batch,
            TransferEvent::Progress {
                id: id.to_string(),
                destination: dest.to_path_buf(),
                percent,
                rate,
            },
        )
    };

    let written: LauncherResult<()> = async {
        let mut file = tokio::fs::File::create(&part)
            .await
            .map_err(|e| LauncherError::Io {
                path: part.clone(),
                source: e,
            })?;
        let mut body = response.bytes_stream();

        loop {
            let chunk = tokio::select! {
                _ = token.cancelled() => return Err(LauncherError::Canceled),
                chunk = body.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk?;

            file.write_all(&chunk).await.map_err(|e| LauncherError::Io {
                path: part.clone(),
                source: e,
            })?;
            downloaded += chunk.len() as u64;

            let percent = match total_bytes {
                Some(total) if total > 0 => (downloaded as f64 / total as f64 * 100.0).min(100.0),
                _ => 0.0,
            };
            // Receiver gone: the batch was aborted, stop streaming.
            if tx.send(progress(downloaded, percent)).await.is_err() {
                return Err(LauncherError::Canceled);
            }
        }

        file.flush().await.map_err(|e| LauncherError::Io {
            path: part.clone(),
            source: e,
        })?;
        // file is dropped here, before the rename (matters on Windows)
        Ok(())
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(e);
    }

    tokio::fs::rename(&part, dest)
        .await
        .map_err(|e| LauncherError::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;

    let _ = tx.send(progress(downloaded, 100.0)).await;
    debug!("Downloaded: {} -> {:?}", url, dest);
    Ok(())
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
