mod client;
mod orchestrator;
mod plan;
mod transport;

pub use client::HttpTransport;
pub use orchestrator::{DownloadOrchestrator, SubmitOptions, SubmitOutcome, TransferJob};
pub use plan::TransferPlan;
pub use transport::{
    BatchEvent, BatchId, LocalFs, PathExists, TransferEvent, Transport, CANCELED_SENTINEL,
};
