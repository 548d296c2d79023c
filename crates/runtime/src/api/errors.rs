//! Error types surfaced by the runtime API.
//!
//! Planning failures are not errors at this level: an agent that cannot plan
//! stays idle and retries next tick. What remains are channel failures between
//! handles and workers, and catalogue mistakes made while wiring an agent.
use thiserror::Error;
use tokio::sync::oneshot;

use goap_core::CatalogueError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("agent worker command channel closed")]
    CommandChannelClosed,

    #[error("agent worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("agent worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("tick delta must be finite and non-negative, got {dt}")]
    InvalidDelta { dt: f32 },
}
