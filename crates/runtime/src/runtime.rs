use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::agent::{Agent, AgentHost};
use crate::api::{AgentHandle, Result, RuntimeError};
use crate::workers::AgentWorker;

/// Runtime tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Commands that may queue for one worker before senders wait.
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 32;
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER_SIZE,
        }
    }
}

/// One agent running in its own worker task.
///
/// [`AgentHandle`] provides a cloneable façade for clients; the runtime keeps
/// the worker's join handle so the agent can be shut down and recovered.
pub struct AgentRuntime<C> {
    handle: AgentHandle,
    worker: JoinHandle<(Agent<C>, C)>,
}

impl<C> AgentRuntime<C>
where
    C: AgentHost + Send + 'static,
{
    /// Spawns a worker owning `agent` and `host` on the current tokio runtime.
    pub fn spawn(agent: Agent<C>, host: C, config: RuntimeConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let handle = AgentHandle::new(agent.name().to_owned(), command_tx);
        let worker = tokio::spawn(AgentWorker::new(agent, host, command_rx).run());
        Self { handle, worker }
    }

    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Stops the worker and returns the agent and its host.
    ///
    /// Commands already queued are processed first.
    pub async fn shutdown(self) -> Result<(Agent<C>, C)> {
        // A worker that already stopped has nothing left to shut down.
        let _ = self.handle.shutdown().await;
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}
