//! Cloneable façade for issuing commands to an agent worker.
//!
//! [`AgentHandle`] hides channel plumbing and offers async helpers for
//! changing facts, stepping the agent and querying its state.
use tokio::sync::{mpsc, oneshot};

use goap_core::{FactStore, Goal};

use super::errors::{Result, RuntimeError};
use crate::agent::{AgentPhase, AgentStatus};
use crate::workers::Command;

/// Client-facing handle to one agent.
#[derive(Clone)]
pub struct AgentHandle {
    name: String,
    command_tx: mpsc::Sender<Command>,
}

impl AgentHandle {
    pub(crate) fn new(name: String, command_tx: mpsc::Sender<Command>) -> Self {
        Self { name, command_tx }
    }

    /// Name of the agent behind this handle.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write a fact. Returns whether the fact already existed.
    pub async fn set_fact(&self, name: impl Into<String>, value: bool) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::SetFact {
            name: name.into(),
            value,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Report a player sighting. Returns whether a chase started.
    pub async fn sight_player(&self) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::SightPlayer { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Add knowledge to an action. Returns whether it became enabled.
    pub async fn learn(&self, action: impl Into<String>, amount: u32) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Learn {
            action: action.into(),
            amount,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Advance the agent by `dt` seconds and return its new phase.
    pub async fn tick(&self, dt: f32) -> Result<AgentPhase> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Tick { dt, reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Snapshot of the agent's facts.
    pub async fn query_facts(&self) -> Result<FactStore> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueryFacts { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Goal of the plan being executed, if any.
    pub async fn query_goal(&self) -> Result<Option<Goal>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueryGoal { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn query_status(&self) -> Result<AgentStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueryStatus { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
