//! Worker task that owns one [`Agent`] and its host.
//!
//! Commands from [`crate::AgentHandle`] are processed one at a time, so fact
//! changes coming from outside are never interleaved with a planning call.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use goap_core::{FactStore, Goal};

use crate::agent::{Agent, AgentHost, AgentPhase, AgentStatus};
use crate::api::{Result, RuntimeError};

/// Commands accepted by an agent worker.
pub enum Command {
    /// Write a fact. Replies whether the fact already existed.
    SetFact {
        name: String,
        value: bool,
        reply: oneshot::Sender<bool>,
    },
    /// Report a player sighting. Replies whether a chase started.
    SightPlayer { reply: oneshot::Sender<bool> },
    /// Add knowledge to an action. Replies whether it became enabled.
    Learn {
        action: String,
        amount: u32,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Advance the agent by `dt` seconds.
    Tick {
        dt: f32,
        reply: oneshot::Sender<Result<AgentPhase>>,
    },
    QueryFacts { reply: oneshot::Sender<FactStore> },
    QueryGoal { reply: oneshot::Sender<Option<Goal>> },
    QueryStatus { reply: oneshot::Sender<AgentStatus> },
    Shutdown,
}

/// Background task driving one agent.
pub struct AgentWorker<C> {
    agent: Agent<C>,
    host: C,
    command_rx: mpsc::Receiver<Command>,
}

impl<C: AgentHost> AgentWorker<C> {
    pub fn new(agent: Agent<C>, host: C, command_rx: mpsc::Receiver<Command>) -> Self {
        info!(
            agent = agent.name(),
            actions = agent.actions().len(),
            goals = agent.goals().len(),
            "AgentWorker initialized"
        );
        Self {
            agent,
            host,
            command_rx,
        }
    }

    /// Main worker loop. Returns the agent and host once every handle is
    /// dropped or a shutdown is requested.
    pub async fn run(mut self) -> (Agent<C>, C) {
        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }
        debug!(agent = self.agent.name(), "AgentWorker stopped");
        (self.agent, self.host)
    }

    /// Returns `false` when the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::SetFact { name, value, reply } => {
                let existed = self.agent.world_state_mut().set(name, value);
                if reply.send(existed).is_err() {
                    debug!("SetFact reply channel closed (caller dropped)");
                }
            }
            Command::SightPlayer { reply } => {
                let started = self.agent.sight_player();
                if reply.send(started).is_err() {
                    debug!("SightPlayer reply channel closed (caller dropped)");
                }
            }
            Command::Learn {
                action,
                amount,
                reply,
            } => {
                let result = self
                    .agent
                    .learn(&action, amount)
                    .map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("Learn reply channel closed (caller dropped)");
                }
            }
            Command::Tick { dt, reply } => {
                let result = self.tick(dt);
                if reply.send(result).is_err() {
                    debug!("Tick reply channel closed (caller dropped)");
                }
            }
            Command::QueryFacts { reply } => {
                if reply.send(self.agent.world_state().clone()).is_err() {
                    debug!("QueryFacts reply channel closed (caller dropped)");
                }
            }
            Command::QueryGoal { reply } => {
                if reply.send(self.agent.current_goal().cloned()).is_err() {
                    debug!("QueryGoal reply channel closed (caller dropped)");
                }
            }
            Command::QueryStatus { reply } => {
                if reply.send(self.agent.status()).is_err() {
                    debug!("QueryStatus reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn tick(&mut self, dt: f32) -> Result<AgentPhase> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(RuntimeError::InvalidDelta { dt });
        }
        Ok(self.agent.update(&mut self.host, dt))
    }
}
