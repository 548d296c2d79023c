//! Agent runtime for goal-oriented action planning.
//!
//! This crate wraps the pure planning core in the shell an agent needs to act:
//! a per-update state machine that plans, walks to targets and performs
//! actions, lifecycle listeners, and a worker task per agent reachable through
//! a cloneable handle.
//!
//! Modules are organized by responsibility:
//! - [`agent`] hosts the agent state machine and its host seam
//! - [`listeners`] provides plan lifecycle callbacks
//! - [`api`] exposes the types downstream clients interact with
//! - [`runtime`] spawns agents onto worker tasks
//! - `workers` keeps background tasks internal to the crate
pub mod agent;
pub mod api;
pub mod listeners;
pub mod runtime;

mod workers;

pub use agent::{
    Agent, AgentHost, AgentMemory, AgentPhase, AgentStatus, BudgetVerdict, ChaseTick,
    HostedAction, MoveOutcome, MovementBudget,
};
pub use api::{AgentHandle, Result, RuntimeError};
pub use listeners::{ListenerRegistry, PlanListener, TracingListener};
pub use runtime::{AgentRuntime, RuntimeConfig};
