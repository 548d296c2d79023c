//! Worker tasks that back the runtime orchestration.
//!
//! Each agent runs in its own worker so agents plan independently and in
//! parallel while each agent's own state is only ever touched by its worker.

mod agent;

pub use agent::{AgentWorker, Command};
