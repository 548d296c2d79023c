//! Per-agent chase timers.

use goap_core::ChaseConfig;

/// Outcome of advancing the chase clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChaseTick {
    Idle,
    Chasing,
    /// The chase ran past its duration and was ended; cooldown has started.
    Expired,
}

/// State an agent carries between updates that is not part of its facts.
///
/// Each agent owns its own timers, so one agent's chase never blocks another.
#[derive(Clone, Debug, Default)]
pub struct AgentMemory {
    config: ChaseConfig,
    chasing: bool,
    chase_time: f32,
    cooldown: f32,
    /// Number of chases started; grows the agent's aggressiveness.
    aggressiveness: u32,
}

impl AgentMemory {
    pub fn new(config: ChaseConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ChaseConfig {
        &self.config
    }

    /// Fact raised by a sighting and cleared when the chase ends.
    pub fn chase_fact(&self) -> &str {
        &self.config.fact
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    pub fn chase_time(&self) -> f32 {
        self.chase_time
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn aggressiveness(&self) -> u32 {
        self.aggressiveness
    }

    /// A new chase needs no chase in progress and an elapsed cooldown.
    pub fn can_start_chase(&self) -> bool {
        !self.chasing && self.cooldown <= 0.0
    }

    /// Starts a chase if allowed. Returns whether one started.
    pub fn start_chase(&mut self) -> bool {
        if !self.can_start_chase() {
            return false;
        }
        self.chasing = true;
        self.chase_time = 0.0;
        self.aggressiveness = self.aggressiveness.saturating_add(1);
        true
    }

    /// Ends the current chase, successful or not, and starts the cooldown.
    pub fn end_chase(&mut self) {
        self.chasing = false;
        self.chase_time = 0.0;
        self.cooldown = self.config.cooldown;
    }

    /// Advances the timers by `dt` seconds.
    ///
    /// Chase time only accrues while `pursuing` (walking toward the player).
    pub fn advance(&mut self, dt: f32, pursuing: bool) -> ChaseTick {
        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        if !self.chasing {
            return ChaseTick::Idle;
        }
        if self.chase_time > self.config.duration {
            self.end_chase();
            return ChaseTick::Expired;
        }
        if pursuing {
            self.chase_time += dt;
        }
        ChaseTick::Chasing
    }
}
