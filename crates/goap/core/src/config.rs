/// Search limits for the planner.
///
/// Both limits are off by default: the search then runs until every branch is
/// exhausted, which always terminates because an action is used at most once
/// per branch. Real-time hosts can cap the work done in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Maximum number of search nodes generated in one call. Exceeding it is a
    /// planning failure, never a partial plan.
    pub max_nodes: Option<usize>,

    /// Maximum plan length. Deeper branches are not explored.
    pub max_depth: Option<usize>,
}

impl PlannerConfig {
    /// Node cap suggested for hosts that plan every frame.
    pub const REALTIME_MAX_NODES: usize = 4096;

    pub const fn unbounded() -> Self {
        Self {
            max_nodes: None,
            max_depth: None,
        }
    }

    pub const fn realtime() -> Self {
        Self {
            max_nodes: Some(Self::REALTIME_MAX_NODES),
            max_depth: None,
        }
    }

    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Movement-cost watchdog used while an agent walks to an action's target.
///
/// Elapsed movement cost grows by `rate * dt` per update and is compared with
/// the action's planned cost.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Movement cost accrued per second of travel.
    pub rate: f32,

    /// Multiple of the planned cost at which the action is abandoned.
    pub abort_factor: f32,

    /// How often the elapsed cost may be relaxed for one action.
    pub max_resets: u32,

    /// The elapsed cost is relaxed only when `remaining / elapsed` is below
    /// `cost / near_divisor`.
    pub near_divisor: f32,
}

impl MovementConfig {
    pub const DEFAULT_RATE: f32 = 0.5;
    pub const DEFAULT_ABORT_FACTOR: f32 = 2.0;
    pub const DEFAULT_MAX_RESETS: u32 = 3;
    pub const DEFAULT_NEAR_DIVISOR: f32 = 3.0;

    pub const fn new() -> Self {
        Self {
            rate: Self::DEFAULT_RATE,
            abort_factor: Self::DEFAULT_ABORT_FACTOR,
            max_resets: Self::DEFAULT_MAX_RESETS,
            near_divisor: Self::DEFAULT_NEAR_DIVISOR,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-agent chase timing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChaseConfig {
    /// Seconds a chase may last before it is given up.
    pub duration: f32,

    /// Seconds after a chase ends before a new one may start.
    pub cooldown: f32,

    /// Fact raised when the player is sighted and cleared when a chase ends.
    pub fact: String,
}

impl ChaseConfig {
    pub const DEFAULT_DURATION: f32 = 5.0;
    pub const DEFAULT_COOLDOWN: f32 = 5.0;
    pub const DEFAULT_FACT: &'static str = "foundPlayer";
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            cooldown: Self::DEFAULT_COOLDOWN,
            fact: Self::DEFAULT_FACT.to_owned(),
        }
    }
}
