//! A flat toy world the simulated agents move around in.

use goap_core::{ActionSpec, TargetId};
use runtime::{AgentHost, MoveOutcome};

/// Agents perform an action once within this distance of its target.
pub const ARRIVAL_RADIUS: f32 = 2.0;

const PLAYER: TargetId = TargetId(0);
const ITEM: TargetId = TargetId(1);
const SIGHTING: TargetId = TargetId(2);
const PATROL_BASE: u32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One agent's view of the world: where it stands and where things are.
#[derive(Clone, Debug)]
pub struct World {
    agent: Point,
    speed: f32,
    player: Point,
    item: Option<Point>,
    sighting: Option<Point>,
    patrol: Vec<Point>,
    next_patrol: usize,
    patrols_completed: u32,
    items_collected: u32,
}

impl World {
    pub fn new(agent: Point, speed: f32, player: Point) -> Self {
        Self {
            agent,
            speed,
            player,
            item: None,
            sighting: None,
            patrol: Vec::new(),
            next_patrol: 0,
            patrols_completed: 0,
            items_collected: 0,
        }
    }

    /// A square patrol route around the origin, offset per agent.
    pub fn patrolling(index: usize) -> Self {
        let offset = index as f32 * 3.0;
        Self::new(Point::new(offset, 0.0), 4.0, Point::new(20.0, 20.0))
            .with_patrol([
                Point::new(offset + 6.0, 0.0),
                Point::new(offset + 6.0, 6.0),
                Point::new(offset, 6.0),
                Point::new(offset, 0.0),
            ])
            .with_item(Point::new(offset + 3.0, -5.0))
            .with_sighting(Point::new(12.0, 12.0))
    }

    pub fn with_patrol(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.patrol = points.into_iter().collect();
        self.next_patrol = 0;
        self
    }

    pub fn with_item(mut self, at: Point) -> Self {
        self.item = Some(at);
        self
    }

    pub fn with_sighting(mut self, at: Point) -> Self {
        self.sighting = Some(at);
        self
    }

    pub fn agent(&self) -> Point {
        self.agent
    }

    pub fn patrols_completed(&self) -> u32 {
        self.patrols_completed
    }

    pub fn items_collected(&self) -> u32 {
        self.items_collected
    }

    fn position(&self, target: TargetId) -> Option<Point> {
        match target {
            PLAYER => Some(self.player),
            ITEM => self.item,
            SIGHTING => self.sighting,
            TargetId(id) => {
                let index = id.checked_sub(PATROL_BASE)? as usize;
                self.patrol.get(index).copied()
            }
        }
    }
}

impl AgentHost for World {
    fn find_target(&mut self, action: &ActionSpec) -> Option<TargetId> {
        match action.name.as_str() {
            "ChasePlayer" => Some(PLAYER),
            "GetItem" => self.item.map(|_| ITEM),
            "MoveToSighting" => self.sighting.map(|_| SIGHTING),
            "PatrolToPoint" if !self.patrol.is_empty() => {
                Some(TargetId(PATROL_BASE + self.next_patrol as u32))
            }
            _ => None,
        }
    }

    fn estimate_cost(&mut self, _action: &ActionSpec, target: TargetId) -> Option<f32> {
        let goal = self.position(target)?;
        Some(self.agent.distance(goal) / self.speed)
    }

    fn move_agent(&mut self, target: TargetId, dt: f32) -> MoveOutcome {
        let Some(goal) = self.position(target) else {
            return MoveOutcome::Unreachable;
        };

        let distance = self.agent.distance(goal);
        if distance <= ARRIVAL_RADIUS {
            return MoveOutcome::Arrived;
        }

        let step = (self.speed * dt).min(distance);
        let ratio = step / distance;
        self.agent.x += (goal.x - self.agent.x) * ratio;
        self.agent.y += (goal.y - self.agent.y) * ratio;

        let remaining = self.agent.distance(goal);
        if remaining <= ARRIVAL_RADIUS {
            MoveOutcome::Arrived
        } else {
            MoveOutcome::Moving { remaining }
        }
    }

    fn is_chase_target(&self, target: TargetId) -> bool {
        target == PLAYER
    }

    fn perform(&mut self, action: &ActionSpec, _target: Option<TargetId>) -> bool {
        match action.name.as_str() {
            "GetItem" => {
                let collected = self.item.take().is_some();
                if collected {
                    self.items_collected += 1;
                }
                collected
            }
            "PatrolToPoint" => {
                self.next_patrol = (self.next_patrol + 1) % self.patrol.len().max(1);
                self.patrols_completed += 1;
                true
            }
            "MoveToSighting" => {
                self.sighting = None;
                true
            }
            _ => true,
        }
    }
}
