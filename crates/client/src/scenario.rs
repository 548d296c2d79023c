//! Scripted stimuli fed to every agent during a run.

use runtime::{AgentHandle, RuntimeError};
use tracing::{info, warn};

/// Something that happens to an agent at a fixed tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    SetFact { name: String, value: bool },
    SightPlayer,
    Learn { action: String, amount: u32 },
}

impl Event {
    pub fn set_fact(name: &str, value: bool) -> Self {
        Self::SetFact {
            name: name.to_owned(),
            value,
        }
    }

    pub fn learn(action: &str, amount: u32) -> Self {
        Self::Learn {
            action: action.to_owned(),
            amount,
        }
    }

    /// Deliver the event. Unknown actions are logged and skipped so custom
    /// content does not have to match the script.
    pub async fn apply(&self, handle: &AgentHandle) -> runtime::Result<()> {
        let agent = handle.name();
        match self {
            Self::SetFact { name, value } => {
                handle.set_fact(name.as_str(), *value).await?;
                info!(agent, fact = %name, value, "fact set");
            }
            Self::SightPlayer => {
                let started = handle.sight_player().await?;
                info!(agent, started, "player sighted");
            }
            Self::Learn { action, amount } => match handle.learn(action.as_str(), *amount).await {
                Ok(unlocked) => info!(agent, action = %action, amount, unlocked, "knowledge added"),
                Err(RuntimeError::Catalogue(e)) => warn!(agent, "skipping learn event: {}", e),
                Err(e) => return Err(e),
            },
        }
        Ok(())
    }
}

/// Events ordered by the tick they fire on.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    events: Vec<(u32, Event)>,
}

impl Scenario {
    /// The default run: the agent patrols, notices an item, spots the player,
    /// learns to use its item, then hears about another sighting.
    pub fn standard() -> Self {
        Self::default()
            .at(20, Event::set_fact("itemSighted", true))
            .at(60, Event::SightPlayer)
            .at(90, Event::learn("UseItem", 100))
            .at(120, Event::set_fact("RECEIVECALL_playerSighting", true))
            .at(160, Event::SightPlayer)
    }

    pub fn at(mut self, tick: u32, event: Event) -> Self {
        let position = self.events.partition_point(|(at, _)| *at <= tick);
        self.events.insert(position, (tick, event));
        self
    }

    pub fn events_at(&self, tick: u32) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |(at, _)| *at == tick)
            .map(|(_, event)| event)
    }
}
