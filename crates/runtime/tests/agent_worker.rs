//! Integration tests for AgentWorker / AgentHandle
//!
//! Each test spawns a worker through `AgentRuntime`, talks to it only through
//! the handle, and shuts it down to recover the agent.

use goap_content::presets;
use goap_core::{ActionSpec, FactStore, TargetId};
use runtime::{
    Agent, AgentHost, AgentPhase, AgentRuntime, MoveOutcome, RuntimeConfig, RuntimeError,
};

/// A world where every target is always within reach.
#[derive(Default)]
struct Arena {
    performed: Vec<String>,
}

impl AgentHost for Arena {
    fn find_target(&mut self, _action: &ActionSpec) -> Option<TargetId> {
        Some(TargetId(7))
    }

    fn move_agent(&mut self, _target: TargetId, _dt: f32) -> MoveOutcome {
        MoveOutcome::Arrived
    }

    fn perform(&mut self, action: &ActionSpec, _target: Option<TargetId>) -> bool {
        self.performed.push(action.name.clone());
        true
    }
}

fn spawn_enemy(name: &str) -> AgentRuntime<Arena> {
    let preset = presets::enemy().expect("embedded enemy preset loads");
    let agent = Agent::from_specs(name, preset.facts, preset.actions, preset.goals)
        .expect("preset action names are unique");
    AgentRuntime::spawn(agent, Arena::default(), RuntimeConfig::default())
}

async fn tick_until_idle(handle: &runtime::AgentHandle, max_ticks: usize) -> usize {
    for tick in 1..=max_ticks {
        if handle.tick(0.1).await.expect("tick succeeds") == AgentPhase::Idle {
            return tick;
        }
    }
    panic!("agent did not return to idle within {max_ticks} ticks");
}

#[tokio::test]
async fn facts_set_through_the_handle_drive_planning() {
    let runtime = spawn_enemy("1");
    let handle = runtime.handle();

    let facts = handle.query_facts().await.unwrap();
    assert_eq!(facts.peek("foundPlayer"), Some(false));
    assert_eq!(handle.query_goal().await.unwrap(), None);

    assert!(handle.set_fact("foundPlayer", true).await.unwrap());
    assert_eq!(handle.tick(0.1).await.unwrap(), AgentPhase::Perform);

    let goal = handle.query_goal().await.unwrap().expect("plan in progress");
    assert_eq!(goal.fact, "attackPlayer");
    let status = handle.query_status().await.unwrap();
    assert_eq!(status.remaining, vec!["ChasePlayer"]);

    tick_until_idle(&handle, 10).await;
    let facts = handle.query_facts().await.unwrap();
    // The attack is rearmed once the chase completes.
    assert_eq!(facts.peek("attackPlayer"), Some(false));
    assert_eq!(facts.peek("foundPlayer"), Some(false));

    let (agent, arena) = runtime.shutdown().await.unwrap();
    assert_eq!(agent.name(), "1");
    assert!(arena.performed.contains(&"ChasePlayer".to_owned()));
}

#[tokio::test]
async fn sighting_starts_a_single_chase() {
    let runtime = spawn_enemy("2");
    let handle = runtime.handle();

    assert!(handle.sight_player().await.unwrap());
    assert!(!handle.sight_player().await.unwrap());
    let facts = handle.query_facts().await.unwrap();
    assert_eq!(facts.peek("foundPlayer"), Some(true));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn learning_is_forwarded_to_the_catalogue() {
    let runtime = spawn_enemy("3");
    let handle = runtime.handle();

    assert!(!handle.learn("UseItem", 50).await.unwrap());
    assert!(handle.learn("UseItem", 50).await.unwrap());
    assert!(matches!(
        handle.learn("Teleport", 1).await,
        Err(RuntimeError::Catalogue(_))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_delta_is_rejected() {
    let runtime = spawn_enemy("4");
    let handle = runtime.handle();

    assert!(matches!(
        handle.tick(-1.0).await,
        Err(RuntimeError::InvalidDelta { .. })
    ));
    assert!(matches!(
        handle.tick(f32::NAN).await,
        Err(RuntimeError::InvalidDelta { .. })
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn handle_fails_after_shutdown() {
    let runtime = spawn_enemy("5");
    let handle = runtime.handle();
    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.set_fact("hasItem", true).await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test]
async fn agents_run_independently() {
    let first = spawn_enemy("a");
    let second = spawn_enemy("b");

    first.handle().set_fact("foundPlayer", true).await.unwrap();
    first.handle().tick(0.1).await.unwrap();
    second.handle().tick(0.1).await.unwrap();

    let first_goal = first.handle().query_goal().await.unwrap();
    let second_goal = second.handle().query_goal().await.unwrap();
    assert_eq!(first_goal.map(|goal| goal.fact), Some("attackPlayer".to_owned()));
    assert_ne!(second_goal.map(|goal| goal.fact), Some("attackPlayer".to_owned()));

    let facts: FactStore = second.handle().query_facts().await.unwrap();
    assert_eq!(facts.peek("foundPlayer"), Some(false));

    first.shutdown().await.unwrap();
    second.shutdown().await.unwrap();
}
