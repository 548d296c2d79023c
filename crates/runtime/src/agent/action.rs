//! Data-driven action whose world behaviour is delegated to the host.

use goap_core::{Action, ActionSpec, ActionState, BoxedAction};

use super::host::AgentHost;

/// An [`ActionSpec`] executed through an [`AgentHost`].
///
/// Proximity actions ask the host for a target during the feasibility check
/// and are infeasible without one; the host may then price the action for the
/// current cycle. Performing hands the spec and target to
/// [`AgentHost::perform`] and completes the action on success.
#[derive(Clone, Debug)]
pub struct HostedAction {
    spec: ActionSpec,
    state: ActionState,
}

impl HostedAction {
    pub fn new(spec: ActionSpec) -> Self {
        let state = ActionState::new(spec.cost);
        Self { spec, state }
    }

    pub fn boxed<C: AgentHost>(spec: ActionSpec) -> BoxedAction<C> {
        Box::new(Self::new(spec))
    }
}

impl<C: AgentHost> Action<C> for HostedAction {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut ActionSpec {
        &mut self.spec
    }

    fn state(&self) -> &ActionState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActionState {
        &mut self.state
    }

    fn check_feasible(&mut self, ctx: &mut C) -> bool {
        if !self.spec.requires_proximity {
            return true;
        }
        let Some(target) = ctx.find_target(&self.spec) else {
            self.state.target = None;
            return false;
        };
        self.state.target = Some(target);
        if let Some(cost) = ctx.estimate_cost(&self.spec, target) {
            self.state.cost = cost;
        }
        true
    }

    fn perform(&mut self, ctx: &mut C) -> bool {
        if self.state.cost_too_high {
            return false;
        }
        if !ctx.perform(&self.spec, self.state.target) {
            return false;
        }
        self.state.done = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use goap_core::TargetId;

    use super::*;
    use crate::agent::host::MoveOutcome;

    #[derive(Default)]
    struct Host {
        target: Option<TargetId>,
        travel: Option<f32>,
        refuse: bool,
        performed: Vec<String>,
    }

    impl AgentHost for Host {
        fn find_target(&mut self, _action: &ActionSpec) -> Option<TargetId> {
            self.target
        }

        fn estimate_cost(&mut self, _action: &ActionSpec, _target: TargetId) -> Option<f32> {
            self.travel
        }

        fn move_agent(&mut self, _target: TargetId, _dt: f32) -> MoveOutcome {
            MoveOutcome::Arrived
        }

        fn perform(&mut self, action: &ActionSpec, _target: Option<TargetId>) -> bool {
            self.performed.push(action.name.clone());
            !self.refuse
        }
    }

    #[test]
    fn proximity_action_needs_a_target() {
        let mut action = HostedAction::new(ActionSpec::new("GetItem").with_proximity(true));
        let mut host = Host::default();
        assert!(!action.check_feasible(&mut host));

        host.target = Some(TargetId(4));
        assert!(action.check_feasible(&mut host));
        assert_eq!(Action::<Host>::target(&action), Some(TargetId(4)));
    }

    #[test]
    fn host_prices_the_action_per_cycle() {
        let mut action = HostedAction::new(
            ActionSpec::new("MoveToSighting")
                .with_cost(-1.0)
                .with_proximity(true),
        );
        let mut host = Host {
            target: Some(TargetId(2)),
            travel: Some(6.5),
            ..Host::default()
        };
        assert!(action.check_feasible(&mut host));
        assert_eq!(Action::<Host>::cost(&action), 6.5);

        Action::<Host>::reset(&mut action);
        host.travel = None;
        assert!(action.check_feasible(&mut host));
        assert_eq!(Action::<Host>::cost(&action), -1.0);
    }

    #[test]
    fn symbolic_action_is_always_feasible() {
        let mut action = HostedAction::new(ActionSpec::new("AimAtPlayer"));
        assert!(action.check_feasible(&mut Host::default()));
    }

    #[test]
    fn host_refusal_fails_perform() {
        let mut action = HostedAction::new(ActionSpec::new("UseItem"));
        let mut host = Host {
            refuse: true,
            ..Host::default()
        };
        assert!(!action.perform(&mut host));
        assert!(!Action::<Host>::is_done(&action));

        host.refuse = false;
        assert!(action.perform(&mut host));
        assert!(Action::<Host>::is_done(&action));
        assert_eq!(host.performed, vec!["UseItem", "UseItem"]);
    }
}
