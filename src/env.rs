use crate::*;
use rand::prelude::*;
use serde_json::json;

/// A hallway domain simulator exposing the reset/step protocol.
///
/// The true state is hidden from the agent: `reset` and `step` only return
/// observations. An episode starts in a uniformly drawn non-goal state and ends
/// on reaching the goal (terminated) or after `max_steps` steps (truncated).
#[derive(Debug, Clone)]
pub struct HallwayEnv {
    name: String,
    model: HallwayModel,
    action_space: DiscreteSpace,
    observation_space: DiscreteSpace,
    state_space: DiscreteSpace,
    rng: StdRng,
    state: Option<Discrete>,
    num_steps: usize,
    done: bool,
}

impl HallwayEnv {
    pub fn new(name: &str, model: HallwayModel, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            name: name.to_string(),
            action_space: DiscreteSpace::new(model.action_set().len()),
            observation_space: DiscreteSpace::new(model.layout().n_observations()),
            state_space: DiscreteSpace::new(model.layout().n_states()),
            model,
            rng,
            state: None,
            num_steps: 0,
            done: false,
        }
    }

    pub fn hallway(config: HallwayConfig) -> Result<Self> {
        let model = HallwayModel::new(Layout::hallway(), ActionSet::Full, config)?;
        Ok(Self::new(HALLWAY_ID, model, None))
    }

    pub fn hallway_simple(config: HallwayConfig) -> Result<Self> {
        let model = HallwayModel::new(Layout::hallway(), ActionSet::Simple, config)?;
        Ok(Self::new(HALLWAY_SIMPLE_ID, model, None))
    }

    pub fn hallway2(config: HallwayConfig) -> Result<Self> {
        let model = HallwayModel::new(Layout::hallway2(), ActionSet::Full, config)?;
        Ok(Self::new(HALLWAY2_ID, model, None))
    }

    pub fn model(&self) -> &HallwayModel {
        &self.model
    }

    pub fn state_space(&self) -> &DiscreteSpace {
        &self.state_space
    }

    /// The hidden state, `None` until the first reset.
    pub fn state(&self) -> Option<Discrete> {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.num_steps
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn max_steps(&self) -> usize {
        self.model.config().max_steps
    }
}

impl Env for HallwayEnv {
    fn name(&self) -> &str {
        &self.name
    }

    fn action_space(&self) -> &DiscreteSpace {
        &self.action_space
    }

    fn observation_space(&self) -> &DiscreteSpace {
        &self.observation_space
    }

    fn reward_range(&self) -> (Continous, Continous) {
        (0., 1.)
    }

    fn reset(&mut self, seed: Option<u64>) -> Discrete {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let starts: Vec<_> = self.model.layout().non_terminal_states().collect();
        let s = starts[self.rng.gen_range(0..starts.len())];
        self.state = Some(s);
        self.num_steps = 0;
        self.done = false;

        let obs = self.model.observe(&mut self.rng, s);
        tracing::debug!(env = %self.name, start = s, obs, "reset");

        obs
    }

    fn step(&mut self, action: Discrete) -> Result<StepInfo> {
        if !self.action_space.contains(&action) {
            return Err(EnvError::InvalidAction {
                action,
                n: self.action_space.n,
            });
        }
        let s = self.state.ok_or(EnvError::ResetNeeded)?;
        if self.done {
            return Err(EnvError::EpisodeEnded);
        }

        let name = self.model.action_set().action(action)?.as_str();
        let s_prime = self.model.sample_next_state(&mut self.rng, s, action)?;
        self.state = Some(s_prime);
        self.num_steps += 1;

        let observation = self.model.observe(&mut self.rng, s_prime);
        let reward = self.model.reward(s_prime);
        let terminated = self.model.layout().is_goal(s_prime);
        let truncated = !terminated && self.num_steps >= self.max_steps();
        self.done = terminated || truncated;

        tracing::trace!(env = %self.name, s, action = name, s_prime, observation, "step");
        if self.done {
            tracing::debug!(
                env = %self.name,
                steps = self.num_steps,
                terminated,
                truncated,
                "episode ended"
            );
        }

        Ok(StepInfo {
            observation,
            reward,
            truncated,
            terminated,
            info: json!({ "state": s_prime, "steps": self.num_steps }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> HallwayEnv {
        HallwayEnv::hallway(HallwayConfig::default()).unwrap()
    }

    #[test]
    fn step_before_reset_needs_reset() {
        assert!(matches!(env().step(1), Err(EnvError::ResetNeeded)));
    }

    #[test]
    fn invalid_action_is_rejected_without_side_effects() {
        let mut env = env();
        env.reset(Some(2718));
        let s = env.state();
        assert!(matches!(
            env.step(5),
            Err(EnvError::InvalidAction { action: 5, n: 5 })
        ));
        assert_eq!(env.state(), s);
        assert_eq!(env.steps(), 0);
    }

    #[test]
    fn reset_never_starts_in_the_goal() {
        let mut env = env();
        for seed in 0..500 {
            env.reset(Some(seed));
            assert_ne!(env.state(), Some(48));
        }
    }

    #[test]
    fn seeded_resets_reproduce_trajectories() {
        let run = |seed| {
            let mut env = env();
            let mut trace = vec![env.reset(Some(seed))];
            for a in [1, 2, 1, 3, 4, 1, 0, 1] {
                match env.step(a) {
                    Ok(si) => trace.push(si.observation),
                    Err(_) => break,
                }
            }
            (trace, env.state())
        };

        assert_eq!(run(31415), run(31415));
    }

    #[test]
    fn info_reports_hidden_state_and_steps() {
        let mut env = env();
        env.reset(Some(7));
        let si = env.step(0).unwrap();
        assert_eq!(si.info["state"], json!(env.state().unwrap()));
        assert_eq!(si.info["steps"], json!(1));
    }

    #[test]
    fn stepping_after_truncation_fails() {
        let config = HallwayConfig {
            max_steps: 1,
            ..Default::default()
        };
        let mut env = HallwayEnv::hallway2(config).unwrap();
        env.reset(Some(1));
        let si = env.step(0).unwrap();
        assert!(si.truncated && !si.terminated);
        assert!(matches!(env.step(0), Err(EnvError::EpisodeEnded)));

        env.reset(None);
        assert!(env.step(0).is_ok());
    }

    #[test]
    fn reaching_the_goal_on_the_last_step_terminates() {
        let config = HallwayConfig {
            max_steps: 1,
            ..HallwayConfig::deterministic()
        };
        let mut env = HallwayEnv::hallway(config).unwrap();
        // First seed that starts next to the goal, facing it.
        let seed = (0..)
            .find(|&seed| {
                env.reset(Some(seed));
                env.state() == Some(46)
            })
            .unwrap();
        env.reset(Some(seed));

        let si = env.step(1).unwrap();
        assert!(si.terminated && !si.truncated);
        assert_eq!(si.reward, 1.);
        assert_eq!(si.observation, env.model().layout().goal_observation());
        assert!(env.is_done());
        assert!(matches!(env.step(1), Err(EnvError::EpisodeEnded)));
    }

    #[test]
    fn rewards_lie_in_the_reward_range() {
        let mut env = env();
        let (lo, hi) = env.reward_range();
        env.reset(Some(3));
        for a in [1, 2, 1, 1, 3, 1] {
            let si = env.step(a).unwrap();
            assert!(lo <= si.reward && si.reward <= hi);
            if si.done() {
                break;
            }
        }
        assert_eq!((lo, hi), (0., 1.));
    }
}
