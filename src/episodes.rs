use crate::*;
use serde::{Deserialize, Serialize};

/// One step of an episode: the hidden state and observation arrived in, the action
/// that led there (`None` after a reset) and the reward received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub o: Discrete,
    pub a: Option<Discrete>,
    pub r: Continous,
}

impl EpisodeEvent {
    pub fn new(s: Discrete, o: Discrete, a: Option<Discrete>, r: Continous) -> Self {
        Self { s, o, a, r }
    }
}

pub trait EpisodeGenerator {
    fn generate(&mut self, n: usize, seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>>;
}

/// What a policy gets to see while rolling out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observability {
    /// Noisy observations, as in the POMDP.
    Observation,
    /// The true state, turning the POMDP into its underlying MDP.
    State,
}

pub struct Rollout<P> {
    env: HallwayEnv,
    policy: P,
    observability: Observability,
}

impl<P: Policy<DiscreteSpace, DiscreteSpace>> Rollout<P> {
    pub fn new(env: HallwayEnv, policy: P, observability: Observability) -> Self {
        Self {
            env,
            policy,
            observability,
        }
    }

    pub fn env(&self) -> &HallwayEnv {
        &self.env
    }

    fn run_episode(&mut self, seed: Option<u64>) -> Result<Vec<EpisodeEvent>> {
        let mut o = self.env.reset(seed);
        let mut s = self.env.state().ok_or(EnvError::ResetNeeded)?;
        let mut ep = vec![EpisodeEvent::new(s, o, None, 0.)];

        loop {
            let input = match self.observability {
                Observability::Observation => o,
                Observability::State => s,
            };
            let a = self.policy.policy(&input);
            let si = self.env.step(a)?;
            o = si.observation;
            s = self.env.state().ok_or(EnvError::ResetNeeded)?;
            ep.push(EpisodeEvent::new(s, o, Some(a), si.reward));

            if si.done() {
                break;
            }
        }

        Ok(ep)
    }
}

impl<P: Policy<DiscreteSpace, DiscreteSpace>> EpisodeGenerator for Rollout<P> {
    /// The seed, if any, is applied to the first reset only, so the whole batch is reproducible.
    fn generate(&mut self, n: usize, seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>> {
        (0..n)
            .map(|i| self.run_episode(if i == 0 { seed } else { None }))
            .collect()
    }
}

pub fn total_reward(ep: &[EpisodeEvent]) -> Continous {
    ep.iter().map(|e| e.r).sum()
}

pub fn episodes_to_json(eps: &[Vec<EpisodeEvent>]) -> Result<String> {
    Ok(serde_json::to_string(eps)?)
}

pub fn episodes_from_json(json: &str) -> Result<Vec<Vec<EpisodeEvent>>> {
    Ok(serde_json::from_str::<Vec<Vec<EpisodeEvent>>>(json)?)
}
