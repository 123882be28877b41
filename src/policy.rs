use crate::*;
use rand::prelude::*;
use std::marker::PhantomData;

/// Samples actions uniformly, ignoring its input.
pub struct RandomPolicy<O> {
    action_space: DiscreteSpace,
    rng: StdRng,
    _input: PhantomData<O>,
}

impl<O: Space> RandomPolicy<O> {
    pub fn new(action_space: DiscreteSpace, seed: u64) -> Self {
        Self {
            action_space,
            rng: StdRng::seed_from_u64(seed),
            _input: PhantomData,
        }
    }
}

impl<O: Space> Policy<O, DiscreteSpace> for RandomPolicy<O> {
    fn policy(&mut self, _s: &O::Item) -> Discrete {
        self.action_space.sample(&mut self.rng)
    }
}

/// Shortest path to the goal, given the true state. Ties are broken at random.
pub struct OptimalPolicy {
    optimal_actions: Vec<Vec<Discrete>>,
    fallback: Discrete,
    rng: StdRng,
}

impl OptimalPolicy {
    pub fn new(model: &HallwayModel, seed: u64) -> Result<Self> {
        let optimal_actions = (0..model.n_s())
            .map(|s| model.optimal_actions(s))
            .collect::<Result<Vec<_>>>()?;
        let fallback = model
            .action_set()
            .index_of(Action::Forward)
            .unwrap_or_default();

        Ok(Self {
            optimal_actions,
            fallback,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Policy<DiscreteSpace, DiscreteSpace> for OptimalPolicy {
    fn policy(&mut self, s: &Discrete) -> Discrete {
        self.optimal_actions
            .get(*s)
            .and_then(|actions| actions.choose(&mut self.rng))
            .copied()
            .unwrap_or(self.fallback)
    }
}
