use crate::common::utils::{decode_observation, encode_observation, N_WALL_OBSERVATIONS};
use crate::sampling::pick_next;
use crate::*;
use itertools::iproduct;
use ndarray::{Array2, Array3, Axis};
use rand::Rng;
use std::collections::VecDeque;

/// Partially Observable Markov Decision Process with a discrete state, action
/// and observation space.
pub trait Pomdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    fn n_o(&self) -> usize;

    fn transitions(&self) -> Transitions;

    /// Distribution over observations on arriving in `s`.
    fn observation_probabilities(&self, s: Discrete) -> Result<Vec<Continous>>;
}

/// The explicit transition, observation and reward model of a hallway layout.
#[derive(Debug, Clone)]
pub struct HallwayModel {
    layout: Layout,
    action_set: ActionSet,
    config: HallwayConfig,
    /// Noise free successor, indexed by state then action.
    next: Vec<Vec<Discrete>>,
    walls: Vec<[bool; 4]>,
    distances: Vec<Option<usize>>,
}

impl HallwayModel {
    pub fn new(layout: Layout, action_set: ActionSet, config: HallwayConfig) -> Result<Self> {
        config.validate()?;

        let next = (0..layout.n_states())
            .map(|s| {
                action_set
                    .actions()
                    .iter()
                    .map(|&action| successor(&layout, s, action))
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| EnvError::InvalidLayout("missing successors".into()))?;
        let walls = (0..layout.n_states())
            .map(|s| layout.walls(s))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| EnvError::InvalidLayout("missing walls".into()))?;
        let distances = goal_distances(&next, layout.goal());

        Ok(Self {
            layout,
            action_set,
            config,
            next,
            walls,
            distances,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn action_set(&self) -> ActionSet {
        self.action_set
    }

    pub fn config(&self) -> &HallwayConfig {
        &self.config
    }

    pub fn check_state(&self, s: Discrete) -> Result<()> {
        if s < self.layout.n_states() {
            Ok(())
        } else {
            Err(EnvError::InvalidState {
                state: s,
                n: self.layout.n_states(),
            })
        }
    }

    /// Deterministic next state for taking action `a` in state `s`.
    pub fn act(&self, s: Discrete, a: Discrete) -> Result<Discrete> {
        self.check_state(s)?;
        self.action_set.action(a)?;
        Ok(self.next[s][a])
    }

    /// Successor states of `s` under `a` with their probabilities.
    ///
    /// The intended action succeeds with `prob_action_success`, otherwise one of the
    /// other actions of the set is executed instead. "Stay" never fails and the goal
    /// is absorbing.
    pub fn transition_probabilities(
        &self,
        s: Discrete,
        a: Discrete,
    ) -> Result<Vec<(Discrete, Continous)>> {
        self.act(s, a)?;
        Ok(self.successors(s, a))
    }

    /// Unchecked `transition_probabilities`: `s` and `a` are in range.
    fn successors(&self, s: Discrete, a: Discrete) -> Vec<(Discrete, Continous)> {
        let intended = self.next[s][a];
        if self.layout.is_goal(s) || self.action_set.actions()[a] == Action::Stay {
            return vec![(intended, 1.)];
        }

        let p = self.config.prob_action_success;
        let p_other = (1. - p) / (self.action_set.len() - 1) as Continous;

        let mut out = vec![(intended, p)];
        for b in self.action_set.alternatives(a) {
            let s_prime = self.next[s][b];
            match out.iter_mut().find(|(x, _)| *x == s_prime) {
                Some((_, q)) => *q += p_other,
                None => out.push((s_prime, p_other)),
            }
        }
        out.retain(|&(_, q)| q > 0.);

        out
    }

    /// Rewards are given for arriving in the goal.
    pub fn reward(&self, s_prime: Discrete) -> Continous {
        if self.layout.is_goal(s_prime) { 1. } else { 0. }
    }

    /// T[a, s, s'].
    pub fn transition_matrix(&self) -> Array3<Continous> {
        let n_s = self.layout.n_states();
        let mut t = Array3::<Continous>::zeros((self.action_set.len(), n_s, n_s));
        for (a, s) in iproduct!(0..self.action_set.len(), 0..n_s) {
            for (s_prime, p) in self.successors(s, a) {
                t[[a, s, s_prime]] += p;
            }
        }

        t
    }

    /// O[s', o].
    pub fn observation_matrix(&self) -> Array2<Continous> {
        let shape = (self.layout.n_states(), self.layout.n_observations());
        let mut o = Array2::<Continous>::zeros(shape);
        for (s, mut row) in o.axis_iter_mut(Axis(0)).enumerate() {
            for (i, p) in self.observation_distribution(s).into_iter().enumerate() {
                row[i] = p;
            }
        }

        o
    }

    /// Probability of each observation after taking `a` in each state, i.e. T[a] . O.
    pub fn predicted_observations(&self, a: Discrete) -> Result<Array2<Continous>> {
        self.action_set.action(a)?;

        let n_s = self.layout.n_states();
        let mut t_a = Array2::<Continous>::zeros((n_s, n_s));
        for s in 0..n_s {
            for (s_prime, p) in self.successors(s, a) {
                t_a[[s, s_prime]] += p;
            }
        }

        Ok(t_a.dot(&self.observation_matrix()))
    }

    fn observation_distribution(&self, s: Discrete) -> Vec<Continous> {
        let mut probs = vec![0.; self.layout.n_observations()];

        if let Some(o) = self.fixed_observation(s) {
            probs[o] = 1.;
            return probs;
        }

        let walls = self.walls[s];
        for (o, p) in probs.iter_mut().enumerate().take(N_WALL_OBSERVATIONS) {
            let Some(seen) = decode_observation(o) else {
                continue;
            };
            *p = walls
                .iter()
                .zip(seen)
                .map(|(&wall, seen)| {
                    let p_see = self.p_see(wall);
                    if seen { p_see } else { 1. - p_see }
                })
                .product();
        }

        probs
    }

    /// Probability to perceive a wall, depending on whether there is one.
    fn p_see(&self, wall: bool) -> Continous {
        if wall {
            self.config.prob_see_wall_true
        } else {
            self.config.prob_see_wall_false
        }
    }

    /// Goal and landmark states are observed without noise.
    fn fixed_observation(&self, s: Discrete) -> Option<Discrete> {
        if self.layout.is_goal(s) {
            Some(self.layout.goal_observation())
        } else {
            self.layout.landmark_observation(s)
        }
    }

    pub fn sample_next_state<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        s: Discrete,
        a: Discrete,
    ) -> Result<Discrete> {
        let ts = self.transition_probabilities(s, a)?;
        pick_next(rng, &ts)
    }

    /// Samples the observation for arriving in `s`, perceiving each wall independently.
    pub fn sample_observation<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        s: Discrete,
    ) -> Result<Discrete> {
        self.check_state(s)?;
        Ok(self.observe(rng, s))
    }

    pub(crate) fn observe<R: Rng + ?Sized>(&self, rng: &mut R, s: Discrete) -> Discrete {
        if let Some(o) = self.fixed_observation(s) {
            return o;
        }

        let walls = self.walls[s];
        let seen = walls.map(|wall| rng.gen::<f64>() < self.p_see(wall));
        encode_observation(&seen)
    }

    /// Fewest actions needed to reach the goal from `s` with noise free dynamics.
    pub fn distance_to_goal(&self, s: Discrete) -> Option<usize> {
        self.distances.get(s).copied().flatten()
    }

    /// Actions on a shortest path to the goal. Empty for the goal itself.
    pub fn optimal_actions(&self, s: Discrete) -> Result<Vec<Discrete>> {
        self.check_state(s)?;
        let Some(d) = self.distance_to_goal(s).filter(|&d| d > 0) else {
            return Ok(vec![]);
        };

        let actions = (0..self.action_set.len())
            .filter(|&a| {
                let s_prime = self.next[s][a];
                s_prime != s && self.distance_to_goal(s_prime) == Some(d - 1)
            })
            .collect();

        Ok(actions)
    }
}

fn successor(layout: &Layout, s: Discrete, action: Action) -> Option<Discrete> {
    match action {
        Action::Stay => layout.pose(s).map(|_| s),
        Action::Forward => layout.forward(s),
        turn => layout.turn(s, turn.rotation()),
    }
}

/// Breadth first search backwards from the goal over the noise free successors.
fn goal_distances(next: &[Vec<Discrete>], goal: Discrete) -> Vec<Option<usize>> {
    let mut predecessors = vec![vec![]; next.len()];
    for (s, successors) in next.iter().enumerate() {
        for &s_prime in successors.iter().filter(|&&s_prime| s_prime != s) {
            predecessors[s_prime].push(s);
        }
    }

    let mut dist = vec![None; next.len()];
    dist[goal] = Some(0);
    let mut queue = VecDeque::from([(goal, 0)]);
    while let Some((s, d)) = queue.pop_front() {
        for &prev in &predecessors[s] {
            if dist[prev].is_none() {
                dist[prev] = Some(d + 1);
                queue.push_back((prev, d + 1));
            }
        }
    }

    dist
}

impl Pomdp for HallwayModel {
    fn n_s(&self) -> usize {
        self.layout.n_states()
    }

    fn n_a(&self) -> usize {
        self.action_set.len()
    }

    fn n_o(&self) -> usize {
        self.layout.n_observations()
    }

    fn transitions(&self) -> Transitions {
        iproduct!(0..self.n_s(), 0..self.n_a())
            .map(|(s, a)| {
                let ts = self
                    .successors(s, a)
                    .into_iter()
                    .map(|(next_state, probability)| Transition {
                        next_state,
                        probability,
                        reward: self.reward(next_state),
                        done: self.layout.is_goal(next_state),
                    })
                    .collect();
                ((s, a), ts)
            })
            .collect()
    }

    fn observation_probabilities(&self, s: Discrete) -> Result<Vec<Continous>> {
        self.check_state(s)?;
        Ok(self.observation_distribution(s))
    }
}
