use crate::*;
use rand::Rng;

pub trait Space {
    type Item;

    fn contains(&self, item: &Self::Item) -> bool;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Item;
}

/// Refer: https://gymnasium.farama.org/api/spaces/fundamental/#discrete
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DiscreteSpace {
    pub n: usize,
}

impl DiscreteSpace {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

impl Space for DiscreteSpace {
    type Item = Discrete;

    fn contains(&self, item: &Discrete) -> bool {
        *item < self.n
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Discrete {
        rng.gen_range(0..self.n)
    }
}

pub trait Policy<O: Space, A: Space> {
    fn policy(&mut self, s: &O::Item) -> A::Item;
}
